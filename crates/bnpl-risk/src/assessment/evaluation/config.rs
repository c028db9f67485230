use serde::{Deserialize, Serialize};

/// Thresholds driving risk banding, recommendations, and risk reasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    /// Lowest probability banded as medium risk.
    pub medium_risk_from: f64,
    /// Lowest probability banded as high risk.
    pub high_risk_from: f64,
    pub reduce_installments_above_ratio: f64,
    pub max_reduced_installments: u8,
    pub purchase_income_share: f64,
    pub upfront_payment_pct: u8,
    pub high_installment_ratio: f64,
    pub overdue_days_limit: f64,
    pub missed_payments_limit: f64,
    pub previous_loans_limit: f64,
    pub top_attributions: usize,
    /// Only surface recommendations when the decision is a conditional approval.
    pub gate_conditions: bool,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            medium_risk_from: 0.15,
            high_risk_from: 0.30,
            reduce_installments_above_ratio: 0.30,
            max_reduced_installments: 6,
            purchase_income_share: 0.5,
            upfront_payment_pct: 20,
            high_installment_ratio: 0.35,
            overdue_days_limit: 10.0,
            missed_payments_limit: 2.0,
            previous_loans_limit: 3.0,
            top_attributions: 6,
            gate_conditions: false,
        }
    }
}

impl DecisionPolicy {
    /// Band thresholds must split `[0, 1]` into three non-empty bands.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let (medium, high) = (self.medium_risk_from, self.high_risk_from);
        if !(0.0 < medium && medium < high && high <= 1.0) {
            return Err(PolicyError::BandOrder { medium, high });
        }

        let thresholds = [
            (
                "reduce_installments_above_ratio",
                self.reduce_installments_above_ratio,
            ),
            ("purchase_income_share", self.purchase_income_share),
            ("high_installment_ratio", self.high_installment_ratio),
            ("overdue_days_limit", self.overdue_days_limit),
            ("missed_payments_limit", self.missed_payments_limit),
            ("previous_loans_limit", self.previous_loans_limit),
        ];
        if let Some((field, value)) = thresholds
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(PolicyError::Threshold { field, value });
        }

        if self.upfront_payment_pct > 100 {
            return Err(PolicyError::UpfrontPercent(self.upfront_payment_pct));
        }
        if self.top_attributions == 0 {
            return Err(PolicyError::NoAttributions);
        }

        Ok(())
    }
}

/// Decision policy that cannot produce a coherent decision trail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("risk bands need 0 < medium_risk_from ({medium}) < high_risk_from ({high}) <= 1")]
    BandOrder { medium: f64, high: f64 },
    #[error("{field} must be a finite, non-negative threshold (found {value})")]
    Threshold { field: &'static str, value: f64 },
    #[error("upfront payment of {0}% exceeds the purchase")]
    UpfrontPercent(u8),
    #[error("top_attributions must keep at least one feature")]
    NoAttributions,
}
