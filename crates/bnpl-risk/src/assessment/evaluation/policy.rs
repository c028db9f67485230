use serde::{Deserialize, Serialize};

use super::config::DecisionPolicy;

/// Risk category assigned from the default probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW RISK",
            RiskLevel::Medium => "MEDIUM RISK",
            RiskLevel::High => "HIGH RISK",
        }
    }

    pub const fn decision(self) -> Decision {
        match self {
            RiskLevel::Low => Decision::Approve,
            RiskLevel::Medium => Decision::Conditional,
            RiskLevel::High => Decision::Reject,
        }
    }
}

/// Approval outcome for a BNPL purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Conditional,
    Reject,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::Approve => "APPROVE",
            Decision::Conditional => "CONDITIONAL APPROVAL",
            Decision::Reject => "REJECT",
        }
    }

    pub fn summary(self) -> String {
        match self {
            Decision::Approve => "Decision: APPROVED".to_string(),
            Decision::Conditional => "Decision: CONDITIONAL APPROVAL".to_string(),
            Decision::Reject => "Decision: REJECTED".to_string(),
        }
    }
}

/// Recommendation attached to a conditional approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalCondition {
    ReduceInstallments { max_installments: u8 },
    LowerPurchaseAmount,
    UpfrontPayment { percent: u8 },
}

impl ApprovalCondition {
    pub fn message(&self) -> String {
        match self {
            ApprovalCondition::ReduceInstallments { max_installments } => {
                format!("Reduce number of installments (max {max_installments})")
            }
            ApprovalCondition::LowerPurchaseAmount => "Lower purchase amount".to_string(),
            ApprovalCondition::UpfrontPayment { percent } => {
                format!("Require {percent}% upfront payment")
            }
        }
    }
}

/// Human-readable driver behind a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskReason {
    HighInstallmentBurden,
    FrequentPaymentDelays,
    MultipleMissedPayments,
    ExcessiveBnplHistory,
    NoMajorRiskFactors,
}

impl RiskReason {
    pub const fn message(self) -> &'static str {
        match self {
            RiskReason::HighInstallmentBurden => "Installment amount is high relative to income",
            RiskReason::FrequentPaymentDelays => "Frequent payment delays in past behavior",
            RiskReason::MultipleMissedPayments => "Multiple missed payments observed",
            RiskReason::ExcessiveBnplHistory => "High number of previous BNPL loans",
            RiskReason::NoMajorRiskFactors => "No major risk factors detected",
        }
    }
}

struct RiskBand {
    level: RiskLevel,
    contains: fn(f64, &DecisionPolicy) -> bool,
}

fn below_medium(probability: f64, policy: &DecisionPolicy) -> bool {
    probability < policy.medium_risk_from
}

fn below_high(probability: f64, policy: &DecisionPolicy) -> bool {
    probability < policy.high_risk_from
}

fn any_probability(_: f64, _: &DecisionPolicy) -> bool {
    true
}

// Half-open bands, first match wins.
const RISK_BANDS: [RiskBand; 3] = [
    RiskBand {
        level: RiskLevel::Low,
        contains: below_medium,
    },
    RiskBand {
        level: RiskLevel::Medium,
        contains: below_high,
    },
    RiskBand {
        level: RiskLevel::High,
        contains: any_probability,
    },
];

pub(crate) fn band_for(probability: f64, policy: &DecisionPolicy) -> RiskLevel {
    RISK_BANDS
        .iter()
        .find(|band| (band.contains)(probability, policy))
        .map(|band| band.level)
        .unwrap_or(RiskLevel::High)
}
