use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 70;

/// Raw applicant fields captured once per assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    pub age: u8,
    pub monthly_income: f64,
    pub purchase_amount: f64,
    pub installments: InstallmentPlan,
    pub employment_status: EmploymentStatus,
    pub avg_overdue_days: f64,
    pub missed_payments: f64,
    pub previous_bnpl_loans: f64,
}

impl ApplicantInput {
    /// Reject inputs outside the documented domain before any feature is derived.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ValidationError::AgeOutOfRange { age: self.age });
        }

        let amounts = [
            ("monthly_income", self.monthly_income),
            ("purchase_amount", self.purchase_amount),
            ("avg_overdue_days", self.avg_overdue_days),
            ("missed_payments", self.missed_payments),
            ("previous_bnpl_loans", self.previous_bnpl_loans),
        ];

        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ValidationError::Negative { field, value });
            }
        }

        Ok(())
    }
}

/// Supported repayment schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InstallmentPlan {
    Three,
    Six,
    Nine,
    Twelve,
}

impl InstallmentPlan {
    pub const ALL: [InstallmentPlan; 4] = [
        InstallmentPlan::Three,
        InstallmentPlan::Six,
        InstallmentPlan::Nine,
        InstallmentPlan::Twelve,
    ];

    pub const fn count(self) -> u8 {
        match self {
            InstallmentPlan::Three => 3,
            InstallmentPlan::Six => 6,
            InstallmentPlan::Nine => 9,
            InstallmentPlan::Twelve => 12,
        }
    }
}

impl TryFrom<u8> for InstallmentPlan {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|plan| plan.count() == value)
            .ok_or(ValidationError::UnsupportedInstallments(value))
    }
}

impl From<InstallmentPlan> for u8 {
    fn from(plan: InstallmentPlan) -> Self {
        plan.count()
    }
}

/// Employment category; salaried applicants are the model baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Salaried,
    #[serde(rename = "Self-Employed", alias = "SelfEmployed", alias = "self_employed")]
    SelfEmployed,
    Unemployed,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Salaried => "Salaried",
            EmploymentStatus::SelfEmployed => "Self-Employed",
            EmploymentStatus::Unemployed => "Unemployed",
        }
    }
}

impl FromStr for EmploymentStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "salaried" => Ok(Self::Salaried),
            "selfemployed" => Ok(Self::SelfEmployed),
            "unemployed" => Ok(Self::Unemployed),
            _ => Err(ValidationError::UnknownEmploymentStatus(
                value.trim().to_string(),
            )),
        }
    }
}

/// Input outside the documented applicant domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("age {age} is outside the supported range of 18 to 70")]
    AgeOutOfRange { age: u8 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must not be negative (found {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("unsupported installment count {0}; expected 3, 6, 9 or 12")]
    UnsupportedInstallments(u8),
    #[error("unknown employment status '{0}'")]
    UnknownEmploymentStatus(String),
}
