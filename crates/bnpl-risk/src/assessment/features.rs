use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::{ApplicantInput, EmploymentStatus, ValidationError};

/// Floor applied to income and purchase amounts before they are used as divisors.
pub const EPSILON: f64 = 1e-6;

pub const AGE: &str = "age";
pub const MONTHLY_INCOME: &str = "monthly_income";
pub const PURCHASE_AMOUNT: &str = "purchase_amount";
pub const INSTALLMENTS: &str = "installments";
pub const PREVIOUS_BNPL_LOANS: &str = "previous_bnpl_loans";
pub const AVG_OVERDUE_DAYS: &str = "avg_overdue_days";
pub const MISSED_PAYMENTS: &str = "missed_payments";
pub const IS_SELF_EMPLOYED: &str = "employment_status_Self-Employed";
pub const IS_UNEMPLOYED: &str = "employment_status_Unemployed";
pub const INCOME_PURCHASE_RATIO: &str = "income_purchase_ratio";
pub const INSTALLMENT_AMOUNT: &str = "installment_amount";
pub const INSTALLMENT_TO_INCOME: &str = "installment_to_income";
pub const PAYMENT_RISK_SCORE: &str = "payment_risk_score";

/// Every feature the deriver can produce, in canonical order.
pub const ASSEMBLED_FEATURES: [&str; 13] = [
    AGE,
    MONTHLY_INCOME,
    PURCHASE_AMOUNT,
    INSTALLMENTS,
    PREVIOUS_BNPL_LOANS,
    AVG_OVERDUE_DAYS,
    MISSED_PAYMENTS,
    IS_SELF_EMPLOYED,
    IS_UNEMPLOYED,
    INCOME_PURCHASE_RATIO,
    INSTALLMENT_AMOUNT,
    INSTALLMENT_TO_INCOME,
    PAYMENT_RISK_SCORE,
];

/// Ordered feature names a scorer expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Result<Self, SchemaMismatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaMismatchError::Empty);
        }

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SchemaMismatchError::DuplicateFeature(name.clone()));
            }
        }

        Ok(Self { names })
    }

    /// Schema listing all assembled features in canonical order.
    pub fn canonical() -> Self {
        Self {
            names: ASSEMBLED_FEATURES.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Confirm every declared name is one the deriver produces.
    pub fn ensure_derivable(&self) -> Result<(), SchemaMismatchError> {
        match self
            .names
            .iter()
            .find(|name| !ASSEMBLED_FEATURES.contains(&name.as_str()))
        {
            Some(unknown) => Err(SchemaMismatchError::UnknownFeature(unknown.clone())),
            None => Ok(()),
        }
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = SchemaMismatchError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.names
    }
}

/// Assembled feature set disagrees with the scorer's declared schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMismatchError {
    #[error("model schema declares feature '{0}' that is not derived from applicant input")]
    UnknownFeature(String),
    #[error("model schema lists feature '{0}' more than once")]
    DuplicateFeature(String),
    #[error("model schema declares no features")]
    Empty,
}

/// Ratios computed from the raw applicant fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedRatios {
    pub income_purchase_ratio: f64,
    pub installment_amount: f64,
    pub installment_to_income: f64,
    pub payment_risk_score: f64,
}

impl DerivedRatios {
    pub fn from_input(input: &ApplicantInput) -> Self {
        let safe_income = input.monthly_income.max(EPSILON);
        let safe_purchase = input.purchase_amount.max(EPSILON);

        let installment_amount = input.purchase_amount / f64::from(input.installments.count());

        Self {
            income_purchase_ratio: safe_income / safe_purchase,
            installment_amount,
            installment_to_income: installment_amount / safe_income,
            payment_risk_score: 0.6 * input.avg_overdue_days + 0.4 * input.missed_payments,
        }
    }

    /// Finite inputs can still overflow here, e.g. a huge income over a zero purchase.
    pub fn ensure_finite(&self) -> Result<(), ValidationError> {
        let ratios = [
            (INCOME_PURCHASE_RATIO, self.income_purchase_ratio),
            (INSTALLMENT_AMOUNT, self.installment_amount),
            (INSTALLMENT_TO_INCOME, self.installment_to_income),
            (PAYMENT_RISK_SCORE, self.payment_risk_score),
        ];

        match ratios.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, _)) => Err(ValidationError::NotFinite { field }),
            None => Ok(()),
        }
    }
}

/// Feature values ordered to match a scorer's schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(|index| self.values[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Output of the feature deriver: the scorer-ready vector plus the ratios the
/// decision rules read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFeatures {
    pub vector: FeatureVector,
    pub ratios: DerivedRatios,
}

fn flag(set: bool) -> f64 {
    if set {
        1.0
    } else {
        0.0
    }
}

fn assemble(input: &ApplicantInput, ratios: &DerivedRatios) -> [(&'static str, f64); 13] {
    [
        (AGE, f64::from(input.age)),
        (MONTHLY_INCOME, input.monthly_income),
        (PURCHASE_AMOUNT, input.purchase_amount),
        (INSTALLMENTS, f64::from(input.installments.count())),
        (PREVIOUS_BNPL_LOANS, input.previous_bnpl_loans),
        (AVG_OVERDUE_DAYS, input.avg_overdue_days),
        (MISSED_PAYMENTS, input.missed_payments),
        (
            IS_SELF_EMPLOYED,
            flag(input.employment_status == EmploymentStatus::SelfEmployed),
        ),
        (
            IS_UNEMPLOYED,
            flag(input.employment_status == EmploymentStatus::Unemployed),
        ),
        (INCOME_PURCHASE_RATIO, ratios.income_purchase_ratio),
        (INSTALLMENT_AMOUNT, ratios.installment_amount),
        (INSTALLMENT_TO_INCOME, ratios.installment_to_income),
        (PAYMENT_RISK_SCORE, ratios.payment_risk_score),
    ]
}

/// Translate raw applicant fields into the exact vector `schema` declares.
pub fn derive_features(
    input: &ApplicantInput,
    schema: &FeatureSchema,
) -> Result<DerivedFeatures, SchemaMismatchError> {
    let ratios = DerivedRatios::from_input(input);
    let assembled = assemble(input, &ratios);

    let mut values = Vec::with_capacity(schema.len());
    for name in schema.names() {
        let value = assembled
            .iter()
            .find(|(key, _)| *key == name.as_str())
            .map(|(_, value)| *value)
            .ok_or_else(|| SchemaMismatchError::UnknownFeature(name.clone()))?;
        values.push(value);
    }

    Ok(DerivedFeatures {
        vector: FeatureVector {
            names: schema.names().to_vec(),
            values,
        },
        ratios,
    })
}
