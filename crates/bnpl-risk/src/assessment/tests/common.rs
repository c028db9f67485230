use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::domain::{ApplicantInput, EmploymentStatus, InstallmentPlan};
use crate::assessment::features::{
    DerivedRatios, FeatureSchema, FeatureVector, ASSEMBLED_FEATURES,
};
use crate::assessment::model::{Attributor, ModelArtifacts, Scorer};
use crate::assessment::{AssessmentContext, DecisionPolicy, RiskAssessmentService};

/// Salaried applicant with a clean history and a modest purchase.
pub(super) fn prime_applicant() -> ApplicantInput {
    ApplicantInput {
        age: 25,
        monthly_income: 50_000.0,
        purchase_amount: 20_000.0,
        installments: InstallmentPlan::Six,
        employment_status: EmploymentStatus::Salaried,
        avg_overdue_days: 0.0,
        missed_payments: 0.0,
        previous_bnpl_loans: 0.0,
    }
}

/// Applicant with a poor repayment record buying above their monthly income.
pub(super) fn stretched_applicant() -> ApplicantInput {
    ApplicantInput {
        age: 35,
        monthly_income: 50_000.0,
        purchase_amount: 90_000.0,
        installments: InstallmentPlan::Three,
        employment_status: EmploymentStatus::Salaried,
        avg_overdue_days: 20.0,
        missed_payments: 5.0,
        previous_bnpl_loans: 4.0,
    }
}

pub(super) fn ratios_with_burden(installment_to_income: f64) -> DerivedRatios {
    DerivedRatios {
        income_purchase_ratio: 1.0,
        installment_amount: 1_000.0,
        installment_to_income,
        payment_risk_score: 0.0,
    }
}

/// First seven canonical features, used where attribution fixtures have seven values.
pub(super) fn seven_feature_schema() -> FeatureSchema {
    FeatureSchema::new(ASSEMBLED_FEATURES[..7].iter().copied()).expect("valid schema")
}

pub(super) struct FixedScorer {
    pub(super) schema: FeatureSchema,
    pub(super) probability: f64,
}

impl Scorer for FixedScorer {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn score(&self, _features: &FeatureVector) -> f64 {
        self.probability
    }
}

/// Scorer that records the feature names it was handed.
pub(super) struct RecordingScorer {
    pub(super) schema: FeatureSchema,
    pub(super) seen: Mutex<Vec<Vec<String>>>,
}

impl RecordingScorer {
    pub(super) fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Scorer for RecordingScorer {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn score(&self, features: &FeatureVector) -> f64 {
        self.seen
            .lock()
            .expect("recording mutex poisoned")
            .push(features.names().to_vec());
        0.1
    }
}

pub(super) struct FixedAttributor {
    pub(super) values: Vec<f64>,
}

impl Attributor for FixedAttributor {
    fn attribute(&self, _features: &FeatureVector) -> Vec<f64> {
        self.values.clone()
    }
}

pub(super) fn service_with(
    schema: FeatureSchema,
    probability: f64,
    attributions: Vec<f64>,
) -> RiskAssessmentService {
    let context = AssessmentContext::new(
        Arc::new(FixedScorer {
            schema,
            probability,
        }),
        Arc::new(FixedAttributor {
            values: attributions,
        }),
        0.2,
        "fixed-test",
    )
    .expect("fixed context builds");
    RiskAssessmentService::new(context, DecisionPolicy::default())
}

pub(super) fn reference_service() -> RiskAssessmentService {
    let artifacts = ModelArtifacts::reference().expect("reference bundle parses");
    let context = AssessmentContext::from_artifacts(&artifacts).expect("reference context");
    RiskAssessmentService::new(context, DecisionPolicy::default())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
