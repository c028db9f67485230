use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::context::AssessmentContext;
use super::domain::{ApplicantInput, ValidationError};
use super::evaluation::{DecisionEngine, DecisionPolicy, EvaluationResult};
use super::features::{derive_features, DerivedRatios, FeatureVector, SchemaMismatchError};
use super::model::IntegrationError;

/// Service composing the model context and the decision engine.
pub struct RiskAssessmentService {
    context: Arc<AssessmentContext>,
    engine: Arc<DecisionEngine>,
}

impl RiskAssessmentService {
    pub fn new(context: AssessmentContext, policy: DecisionPolicy) -> Self {
        Self {
            context: Arc::new(context),
            engine: Arc::new(DecisionEngine::new(policy)),
        }
    }

    pub fn context(&self) -> &AssessmentContext {
        &self.context
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Validate, derive, score, attribute, and decide for one applicant.
    pub fn assess(&self, input: &ApplicantInput) -> Result<Assessment, AssessmentError> {
        input.validate()?;

        let derived = derive_features(input, self.context.schema())?;
        derived.ratios.ensure_finite()?;
        let probability = self.context.scorer().score(&derived.vector);
        if !(0.0..=1.0).contains(&probability) {
            warn!(probability, model = self.context.version(), "scorer broke its contract");
            return Err(IntegrationError::ProbabilityOutOfRange(probability).into());
        }

        let contributions = self.context.attributor().attribute(&derived.vector);
        check_attributions(&derived.vector, &contributions)?;

        let mut result = self.engine.evaluate(probability, input, &derived.ratios);
        result.attributions = self.engine.explain(&derived.vector, &contributions);

        debug!(
            installment_to_income = derived.ratios.installment_to_income,
            payment_risk_score = derived.ratios.payment_risk_score,
            "derived applicant ratios"
        );
        info!(
            probability,
            risk_level = result.risk_level.label(),
            decision = result.decision.label(),
            "assessment completed"
        );

        Ok(Assessment {
            features: derived.vector,
            ratios: derived.ratios,
            result,
        })
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            version: self.context.version().to_string(),
            feature_names: self.context.schema().names().to_vec(),
            cutoff: self.context.cutoff(),
        }
    }
}

fn check_attributions(features: &FeatureVector, values: &[f64]) -> Result<(), IntegrationError> {
    if values.len() != features.len() {
        return Err(IntegrationError::AttributionLength {
            expected: features.len(),
            found: values.len(),
        });
    }

    match features
        .names()
        .iter()
        .zip(values)
        .find(|(_, value)| !value.is_finite())
    {
        Some((feature, _)) => Err(IntegrationError::NonFiniteAttribution {
            feature: feature.clone(),
        }),
        None => Ok(()),
    }
}

/// Completed assessment with the inputs the decision was made on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub features: FeatureVector,
    pub ratios: DerivedRatios,
    pub result: EvaluationResult,
}

/// Metadata describing the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub version: String,
    pub feature_names: Vec<String>,
    pub cutoff: f64,
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Schema(#[from] SchemaMismatchError),
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}
