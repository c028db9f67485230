mod attribution;
mod config;
mod policy;
mod rules;

pub use attribution::{rank_attributions, FeatureAttribution, Impact};
pub use config::{DecisionPolicy, PolicyError};
pub use policy::{ApprovalCondition, Decision, RiskLevel, RiskReason};

use super::domain::ApplicantInput;
use super::features::{DerivedRatios, FeatureVector};
use rules::DecisionSignals;
use serde::{Deserialize, Serialize};

/// Stateless engine turning a default probability into a decision trail.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    policy: DecisionPolicy,
}

impl DecisionEngine {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Band the probability and collect recommendations and reasons. The
    /// result carries no attributions; see [`DecisionEngine::explain`].
    ///
    /// `probability` must lie within `[0, 1]`; NaN or out-of-range values are
    /// not banded meaningfully. [`RiskAssessmentService::assess`] rejects them
    /// before calling this.
    ///
    /// [`RiskAssessmentService::assess`]: crate::assessment::RiskAssessmentService::assess
    pub fn evaluate(
        &self,
        probability: f64,
        input: &ApplicantInput,
        ratios: &DerivedRatios,
    ) -> EvaluationResult {
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "probability {probability} outside [0, 1]"
        );
        let risk_level = policy::band_for(probability, &self.policy);
        let decision = risk_level.decision();
        let signals = DecisionSignals::new(input, ratios);

        let conditions = if self.policy.gate_conditions && decision != Decision::Conditional {
            Vec::new()
        } else {
            rules::conditions_for(&signals, &self.policy)
        };

        EvaluationResult {
            probability,
            risk_level,
            decision,
            conditions,
            reasons: rules::reasons_for(&signals, &self.policy),
            attributions: Vec::new(),
        }
    }

    /// Rank per-feature contributions aligned with `features`.
    pub fn explain(&self, features: &FeatureVector, values: &[f64]) -> Vec<FeatureAttribution> {
        rank_attributions(features.names(), values, self.policy.top_attributions)
    }
}

/// Evaluate with the default decision policy. `probability` must lie within
/// `[0, 1]`.
pub fn evaluate(probability: f64, input: &ApplicantInput, ratios: &DerivedRatios) -> EvaluationResult {
    DecisionEngine::default().evaluate(probability, input, ratios)
}

/// Decision trail for a single assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub decision: Decision,
    pub conditions: Vec<ApprovalCondition>,
    pub reasons: Vec<RiskReason>,
    pub attributions: Vec<FeatureAttribution>,
}
