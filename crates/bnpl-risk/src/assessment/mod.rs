//! BNPL applicant assessment: feature derivation, model scoring, decision
//! banding, and attribution-based explanations.

pub mod batch;
mod context;
pub mod domain;
pub mod evaluation;
pub mod features;
pub mod model;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use batch::{BatchAssessor, BatchImportError, BatchReport, BatchRowError, BatchSummary};
pub use context::AssessmentContext;
pub use domain::{ApplicantInput, EmploymentStatus, InstallmentPlan, ValidationError};
pub use evaluation::{
    evaluate, rank_attributions, ApprovalCondition, Decision, DecisionEngine, DecisionPolicy,
    EvaluationResult, FeatureAttribution, Impact, PolicyError, RiskLevel, RiskReason,
};
pub use features::{
    derive_features, DerivedFeatures, DerivedRatios, FeatureSchema, FeatureVector,
    SchemaMismatchError,
};
pub use model::{
    ArtifactError, Attributor, IntegrationError, LogisticScorer, ModelArtifacts, Scorer,
};
pub use router::assessment_router;
pub use service::{Assessment, AssessmentError, ModelInfo, RiskAssessmentService};
pub use views::{AssessmentView, AttributionView};
