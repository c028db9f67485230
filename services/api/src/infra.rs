use bnpl_risk::assessment::{
    AssessmentContext, DecisionPolicy, ModelArtifacts, RiskAssessmentService,
};
use bnpl_risk::config::AssessmentConfig;
use bnpl_risk::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the model bundle once and wires it to the configured decision policy.
pub(crate) fn build_service(config: &AssessmentConfig) -> Result<RiskAssessmentService, AppError> {
    let artifacts = match &config.artifacts_path {
        Some(path) => {
            info!(path = %path.display(), "loading model artifacts");
            ModelArtifacts::from_path(path)?
        }
        None => ModelArtifacts::reference()?,
    };

    let context = AssessmentContext::from_artifacts(&artifacts)?;
    let policy = DecisionPolicy {
        gate_conditions: config.gate_conditions,
        ..DecisionPolicy::default()
    };
    policy.validate()?;

    Ok(RiskAssessmentService::new(context, policy))
}
