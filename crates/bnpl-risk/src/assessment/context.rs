use std::sync::Arc;

use super::features::FeatureSchema;
use super::model::{ArtifactError, Attributor, LogisticScorer, ModelArtifacts, Scorer};

/// Read-only model resources loaded once at startup and shared by every
/// assessment.
#[derive(Clone)]
pub struct AssessmentContext {
    scorer: Arc<dyn Scorer>,
    attributor: Arc<dyn Attributor>,
    cutoff: f64,
    version: String,
}

impl AssessmentContext {
    /// Fails when the scorer's schema names a feature the deriver cannot
    /// produce or the cutoff is not a probability.
    pub fn new(
        scorer: Arc<dyn Scorer>,
        attributor: Arc<dyn Attributor>,
        cutoff: f64,
        version: impl Into<String>,
    ) -> Result<Self, ArtifactError> {
        scorer.schema().ensure_derivable()?;
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(ArtifactError::InvalidCutoff(cutoff));
        }

        Ok(Self {
            scorer,
            attributor,
            cutoff,
            version: version.into(),
        })
    }

    pub fn from_artifacts(artifacts: &ModelArtifacts) -> Result<Self, ArtifactError> {
        let model = Arc::new(LogisticScorer::from_artifacts(artifacts)?);
        Self::new(
            model.clone(),
            model,
            artifacts.cutoff,
            artifacts.version.clone(),
        )
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    pub fn attributor(&self) -> &dyn Attributor {
        self.attributor.as_ref()
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.scorer.schema()
    }

    /// Threshold shipped with the model; banding does not consult it.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl std::fmt::Debug for AssessmentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentContext")
            .field("version", &self.version)
            .field("cutoff", &self.cutoff)
            .field("schema", self.scorer.schema())
            .finish_non_exhaustive()
    }
}
