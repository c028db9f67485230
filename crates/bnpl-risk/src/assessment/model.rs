//! Contracts for the external scorer and attributor, plus the logistic
//! reference model loaded from a JSON artifact bundle.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::features::{FeatureSchema, FeatureVector, SchemaMismatchError};

const REFERENCE_ARTIFACTS: &str = include_str!("../../artifacts/reference_model.json");

/// Pre-trained classifier returning the probability of default.
pub trait Scorer: Send + Sync {
    /// Feature names (and their order) the scorer was trained on.
    fn schema(&self) -> &FeatureSchema;

    fn score(&self, features: &FeatureVector) -> f64;
}

/// Per-feature contributions to a single score, index-aligned with the vector.
pub trait Attributor: Send + Sync {
    fn attribute(&self, features: &FeatureVector) -> Vec<f64>;
}

/// Scorer or attributor output that breaks its contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntegrationError {
    #[error("scorer returned probability {0} outside [0, 1]")]
    ProbabilityOutOfRange(f64),
    #[error("attributor returned {found} values for {expected} features")]
    AttributionLength { expected: usize, found: usize },
    #[error("attributor returned a non-finite value for feature '{feature}'")]
    NonFiniteAttribution { feature: String },
}

/// Persisted model bundle: schema, cutoff, and logistic parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifacts {
    pub version: String,
    pub feature_names: FeatureSchema,
    pub cutoff: f64,
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
    pub baseline: BTreeMap<String, f64>,
}

impl ModelArtifacts {
    /// Bundle compiled into the crate, used when no artifact path is configured.
    pub fn reference() -> Result<Self, ArtifactError> {
        Self::from_reader(REFERENCE_ARTIFACTS.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifacts: Self = serde_json::from_reader(reader)?;
        if !(0.0..=1.0).contains(&artifacts.cutoff) {
            return Err(ArtifactError::InvalidCutoff(artifacts.cutoff));
        }
        Ok(artifacts)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read model artifacts: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid model artifact data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cutoff {0} must lie within [0, 1]")]
    InvalidCutoff(f64),
    #[error("model artifacts lack a coefficient for feature '{0}'")]
    MissingCoefficient(String),
    #[error("model artifacts lack a baseline value for feature '{0}'")]
    MissingBaseline(String),
    #[error(transparent)]
    Schema(#[from] SchemaMismatchError),
}

/// Logistic model whose attribution is each feature's log-odds contribution
/// relative to the baseline applicant.
#[derive(Debug, Clone)]
pub struct LogisticScorer {
    schema: FeatureSchema,
    intercept: f64,
    weights: Vec<f64>,
    baseline: Vec<f64>,
}

impl LogisticScorer {
    pub fn from_artifacts(artifacts: &ModelArtifacts) -> Result<Self, ArtifactError> {
        let schema = artifacts.feature_names.clone();
        let mut weights = Vec::with_capacity(schema.len());
        let mut baseline = Vec::with_capacity(schema.len());

        for name in schema.names() {
            let weight = artifacts
                .coefficients
                .get(name)
                .copied()
                .ok_or_else(|| ArtifactError::MissingCoefficient(name.clone()))?;
            let reference = artifacts
                .baseline
                .get(name)
                .copied()
                .ok_or_else(|| ArtifactError::MissingBaseline(name.clone()))?;
            weights.push(weight);
            baseline.push(reference);
        }

        Ok(Self {
            schema,
            intercept: artifacts.intercept,
            weights,
            baseline,
        })
    }

    fn margin(&self, features: &FeatureVector) -> f64 {
        self.weights
            .iter()
            .zip(features.values())
            .fold(self.intercept, |acc, (weight, value)| acc + weight * value)
    }
}

impl Scorer for LogisticScorer {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn score(&self, features: &FeatureVector) -> f64 {
        1.0 / (1.0 + (-self.margin(features)).exp())
    }
}

impl Attributor for LogisticScorer {
    fn attribute(&self, features: &FeatureVector) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.baseline)
            .zip(features.values())
            .map(|((weight, reference), value)| weight * (value - reference))
            .collect()
    }
}
