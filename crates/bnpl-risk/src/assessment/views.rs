use chrono::{DateTime, Utc};
use serde::Serialize;

use super::evaluation::{Decision, RiskLevel};
use super::features::DerivedRatios;
use super::service::Assessment;

/// Serialized assessment returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentView {
    pub probability: f64,
    pub probability_pct: String,
    pub risk_level: RiskLevel,
    pub risk_label: &'static str,
    pub decision: Decision,
    pub decision_label: &'static str,
    pub conditions: Vec<String>,
    pub reasons: Vec<String>,
    pub attributions: Vec<AttributionView>,
    pub ratios: DerivedRatios,
    pub assessed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionView {
    pub feature: String,
    pub value: f64,
    pub impact: &'static str,
}

impl Assessment {
    pub fn view(&self, assessed_at: DateTime<Utc>) -> AssessmentView {
        let result = &self.result;
        AssessmentView {
            probability: result.probability,
            probability_pct: format!("{:.2}%", result.probability * 100.0),
            risk_level: result.risk_level,
            risk_label: result.risk_level.label(),
            decision: result.decision,
            decision_label: result.decision.label(),
            conditions: result
                .conditions
                .iter()
                .map(|condition| condition.message())
                .collect(),
            reasons: result
                .reasons
                .iter()
                .map(|reason| reason.message().to_string())
                .collect(),
            attributions: result
                .attributions
                .iter()
                .map(|attribution| AttributionView {
                    feature: attribution.feature.clone(),
                    value: attribution.value,
                    impact: attribution.impact.label(),
                })
                .collect(),
            ratios: self.ratios,
            assessed_at,
        }
    }
}
