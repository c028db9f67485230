use serde::{Deserialize, Serialize};

/// Direction a feature pushed the default probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    IncreasesRisk,
    DecreasesRisk,
}

impl Impact {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Impact::IncreasesRisk
        } else {
            Impact::DecreasesRisk
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Impact::IncreasesRisk => "Increases Risk",
            Impact::DecreasesRisk => "Decreases Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAttribution {
    pub feature: String,
    pub value: f64,
    pub impact: Impact,
}

/// Rank contributions by magnitude, keeping the `top` largest. Equal
/// magnitudes keep their feature order.
pub fn rank_attributions(names: &[String], values: &[f64], top: usize) -> Vec<FeatureAttribution> {
    let mut ranked: Vec<FeatureAttribution> = names
        .iter()
        .zip(values)
        .map(|(feature, value)| FeatureAttribution {
            feature: feature.clone(),
            value: *value,
            impact: Impact::of(*value),
        })
        .collect();

    ranked.sort_by(|left, right| right.value.abs().total_cmp(&left.value.abs()));
    ranked.truncate(top);
    ranked
}
