use crate::evaluation::{ConfusionRecord, MetricBundle, calculate_metrics};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Which dataset's train partition a model was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrainingSource {
    Original,
    Released,
}

impl TrainingSource {
    /// Short tag used in artifact names: trained-on `o`/`r`, tested on `o`.
    pub fn tag(self) -> &'static str {
        match self {
            TrainingSource::Original => "o_o",
            TrainingSource::Released => "r_o",
        }
    }
}

/// Predictions of one fitted model on the original test partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub classifier: String,
    pub source: TrainingSource,
    pub predicted: Vec<String>,
    pub truth: Vec<String>,
}

impl PredictionResult {
    pub fn metrics(&self) -> MetricBundle {
        calculate_metrics(&self.truth, &self.predicted)
    }

    pub fn confusion(&self, model_classes: &[String]) -> ConfusionRecord {
        ConfusionRecord::compute(&self.truth, &self.predicted, model_classes)
    }
}
