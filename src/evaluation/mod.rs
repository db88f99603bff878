mod bundle;
mod confusion;
mod diff;
mod estimators;
mod evaluators;
mod measurement;
mod metric;
mod prediction;

pub use bundle::{DiffBundle, MetricBundle, calculate_metrics};
pub use confusion::ConfusionRecord;
pub use diff::{RELATIVE_DIFF_FLOOR, overall_diff, relative_diff};
pub use estimators::{BasicEstimator, Estimator};
pub use evaluators::{BasicClassificationEvaluator, PerformanceEvaluator};
pub use measurement::Measurement;
pub use metric::{Average, Metric, metric_cells};
pub use prediction::{PredictionResult, TrainingSource};
