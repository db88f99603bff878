mod diagnostics;
mod trainer;
mod utility_evaluator;

pub use diagnostics::{ClassifierFailure, RunDiagnostics, TrainingStage};
pub use trainer::{ClassifierRun, ModelTrainer};
pub use utility_evaluator::{ClassifierProgress, ClassifierStatus, EvaluationOutcome, UtilityEvaluator};
