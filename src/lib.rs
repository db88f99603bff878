pub mod classifiers;
pub mod config;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod partition;
pub mod preprocessing;
pub mod report;
pub mod selection;
pub mod tasks;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use crate::config::RunConfig;
pub use crate::core::metadata::DatasetMetadata;
pub use crate::error::{Result, UtilityError};
pub use crate::report::UtilityReport;
pub use crate::tasks::{EvaluationOutcome, UtilityEvaluator};
