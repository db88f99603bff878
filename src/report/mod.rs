mod sink;
mod utility_report;

pub use sink::{
    ArtifactSink, DIAGNOSTICS_FILE, DIFF_FILE, JsonDirectorySink, ORIGINAL_CONFUSION_FILE, ORIGINAL_METRICS_FILE,
    OVERALL_DIFF_FILE, RELEASED_CONFUSION_FILE, RELEASED_METRICS_FILE,
};
pub use utility_report::{ClassifierReport, UtilityReport};
