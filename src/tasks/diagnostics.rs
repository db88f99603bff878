use serde::Serialize;
use strum_macros::Display;

/// Step of a classifier's training at which it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrainingStage {
    Search,
    Original,
    Released,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierFailure {
    pub classifier: String,
    pub stage: TrainingStage,
    pub message: String,
}

/// Recoverable problems of one run, returned next to the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunDiagnostics {
    pub warnings: Vec<String>,
    pub failures: Vec<ClassifierFailure>,
}

impl RunDiagnostics {
    pub fn warn<S: Into<String>>(&mut self, message: S) {
        self.warnings.push(message.into());
    }

    pub fn fail(&mut self, failure: ClassifierFailure) {
        self.failures.push(failure);
    }

    pub fn has_failed(&self, classifier: &str) -> bool {
        self.failures.iter().any(|f| f.classifier == classifier)
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_and_failures_both_dirty_a_run() {
        let mut d = RunDiagnostics::default();
        assert!(d.is_clean());
        d.warn("x imputed");
        assert!(!d.is_clean());

        let mut d = RunDiagnostics::default();
        d.fail(ClassifierFailure {
            classifier: "knn".into(),
            stage: TrainingStage::Released,
            message: "too few rows".into(),
        });
        assert!(!d.is_clean());
        assert!(d.has_failed("knn"));
        assert!(!d.has_failed("lr"));
    }
}
