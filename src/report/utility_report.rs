use crate::config::SelectionMode;
use crate::evaluation::{Average, ConfusionRecord, DiffBundle, Metric, MetricBundle};
use crate::tasks::ClassifierRun;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Results of one classifier that completed both training passes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierReport {
    pub name: String,
    pub kind: String,
    pub mode: SelectionMode,
    pub parameters: Map<String, Value>,
    /// Mean cross-validated macro F1 of the chosen parameters, searched mode only.
    pub search_score: Option<f64>,
    pub trained_on_original: MetricBundle,
    pub trained_on_released: MetricBundle,
    pub diff: DiffBundle,
    pub confusion_original: ConfusionRecord,
    pub confusion_released: ConfusionRecord,
}

impl From<ClassifierRun> for ClassifierReport {
    fn from(run: ClassifierRun) -> Self {
        let trained_on_original = run.original.metrics();
        let trained_on_released = run.released.metrics();
        let diff = DiffBundle::between(&trained_on_original, &trained_on_released);
        Self {
            kind: run.spec.kind.to_string(),
            mode: run.spec.mode,
            search_score: run.search.as_ref().map(|s| s.best_score),
            confusion_original: run.original.confusion(&run.original_classes),
            confusion_released: run.released.confusion(&run.released_classes),
            name: run.spec.name,
            parameters: run.parameters,
            trained_on_original,
            trained_on_released,
            diff,
        }
    }
}

/// Outcome of a utility evaluation run. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityReport {
    generated_at: DateTime<Utc>,
    seed: u64,
    synth_method: String,
    overall_diff: DiffBundle,
    classifiers: Vec<ClassifierReport>,
}

impl UtilityReport {
    pub fn new(seed: u64, synth_method: String, overall_diff: DiffBundle, classifiers: Vec<ClassifierReport>) -> Self {
        Self {
            generated_at: Utc::now(),
            seed,
            synth_method,
            overall_diff,
            classifiers,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn synth_method(&self) -> &str {
        &self.synth_method
    }

    /// Cell-wise mean of the per-classifier diffs.
    pub fn overall_diff(&self) -> &DiffBundle {
        &self.overall_diff
    }

    /// Classifiers in configuration order, failed ones excluded.
    pub fn classifiers(&self) -> &[ClassifierReport] {
        &self.classifiers
    }

    pub fn classifier(&self, name: &str) -> Option<&ClassifierReport> {
        self.classifiers.iter().find(|c| c.name == name)
    }

    /// `{classifier name: field}` in classifier order.
    pub fn by_classifier<T: Serialize>(
        &self,
        field: impl Fn(&ClassifierReport) -> &T,
    ) -> serde_json::Result<Value> {
        let map = self
            .classifiers
            .iter()
            .map(|c| Ok((c.name.clone(), serde_json::to_value(field(c))?)))
            .collect::<serde_json::Result<Map<String, Value>>>()?;
        Ok(Value::Object(map))
    }
}

fn write_cells(f: &mut fmt::Formatter<'_>, cells: impl Iterator<Item = (Metric, Average, f64)>) -> fmt::Result {
    for (metric, average, value) in cells {
        writeln!(f, "{metric} ({average}): {value:.2}")?;
    }
    Ok(())
}

impl UtilityReport {
    fn write_section(
        &self,
        f: &mut fmt::Formatter<'_>,
        title: &str,
        pick: impl Fn(&ClassifierReport) -> &MetricBundle,
    ) -> fmt::Result {
        writeln!(f, "\n{title}")?;
        for c in &self.classifiers {
            writeln!(f, "\n{}\n{}", c.name, "-".repeat(c.name.len()))?;
            write_cells(f, pick(c).iter())?;
        }
        Ok(())
    }
}

impl fmt::Display for UtilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_section(f, "Trained on original and tested on original", |c| &c.trained_on_original)?;
        self.write_section(f, "Trained on released and tested on original", |c| &c.trained_on_released)?;
        writeln!(f, "\nOverall difference")?;
        write_cells(f, self.overall_diff.iter())
    }
}
