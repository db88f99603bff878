use crate::config::{ClassifierSpec, RunConfig};
use crate::core::column_types::ColumnTypeMap;
use crate::core::dataset::Dataset;
use crate::core::metadata::DatasetMetadata;
use crate::error::{Result, UtilityError};
use crate::evaluation::overall_diff;
use crate::partition::{DataPartitioner, PartitionSettings};
use crate::preprocessing::TransformSpec;
use crate::report::{ClassifierReport, UtilityReport};
use crate::selection::{GridSearchCv, HyperparameterSearch};
use crate::tasks::{ModelTrainer, RunDiagnostics};
use serde::Serialize;
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ClassifierStatus {
    Completed,
    Failed(String),
}

/// Emitted once per classifier, after both passes or the failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierProgress {
    /// 1-based position in the ensemble.
    pub index: usize,
    pub total: usize,
    pub classifier: String,
    pub status: ClassifierStatus,
}

#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub report: UtilityReport,
    pub diagnostics: RunDiagnostics,
}

/// Runs every configured classifier on original and released data and
/// aggregates how far apart the two regimes score.
pub struct UtilityEvaluator {
    config: RunConfig,
    classifiers: Vec<ClassifierSpec>,
    transform: TransformSpec,
    feature_columns: Vec<String>,
    setup_warnings: Vec<String>,
    search: Box<dyn HyperparameterSearch>,
    progress_tx: Option<Sender<ClassifierProgress>>,
}

impl UtilityEvaluator {
    /// Validates the configuration against the metadata. Nothing is trained
    /// until [`run`](Self::run).
    pub fn new(config: &RunConfig, metadata: &DatasetMetadata) -> Result<Self> {
        let classifiers = config.validate()?;
        let types = ColumnTypeMap::from_metadata(metadata, &config.synth_method, &config.discrete_types)?;
        if types.kind_of(&config.label_column).is_none() {
            return Err(UtilityError::config(format!(
                "label column '{}' is not described by the metadata",
                config.label_column
            )));
        }

        let (transform, dropped) = TransformSpec::build(&types, &config.input_columns);
        if transform.is_empty() {
            return Err(UtilityError::config("no input column is described by the metadata"));
        }
        let setup_warnings = dropped
            .iter()
            .map(|c| format!("input column '{c}' has no metadata and was dropped"))
            .collect();
        let feature_columns = config
            .input_columns
            .iter()
            .filter(|c| !dropped.contains(c))
            .cloned()
            .collect();

        Ok(Self {
            search: Box::new(GridSearchCv::new(config.cv_folds, config.n_jobs)),
            config: config.clone(),
            classifiers,
            transform,
            feature_columns,
            setup_warnings,
            progress_tx: None,
        })
    }

    pub fn with_search(mut self, search: Box<dyn HyperparameterSearch>) -> Self {
        self.search = search;
        self
    }

    pub fn with_progress(mut self, tx: Sender<ClassifierProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn classifiers(&self) -> &[ClassifierSpec] {
        &self.classifiers
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn run(&self, original: Dataset, released: Dataset) -> Result<EvaluationOutcome> {
        let started = Instant::now();
        let mut diagnostics = RunDiagnostics::default();
        for w in &self.setup_warnings {
            warn!("{w}");
            diagnostics.warn(w.clone());
        }
        info!(
            classifiers = self.classifiers.len(),
            original_rows = original.n_rows(),
            released_rows = released.n_rows(),
            seed = self.config.random_seed,
            "starting utility evaluation"
        );

        let partitioner = DataPartitioner::new(PartitionSettings {
            input_columns: self.feature_columns.clone(),
            numeric_columns: self.transform.numeric().to_vec(),
            label_column: self.config.label_column.clone(),
            test_ratio: self.config.test_train_ratio,
            leaked_rows: self.config.num_leaked_rows,
            seed: self.config.random_seed,
        });
        let pair = partitioner.partition(original, released, &mut diagnostics)?;

        let trainer = ModelTrainer::new(&self.transform, self.search.as_ref(), self.config.random_seed);
        let total = self.classifiers.len();
        let mut reports = Vec::with_capacity(total);
        for (i, spec) in self.classifiers.iter().enumerate() {
            let status = match trainer.train(spec, &pair) {
                Ok(mut run) => {
                    for w in std::mem::take(&mut run.warnings) {
                        let w = format!("classifier '{}' {w}", spec.name);
                        warn!("{w}");
                        diagnostics.warn(w);
                    }
                    reports.push(ClassifierReport::from(run));
                    ClassifierStatus::Completed
                }
                Err(failure) => {
                    warn!(
                        classifier = %failure.classifier,
                        stage = %failure.stage,
                        "classifier dropped: {}",
                        failure.message
                    );
                    let reason = failure.message.clone();
                    diagnostics.fail(failure);
                    ClassifierStatus::Failed(reason)
                }
            };
            if let Some(tx) = &self.progress_tx {
                let _ = tx.send(ClassifierProgress {
                    index: i + 1,
                    total,
                    classifier: spec.name.clone(),
                    status,
                });
            }
        }

        let overall = overall_diff(reports.iter().map(|r| &r.diff)).ok_or(UtilityError::AllClassifiersFailed(total))?;
        info!(
            completed = reports.len(),
            failed = diagnostics.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "utility evaluation finished"
        );
        let report = UtilityReport::new(self.config.random_seed, self.config.synth_method.clone(), overall, reports);
        Ok(EvaluationOutcome { report, diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::Value;
    use crate::core::metadata::{ColumnMetadata, ColumnType};
    use crate::testing::dummies::SeaTable;
    use serde_json::json;
    use std::sync::mpsc;

    fn metadata() -> DatasetMetadata {
        DatasetMetadata::new(vec![
            ColumnMetadata {
                name: "x".into(),
                column_type: ColumnType::ContinuousNumerical,
            },
            ColumnMetadata {
                name: "y".into(),
                column_type: ColumnType::Categorical,
            },
        ])
    }

    #[test]
    fn unknown_input_columns_are_dropped_with_a_warning() {
        let config = RunConfig::new(vec!["x".into(), "ghost".into()], "y", 0.2);
        let ev = UtilityEvaluator::new(&config, &metadata()).unwrap();
        assert_eq!(ev.feature_columns(), &["x"]);
        assert_eq!(ev.setup_warnings.len(), 1);
        assert_eq!(ev.classifiers().len(), 3);
    }

    #[test]
    fn label_without_metadata_is_a_config_error() {
        let config = RunConfig::new(vec!["x".into()], "z", 0.2);
        assert!(matches!(
            UtilityEvaluator::new(&config, &metadata()),
            Err(UtilityError::Config(_))
        ));
    }

    #[test]
    fn inputs_without_metadata_are_a_config_error() {
        let config = RunConfig::new(vec!["ghost".into()], "y", 0.2);
        assert!(matches!(
            UtilityEvaluator::new(&config, &metadata()),
            Err(UtilityError::Config(_))
        ));
    }

    #[test]
    fn progress_reports_every_classifier_in_order() {
        let table = serde_json::from_value(json!({
            "majority": {"kind": "majority-class"},
            "huge-k": {"kind": "k-neighbors", "params_main": {"n_neighbors": 500}},
            "bayes": {"kind": "GaussianNB"}
        }))
        .unwrap();
        let config = RunConfig::new(SeaTable::input_columns(), "class", 0.25).with_classifiers(table);
        let (tx, rx) = mpsc::channel();
        let data = SeaTable::new(200, 5).generate();
        let outcome = UtilityEvaluator::new(&config, &SeaTable::metadata())
            .unwrap()
            .with_progress(tx)
            .run(data.clone(), data)
            .unwrap();

        let events: Vec<ClassifierProgress> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].index, 1);
        assert!(events.iter().all(|e| e.total == 3));
        assert_eq!(events[0].status, ClassifierStatus::Completed);
        assert!(matches!(events[1].status, ClassifierStatus::Failed(_)));
        assert_eq!(events[2].classifier, "bayes");
        assert_eq!(outcome.report.classifiers().len(), 2);
        assert_eq!(outcome.diagnostics.failures.len(), 1);
    }

    #[test]
    fn text_in_a_numeric_feature_aborts_before_training() {
        let table = serde_json::from_value(json!({"majority": {"kind": "majority-class"}})).unwrap();
        let config = RunConfig::new(SeaTable::input_columns(), "class", 0.2).with_classifiers(table);
        let (tx, rx) = mpsc::channel();
        let original = SeaTable::new(50, 1).generate();
        let mut released = original.clone();
        released.column_mut("attrib1").unwrap().values[5] = Value::from("oops");
        let err = UtilityEvaluator::new(&config, &SeaTable::metadata())
            .unwrap()
            .with_progress(tx)
            .run(original, released)
            .unwrap_err();
        assert!(matches!(err, UtilityError::Data(_)), "{err:?}");
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn unconverged_fits_become_run_warnings() {
        let table = serde_json::from_value(json!({
            "lr": {"kind": "logistic-regression", "params_main": {"max_iter": 1, "tol": 0.0}}
        }))
        .unwrap();
        let config = RunConfig::new(SeaTable::input_columns(), "class", 0.2).with_classifiers(table);
        let data = SeaTable::new(80, 2).generate();
        let outcome = UtilityEvaluator::new(&config, &SeaTable::metadata())
            .unwrap()
            .run(data.clone(), data)
            .unwrap();
        assert_eq!(outcome.report.classifiers().len(), 1);
        assert_eq!(outcome.diagnostics.warnings.len(), 2);
        assert!(outcome.diagnostics.warnings[0].starts_with("classifier 'lr' original pass:"));
    }

    #[test]
    fn diverging_classifier_is_dropped_not_reported() {
        let table = serde_json::from_value(json!({
            "lr": {"kind": "logistic-regression", "params_main": {"learning_rate": 1e308, "max_iter": 50}}
        }))
        .unwrap();
        let config = RunConfig::new(SeaTable::input_columns(), "class", 0.2).with_classifiers(table);
        let data = SeaTable::new(80, 2).generate();
        let err = UtilityEvaluator::new(&config, &SeaTable::metadata())
            .unwrap()
            .run(data.clone(), data)
            .unwrap_err();
        assert!(matches!(err, UtilityError::AllClassifiersFailed(1)));
    }

    #[test]
    fn schema_mismatch_aborts_the_run() {
        let config = RunConfig::new(SeaTable::input_columns(), "class", 0.2);
        let original = SeaTable::new(50, 1).generate();
        let released = original.select_columns(&["class", "group", "attrib2", "attrib1"]).unwrap();
        let err = UtilityEvaluator::new(&config, &SeaTable::metadata())
            .unwrap()
            .run(original, released)
            .unwrap_err();
        assert!(matches!(err, UtilityError::SchemaMismatch { .. }));
    }
}
