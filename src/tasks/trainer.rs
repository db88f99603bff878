use crate::classifiers::{FitError, ModelPipeline};
use crate::config::build::build_learner;
use crate::config::{ClassifierSpec, SelectionMode};
use crate::core::dataset::Dataset;
use crate::evaluation::{PredictionResult, TrainingSource};
use crate::partition::{Partition, PartitionPair};
use crate::preprocessing::TransformSpec;
use crate::selection::{HyperparameterSearch, SearchOutcome, SearchRequest};
use crate::tasks::{ClassifierFailure, TrainingStage};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Both training passes of one classifier, scored on the original test rows.
#[derive(Debug, Clone)]
pub struct ClassifierRun {
    pub spec: ClassifierSpec,
    /// Parameters used by both passes.
    pub parameters: Map<String, Value>,
    pub search: Option<SearchOutcome>,
    pub original: PredictionResult,
    pub released: PredictionResult,
    pub original_classes: Vec<String>,
    pub released_classes: Vec<String>,
    /// Non-fatal remarks from either pass, prefixed with the pass.
    pub warnings: Vec<String>,
}

struct FittedPass {
    predicted: Vec<String>,
    classes: Vec<String>,
    warnings: Vec<String>,
}

pub struct ModelTrainer<'a> {
    transform: &'a TransformSpec,
    search: &'a dyn HyperparameterSearch,
    seed: u64,
}

impl<'a> ModelTrainer<'a> {
    pub fn new(transform: &'a TransformSpec, search: &'a dyn HyperparameterSearch, seed: u64) -> Self {
        Self {
            transform,
            search,
            seed,
        }
    }

    /// Runs the original pass (searching first when asked to), then the
    /// released pass with the same parameters.
    pub fn train(&self, spec: &ClassifierSpec, pair: &PartitionPair) -> Result<ClassifierRun, ClassifierFailure> {
        let failure = |stage: TrainingStage, e: FitError| ClassifierFailure {
            classifier: spec.name.clone(),
            stage,
            message: e.to_string(),
        };

        let (parameters, search) = match spec.mode {
            SelectionMode::Fixed => (spec.fixed_params.clone(), None),
            SelectionMode::Searched => {
                let request = SearchRequest {
                    classifier: spec,
                    transform: self.transform,
                    features: &pair.original.train_features,
                    labels: &pair.original.train_labels,
                    seed: self.seed,
                };
                let outcome = self
                    .search
                    .search(&request)
                    .map_err(|e| failure(TrainingStage::Search, e))?;
                let best = Value::Object(outcome.best_params.clone());
                debug!(
                    classifier = %spec.name,
                    best = %best,
                    score = outcome.best_score,
                    "grid search finished"
                );
                (outcome.best_params.clone(), Some(outcome))
            }
        };

        let test = &pair.original;
        let original = self
            .fit_predict(spec, &parameters, &pair.original, &test.test_features)
            .map_err(|e| failure(TrainingStage::Original, e))?;
        let released = self
            .fit_predict(spec, &parameters, &pair.released, &test.test_features)
            .map_err(|e| failure(TrainingStage::Released, e))?;
        let warnings = [(TrainingStage::Original, &original), (TrainingStage::Released, &released)]
            .into_iter()
            .flat_map(|(stage, pass)| pass.warnings.iter().map(move |w| format!("{stage} pass: {w}")))
            .collect();
        info!(classifier = %spec.name, kind = %spec.kind, "trained on original and released data");

        let prediction = |source, predicted| PredictionResult {
            classifier: spec.name.clone(),
            source,
            predicted,
            truth: test.test_labels.clone(),
        };
        Ok(ClassifierRun {
            spec: spec.clone(),
            parameters,
            search,
            original: prediction(TrainingSource::Original, original.predicted),
            released: prediction(TrainingSource::Released, released.predicted),
            original_classes: original.classes,
            released_classes: released.classes,
            warnings,
        })
    }

    fn fit_predict(
        &self,
        spec: &ClassifierSpec,
        parameters: &Map<String, Value>,
        train: &Partition,
        test_features: &Dataset,
    ) -> Result<FittedPass, FitError> {
        let choice = spec.choice_with(parameters.clone())?;
        let learner = build_learner(&choice, self.seed)?;
        let mut pipeline = ModelPipeline::new(self.transform.clone(), learner);
        pipeline.fit(&train.train_features, &train.train_labels)?;
        let predicted = pipeline.predict(test_features)?;
        Ok(FittedPass {
            predicted,
            classes: pipeline.classes().to_vec(),
            warnings: pipeline.fit_warnings(),
        })
    }
}
