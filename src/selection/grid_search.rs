use crate::classifiers::{FitError, ModelPipeline};
use crate::config::ClassifierSpec;
use crate::config::build::build_learner;
use crate::core::dataset::Dataset;
use crate::evaluation::{Average, Metric, calculate_metrics};
use crate::preprocessing::TransformSpec;
use crate::selection::{Fold, merge_params, stratified_k_fold};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Everything a search needs to score candidates of one classifier.
pub struct SearchRequest<'a> {
    pub classifier: &'a ClassifierSpec,
    pub transform: &'a TransformSpec,
    pub features: &'a Dataset,
    pub labels: &'a [String],
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub overrides: Map<String, Value>,
    /// Mean validation macro F1; NaN when any fold failed.
    pub mean_score: f64,
    pub fold_scores: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// Fixed parameters merged with the winning candidate.
    pub best_params: Map<String, Value>,
    pub best_score: f64,
    pub candidates: Vec<CandidateScore>,
}

/// Picks the parameters of a searched classifier.
pub trait HyperparameterSearch: Send + Sync {
    fn search(&self, request: &SearchRequest<'_>) -> Result<SearchOutcome, FitError>;
}

/// Exhaustive grid search scored by stratified k-fold macro F1.
///
/// (candidate, fold) fits run in parallel. Scores are collected in job order
/// and the first candidate with the best mean wins, so the result does not
/// depend on scheduling.
#[derive(Debug, Clone)]
pub struct GridSearchCv {
    folds: usize,
    n_jobs: usize,
}

impl GridSearchCv {
    /// `n_jobs` of 0 uses the global rayon pool.
    pub fn new(folds: usize, n_jobs: usize) -> Self {
        Self { folds, n_jobs }
    }

    fn run_jobs(&self, request: &SearchRequest<'_>, candidates: &[Map<String, Value>], folds: &[FoldData])
    -> Vec<Result<f64, FitError>> {
        let jobs: Vec<(usize, usize)> = (0..candidates.len())
            .flat_map(|c| (0..folds.len()).map(move |f| (c, f)))
            .collect();
        let score_all = || {
            jobs.par_iter()
                .map(|&(c, f)| score_fold(request, &candidates[c], &folds[f]))
                .collect::<Vec<_>>()
        };

        if self.n_jobs == 0 {
            return score_all();
        }
        match ThreadPoolBuilder::new().num_threads(self.n_jobs).build() {
            Ok(pool) => pool.install(score_all),
            Err(e) => {
                warn!(error = %e, "could not build search thread pool, using the global pool");
                score_all()
            }
        }
    }
}

impl HyperparameterSearch for GridSearchCv {
    fn search(&self, request: &SearchRequest<'_>) -> Result<SearchOutcome, FitError> {
        let candidates = request.classifier.grid.candidates();
        if candidates.is_empty() {
            return Err(FitError::NoCandidates);
        }
        let folds: Vec<FoldData> = stratified_k_fold(request.labels, self.folds)?
            .iter()
            .map(|f| FoldData::new(request.features, request.labels, f))
            .collect();

        let results = self.run_jobs(request, &candidates, &folds);

        let mut last_error = None;
        let mut scored = Vec::with_capacity(candidates.len());
        for (overrides, chunk) in candidates.into_iter().zip(results.chunks(folds.len())) {
            let fold_scores: Vec<f64> = chunk
                .iter()
                .map(|r| match r {
                    Ok(s) => *s,
                    Err(e) => {
                        last_error = Some(e.clone());
                        f64::NAN
                    }
                })
                .collect();
            let mean_score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
            let params = Value::Object(overrides.clone());
            debug!(
                classifier = %request.classifier.name,
                params = %params,
                score = mean_score,
                "scored grid candidate"
            );
            scored.push(CandidateScore {
                overrides,
                mean_score,
                fold_scores,
            });
        }

        let mut best: Option<usize> = None;
        for (i, c) in scored.iter().enumerate().filter(|(_, c)| c.mean_score.is_finite()) {
            if best.is_none_or(|b| c.mean_score > scored[b].mean_score) {
                best = Some(i);
            }
        }
        let Some(best) = best else {
            return Err(FitError::AllCandidatesFailed(
                last_error.map(|e| e.to_string()).unwrap_or_default(),
            ));
        };

        Ok(SearchOutcome {
            best_params: merge_params(&request.classifier.fixed_params, &scored[best].overrides),
            best_score: scored[best].mean_score,
            candidates: scored,
        })
    }
}

struct FoldData {
    train: Dataset,
    train_labels: Vec<String>,
    validation: Dataset,
    validation_labels: Vec<String>,
}

impl FoldData {
    fn new(features: &Dataset, labels: &[String], fold: &Fold) -> Self {
        let pick = |rows: &[usize]| rows.iter().map(|&i| labels[i].clone()).collect::<Vec<_>>();
        Self {
            train: features.select_rows(&fold.train),
            train_labels: pick(&fold.train),
            validation: features.select_rows(&fold.validation),
            validation_labels: pick(&fold.validation),
        }
    }
}

fn score_fold(request: &SearchRequest<'_>, overrides: &Map<String, Value>, fold: &FoldData) -> Result<f64, FitError> {
    let choice = request.classifier.choice(overrides)?;
    let learner = build_learner(&choice, request.seed)?;
    let mut pipeline = ModelPipeline::new(request.transform.clone(), learner);
    pipeline.fit(&fold.train, &fold.train_labels)?;
    let predicted = pipeline.predict(&fold.validation)?;
    Ok(calculate_metrics(&fold.validation_labels, &predicted)
        .get(Metric::F1, Average::Macro)
        .unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionMode;
    use crate::config::choices::LearnerKind;
    use crate::core::dataset::Value as Cell;
    use crate::selection::ParamGrid;
    use serde_json::json;

    fn data() -> (Dataset, Vec<String>) {
        let rows = (0..40)
            .map(|i| vec![Cell::Number(if i % 2 == 0 { 10.0 + i as f64 } else { -10.0 - i as f64 })])
            .collect();
        let labels = (0..40).map(|i| if i % 2 == 0 { "pos" } else { "neg" }.to_string()).collect();
        (Dataset::from_rows(&["x"], rows).unwrap(), labels)
    }

    fn spec(grid: Value) -> ClassifierSpec {
        ClassifierSpec {
            name: "knn".into(),
            kind: LearnerKind::KNeighbors,
            mode: SelectionMode::Searched,
            fixed_params: json!({"weights": "uniform"}).as_object().unwrap().clone(),
            grid: ParamGrid::from_json(grid.as_object().unwrap()).unwrap(),
        }
    }

    #[test]
    fn picks_a_working_candidate_and_merges_fixed_params() {
        let (x, y) = data();
        let spec = spec(json!({"n_neighbors": [3, 1000]}));
        let transform = TransformSpec::new(vec!["x".into()], vec![]);
        let req = SearchRequest {
            classifier: &spec,
            transform: &transform,
            features: &x,
            labels: &y,
            seed: 1,
        };
        let out = GridSearchCv::new(4, 2).search(&req).unwrap();
        assert_eq!(out.best_params.get("n_neighbors"), Some(&json!(3)));
        assert_eq!(out.best_params.get("weights"), Some(&json!("uniform")));
        assert!((out.best_score - 100.0).abs() < 1e-9);
        assert_eq!(out.candidates.len(), 2);
        assert!(out.candidates[1].mean_score.is_nan());
    }

    #[test]
    fn ties_go_to_the_first_candidate() {
        let (x, y) = data();
        let spec = spec(json!({"n_neighbors": [1, 3]}));
        let transform = TransformSpec::new(vec!["x".into()], vec![]);
        let req = SearchRequest {
            classifier: &spec,
            transform: &transform,
            features: &x,
            labels: &y,
            seed: 1,
        };
        let out = GridSearchCv::new(5, 0).search(&req).unwrap();
        assert_eq!(out.best_params.get("n_neighbors"), Some(&json!(1)));
    }

    #[test]
    fn every_candidate_failing_is_an_error() {
        let (x, y) = data();
        let spec = spec(json!({"n_neighbors": [500, 1000]}));
        let transform = TransformSpec::new(vec!["x".into()], vec![]);
        let req = SearchRequest {
            classifier: &spec,
            transform: &transform,
            features: &x,
            labels: &y,
            seed: 1,
        };
        let err = GridSearchCv::new(3, 0).search(&req).unwrap_err();
        assert!(matches!(err, FitError::AllCandidatesFailed(_)));
    }
}
