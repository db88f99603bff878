use crate::classifiers::FitError;
use crate::selection::{GridSearchCv, HyperparameterSearch, SearchOutcome, SearchRequest, merge_params};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

enum Answer {
    Delegate(GridSearchCv),
    Fixed(Map<String, Value>),
}

/// Search double that records every call.
///
/// Clones share their counters, so a test can keep one handle and box the
/// other into the evaluator.
#[derive(Clone)]
pub struct SpySearch {
    answer: Arc<Answer>,
    calls: Arc<AtomicUsize>,
    searched: Arc<Mutex<Vec<String>>>,
}

impl SpySearch {
    /// Runs a real grid search underneath.
    pub fn delegating(folds: usize) -> Self {
        Self::with_answer(Answer::Delegate(GridSearchCv::new(folds, 1)))
    }

    /// Skips the search and returns `overrides` merged into the fixed params.
    pub fn returning(overrides: Map<String, Value>) -> Self {
        Self::with_answer(Answer::Fixed(overrides))
    }

    fn with_answer(answer: Answer) -> Self {
        Self {
            answer: Arc::new(answer),
            calls: Arc::new(AtomicUsize::new(0)),
            searched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Classifier names in call order.
    pub fn searched(&self) -> Vec<String> {
        self.searched.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl HyperparameterSearch for SpySearch {
    fn search(&self, request: &SearchRequest<'_>) -> Result<SearchOutcome, FitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut names) = self.searched.lock() {
            names.push(request.classifier.name.clone());
        }
        match self.answer.as_ref() {
            Answer::Delegate(inner) => inner.search(request),
            Answer::Fixed(overrides) => Ok(SearchOutcome {
                best_params: merge_params(&request.classifier.fixed_params, overrides),
                best_score: f64::NAN,
                candidates: Vec::new(),
            }),
        }
    }
}
