mod folds;
mod grid_search;
mod param_grid;

pub use folds::{Fold, stratified_k_fold};
pub use grid_search::{CandidateScore, GridSearchCv, HyperparameterSearch, SearchOutcome, SearchRequest};
pub use param_grid::{CLASSIFIER_PREFIX, ParamGrid, merge_params};
