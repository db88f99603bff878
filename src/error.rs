use thiserror::Error;

/// Errors that abort a utility evaluation run.
///
/// Per-classifier training problems are not represented here: they are
/// [`FitError`](crate::classifiers::FitError)s recorded in the run
/// diagnostics, and only surface as [`UtilityError::AllClassifiersFailed`]
/// when nothing is left to aggregate.
#[derive(Debug, Error)]
pub enum UtilityError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("schema mismatch between original {original:?} and released {released:?} columns")]
    SchemaMismatch {
        original: Vec<String>,
        released: Vec<String>,
    },

    #[error("data error: {0}")]
    Data(String),

    #[error("every classifier failed ({0} attempted), nothing to aggregate")]
    AllClassifiersFailed(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl UtilityError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn data<S: Into<String>>(msg: S) -> Self {
        Self::Data(msg.into())
    }
}

pub type Result<T, E = UtilityError> = std::result::Result<T, E>;
