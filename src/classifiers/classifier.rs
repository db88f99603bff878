use crate::core::matrix::{Matrix, RowView};
use crate::utils::math::argmax;
use thiserror::Error;

/// Why a single classifier could not be fitted or used.
///
/// These never abort a run: the classifier is dropped from the ensemble and
/// the reason is recorded in the run diagnostics.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FitError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("feature matrix has {features} rows but {labels} labels were given")]
    ShapeMismatch { features: usize, labels: usize },

    #[error("model used before being fitted")]
    NotFitted,

    #[error("training diverged: {0}")]
    Diverged(String),

    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    #[error("parameter grid has no candidates")]
    NoCandidates,

    #[error("every grid candidate failed, last error: {0}")]
    AllCandidatesFailed(String),
}

/// A batch classifier over encoded feature rows.
///
/// Classes are dense indices `0..n_classes`; the caller owns the mapping to
/// label names.
pub trait Classifier {
    fn fit(&mut self, features: &Matrix, classes: &[usize], n_classes: usize)
    -> Result<(), FitError>;

    /// Class scores for one row, one entry per class, or `None` when the
    /// model cannot score it.
    fn get_votes_for_instance(&self, instance: RowView<'_>) -> Option<Vec<f64>>;

    /// Non-fatal remarks about the last `fit`, such as stopping before
    /// convergence.
    fn fit_warnings(&self) -> Vec<String> {
        Vec::new()
    }

    /// Most-voted class per row. Rows without usable votes get class 0.
    fn predict(&self, features: &Matrix) -> Vec<usize> {
        features
            .outer_iter()
            .map(|row| {
                self.get_votes_for_instance(row)
                    .and_then(|v| argmax(&v))
                    .unwrap_or(0)
            })
            .collect()
    }
}

/// Shared precondition checks for `fit` implementations.
pub(crate) fn check_training_set(
    features: &Matrix,
    classes: &[usize],
    n_classes: usize,
) -> Result<(), FitError> {
    if features.nrows() != classes.len() {
        return Err(FitError::ShapeMismatch {
            features: features.nrows(),
            labels: classes.len(),
        });
    }
    if classes.is_empty() || n_classes == 0 {
        return Err(FitError::EmptyTrainingSet);
    }
    if let Some(&c) = classes.iter().find(|&&c| c >= n_classes) {
        return Err(FitError::InvalidParameter(format!(
            "class index {c} out of range for {n_classes} classes"
        )));
    }
    Ok(())
}

/// Per-class counts of `classes`.
pub(crate) fn class_counts(classes: &[usize], n_classes: usize) -> Vec<f64> {
    let mut counts = vec![0.0; n_classes];
    for &c in classes {
        counts[c] += 1.0;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f64>);

    impl Classifier for Fixed {
        fn fit(&mut self, _: &Matrix, _: &[usize], _: usize) -> Result<(), FitError> {
            Ok(())
        }

        fn get_votes_for_instance(&self, _: RowView<'_>) -> Option<Vec<f64>> {
            if self.0.is_empty() { None } else { Some(self.0.clone()) }
        }
    }

    #[test]
    fn predict_uses_argmax_and_falls_back_to_zero() {
        let m = Matrix::zeros((2, 1));
        assert_eq!(Fixed(vec![0.1, 0.7, 0.2]).predict(&m), vec![1, 1]);
        assert_eq!(Fixed(vec![]).predict(&m), vec![0, 0]);
    }

    #[test]
    fn training_set_checks() {
        let m = Matrix::zeros((2, 1));
        assert_eq!(
            check_training_set(&m, &[0], 2),
            Err(FitError::ShapeMismatch {
                features: 2,
                labels: 1
            })
        );
        assert_eq!(
            check_training_set(&Matrix::zeros((0, 1)), &[], 1),
            Err(FitError::EmptyTrainingSet)
        );
        assert!(matches!(
            check_training_set(&m, &[0, 5], 2),
            Err(FitError::InvalidParameter(_))
        ));
        assert!(check_training_set(&m, &[0, 1], 2).is_ok());
    }
}
