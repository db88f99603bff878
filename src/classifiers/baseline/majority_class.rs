use crate::classifiers::classifier::{check_training_set, class_counts};
use crate::classifiers::{Classifier, FitError};
use crate::core::matrix::{Matrix, RowView};
use crate::utils::math::normalize_in_place;

/// Ignores the features and votes with the training class frequencies.
#[derive(Debug, Clone, Default)]
pub struct MajorityClass {
    distribution: Vec<f64>,
}

impl MajorityClass {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Classifier for MajorityClass {
    fn fit(&mut self, features: &Matrix, classes: &[usize], n_classes: usize) -> Result<(), FitError> {
        check_training_set(features, classes, n_classes)?;
        let mut dist = class_counts(classes, n_classes);
        normalize_in_place(&mut dist);
        self.distribution = dist;
        Ok(())
    }

    fn get_votes_for_instance(&self, _instance: RowView<'_>) -> Option<Vec<f64>> {
        if self.distribution.is_empty() {
            None
        } else {
            Some(self.distribution.clone())
        }
    }
}
