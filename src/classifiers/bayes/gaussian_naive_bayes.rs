use crate::classifiers::bayes::ClassGaussians;
use crate::classifiers::classifier::{check_training_set, class_counts};
use crate::classifiers::{Classifier, FitError};
use crate::core::estimators::GaussianEstimator;
use crate::core::matrix::{Matrix, RowView};
use crate::utils::math::softmax_in_place;
use ndarray::Axis;

/// Gaussian naive Bayes.
///
/// Every class variance is inflated by `var_smoothing` times the largest
/// feature variance, so constant one-hot columns do not produce zero
/// variances.
#[derive(Debug, Clone)]
pub struct GaussianNaiveBayes {
    var_smoothing: f64,
    columns: Vec<ClassGaussians>,
    log_priors: Vec<f64>,
    epsilon: f64,
}

impl GaussianNaiveBayes {
    pub fn new(var_smoothing: f64) -> Result<Self, FitError> {
        if !(var_smoothing >= 0.0) || !var_smoothing.is_finite() {
            return Err(FitError::InvalidParameter(format!(
                "var_smoothing must be a finite value >= 0, got {var_smoothing}"
            )));
        }
        Ok(Self {
            var_smoothing,
            columns: Vec::new(),
            log_priors: Vec::new(),
            epsilon: 0.0,
        })
    }
}

impl Classifier for GaussianNaiveBayes {
    fn fit(&mut self, features: &Matrix, classes: &[usize], n_classes: usize) -> Result<(), FitError> {
        check_training_set(features, classes, n_classes)?;

        let mut columns = vec![ClassGaussians::new(); features.ncols()];
        let mut max_variance: f64 = 0.0;
        for (column, values) in columns.iter_mut().zip(features.axis_iter(Axis(1))) {
            let mut overall = GaussianEstimator::new();
            for (&x, &c) in values.iter().zip(classes) {
                column.observe(x, c, 1.0);
                overall.add_observation(x, 1.0);
            }
            max_variance = max_variance.max(overall.variance());
        }

        let n = classes.len() as f64;
        self.log_priors = class_counts(classes, n_classes)
            .into_iter()
            .map(|k| if k > 0.0 { (k / n).ln() } else { f64::NEG_INFINITY })
            .collect();
        // keeps variances positive even when every feature is constant
        self.epsilon = (self.var_smoothing * max_variance).max(1e-12);
        self.columns = columns;
        Ok(())
    }

    fn get_votes_for_instance(&self, instance: RowView<'_>) -> Option<Vec<f64>> {
        if self.log_priors.is_empty() || instance.len() != self.columns.len() {
            return None;
        }
        let mut joint: Vec<f64> = self.log_priors.clone();
        for (c, score) in joint.iter_mut().enumerate() {
            if !score.is_finite() {
                continue;
            }
            for (column, &x) in self.columns.iter().zip(instance) {
                *score += column.log_likelihood(x, c, self.epsilon).unwrap_or(0.0);
            }
        }
        softmax_in_place(&mut joint);
        Some(joint)
    }
}
