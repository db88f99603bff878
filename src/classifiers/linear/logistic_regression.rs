use crate::classifiers::classifier::check_training_set;
use crate::classifiers::{Classifier, FitError};
use crate::core::matrix::{Matrix, RowView};
use crate::utils::math::{softmax_in_place, softmax_rows};
use ndarray::{Array1, Array2, Axis};
use tracing::debug;

/// Multinomial logistic regression with L2 penalty, fitted by full-batch
/// gradient descent from zero weights.
///
/// Minimises `mean cross-entropy + ||W||^2 / (2 * c * n)`; the intercepts are
/// not penalised. Stops once the largest gradient component drops below
/// `tol` or after `max_iter` steps. A non-finite gradient or weight fails
/// the fit.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    max_iter: usize,
    learning_rate: f64,
    c: f64,
    tol: f64,
    // n_classes x n_features
    coef: Array2<f64>,
    intercept: Array1<f64>,
    n_iter: usize,
    converged: bool,
}

impl LogisticRegression {
    pub fn new(max_iter: usize, learning_rate: f64, c: f64, tol: f64) -> Result<Self, FitError> {
        if max_iter == 0 {
            return Err(FitError::InvalidParameter("max_iter must be > 0".into()));
        }
        if !(learning_rate > 0.0) || !learning_rate.is_finite() {
            return Err(FitError::InvalidParameter(format!(
                "learning_rate must be > 0, got {learning_rate}"
            )));
        }
        if !(c > 0.0) {
            return Err(FitError::InvalidParameter(format!("C must be > 0, got {c}")));
        }
        if !(tol >= 0.0) {
            return Err(FitError::InvalidParameter(format!("tol must be >= 0, got {tol}")));
        }
        Ok(Self {
            max_iter,
            learning_rate,
            c,
            tol,
            coef: Array2::zeros((0, 0)),
            intercept: Array1::zeros(0),
            n_iter: 0,
            converged: false,
        })
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    fn diverged(&self) -> FitError {
        FitError::Diverged(format!(
            "logistic regression weights became non-finite after {} iterations (learning_rate = {})",
            self.n_iter, self.learning_rate
        ))
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, features: &Matrix, classes: &[usize], n_classes: usize) -> Result<(), FitError> {
        check_training_set(features, classes, n_classes)?;
        let n = features.nrows() as f64;
        let penalty = 1.0 / (self.c * n);

        self.coef = Array2::zeros((n_classes, features.ncols()));
        self.intercept = Array1::zeros(n_classes);
        self.converged = false;
        self.n_iter = 0;

        let mut targets = Array2::<f64>::zeros((features.nrows(), n_classes));
        for (i, &y) in classes.iter().enumerate() {
            targets[[i, y]] = 1.0;
        }

        for it in 0..self.max_iter {
            let mut probs = features.dot(&self.coef.t()) + &self.intercept;
            softmax_rows(&mut probs);
            let residual = probs - &targets;

            let mut grad_coef = residual.t().dot(features) / n;
            grad_coef.scaled_add(penalty, &self.coef);
            let grad_intercept = residual.sum_axis(Axis(0)) / n;

            self.n_iter = it + 1;
            let grads = || grad_coef.iter().chain(grad_intercept.iter());
            if grads().any(|g| !g.is_finite()) {
                return Err(self.diverged());
            }
            if grads().fold(0.0_f64, |m, g| m.max(g.abs())) < self.tol {
                self.converged = true;
                break;
            }
            self.coef.scaled_add(-self.learning_rate, &grad_coef);
            self.intercept.scaled_add(-self.learning_rate, &grad_intercept);
        }
        if self.coef.iter().chain(self.intercept.iter()).any(|w| !w.is_finite()) {
            return Err(self.diverged());
        }
        if !self.converged {
            debug!(max_iter = self.max_iter, "logistic regression stopped before reaching tol");
        }
        Ok(())
    }

    fn get_votes_for_instance(&self, instance: RowView<'_>) -> Option<Vec<f64>> {
        if self.coef.nrows() == 0 || self.coef.ncols() != instance.len() {
            return None;
        }
        let mut out = (self.coef.dot(&instance) + &self.intercept).to_vec();
        softmax_in_place(&mut out);
        Some(out)
    }

    fn fit_warnings(&self) -> Vec<String> {
        if self.n_iter > 0 && !self.converged {
            vec![format!(
                "logistic regression did not converge within max_iter = {} (tol = {})",
                self.max_iter, self.tol
            )]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::matrix_from_rows;
    use ndarray::aview1;

    fn linear_data() -> (Matrix, Vec<usize>) {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..40 {
            let a = (i as f64 - 20.0) / 10.0;
            let b = ((i * 7) % 11) as f64 / 5.0 - 1.0;
            rows.push(vec![a, b]);
            y.push(usize::from(a + 0.2 * b > 0.0));
        }
        (matrix_from_rows(&rows).unwrap(), y)
    }

    #[test]
    fn learns_a_linear_boundary() {
        let (x, y) = linear_data();
        let mut lr = LogisticRegression::new(500, 0.5, 1.0, 1e-6).unwrap();
        lr.fit(&x, &y, 2).unwrap();
        let pred = lr.predict(&x);
        let correct = pred.iter().zip(&y).filter(|(a, b)| a == b).count();
        assert!(correct >= 36, "correct={correct}");
        assert!(lr.n_iter() > 0);
    }

    #[test]
    fn handles_three_classes() {
        let rows: Vec<Vec<f64>> = (0..30).map(|i| vec![(i / 10) as f64 - 1.0]).collect();
        let y: Vec<usize> = (0..30).map(|i| i / 10).collect();
        let x = matrix_from_rows(&rows).unwrap();
        let mut lr = LogisticRegression::new(2000, 0.5, 10.0, 1e-8).unwrap();
        lr.fit(&x, &y, 3).unwrap();
        let query = matrix_from_rows(&[vec![-1.0], vec![0.0], vec![1.0]]).unwrap();
        assert_eq!(lr.predict(&query), vec![0, 1, 2]);
    }

    #[test]
    fn is_deterministic() {
        let (x, y) = linear_data();
        let mut a = LogisticRegression::new(50, 0.1, 1.0, 1e-4).unwrap();
        let mut b = LogisticRegression::new(50, 0.1, 1.0, 1e-4).unwrap();
        a.fit(&x, &y, 2).unwrap();
        b.fit(&x, &y, 2).unwrap();
        assert_eq!(
            a.get_votes_for_instance(aview1(&[0.3, -0.2])),
            b.get_votes_for_instance(aview1(&[0.3, -0.2]))
        );
    }

    #[test]
    fn huge_step_size_fails_as_diverged() {
        let (x, y) = linear_data();
        let mut lr = LogisticRegression::new(50, 1e308, 1.0, 1e-4).unwrap();
        assert!(matches!(lr.fit(&x, &y, 2), Err(FitError::Diverged(_))));
    }

    #[test]
    fn stopping_at_max_iter_is_a_warning() {
        let (x, y) = linear_data();
        let mut short = LogisticRegression::new(3, 0.1, 1.0, 1e-12).unwrap();
        short.fit(&x, &y, 2).unwrap();
        assert!(!short.converged());
        assert_eq!(short.fit_warnings().len(), 1);

        let mut done = LogisticRegression::new(10, 0.1, 1.0, 10.0).unwrap();
        done.fit(&x, &y, 2).unwrap();
        assert!(done.converged());
        assert!(done.fit_warnings().is_empty());
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(LogisticRegression::new(0, 0.1, 1.0, 1e-4).is_err());
        assert!(LogisticRegression::new(10, 0.0, 1.0, 1e-4).is_err());
        assert!(LogisticRegression::new(10, 0.1, 0.0, 1e-4).is_err());
        assert!(LogisticRegression::new(10, 0.1, 1.0, -1.0).is_err());
    }
}
