use crate::core::estimators::GaussianEstimator;

/// Per-column standardization: `(x - mean) / std`.
///
/// A constant column keeps a unit scale, so it maps to zeros instead of NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: f64,
    scale: f64,
}

impl StandardScaler {
    pub fn fit(values: &[f64]) -> Self {
        let mut est = GaussianEstimator::new();
        for &v in values {
            est.add_observation(v, 1.0);
        }
        let sd = est.std_dev();
        Self {
            mean: est.mean(),
            scale: if sd > f64::EPSILON { sd } else { 1.0 },
        }
    }

    #[inline]
    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}
