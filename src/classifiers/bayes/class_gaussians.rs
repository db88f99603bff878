use crate::core::estimators::GaussianEstimator;

/// Per-class Gaussian summary of one feature column.
#[derive(Debug, Clone, Default)]
pub struct ClassGaussians {
    per_class: Vec<Option<GaussianEstimator>>,
    ranges: Vec<(f64, f64)>,
}

impl ClassGaussians {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one weighted value for `class`. NaN values and non-positive
    /// weights are ignored.
    pub fn observe(&mut self, value: f64, class: usize, weight: f64) {
        if value.is_nan() || !(weight > 0.0) || !weight.is_finite() {
            return;
        }
        if class >= self.per_class.len() {
            self.per_class.resize_with(class + 1, || None);
            self.ranges.resize(class + 1, (f64::INFINITY, f64::NEG_INFINITY));
        }
        self.per_class[class]
            .get_or_insert_with(GaussianEstimator::new)
            .add_observation(value, weight);
        let (lo, hi) = &mut self.ranges[class];
        *lo = lo.min(value);
        *hi = hi.max(value);
    }

    fn estimator(&self, class: usize) -> Option<&GaussianEstimator> {
        self.per_class.get(class).and_then(Option::as_ref)
    }

    pub fn density(&self, value: f64, class: usize) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        self.estimator(class).map(|e| e.probability_density(value))
    }

    /// Log-density under `class` with `extra_variance` added to its variance.
    pub fn log_likelihood(&self, value: f64, class: usize, extra_variance: f64) -> Option<f64> {
        self.estimator(class)
            .map(|e| e.log_density_smoothed(value, extra_variance))
    }

    pub fn range(&self, class: usize) -> Option<(f64, f64)> {
        self.ranges.get(class).copied().filter(|(lo, hi)| lo <= hi)
    }
}
