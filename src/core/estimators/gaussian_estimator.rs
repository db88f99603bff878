use std::f64::consts::PI;

/// Weighted incremental mean/variance (West's update of Welford).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaussianEstimator {
    weight_sum: f64,
    mean: f64,
    variance_sum: f64,
}

impl GaussianEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observation(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || !(weight > 0.0) {
            return;
        }
        let new_weight_sum = self.weight_sum + weight;
        let delta = value - self.mean;
        let new_mean = self.mean + delta * weight / new_weight_sum;
        self.variance_sum += weight * delta * (value - new_mean);
        self.mean = new_mean;
        self.weight_sum = new_weight_sum;
    }

    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.weight_sum
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance, zero before any observation.
    #[inline]
    pub fn variance(&self) -> f64 {
        if self.weight_sum > 0.0 {
            (self.variance_sum / self.weight_sum).max(0.0)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Density of `value`; a degenerate estimator puts all mass on its mean.
    pub fn probability_density(&self, value: f64) -> f64 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        let sd = self.std_dev();
        if sd > 0.0 {
            let diff = value - self.mean;
            (1.0 / ((2.0 * PI).sqrt() * sd)) * (-(diff * diff) / (2.0 * sd * sd)).exp()
        } else if value == self.mean {
            1.0
        } else {
            0.0
        }
    }

    /// Gaussian log-density with extra variance added, as used by naive Bayes.
    pub fn log_density_smoothed(&self, value: f64, extra_variance: f64) -> f64 {
        let var = self.variance() + extra_variance;
        let diff = value - self.mean;
        -0.5 * (2.0 * PI * var).ln() - diff * diff / (2.0 * var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9
    }

    #[test]
    fn mean_and_population_variance() {
        let mut e = GaussianEstimator::new();
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            e.add_observation(v, 1.0);
        }
        assert!(approx_eq(e.mean(), 5.0));
        assert!(approx_eq(e.variance(), 4.0));
        assert!(approx_eq(e.std_dev(), 2.0));
    }

    #[test]
    fn weights_act_as_repeats() {
        let mut a = GaussianEstimator::new();
        a.add_observation(1.0, 2.0);
        a.add_observation(3.0, 1.0);
        let mut b = GaussianEstimator::new();
        for v in [1.0, 1.0, 3.0] {
            b.add_observation(v, 1.0);
        }
        assert!(approx_eq(a.mean(), b.mean()));
        assert!(approx_eq(a.variance(), b.variance()));
    }

    #[test]
    fn degenerate_density_is_point_mass() {
        let mut e = GaussianEstimator::new();
        assert_eq!(e.probability_density(0.0), 0.0);
        e.add_observation(10.0, 2.0);
        assert_eq!(e.probability_density(10.0), 1.0);
        assert_eq!(e.probability_density(10.5), 0.0);
    }

    #[test]
    fn ignores_nan_and_non_positive_weight() {
        let mut e = GaussianEstimator::new();
        e.add_observation(f64::NAN, 1.0);
        e.add_observation(1.0, 0.0);
        e.add_observation(1.0, -1.0);
        assert_eq!(e.total_weight(), 0.0);
    }

    #[test]
    fn smoothed_log_density_peaks_at_mean() {
        let mut e = GaussianEstimator::new();
        for v in [-1.0, 0.0, 1.0] {
            e.add_observation(v, 1.0);
        }
        assert!(e.log_density_smoothed(0.0, 1e-9) > e.log_density_smoothed(1.0, 1e-9));
        assert!(e.log_density_smoothed(0.0, 0.0).is_finite());
    }
}
