/// Running scalar estimate fed one observation at a time.
pub trait Estimator {
    fn add(&mut self, v: f64);

    /// Current estimate; NaN before any observation.
    fn estimation(&self) -> f64;
}
