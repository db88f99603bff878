use crate::evaluation::Measurement;

/// Accumulates (truth, prediction) pairs and reports aggregate scores.
pub trait PerformanceEvaluator {
    /// Clears every accumulated pair.
    fn reset(&mut self);

    fn add_result(&mut self, truth: &str, predicted: &str);

    /// Snapshot of every (metric, average) cell. Never fails; scores that are
    /// undefined for the pairs seen so far are reported as 0.
    fn performance(&self) -> Vec<Measurement>;
}
