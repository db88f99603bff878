use crate::evaluation::{Average, Metric};

/// One scored cell produced by a performance evaluator, on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub metric: Metric,
    pub average: Average,
    pub value: f64,
}

impl Measurement {
    #[inline]
    pub fn new(metric: Metric, average: Average, value: f64) -> Self {
        Self {
            metric,
            average,
            value,
        }
    }
}
