use crate::evaluation::{
    Average, BasicClassificationEvaluator, BasicEstimator, Measurement, Metric,
    PerformanceEvaluator, metric_cells,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type Cells = BTreeMap<Metric, BTreeMap<Average, f64>>;

/// Scores of one classifier on the original test partition, keyed by metric
/// then averaging mode, on the 0-100 scale.
///
/// Serializes as `{"accuracy": {"value": ..}, "precision": {"macro": ..}, ..}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricBundle(Cells);

impl MetricBundle {
    pub fn from_measurements<I: IntoIterator<Item = Measurement>>(measurements: I) -> Self {
        let mut cells = Cells::new();
        for m in measurements {
            cells.entry(m.metric).or_default().insert(m.average, m.value);
        }
        Self(cells)
    }

    pub fn get(&self, metric: Metric, average: Average) -> Option<f64> {
        self.0.get(&metric)?.get(&average).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Average, f64)> + '_ {
        iter_cells(&self.0)
    }

    /// True when every reported (metric, average) cell is present.
    pub fn is_complete(&self) -> bool {
        metric_cells().all(|(m, a)| self.get(m, a).is_some())
    }
}

/// Relative differences between two [`MetricBundle`]s, same shape, values
/// in `[0, inf)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffBundle(pub(crate) Cells);

impl DiffBundle {
    pub fn get(&self, metric: Metric, average: Average) -> Option<f64> {
        self.0.get(&metric)?.get(&average).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Average, f64)> + '_ {
        iter_cells(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, metric: Metric, average: Average, value: f64) {
        self.0.entry(metric).or_default().insert(average, value);
    }
}

fn iter_cells(cells: &Cells) -> impl Iterator<Item = (Metric, Average, f64)> + '_ {
    cells
        .iter()
        .flat_map(|(&m, by_avg)| by_avg.iter().map(move |(&a, &v)| (m, a, v)))
}

/// Scores `predicted` against `truth` on every (metric, average) cell.
///
/// Pairs are matched positionally; extra entries on the longer side are
/// ignored.
pub fn calculate_metrics<S: AsRef<str>>(truth: &[S], predicted: &[S]) -> MetricBundle {
    let mut ev = BasicClassificationEvaluator::<BasicEstimator>::new();
    for (t, p) in truth.iter().zip(predicted) {
        ev.add_result(t.as_ref(), p.as_ref());
    }
    MetricBundle::from_measurements(ev.performance())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundles_are_always_complete() {
        let empty: [&str; 0] = [];
        assert!(calculate_metrics(&empty, &empty).is_complete());
        let b = calculate_metrics(&["x", "y"], &["y", "y"]);
        assert!(b.is_complete());
        assert_eq!(b.get(Metric::Accuracy, Average::Value), Some(50.0));
        assert_eq!(b.get(Metric::Accuracy, Average::Macro), None);
    }

    #[test]
    fn serializes_as_nested_maps() {
        let b = calculate_metrics(&["a"], &["a"]);
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["accuracy"]["value"], 100.0);
        assert_eq!(json["f1"]["weighted"], 100.0);
        let back: MetricBundle = serde_json::from_value(json).unwrap();
        assert_eq!(back, b);
    }
}
