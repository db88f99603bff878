use crate::evaluation::{DiffBundle, MetricBundle};

/// Denominator floor of the relative difference.
pub const RELATIVE_DIFF_FLOOR: f64 = 1e-9;

/// `|original - released| / max(floor, original)`.
///
/// Only the original-trained score is in the denominator, so a near-zero
/// original score inflates the result.
#[inline]
pub fn relative_diff(original: f64, released: f64) -> f64 {
    (original - released).abs() / original.max(RELATIVE_DIFF_FLOOR)
}

impl DiffBundle {
    /// Cell-wise relative difference over the cells present in both bundles.
    pub fn between(original: &MetricBundle, released: &MetricBundle) -> Self {
        let mut diff = DiffBundle::default();
        for (metric, average, o) in original.iter() {
            if let Some(r) = released.get(metric, average) {
                diff.insert(metric, average, relative_diff(o, r));
            }
        }
        diff
    }
}

/// Cell-wise arithmetic mean of per-classifier diffs; `None` when there is
/// nothing to average.
///
/// The cells are those of the first bundle; a cell missing from a later
/// bundle is averaged over the bundles that have it.
pub fn overall_diff<'a, I>(diffs: I) -> Option<DiffBundle>
where
    I: IntoIterator<Item = &'a DiffBundle>,
{
    let diffs: Vec<&DiffBundle> = diffs.into_iter().collect();
    let first = diffs.first()?;
    let mut out = DiffBundle::default();
    for (metric, average, _) in first.iter() {
        let values: Vec<f64> = diffs.iter().filter_map(|d| d.get(metric, average)).collect();
        out.insert(metric, average, values.iter().sum::<f64>() / values.len() as f64);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{Average, Measurement, Metric, metric_cells};

    fn bundle(values: [f64; 7]) -> MetricBundle {
        MetricBundle::from_measurements(
            metric_cells()
                .zip(values)
                .map(|((m, a), v)| Measurement::new(m, a, v)),
        )
    }

    #[test]
    fn identical_bundles_have_zero_diff() {
        let b = bundle([80.0, 70.0, 75.0, 60.0, 65.0, 0.0, 50.0]);
        let d = DiffBundle::between(&b, &b);
        assert_eq!(d.iter().count(), 7);
        assert!(d.iter().all(|(_, _, v)| v == 0.0));
    }

    #[test]
    fn zero_original_score_uses_floor() {
        assert_eq!(relative_diff(0.0, 0.0), 0.0);
        assert!((relative_diff(0.0, 1e-9) - 1.0).abs() < 1e-12);
        assert!((relative_diff(50.0, 40.0) - 0.2).abs() < 1e-12);
        assert!((relative_diff(50.0, 60.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn overall_is_mean_of_three_classifiers() {
        let o = bundle([80.0; 7]);
        let d1 = DiffBundle::between(&o, &bundle([80.0; 7])); // 0
        let d2 = DiffBundle::between(&o, &bundle([60.0; 7])); // 0.25
        let d3 = DiffBundle::between(&o, &bundle([40.0; 7])); // 0.5
        let overall = overall_diff([&d1, &d2, &d3]).unwrap();
        for (m, a) in metric_cells() {
            assert!((overall.get(m, a).unwrap() - 0.25).abs() < 1e-12);
        }

        let mixed = DiffBundle::between(&bundle([100.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0]), &bundle([90.0; 7]));
        let overall = overall_diff([&d1, &mixed, &d3]).unwrap();
        let acc = overall.get(Metric::Accuracy, Average::Value).unwrap();
        assert!((acc - (0.0 + 0.1 + 0.5) / 3.0).abs() < 1e-12);
        let f1 = overall.get(Metric::F1, Average::Macro).unwrap();
        assert!((f1 - (0.0 + 0.8 + 0.5) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn nothing_to_average() {
        assert!(overall_diff(Vec::<&DiffBundle>::new()).is_none());
    }
}
