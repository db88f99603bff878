use crate::evaluation::{Average, Estimator, Measurement, Metric, PerformanceEvaluator};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct LabelScores {
    precision: f64,
    recall: f64,
    f1: f64,
    support: f64,
}

/// Batch classifier evaluator backed by a confusion count table.
///
/// Labels are the union of every truth and predicted label seen. For each
/// label, precision is `tp / predicted` and recall is `tp / actual`, both 0
/// when the denominator is 0; F1 is 0 when precision and recall are both 0.
/// `Macro` is the unweighted mean over labels, `Weighted` weights every
/// label by its true support. All scores are scaled to 0-100.
pub struct BasicClassificationEvaluator<E: Estimator + Default> {
    weight_correct: E,
    labels: Vec<String>,
    index: HashMap<String, usize>,
    // counts[truth][predicted]
    counts: Vec<Vec<f64>>,
}

impl<E: Estimator + Default> Default for BasicClassificationEvaluator<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Estimator + Default> BasicClassificationEvaluator<E> {
    pub fn new() -> Self {
        Self {
            weight_correct: E::default(),
            labels: Vec::new(),
            index: HashMap::new(),
            counts: Vec::new(),
        }
    }

    /// Labels in first-seen order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[inline]
    fn label_index(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.labels.len();
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), i);
        for row in self.counts.iter_mut() {
            row.push(0.0);
        }
        self.counts.push(vec![0.0; i + 1]);
        i
    }

    fn per_label(&self) -> Vec<LabelScores> {
        let k = self.labels.len();
        (0..k)
            .map(|c| {
                let tp = self.counts[c][c];
                let actual: f64 = self.counts[c].iter().sum();
                let predicted: f64 = self.counts.iter().map(|row| row[c]).sum();
                let p = if predicted > 0.0 { tp / predicted } else { 0.0 };
                let r = if actual > 0.0 { tp / actual } else { 0.0 };
                let f1 = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 };
                LabelScores {
                    precision: p,
                    recall: r,
                    f1,
                    support: actual,
                }
            })
            .collect()
    }
}

impl<E: Estimator + Default> PerformanceEvaluator for BasicClassificationEvaluator<E> {
    fn reset(&mut self) {
        *self = Self::new();
    }

    fn add_result(&mut self, truth: &str, predicted: &str) {
        let t = self.label_index(truth);
        let p = self.label_index(predicted);
        self.counts[t][p] += 1.0;
        self.weight_correct.add(if t == p { 1.0 } else { 0.0 });
    }

    fn performance(&self) -> Vec<Measurement> {
        let accuracy = self.weight_correct.estimation();
        let mut m = vec![Measurement::new(
            Metric::Accuracy,
            Average::Value,
            if accuracy.is_finite() { accuracy * 100.0 } else { 0.0 },
        )];

        let stats = self.per_label();
        let k = stats.len() as f64;
        let total: f64 = stats.iter().map(|s| s.support).sum();
        let fold = |pick: fn(&LabelScores) -> f64| {
            if stats.is_empty() || total <= 0.0 {
                return (0.0, 0.0);
            }
            let macro_avg = stats.iter().map(pick).sum::<f64>() / k;
            let weighted = stats.iter().map(|s| pick(s) * s.support).sum::<f64>() / total;
            (macro_avg * 100.0, weighted * 100.0)
        };

        let picks: [(Metric, fn(&LabelScores) -> f64); 3] = [
            (Metric::Precision, |s| s.precision),
            (Metric::Recall, |s| s.recall),
            (Metric::F1, |s| s.f1),
        ];
        for (metric, pick) in picks {
            let (macro_avg, weighted) = fold(pick);
            m.push(Measurement::new(metric, Average::Macro, macro_avg));
            m.push(Measurement::new(metric, Average::Weighted, weighted));
        }
        m
    }
}
