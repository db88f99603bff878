use crate::core::dataset::sorted_categories;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confusion matrix of one (classifier, training source) pair.
///
/// `conf_matrix[i][j]` counts test rows whose true label is
/// `target_names[i]` and whose predicted label is `target_names[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionRecord {
    pub conf_matrix: Vec<Vec<u64>>,
    pub target_names: Vec<String>,
}

impl ConfusionRecord {
    /// Label order is `model_classes`, then test labels the model never saw,
    /// sorted.
    pub fn compute<S: AsRef<str>>(truth: &[S], predicted: &[S], model_classes: &[String]) -> Self {
        let mut target_names: Vec<String> = model_classes.to_vec();
        let unseen = sorted_categories(
            truth
                .iter()
                .chain(predicted)
                .map(|l| l.as_ref())
                .filter(|l| !model_classes.iter().any(|c| c.as_str() == *l)),
        );
        target_names.extend(unseen);

        let index: HashMap<&str, usize> = target_names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();
        let k = target_names.len();
        let mut conf_matrix = vec![vec![0u64; k]; k];
        for (t, p) in truth.iter().zip(predicted) {
            conf_matrix[index[t.as_ref()]][index[p.as_ref()]] += 1;
        }
        Self {
            conf_matrix,
            target_names,
        }
    }

    pub fn total(&self) -> u64 {
        self.conf_matrix.iter().flatten().sum()
    }

    pub fn correct(&self) -> u64 {
        (0..self.conf_matrix.len()).map(|i| self.conf_matrix[i][i]).sum()
    }
}
