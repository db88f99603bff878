use crate::classifiers::FitError;
use crate::core::dataset::sorted_categories;

/// Train/validation row indices of one cross-validation fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Deterministic stratified k-fold split.
///
/// Rows are grouped by label (labels in category order, rows in source order
/// within a label) and dealt round-robin to the folds, so each fold gets a
/// near-equal share of every label. Index lists are ascending.
pub fn stratified_k_fold(labels: &[String], k: usize) -> Result<Vec<Fold>, FitError> {
    if k < 2 {
        return Err(FitError::InvalidParameter(format!("cv folds must be >= 2, got {k}")));
    }
    if labels.len() < k {
        return Err(FitError::InvalidParameter(format!(
            "cannot make {k} folds from {} rows",
            labels.len()
        )));
    }

    let mut assignment = vec![0usize; labels.len()];
    let mut dealt = 0usize;
    for class in sorted_categories(labels.iter()) {
        for (row, _) in labels.iter().enumerate().filter(|(_, l)| **l == class) {
            assignment[row] = dealt % k;
            dealt += 1;
        }
    }

    Ok((0..k)
        .map(|f| {
            let (validation, train): (Vec<usize>, Vec<usize>) =
                (0..labels.len()).partition(|&row| assignment[row] == f);
            Fold { train, validation }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(s: &str) -> Vec<String> {
        s.chars().map(String::from).collect()
    }

    #[test]
    fn folds_cover_every_row_once() {
        let y = labels("aaaaaabbbc");
        let folds = stratified_k_fold(&y, 3).unwrap();
        let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.validation.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        for f in &folds {
            assert_eq!(f.train.len() + f.validation.len(), 10);
            let a = f.validation.iter().filter(|&&i| y[i] == "a").count();
            assert_eq!(a, 2);
        }
    }

    #[test]
    fn rejects_bad_fold_counts() {
        assert!(stratified_k_fold(&labels("ab"), 1).is_err());
        assert!(stratified_k_fold(&labels("ab"), 3).is_err());
    }
}
