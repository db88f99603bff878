use crate::error::{Result, UtilityError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Row indices of one train/test split, each side in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seeded shuffle split with `ceil(test_ratio * n_rows)` test rows.
///
/// The same seed and row count always produce the same assignment.
pub fn train_test_split(n_rows: usize, test_ratio: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(UtilityError::data(format!(
            "test ratio must be in (0, 1), got {test_ratio}"
        )));
    }
    let n_test = (test_ratio * n_rows as f64).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(UtilityError::data(format!(
            "test ratio {test_ratio} over {n_rows} rows leaves an empty train or test side"
        )));
    }

    let mut order: Vec<usize> = (0..n_rows).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut test = order[..n_test].to_vec();
    let mut train = order[n_test..].to_vec();
    test.sort_unstable();
    train.sort_unstable();
    Ok(SplitIndices { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_ceil_of_ratio() {
        let s = train_test_split(10, 0.25, 1).unwrap();
        assert_eq!(s.test.len(), 3);
        assert_eq!(s.train.len(), 7);
    }

    #[test]
    fn sides_are_disjoint_and_cover_all_rows() {
        let s = train_test_split(100, 0.2, 7).unwrap();
        let mut all: Vec<usize> = s.train.iter().chain(&s.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        assert_eq!(
            train_test_split(500, 0.2, 42).unwrap(),
            train_test_split(500, 0.2, 42).unwrap()
        );
        assert_ne!(
            train_test_split(500, 0.2, 42).unwrap(),
            train_test_split(500, 0.2, 43).unwrap()
        );
    }

    #[test]
    fn ratio_out_of_range_is_rejected() {
        for r in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(train_test_split(10, r, 0), Err(UtilityError::Data(_))));
        }
        assert!(train_test_split(1, 0.5, 0).is_err());
    }
}
