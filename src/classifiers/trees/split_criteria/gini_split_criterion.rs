use crate::classifiers::trees::split_criteria::SplitCriterion;

#[derive(Debug, Clone, Copy, Default)]
pub struct GiniSplitCriterion;

impl GiniSplitCriterion {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_gini(&self, distribution: &[f64], distribution_sum_of_weights: f64) -> f64 {
        if distribution_sum_of_weights <= 0.0 {
            return 0.0;
        }
        let mut gini = 1.0;
        for i in distribution {
            let rel_freq = i / distribution_sum_of_weights;
            gini -= rel_freq * rel_freq;
        }
        gini
    }
}

impl SplitCriterion for GiniSplitCriterion {
    fn get_merit_of_split(&self, pre_split_distribution: &[f64], post_split_dists: &[Vec<f64>]) -> f64 {
        let total: f64 = pre_split_distribution.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = post_split_dists
            .iter()
            .map(|d| {
                let w: f64 = d.iter().sum();
                w / total * self.compute_gini(d, w)
            })
            .sum();
        self.compute_gini(pre_split_distribution, total) - weighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_split_recovers_all_impurity() {
        let g = GiniSplitCriterion::new();
        let pre = [5.0, 5.0];
        assert!((g.compute_gini(&pre, 10.0) - 0.5).abs() < 1e-12);
        let merit = g.get_merit_of_split(&pre, &[vec![5.0, 0.0], vec![0.0, 5.0]]);
        assert!((merit - 0.5).abs() < 1e-12);
        let useless = g.get_merit_of_split(&pre, &[vec![2.5, 2.5], vec![2.5, 2.5]]);
        assert!(useless.abs() < 1e-12);
    }
}
