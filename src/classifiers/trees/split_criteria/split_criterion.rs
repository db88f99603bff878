pub trait SplitCriterion {
    /// Impurity decrease achieved by splitting `pre_split_distribution` into
    /// `post_split_dists`. Larger is better.
    fn get_merit_of_split(&self, pre_split_distribution: &[f64], post_split_dists: &[Vec<f64>])
    -> f64;
}
