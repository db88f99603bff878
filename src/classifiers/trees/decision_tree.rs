use crate::classifiers::classifier::check_training_set;
use crate::classifiers::trees::split_criteria::{GiniSplitCriterion, SplitCriterion};
use crate::classifiers::trees::{MaxFeatures, SplitSuggestion};
use crate::classifiers::{Classifier, FitError};
use crate::core::matrix::{Matrix, RowView};
use crate::utils::math::normalize_in_place;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Growth limits shared by [`DecisionTree`] and the random forest.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSettings {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// `None` examines every feature at every split.
    pub max_features: Option<MaxFeatures>,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

impl TreeSettings {
    pub fn validate(&self) -> Result<(), FitError> {
        if self.max_depth == Some(0) {
            return Err(FitError::InvalidParameter("max_depth must be > 0".into()));
        }
        if self.min_samples_split < 2 {
            return Err(FitError::InvalidParameter("min_samples_split must be >= 2".into()));
        }
        if self.min_samples_leaf < 1 {
            return Err(FitError::InvalidParameter("min_samples_leaf must be >= 1".into()));
        }
        match self.max_features {
            Some(mf) if !mf.is_valid() => {
                Err(FitError::InvalidParameter(format!("invalid max_features {mf:?}")))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// CART classification tree with Gini impurity and binary threshold splits.
///
/// Nodes live in an arena; index 0 is the root.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    settings: TreeSettings,
    seed: u64,
    criterion: GiniSplitCriterion,
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTree {
    pub fn new(settings: TreeSettings, seed: u64) -> Result<Self, FitError> {
        settings.validate()?;
        Ok(Self {
            settings,
            seed,
            criterion: GiniSplitCriterion::new(),
            nodes: Vec::new(),
            n_features: 0,
        })
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], i: usize) -> usize {
            match &nodes[i] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    /// Fits on the given sample rows; repeated indices count repeatedly.
    pub(crate) fn fit_rows(
        &mut self,
        features: &Matrix,
        classes: &[usize],
        n_classes: usize,
        rows: &[usize],
    ) -> Result<(), FitError> {
        if rows.is_empty() {
            return Err(FitError::EmptyTrainingSet);
        }
        self.nodes.clear();
        self.n_features = features.ncols();
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.grow(features, classes, n_classes, rows.to_vec(), 0, &mut rng);
        Ok(())
    }

    fn grow(
        &mut self,
        x: &Matrix,
        y: &[usize],
        n_classes: usize,
        rows: Vec<usize>,
        depth: usize,
        rng: &mut StdRng,
    ) -> usize {
        let distribution = class_counts_of(y, &rows, n_classes);
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: distribution.clone(),
        });

        let pure = distribution.iter().filter(|&&c| c > 0.0).count() <= 1;
        let depth_reached = self.settings.max_depth.is_some_and(|d| depth >= d);
        if pure || depth_reached || rows.len() < self.settings.min_samples_split {
            return id;
        }

        let candidates = self.candidate_features(rng);
        let Some(best) = self.best_split(x, y, &rows, &distribution, &candidates) else {
            return id;
        };

        let (f, t) = (best.feature(), best.threshold());
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| x[[r, f]] <= t);
        let left = self.grow(x, y, n_classes, left_rows, depth + 1, rng);
        let right = self.grow(x, y, n_classes, right_rows, depth + 1, rng);
        self.nodes[id] = Node::Split {
            feature: f,
            threshold: t,
            left,
            right,
        };
        id
    }

    fn candidate_features(&self, rng: &mut StdRng) -> Vec<usize> {
        let d = self.n_features;
        match self.settings.max_features {
            None => (0..d).collect(),
            Some(mf) => {
                let k = mf.resolve(d);
                if k >= d {
                    return (0..d).collect();
                }
                let mut picked = index::sample(rng, d, k).into_vec();
                picked.sort_unstable();
                picked
            }
        }
    }

    fn best_split(
        &self,
        x: &Matrix,
        y: &[usize],
        rows: &[usize],
        total: &[f64],
        features: &[usize],
    ) -> Option<SplitSuggestion> {
        let min_leaf = self.settings.min_samples_leaf;
        let n = rows.len();
        let mut best: Option<SplitSuggestion> = None;

        for &f in features {
            let mut order = rows.to_vec();
            order.sort_by(|&a, &b| x[[a, f]].total_cmp(&x[[b, f]]));

            let mut left = vec![0.0; total.len()];
            for pos in 0..n - 1 {
                left[y[order[pos]]] += 1.0;
                let (v, next) = (x[[order[pos], f]], x[[order[pos + 1], f]]);
                let n_left = pos + 1;
                if v == next || n_left < min_leaf || n - n_left < min_leaf {
                    continue;
                }
                let right: Vec<f64> = total.iter().zip(&left).map(|(t, l)| t - l).collect();
                let merit = self
                    .criterion
                    .get_merit_of_split(total, &[left.clone(), right.clone()]);
                let candidate = SplitSuggestion::new(f, v + (next - v) / 2.0, left.clone(), right, merit);
                // zero-merit splits are allowed; the first of equal splits wins
                if best.as_ref().is_none_or(|b| candidate > *b) {
                    best = Some(candidate);
                }
            }
        }
        best
    }
}

fn class_counts_of(y: &[usize], rows: &[usize], n_classes: usize) -> Vec<f64> {
    let mut counts = vec![0.0; n_classes];
    for &r in rows {
        counts[y[r]] += 1.0;
    }
    counts
}

impl Classifier for DecisionTree {
    fn fit(&mut self, features: &Matrix, classes: &[usize], n_classes: usize) -> Result<(), FitError> {
        check_training_set(features, classes, n_classes)?;
        let rows: Vec<usize> = (0..features.nrows()).collect();
        self.fit_rows(features, classes, n_classes, &rows)
    }

    fn get_votes_for_instance(&self, instance: RowView<'_>) -> Option<Vec<f64>> {
        if self.nodes.is_empty() || instance.len() != self.n_features {
            return None;
        }
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Leaf { distribution } => {
                    let mut votes = distribution.clone();
                    normalize_in_place(&mut votes);
                    return Some(votes);
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if instance[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}
