use crate::classifiers::classifier::check_training_set;
use crate::classifiers::trees::{DecisionTree, FeatureRule, MaxFeatures, TreeSettings};
use crate::classifiers::{Classifier, FitError};
use crate::core::matrix::{Matrix, RowView};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bagged CART trees; votes are the mean of the trees' class probabilities.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_estimators: usize,
    settings: TreeSettings,
    bootstrap: bool,
    seed: u64,
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// `settings.max_features` of `None` means `sqrt`.
    pub fn new(
        n_estimators: usize,
        mut settings: TreeSettings,
        bootstrap: bool,
        seed: u64,
    ) -> Result<Self, FitError> {
        if n_estimators == 0 {
            return Err(FitError::InvalidParameter("n_estimators must be > 0".into()));
        }
        settings
            .max_features
            .get_or_insert(MaxFeatures::Rule(FeatureRule::Sqrt));
        settings.validate()?;
        Ok(Self {
            n_estimators,
            settings,
            bootstrap,
            seed,
            trees: Vec::new(),
            n_classes: 0,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, features: &Matrix, classes: &[usize], n_classes: usize) -> Result<(), FitError> {
        check_training_set(features, classes, n_classes)?;
        let n = features.nrows();
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.trees.clear();
        self.n_classes = n_classes;

        for _ in 0..self.n_estimators {
            let tree_seed: u64 = rng.random();
            let rows: Vec<usize> = if self.bootstrap {
                (0..n).map(|_| rng.random_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            let mut tree = DecisionTree::new(self.settings.clone(), tree_seed)?;
            tree.fit_rows(features, classes, n_classes, &rows)?;
            self.trees.push(tree);
        }
        Ok(())
    }

    fn get_votes_for_instance(&self, instance: RowView<'_>) -> Option<Vec<f64>> {
        if self.trees.is_empty() {
            return None;
        }
        let mut votes = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let v = tree.get_votes_for_instance(instance)?;
            for (acc, p) in votes.iter_mut().zip(v) {
                *acc += p;
            }
        }
        let k = self.trees.len() as f64;
        votes.iter_mut().for_each(|v| *v /= k);
        Some(votes)
    }
}
