use crate::classifiers::baseline::MajorityClass;
use crate::classifiers::bayes::GaussianNaiveBayes;
use crate::classifiers::linear::LogisticRegression;
use crate::classifiers::neighbors::KNeighbors;
use crate::classifiers::trees::{DecisionTree, RandomForest, TreeSettings};
use crate::classifiers::{Classifier, FitError};
use crate::config::choices::LearnerChoice;

/// Instantiates an unfitted learner. `seed` is used by stochastic learners
/// that do not set their own `random_state`.
pub fn build_learner(choice: &LearnerChoice, seed: u64) -> Result<Box<dyn Classifier + Send>, FitError> {
    Ok(match choice {
        LearnerChoice::LogisticRegression(p) => Box::new(LogisticRegression::new(
            p.max_iter,
            p.learning_rate,
            p.c,
            p.tol,
        )?),
        LearnerChoice::KNeighbors(p) => Box::new(KNeighbors::new(p.n_neighbors, p.weights)?),
        LearnerChoice::GaussianNaiveBayes(p) => Box::new(GaussianNaiveBayes::new(p.var_smoothing)?),
        LearnerChoice::DecisionTree(p) => {
            let settings = TreeSettings {
                max_depth: p.max_depth,
                min_samples_split: p.min_samples_split,
                min_samples_leaf: p.min_samples_leaf,
                max_features: p.max_features,
            };
            Box::new(DecisionTree::new(settings, p.random_state.unwrap_or(seed))?)
        }
        LearnerChoice::RandomForest(p) => {
            let settings = TreeSettings {
                max_depth: p.max_depth,
                min_samples_split: p.min_samples_split,
                min_samples_leaf: p.min_samples_leaf,
                max_features: p.max_features,
            };
            Box::new(RandomForest::new(
                p.n_estimators,
                settings,
                p.bootstrap,
                p.random_state.unwrap_or(seed),
            )?)
        }
        LearnerChoice::MajorityClass(_) => Box::new(MajorityClass::new()),
    })
}
