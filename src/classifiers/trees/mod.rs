mod decision_tree;
mod max_features;
mod random_forest;
mod split_suggestion;
pub mod split_criteria;

pub use decision_tree::{DecisionTree, TreeSettings};
pub use max_features::{FeatureRule, MaxFeatures};
pub use random_forest::RandomForest;
pub use split_suggestion::SplitSuggestion;
