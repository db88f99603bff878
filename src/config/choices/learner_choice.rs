use crate::classifiers::neighbors::NeighborWeights;
use crate::classifiers::trees::MaxFeatures;
use crate::config::choices::RegistryChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_max_iter() -> usize {
    100
}
fn default_learning_rate() -> f64 {
    0.1
}
fn default_c() -> f64 {
    1.0
}
fn default_tol() -> f64 {
    1e-4
}
fn default_n_neighbors() -> usize {
    5
}
fn default_var_smoothing() -> f64 {
    1e-9
}
fn default_min_samples_split() -> usize {
    2
}
fn default_min_samples_leaf() -> usize {
    1
}
fn default_n_estimators() -> usize {
    100
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NoParams {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LogisticRegressionParams {
    #[serde(default = "default_max_iter")]
    #[schemars(
        title = "Maximum iterations",
        description = "Gradient descent steps before giving up on tol.",
        default = "default_max_iter",
        range(min = 1)
    )]
    pub max_iter: usize,

    #[serde(default = "default_learning_rate")]
    #[schemars(title = "Learning rate", default = "default_learning_rate")]
    pub learning_rate: f64,

    #[serde(rename = "C", default = "default_c")]
    #[schemars(
        title = "Inverse regularization strength",
        description = "Smaller values mean a stronger L2 penalty.",
        default = "default_c"
    )]
    pub c: f64,

    #[serde(default = "default_tol")]
    #[schemars(title = "Tolerance", default = "default_tol")]
    pub tol: f64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            max_iter: default_max_iter(),
            learning_rate: default_learning_rate(),
            c: default_c(),
            tol: default_tol(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KNeighborsParams {
    #[serde(default = "default_n_neighbors")]
    #[schemars(title = "Neighbours", default = "default_n_neighbors", range(min = 1))]
    pub n_neighbors: usize,

    #[serde(default)]
    #[schemars(
        title = "Weights",
        description = "uniform: every neighbour counts the same; distance: closer neighbours count more."
    )]
    pub weights: NeighborWeights,
}

impl Default for KNeighborsParams {
    fn default() -> Self {
        Self {
            n_neighbors: default_n_neighbors(),
            weights: NeighborWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GaussianNaiveBayesParams {
    #[serde(default = "default_var_smoothing")]
    #[schemars(
        title = "Variance smoothing",
        description = "Share of the largest feature variance added to every variance.",
        default = "default_var_smoothing"
    )]
    pub var_smoothing: f64,
}

impl Default for GaussianNaiveBayesParams {
    fn default() -> Self {
        Self {
            var_smoothing: default_var_smoothing(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DecisionTreeParams {
    #[serde(default)]
    #[schemars(title = "Maximum depth", description = "Unlimited when absent.")]
    pub max_depth: Option<usize>,

    #[serde(default = "default_min_samples_split")]
    #[schemars(title = "Minimum rows to split", default = "default_min_samples_split")]
    pub min_samples_split: usize,

    #[serde(default = "default_min_samples_leaf")]
    #[schemars(title = "Minimum rows per leaf", default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,

    #[serde(default)]
    #[schemars(
        title = "Features per split",
        description = "Count, fraction, \"sqrt\", \"log2\" or \"all\". Every feature when absent."
    )]
    pub max_features: Option<MaxFeatures>,

    #[serde(default)]
    #[schemars(title = "Random state", description = "Defaults to the run seed.")]
    pub random_state: Option<u64>,
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            min_samples_leaf: default_min_samples_leaf(),
            max_features: None,
            random_state: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RandomForestParams {
    #[serde(default = "default_n_estimators")]
    #[schemars(title = "Trees", default = "default_n_estimators", range(min = 1))]
    pub n_estimators: usize,

    #[serde(default)]
    #[schemars(title = "Maximum depth", description = "Unlimited when absent.")]
    pub max_depth: Option<usize>,

    #[serde(default = "default_min_samples_split")]
    #[schemars(title = "Minimum rows to split", default = "default_min_samples_split")]
    pub min_samples_split: usize,

    #[serde(default = "default_min_samples_leaf")]
    #[schemars(title = "Minimum rows per leaf", default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,

    #[serde(default)]
    #[schemars(
        title = "Features per split",
        description = "Count, fraction, \"sqrt\", \"log2\" or \"all\". sqrt when absent."
    )]
    pub max_features: Option<MaxFeatures>,

    #[serde(default = "default_true")]
    #[schemars(title = "Bootstrap", default = "default_true")]
    pub bootstrap: bool,

    #[serde(default)]
    #[schemars(title = "Random state", description = "Defaults to the run seed.")]
    pub random_state: Option<u64>,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            min_samples_leaf: default_min_samples_leaf(),
            max_features: None,
            bootstrap: default_true(),
            random_state: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(LearnerKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage, Hash))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum LearnerChoice {
    #[strum_discriminants(strum(
        message = "Logistic Regression",
        detailed_message = "Multinomial softmax regression with an L2 penalty."
    ))]
    LogisticRegression(LogisticRegressionParams),
    #[strum_discriminants(strum(
        message = "K-Nearest Neighbours",
        detailed_message = "Votes of the k closest training rows."
    ))]
    KNeighbors(KNeighborsParams),
    #[strum_discriminants(strum(
        message = "Gaussian Naive Bayes",
        detailed_message = "Per-class Gaussian likelihoods assuming feature independence."
    ))]
    GaussianNaiveBayes(GaussianNaiveBayesParams),
    #[strum_discriminants(strum(
        message = "Decision Tree",
        detailed_message = "CART tree grown with Gini impurity."
    ))]
    DecisionTree(DecisionTreeParams),
    #[strum_discriminants(strum(
        message = "Random Forest",
        detailed_message = "Bootstrap-aggregated CART trees with feature subsampling."
    ))]
    RandomForest(RandomForestParams),
    #[strum_discriminants(strum(
        message = "Majority Class",
        detailed_message = "Baseline that ignores the features."
    ))]
    MajorityClass(NoParams),
}

/// Class names used by existing run configurations.
const LEARNER_ALIASES: &[(&str, LearnerKind)] = &[
    ("LogisticRegression", LearnerKind::LogisticRegression),
    ("KNeighborsClassifier", LearnerKind::KNeighbors),
    ("GaussianNB", LearnerKind::GaussianNaiveBayes),
    ("DecisionTreeClassifier", LearnerKind::DecisionTree),
    ("RandomForestClassifier", LearnerKind::RandomForest),
    ("DummyClassifier", LearnerKind::MajorityClass),
];

impl LearnerKind {
    /// Registry lookup by kebab-case kind or by alias.
    pub fn resolve(name: &str) -> Option<Self> {
        LearnerKind::from_str(name).ok().or_else(|| {
            LEARNER_ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|&(_, kind)| kind)
        })
    }

    /// Whether the learner draws random numbers and takes `random_state`.
    pub fn is_stochastic(self) -> bool {
        matches!(self, LearnerKind::DecisionTree | LearnerKind::RandomForest)
    }
}

impl LearnerChoice {
    pub fn kind(&self) -> LearnerKind {
        LearnerKind::from(self)
    }
}

impl RegistryChoice for LearnerChoice {
    type Kind = LearnerKind;

    fn schema() -> Schema {
        schema_for!(LearnerChoice)
    }

    fn default_params(kind: Self::Kind) -> Value {
        let params = match kind {
            LearnerKind::LogisticRegression => serde_json::to_value(LogisticRegressionParams::default()),
            LearnerKind::KNeighbors => serde_json::to_value(KNeighborsParams::default()),
            LearnerKind::GaussianNaiveBayes => serde_json::to_value(GaussianNaiveBayesParams::default()),
            LearnerKind::DecisionTree => serde_json::to_value(DecisionTreeParams::default()),
            LearnerKind::RandomForest => serde_json::to_value(RandomForestParams::default()),
            LearnerKind::MajorityClass => serde_json::to_value(NoParams::default()),
        };
        params.unwrap_or(Value::Null)
    }
}
