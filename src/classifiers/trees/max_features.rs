use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeatureRule {
    Sqrt,
    Log2,
    All,
}

/// Number of features examined at each split.
///
/// Accepts an integer count, a fraction in `(0, 1]` or one of the named
/// rules, so `3`, `0.5` and `"sqrt"` all deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MaxFeatures {
    Count(usize),
    Fraction(f64),
    Rule(FeatureRule),
}

impl MaxFeatures {
    pub fn is_valid(&self) -> bool {
        match *self {
            MaxFeatures::Count(k) => k > 0,
            MaxFeatures::Fraction(f) => f > 0.0 && f <= 1.0,
            MaxFeatures::Rule(_) => true,
        }
    }

    /// Concrete count for `n_features` columns, clamped to `1..=n_features`.
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = n_features as f64;
        let k = match *self {
            MaxFeatures::Count(k) => k,
            MaxFeatures::Fraction(f) => (f * n) as usize,
            MaxFeatures::Rule(FeatureRule::Sqrt) => n.sqrt() as usize,
            MaxFeatures::Rule(FeatureRule::Log2) => n.log2() as usize,
            MaxFeatures::Rule(FeatureRule::All) => n_features,
        };
        k.clamp(1, n_features.max(1))
    }
}
