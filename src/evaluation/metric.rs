use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Metric {
    Accuracy,
    Precision,
    Recall,
    F1,
}

/// How per-class scores are folded into one number. Accuracy only has
/// `Value`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Average {
    Value,
    Macro,
    Weighted,
}

impl Metric {
    pub fn averages(self) -> &'static [Average] {
        match self {
            Metric::Accuracy => &[Average::Value],
            _ => &[Average::Macro, Average::Weighted],
        }
    }
}

/// Every (metric, average) cell reported for a classifier, in report order.
pub fn metric_cells() -> impl Iterator<Item = (Metric, Average)> {
    use strum::IntoEnumIterator;
    Metric::iter().flat_map(|m| m.averages().iter().map(move |&a| (m, a)))
}
