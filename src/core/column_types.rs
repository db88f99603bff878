use crate::core::metadata::{ColumnType, DatasetMetadata};
use crate::error::{Result, UtilityError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Synthesis methods whose output only contains discrete values.
const ALL_DISCRETE_METHODS: [&str; 1] = ["sgf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Numeric,
    Discrete,
}

/// Column name to feature kind, derived once per run from the metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnTypeMap {
    kinds: BTreeMap<String, FeatureKind>,
    order: Vec<String>,
}

impl ColumnTypeMap {
    /// Splits metadata columns into numeric and discrete features.
    pub fn from_metadata(
        metadata: &DatasetMetadata,
        synth_method: &str,
        discrete_types: &[ColumnType],
    ) -> Result<Self> {
        if metadata.columns.is_empty() {
            return Err(UtilityError::config("metadata lists no columns"));
        }
        let all_discrete = ALL_DISCRETE_METHODS
            .iter()
            .any(|m| m.eq_ignore_ascii_case(synth_method));

        let mut out = Self::default();
        for col in &metadata.columns {
            let kind = if all_discrete || discrete_types.contains(&col.column_type) {
                FeatureKind::Discrete
            } else {
                FeatureKind::Numeric
            };
            out.kinds.insert(col.name.clone(), kind);
            out.order.push(col.name.clone());
        }
        Ok(out)
    }

    pub fn kind_of(&self, name: &str) -> Option<FeatureKind> {
        self.kinds.get(name).copied()
    }

    pub fn numeric(&self) -> Vec<&str> {
        self.of_kind(FeatureKind::Numeric)
    }

    pub fn discrete(&self) -> Vec<&str> {
        self.of_kind(FeatureKind::Discrete)
    }

    fn of_kind(&self, kind: FeatureKind) -> Vec<&str> {
        self.order
            .iter()
            .filter(|n| self.kinds[n.as_str()] == kind)
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
