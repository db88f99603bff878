use crate::error::{Result, UtilityError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Declared statistical type of a column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
)]
pub enum ColumnType {
    Categorical,
    Ordinal,
    DiscreteNumerical,
    DateTime,
    ContinuousNumerical,
}

impl ColumnType {
    /// Types encoded as discrete features unless configured otherwise.
    pub const DEFAULT_DISCRETE: [ColumnType; 4] = [
        ColumnType::Categorical,
        ColumnType::Ordinal,
        ColumnType::DiscreteNumerical,
        ColumnType::DateTime,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// Per-column metadata of the original dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetMetadata {
    pub columns: Vec<ColumnMetadata>,
}

impl DatasetMetadata {
    pub fn new(columns: Vec<ColumnMetadata>) -> Self {
        Self { columns }
    }

    /// Parses `{"columns": [{"name": .., "type": ..}, ..]}`.
    ///
    /// Extra keys are ignored. Anything else that is off (no `columns`,
    /// an entry without `name` or `type`, an unknown type, a repeated name)
    /// is a configuration error.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let cols = value
            .get("columns")
            .and_then(Value::as_array)
            .ok_or_else(|| UtilityError::config("metadata does not contain a 'columns' array"))?;

        let mut columns = Vec::with_capacity(cols.len());
        for (i, c) in cols.iter().enumerate() {
            let name = c
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| UtilityError::config(format!("metadata column {i} has no 'name'")))?;
            let ty = c.get("type").and_then(Value::as_str).ok_or_else(|| {
                UtilityError::config(format!("metadata column '{name}' has no 'type'"))
            })?;
            let column_type = ColumnType::from_str(ty).map_err(|_| {
                UtilityError::config(format!("metadata column '{name}' has unknown type '{ty}'"))
            })?;
            if columns.iter().any(|m: &ColumnMetadata| m.name == name) {
                return Err(UtilityError::config(format!(
                    "metadata lists column '{name}' twice"
                )));
            }
            columns.push(ColumnMetadata {
                name: name.to_string(),
                column_type,
            });
        }
        Ok(Self { columns })
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let v: Value = serde_json::from_str(s)
            .map_err(|e| UtilityError::config(format!("metadata is not valid json: {e}")))?;
        Self::from_json_value(&v)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            UtilityError::config(format!(
                "cannot read metadata {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_json_str(&s)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_columns_and_ignores_extra_keys() {
        let m = DatasetMetadata::from_json_str(
            r#"{"columns": [
                {"name": "age", "type": "DiscreteNumerical", "min": 17},
                {"name": "fnlwgt", "type": "ContinuousNumerical"}
            ], "provenance": "census"}"#,
        )
        .unwrap();
        assert_eq!(m.columns.len(), 2);
        assert_eq!(m.column_type("age"), Some(ColumnType::DiscreteNumerical));
        assert_eq!(m.column_type("nope"), None);
    }

    #[test]
    fn malformed_metadata_is_a_config_error() {
        for bad in [
            r#"{}"#,
            r#"{"columns": [{"type": "Categorical"}]}"#,
            r#"{"columns": [{"name": "x"}]}"#,
            r#"{"columns": [{"name": "x", "type": "Imaginary"}]}"#,
            r#"{"columns": [{"name": "x", "type": "Ordinal"}, {"name": "x", "type": "Ordinal"}]}"#,
            r#"not json"#,
        ] {
            let err = DatasetMetadata::from_json_str(bad).unwrap_err();
            assert!(matches!(err, UtilityError::Config(_)), "{bad}");
        }
    }
}
