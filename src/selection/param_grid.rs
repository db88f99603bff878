use crate::error::{Result, UtilityError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Prefix that pipeline-style grids put in front of classifier parameters.
pub const CLASSIFIER_PREFIX: &str = "classifier__";

/// Named lists of candidate values; candidates are the cartesian product.
///
/// Keys are kept sorted, and the last key varies fastest when enumerating.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParamGrid {
    values: BTreeMap<String, Vec<Value>>,
}

impl ParamGrid {
    /// Parses `{"name": [v1, v2, ..], ..}`, stripping [`CLASSIFIER_PREFIX`].
    pub fn from_json(map: &Map<String, Value>) -> Result<Self> {
        let mut values = BTreeMap::new();
        for (raw_key, raw) in map {
            let key = raw_key.strip_prefix(CLASSIFIER_PREFIX).unwrap_or(raw_key);
            if key.is_empty() {
                return Err(UtilityError::config(format!("empty parameter name '{raw_key}'")));
            }
            let list = raw.as_array().ok_or_else(|| {
                UtilityError::config(format!("grid entry '{raw_key}' must be a list, got {raw}"))
            })?;
            if list.is_empty() {
                return Err(UtilityError::config(format!("grid entry '{raw_key}' has no values")));
            }
            if values.insert(key.to_string(), list.clone()).is_some() {
                return Err(UtilityError::config(format!(
                    "grid parameter '{key}' is given more than once"
                )));
            }
        }
        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn values_of(&self, key: &str) -> Option<&[Value]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Number of candidates; an empty grid has exactly one (no overrides).
    pub fn len(&self) -> usize {
        self.values.values().map(Vec::len).product()
    }

    pub fn candidates(&self) -> Vec<Map<String, Value>> {
        let mut out = vec![Map::new()];
        for (key, options) in &self.values {
            let mut next = Vec::with_capacity(out.len() * options.len());
            for partial in &out {
                for v in options {
                    let mut c = partial.clone();
                    c.insert(key.clone(), v.clone());
                    next.push(c);
                }
            }
            out = next;
        }
        out
    }
}

/// `base` with every key of `overrides` replaced.
pub fn merge_params(base: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut out = base.clone();
    for (k, v) in overrides {
        out.insert(k.clone(), v.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn strips_prefix_and_enumerates_in_order() {
        let grid = ParamGrid::from_json(&obj(json!({
            "classifier__n_neighbors": [3, 5],
            "weights": ["uniform", "distance"],
        })))
        .unwrap();
        assert_eq!(grid.keys().collect::<Vec<_>>(), vec!["n_neighbors", "weights"]);
        assert_eq!(grid.len(), 4);
        let c = grid.candidates();
        assert_eq!(c.len(), 4);
        assert_eq!(Value::Object(c[0].clone()), json!({"n_neighbors": 3, "weights": "uniform"}));
        assert_eq!(Value::Object(c[1].clone()), json!({"n_neighbors": 3, "weights": "distance"}));
        assert_eq!(Value::Object(c[3].clone()), json!({"n_neighbors": 5, "weights": "distance"}));
    }

    #[test]
    fn empty_grid_has_one_candidate() {
        let grid = ParamGrid::default();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.candidates(), vec![Map::new()]);
    }

    #[test]
    fn malformed_grids_are_config_errors() {
        for bad in [
            json!({"max_iter": 10}),
            json!({"max_iter": []}),
            json!({"classifier__C": [1], "C": [2]}),
            json!({"classifier__": [1]}),
        ] {
            let err = ParamGrid::from_json(&obj(bad)).unwrap_err();
            assert!(matches!(err, UtilityError::Config(_)));
        }
    }

    #[test]
    fn merge_overrides_base() {
        let merged = merge_params(&obj(json!({"a": 1, "b": 2})), &obj(json!({"b": 3})));
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 3}));
    }
}
