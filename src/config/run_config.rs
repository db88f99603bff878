use crate::classifiers::FitError;
use crate::config::choices::{LearnerChoice, LearnerKind, RegistryChoice, check_params};
use crate::core::metadata::ColumnType;
use crate::error::{Result, UtilityError};
use crate::selection::{ParamGrid, merge_params};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::path::Path;
use strum_macros::Display;
use tracing::warn;

/// Key of the classifier section inside a full run-input document.
pub const RUN_INPUT_SECTION: &str = "utility_parameters_classifiers";

fn default_seed() -> u64 {
    1234
}
fn default_discrete_types() -> Vec<ColumnType> {
    ColumnType::DEFAULT_DISCRETE.to_vec()
}
fn default_cv_folds() -> usize {
    5
}
fn default_true() -> bool {
    true
}

/// How a classifier's parameters are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SelectionMode {
    /// Use `params_main` as given.
    #[default]
    #[serde(alias = "main")]
    Fixed,
    /// Cross-validated grid search over `params_range`.
    #[serde(alias = "range")]
    Searched,
}

/// One classifier as written in the run configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierEntry {
    /// Required in list form; the object key is the name otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Registry kind; defaults to the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default)]
    pub params_main: Map<String, Value>,
    #[serde(default)]
    pub params_range: Map<String, Value>,
}

/// Either `{"Name": {..entry..}, ..}` or `[{"name": "Name", ..entry..}, ..]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassifierTable {
    List(Vec<ClassifierEntry>),
    ByName(Map<String, Value>),
}

impl ClassifierTable {
    fn entries(&self) -> Result<Vec<(String, ClassifierEntry)>> {
        match self {
            ClassifierTable::List(list) => list
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    let name = e.name.clone().ok_or_else(|| {
                        UtilityError::config(format!("classifier #{i} has no name"))
                    })?;
                    Ok((name, e.clone()))
                })
                .collect(),
            ClassifierTable::ByName(map) => map
                .iter()
                .map(|(name, v)| {
                    let e: ClassifierEntry = serde_json::from_value(v.clone()).map_err(|err| {
                        UtilityError::config(format!("classifier '{name}': {err}"))
                    })?;
                    Ok((name.clone(), e))
                })
                .collect(),
        }
    }
}

/// Utility evaluation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub input_columns: Vec<String>,
    pub label_column: String,
    pub test_train_ratio: f64,
    #[serde(default)]
    pub num_leaked_rows: usize,
    #[serde(default = "default_seed")]
    pub random_seed: u64,
    #[serde(default = "default_discrete_types")]
    pub discrete_types: Vec<ColumnType>,
    #[serde(default)]
    pub synth_method: String,
    #[serde(default = "default_cv_folds")]
    pub cv_folds: usize,
    /// Threads for the grid search; 0 uses the global rayon pool.
    #[serde(default)]
    pub n_jobs: usize,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, alias = "classifiers", skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierTable>,
}

/// A validated classifier of the ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSpec {
    pub name: String,
    pub kind: LearnerKind,
    pub mode: SelectionMode,
    pub fixed_params: Map<String, Value>,
    pub grid: ParamGrid,
}

impl ClassifierSpec {
    /// Typed learner for the fixed parameters with `overrides` applied.
    pub fn choice(&self, overrides: &Map<String, Value>) -> Result<LearnerChoice, FitError> {
        self.choice_with(merge_params(&self.fixed_params, overrides))
    }

    /// Typed learner for a complete parameter set, ignoring the fixed ones.
    pub fn choice_with(&self, params: Map<String, Value>) -> Result<LearnerChoice, FitError> {
        LearnerChoice::from_parts(self.kind, Value::Object(params))
            .map_err(|e| FitError::InvalidParameter(format!("{}: {e}", self.name)))
    }
}

impl RunConfig {
    pub fn new<S: Into<String>>(input_columns: Vec<String>, label_column: S, test_train_ratio: f64) -> Self {
        Self {
            input_columns,
            label_column: label_column.into(),
            test_train_ratio,
            num_leaked_rows: 0,
            random_seed: default_seed(),
            discrete_types: default_discrete_types(),
            synth_method: String::new(),
            cv_folds: default_cv_folds(),
            n_jobs: 0,
            enabled: true,
            classifier: None,
        }
    }

    /// Accepts either the bare settings object or a full run-input document
    /// holding them under [`RUN_INPUT_SECTION`]. A document-level
    /// `"enabled": false` disables the run.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Object(mut doc) = value else {
            return Err(UtilityError::config("run configuration must be a JSON object"));
        };
        if let Some(section) = doc.remove(RUN_INPUT_SECTION) {
            let outer_enabled = doc.get("enabled").and_then(Value::as_bool).unwrap_or(true);
            let mut cfg: RunConfig = serde_json::from_value(section)
                .map_err(|e| UtilityError::config(format!("{RUN_INPUT_SECTION}: {e}")))?;
            cfg.enabled &= outer_enabled;
            return Ok(cfg);
        }
        serde_json::from_value(Value::Object(doc)).map_err(|e| UtilityError::config(e.to_string()))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(s)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_classifiers(mut self, table: ClassifierTable) -> Self {
        self.classifier = Some(table);
        self
    }

    /// Checks the scalar settings and resolves the ensemble.
    pub fn validate(&self) -> Result<Vec<ClassifierSpec>> {
        if self.input_columns.is_empty() {
            return Err(UtilityError::config("input_columns is empty"));
        }
        if self.label_column.is_empty() {
            return Err(UtilityError::config("label_column is empty"));
        }
        if self.input_columns.contains(&self.label_column) {
            return Err(UtilityError::config(format!(
                "label column '{}' is also an input column",
                self.label_column
            )));
        }
        if !(self.test_train_ratio > 0.0 && self.test_train_ratio < 1.0) {
            return Err(UtilityError::config(format!(
                "test_train_ratio must be in (0, 1), got {}",
                self.test_train_ratio
            )));
        }
        if self.cv_folds < 2 {
            return Err(UtilityError::config(format!("cv_folds must be >= 2, got {}", self.cv_folds)));
        }
        self.classifier_specs()
    }

    pub fn classifier_specs(&self) -> Result<Vec<ClassifierSpec>> {
        let entries = match &self.classifier {
            Some(table) => table.entries()?,
            None => {
                warn!("no classifier configured, using the default ensemble");
                default_ensemble().entries()?
            }
        };
        if entries.is_empty() {
            return Err(UtilityError::config("classifier ensemble is empty"));
        }

        let schema = LearnerChoice::schema();
        let mut seen = HashSet::new();
        let mut specs = Vec::with_capacity(entries.len());
        for (name, entry) in entries {
            if !seen.insert(name.clone()) {
                return Err(UtilityError::config(format!("duplicate classifier '{name}'")));
            }
            let kind_name = entry.kind.as_deref().unwrap_or(&name);
            let kind = LearnerKind::resolve(kind_name).ok_or_else(|| {
                UtilityError::config(format!("classifier '{name}': unknown kind '{kind_name}'"))
            })?;
            let kind_key = kind.to_string();

            check_params(&schema, &kind_key, &entry.params_main)
                .map_err(|e| UtilityError::config(format!("classifier '{name}': {e}")))?;

            let grid = match entry.mode {
                SelectionMode::Fixed => ParamGrid::default(),
                SelectionMode::Searched => ParamGrid::from_json(&entry.params_range)?,
            };
            for key in grid.keys() {
                for v in grid.values_of(key).unwrap_or_default() {
                    let single: Map<String, Value> = [(key.to_string(), v.clone())].into_iter().collect();
                    check_params(&schema, &kind_key, &single)
                        .map_err(|e| UtilityError::config(format!("classifier '{name}' grid: {e}")))?;
                }
            }

            let spec = ClassifierSpec {
                name,
                kind,
                mode: entry.mode,
                fixed_params: entry.params_main,
                grid,
            };
            for candidate in spec.grid.candidates() {
                spec.choice(&candidate)
                    .map_err(|e| UtilityError::config(e.to_string()))?;
            }
            specs.push(spec);
        }
        Ok(specs)
    }
}

/// Ensemble used when the configuration names none.
pub fn default_ensemble() -> ClassifierTable {
    let table = json!({
        "LogisticRegression": {
            "mode": "range",
            "params_main": {"max_iter": 5000},
            "params_range": {"classifier__max_iter": [10, 50, 100, 150, 180, 200, 250, 300]}
        },
        "KNeighborsClassifier": {
            "mode": "main",
            "params_main": {"n_neighbors": 3},
            "params_range": {"classifier__n_neighbors": [3, 4, 5]}
        },
        "RandomForestClassifier": {
            "mode": "main",
            "params_main": {"max_depth": 5, "n_estimators": 10, "max_features": 1, "random_state": 123},
            "params_range": {}
        }
    });
    match table {
        Value::Object(map) => ClassifierTable::ByName(map),
        _ => ClassifierTable::ByName(Map::new()),
    }
}
