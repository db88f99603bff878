use crate::core::dataset::{Dataset, Value};
use crate::error::{Result, UtilityError};
use crate::partition::{impute_median, train_test_split};
use crate::tasks::RunDiagnostics;
use tracing::{info, warn};

/// Train/test features and labels of one dataset.
///
/// `train_rows`/`test_rows` are the source row indices, kept so callers can
/// trace every partition row back to the (imputed, leaked) dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub train_features: Dataset,
    pub train_labels: Vec<String>,
    pub test_features: Dataset,
    pub test_labels: Vec<String>,
    pub train_rows: Vec<usize>,
    pub test_rows: Vec<usize>,
}

/// Partitions of both datasets, produced once per run.
///
/// Every classifier is scored on `original.test_*`; the released test side is
/// kept for completeness but never used for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionPair {
    pub original: Partition,
    pub released: Partition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionSettings {
    pub input_columns: Vec<String>,
    /// Inputs that must hold numbers; missing cells are allowed and imputed.
    pub numeric_columns: Vec<String>,
    pub label_column: String,
    pub test_ratio: f64,
    pub leaked_rows: usize,
    pub seed: u64,
}

pub struct DataPartitioner {
    settings: PartitionSettings,
}

impl DataPartitioner {
    pub fn new(settings: PartitionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PartitionSettings {
        &self.settings
    }

    /// Imputes, injects leaked rows and splits both datasets.
    ///
    /// Consumes the inputs; the imputed copies only live inside the returned
    /// partitions.
    pub fn partition(
        &self,
        mut original: Dataset,
        mut released: Dataset,
        diagnostics: &mut RunDiagnostics,
    ) -> Result<PartitionPair> {
        let s = &self.settings;
        if original.column_names() != released.column_names() {
            return Err(UtilityError::SchemaMismatch {
                original: original.column_names(),
                released: released.column_names(),
            });
        }
        self.check_columns(&original, "original")?;
        self.check_columns(&released, "released")?;

        for w in impute_median(&mut original) {
            warn!("original dataset: {w}");
            diagnostics.warn(format!("original dataset: {w}"));
        }
        for w in impute_median(&mut released) {
            warn!("released dataset: {w}");
            diagnostics.warn(format!("released dataset: {w}"));
        }

        if s.leaked_rows > 0 {
            released.overwrite_leading_rows(&original, s.leaked_rows)?;
            info!(rows = s.leaked_rows, "copied original rows into released dataset");
        }

        let original = self.split(&original)?;
        let released = self.split(&released)?;
        info!(
            original_train = original.train_labels.len(),
            original_test = original.test_labels.len(),
            released_train = released.train_labels.len(),
            "partitioned datasets"
        );
        Ok(PartitionPair { original, released })
    }

    fn check_columns(&self, data: &Dataset, which: &str) -> Result<()> {
        let s = &self.settings;
        if !data.has_column(&s.label_column) {
            return Err(UtilityError::data(format!(
                "label column '{}' not found in {which} dataset",
                s.label_column
            )));
        }
        if let Some(missing) = s.input_columns.iter().find(|c| !data.has_column(c)) {
            return Err(UtilityError::data(format!(
                "feature column '{missing}' not found in {which} dataset"
            )));
        }
        for name in &s.numeric_columns {
            let Some(col) = data.column(name) else {
                return Err(UtilityError::data(format!(
                    "numeric feature '{name}' not found in {which} dataset"
                )));
            };
            let bad = col
                .values
                .iter()
                .position(|v| !matches!(v, Value::Number(_) | Value::Missing));
            if let Some(row) = bad {
                return Err(UtilityError::data(format!(
                    "numeric feature '{name}' has non-numeric value {} at row {row} of {which} dataset",
                    col.values[row]
                )));
            }
        }
        Ok(())
    }

    fn split(&self, data: &Dataset) -> Result<Partition> {
        let s = &self.settings;
        let idx = train_test_split(data.n_rows(), s.test_ratio, s.seed)?;
        let features = data.select_columns(&s.input_columns)?;
        let labels = data.categories_of(&s.label_column)?;
        let pick = |rows: &[usize]| rows.iter().map(|&i| labels[i].clone()).collect::<Vec<_>>();
        Ok(Partition {
            train_features: features.select_rows(&idx.train),
            train_labels: pick(&idx.train),
            test_features: features.select_rows(&idx.test),
            test_labels: pick(&idx.test),
            train_rows: idx.train,
            test_rows: idx.test,
        })
    }
}
