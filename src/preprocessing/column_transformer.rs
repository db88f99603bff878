use crate::core::column_types::{ColumnTypeMap, FeatureKind};
use crate::core::dataset::{Dataset, Value};
use crate::core::matrix::Matrix;
use crate::error::{Result, UtilityError};
use crate::preprocessing::{OneHotEncoder, StandardScaler};
use ndarray::s;
use tracing::warn;

/// Which input features are scaled and which are one-hot encoded.
///
/// One transform description is shared by both training regimes; every regime fits its own
/// [`FittedTransform`] from it, so neither sees the other's statistics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformSpec {
    numeric: Vec<String>,
    discrete: Vec<String>,
}

impl TransformSpec {
    /// Restricts the column types to the configured input features.
    ///
    /// Returns the transform and the input features that the metadata does not
    /// describe; those are dropped from the feature matrix.
    pub fn build<S: AsRef<str>>(types: &ColumnTypeMap, input_columns: &[S]) -> (Self, Vec<String>) {
        let mut spec = Self::default();
        let mut dropped = Vec::new();
        for name in input_columns {
            let name = name.as_ref();
            match types.kind_of(name) {
                Some(FeatureKind::Numeric) => spec.numeric.push(name.to_string()),
                Some(FeatureKind::Discrete) => spec.discrete.push(name.to_string()),
                None => {
                    warn!(column = name, "input feature has no metadata, dropping it");
                    dropped.push(name.to_string());
                }
            }
        }
        (spec, dropped)
    }

    pub fn new(numeric: Vec<String>, discrete: Vec<String>) -> Self {
        Self { numeric, discrete }
    }

    pub fn numeric(&self) -> &[String] {
        &self.numeric
    }

    pub fn discrete(&self) -> &[String] {
        &self.discrete
    }

    pub fn is_empty(&self) -> bool {
        self.numeric.is_empty() && self.discrete.is_empty()
    }

    /// Fits scalers and encoders on `data`, which must contain every column.
    pub fn fit(&self, data: &Dataset) -> Result<FittedTransform> {
        let mut scalers = Vec::with_capacity(self.numeric.len());
        for name in &self.numeric {
            let values = numeric_values(data, name)?;
            scalers.push((name.clone(), StandardScaler::fit(&values)));
        }
        let mut encoders = Vec::with_capacity(self.discrete.len());
        for name in &self.discrete {
            let cats = data.categories_of(name)?;
            encoders.push((name.clone(), OneHotEncoder::fit(&cats)));
        }
        Ok(FittedTransform { scalers, encoders })
    }
}

/// Scalers and encoders fitted on one training partition.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedTransform {
    scalers: Vec<(String, StandardScaler)>,
    encoders: Vec<(String, OneHotEncoder)>,
}

impl FittedTransform {
    /// Width of the produced feature matrix.
    pub fn n_features(&self) -> usize {
        self.scalers.len() + self.encoders.iter().map(|(_, e)| e.width()).sum::<usize>()
    }

    /// Output column names: numeric features, then `name=category` indicators.
    pub fn feature_names(&self) -> Vec<String> {
        let mut out: Vec<String> = self.scalers.iter().map(|(n, _)| n.clone()).collect();
        for (n, e) in &self.encoders {
            out.extend(e.categories().iter().map(|c| format!("{n}={c}")));
        }
        out
    }

    pub fn transform(&self, data: &Dataset) -> Result<Matrix> {
        let n = data.n_rows();
        let mut m = Matrix::zeros((n, self.n_features()));

        for (j, (name, scaler)) in self.scalers.iter().enumerate() {
            let values = numeric_values(data, name)?;
            for (i, v) in values.into_iter().enumerate() {
                m[[i, j]] = scaler.transform(v);
            }
        }

        let mut offset = self.scalers.len();
        for (name, encoder) in &self.encoders {
            let cats = data.categories_of(name)?;
            let w = encoder.width();
            for (i, c) in cats.iter().enumerate() {
                encoder.encode_into(c, m.slice_mut(s![i, offset..offset + w]));
            }
            offset += w;
        }
        Ok(m)
    }
}

fn numeric_values(data: &Dataset, name: &str) -> Result<Vec<f64>> {
    let col = data
        .column(name)
        .ok_or_else(|| UtilityError::data(format!("column '{name}' not found")))?;
    col.values
        .iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::Number(x) => Ok(*x),
            other => Err(UtilityError::data(format!(
                "numeric feature '{name}' has non-numeric value {other} at row {i}"
            ))),
        })
        .collect()
}
