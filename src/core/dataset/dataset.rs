use crate::core::dataset::Value;
use crate::error::{Result, UtilityError};

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new<N: Into<String>>(name: N, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// True when every non-missing cell is a number.
    pub fn is_numeric(&self) -> bool {
        self.values
            .iter()
            .all(|v| matches!(v, Value::Number(_) | Value::Missing))
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }
}

/// Column-major table shared by the original and released datasets.
///
/// All columns have the same length. Column names are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        for c in &columns {
            if c.values.len() != n_rows {
                return Err(UtilityError::data(format!(
                    "column '{}' has {} rows, expected {n_rows}",
                    c.name,
                    c.values.len()
                )));
            }
        }
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].iter().any(|o| o.name == c.name) {
                return Err(UtilityError::data(format!(
                    "duplicate column name '{}'",
                    c.name
                )));
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Builds a dataset from a header and row-major cells.
    pub fn from_rows<S: AsRef<str>>(header: &[S], rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns: Vec<Column> = header
            .iter()
            .map(|h| Column::new(h.as_ref(), Vec::with_capacity(rows.len())))
            .collect();
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(UtilityError::data(format!(
                    "row {r} has {} cells, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
            for (col, v) in columns.iter_mut().zip(row) {
                col.values.push(v);
            }
        }
        Self::new(columns)
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn columns_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        self.columns.iter_mut()
    }

    pub fn index_of_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index_of_column(name).is_some()
    }

    /// Cells of one row, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.n_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// New dataset containing the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), indices.iter().map(|&i| c.values[i].clone()).collect()))
            .collect();
        Self {
            columns,
            n_rows: indices.len(),
        }
    }

    /// New dataset restricted to the named columns, in the given order.
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut columns = Vec::with_capacity(names.len());
        for n in names {
            let col = self.column(n.as_ref()).ok_or_else(|| {
                UtilityError::data(format!("column '{}' not found", n.as_ref()))
            })?;
            columns.push(col.clone());
        }
        Ok(Self {
            columns,
            n_rows: self.n_rows,
        })
    }

    /// Category keys of a column, one per row.
    pub fn categories_of(&self, name: &str) -> Result<Vec<String>> {
        let col = self
            .column(name)
            .ok_or_else(|| UtilityError::data(format!("column '{name}' not found")))?;
        Ok(col.values.iter().map(Value::category).collect())
    }

    /// Copies the first `n` rows of `source` over the first `n` rows of `self`.
    ///
    /// Both datasets must share the same column order.
    pub fn overwrite_leading_rows(&mut self, source: &Dataset, n: usize) -> Result<()> {
        if self.column_names() != source.column_names() {
            return Err(UtilityError::SchemaMismatch {
                original: source.column_names(),
                released: self.column_names(),
            });
        }
        if n > self.n_rows || n > source.n_rows {
            return Err(UtilityError::data(format!(
                "cannot copy {n} rows: original has {}, released has {}",
                source.n_rows, self.n_rows
            )));
        }
        for (dst, src) in self.columns.iter_mut().zip(&source.columns) {
            dst.values[..n].clone_from_slice(&src.values[..n]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Dataset {
        Dataset::from_rows(
            &["a", "b"],
            vec![
                vec![Value::Number(1.0), Value::from("x")],
                vec![Value::Number(2.0), Value::from("y")],
                vec![Value::Missing, Value::from("z")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = Dataset::from_rows(&["a", "b"], vec![vec![Value::Number(1.0)]]).unwrap_err();
        assert!(matches!(err, UtilityError::Data(_)));
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::new("a", vec![Value::Missing]),
            Column::new("a", vec![Value::Missing]),
        ])
        .unwrap_err();
        assert!(matches!(err, UtilityError::Data(_)));
    }

    #[test]
    fn select_rows_preserves_requested_order() {
        let d = small().select_rows(&[2, 0]);
        assert_eq!(d.n_rows(), 2);
        assert_eq!(d.column("b").unwrap().values, vec![Value::from("z"), Value::from("x")]);
    }

    #[test]
    fn numeric_detection_ignores_missing() {
        let d = small();
        assert!(d.column("a").unwrap().is_numeric());
        assert!(!d.column("b").unwrap().is_numeric());
        assert_eq!(d.column("a").unwrap().missing_count(), 1);
    }

    #[test]
    fn overwrite_leading_rows_copies_prefix_only() {
        let src = small();
        let mut dst = Dataset::from_rows(
            &["a", "b"],
            vec![
                vec![Value::Number(9.0), Value::from("q")],
                vec![Value::Number(8.0), Value::from("r")],
                vec![Value::Number(7.0), Value::from("s")],
            ],
        )
        .unwrap();
        dst.overwrite_leading_rows(&src, 2).unwrap();
        assert_eq!(dst.row(0), src.row(0));
        assert_eq!(dst.row(1), src.row(1));
        assert_eq!(dst.column("b").unwrap().values[2], Value::from("s"));

        assert!(dst.overwrite_leading_rows(&src, 4).is_err());
    }
}
