use crate::core::dataset::{Dataset, Value};

/// Median of the numeric cells of a column, `None` when there are none.
pub fn column_median(values: &[Value]) -> Option<f64> {
    let mut xs: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(f64::total_cmp);
    let mid = xs.len() / 2;
    Some(if xs.len() % 2 == 0 {
        (xs[mid - 1] + xs[mid]) / 2.0
    } else {
        xs[mid]
    })
}

/// Fills missing cells of numeric columns with that column's median.
///
/// Uses only `data`'s own statistics. Text columns are left alone; their
/// missing cells act as one more category. A numeric column with no values
/// at all is filled with zero. Returns one warning per such column.
pub fn impute_median(data: &mut Dataset) -> Vec<String> {
    let mut warnings = Vec::new();
    for col in data.columns_mut() {
        if col.missing_count() == 0 || !col.is_numeric() {
            continue;
        }
        let fill = match column_median(&col.values) {
            Some(m) => m,
            None => {
                warnings.push(format!(
                    "column '{}' has no numeric values, filling with 0",
                    col.name
                ));
                0.0
            }
        };
        for v in col.values.iter_mut().filter(|v| v.is_missing()) {
            *v = Value::Number(fill);
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_handles_odd_and_even_counts() {
        let odd = [Value::Number(3.0), Value::Number(1.0), Value::Number(2.0)];
        assert_eq!(column_median(&odd), Some(2.0));
        let even = [
            Value::Number(4.0),
            Value::Missing,
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0),
        ];
        assert_eq!(column_median(&even), Some(2.5));
        assert_eq!(column_median(&[Value::Missing]), None);
    }

    #[test]
    fn fills_numeric_columns_only() {
        let mut d = Dataset::from_rows(
            &["n", "t"],
            vec![
                vec![Value::Number(1.0), Value::from("a")],
                vec![Value::Missing, Value::Missing],
                vec![Value::Number(5.0), Value::from("b")],
            ],
        )
        .unwrap();
        let warnings = impute_median(&mut d);
        assert!(warnings.is_empty());
        assert_eq!(d.column("n").unwrap().values[1], Value::Number(3.0));
        assert_eq!(d.column("t").unwrap().values[1], Value::Missing);
    }

    #[test]
    fn all_missing_column_is_zero_filled_with_warning() {
        let mut d = Dataset::from_rows(&["n"], vec![vec![Value::Missing], vec![Value::Missing]]).unwrap();
        let warnings = impute_median(&mut d);
        assert_eq!(warnings.len(), 1);
        assert_eq!(d.column("n").unwrap().values, vec![Value::Number(0.0); 2]);
    }
}
