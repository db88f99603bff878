use crate::core::dataset::{Dataset, Value};
use crate::error::{Result, UtilityError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn malformed(e: csv::Error) -> UtilityError {
    UtilityError::data(format!("malformed csv: {e}"))
}

/// Reads a header-first CSV table.
///
/// Cells listed in [`Value::MISSING_TOKENS`] become missing. A column whose
/// non-missing cells all parse as numbers stays numeric; any other column is
/// read back as text, so `"01"` in a text column keeps its leading zero.
/// Rows with a different field count than the header are rejected.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let names: Vec<String> = rdr
        .headers()
        .map_err(malformed)?
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h }.to_string())
        .collect();
    if names.is_empty() {
        return Err(UtilityError::data("csv input has no header row"));
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(malformed)?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let numeric_columns: Vec<bool> = (0..names.len())
        .map(|c| {
            raw_rows
                .iter()
                .all(|r| !matches!(Value::parse(&r[c]), Value::Text(_)))
        })
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|r| {
            r.into_iter()
                .zip(&numeric_columns)
                .map(|(cell, &numeric)| match Value::parse(&cell) {
                    Value::Number(_) if !numeric => Value::Text(cell),
                    v => v,
                })
                .collect()
        })
        .collect();

    Dataset::from_rows(&names, rows)
}

pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let file = File::open(path.as_ref()).map_err(|e| {
        UtilityError::data(format!("cannot open {}: {e}", path.as_ref().display()))
    })?;
    read_csv(file)
}
