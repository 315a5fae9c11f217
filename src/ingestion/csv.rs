//! CSV row ingestion.

use std::io::Read;
use std::path::Path;

use crate::error::GridResult;
use crate::types::{ColumnDefinition, Row, Value, ValueType};

/// Read rows from a CSV file with headers.
pub fn rows_from_csv_path(
    path: impl AsRef<Path>,
    columns: &[ColumnDefinition],
) -> GridResult<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    rows_from_csv_reader(&mut rdr, columns)
}

/// Read rows from an existing CSV reader.
///
/// Every header becomes a field. Cells of columns declared as numbers or booleans are
/// converted when they parse; anything else stays a string, and empty cells become null.
pub fn rows_from_csv_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    columns: &[ColumnDefinition],
) -> GridResult<Vec<Row>> {
    let headers = rdr.headers()?.clone();
    let types: Vec<ValueType> = headers
        .iter()
        .map(|h| {
            columns
                .iter()
                .find(|c| c.key == h)
                .map_or(ValueType::Text, |c| c.value_type)
        })
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Row = headers
            .iter()
            .zip(types.iter())
            .enumerate()
            .map(|(i, (h, ty))| (h, typed_cell(*ty, record.get(i).unwrap_or(""))))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn typed_cell(value_type: ValueType, raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match value_type {
        ValueType::Number => {
            if let Ok(n) = trimmed.parse::<i64>() {
                Value::from(n)
            } else if let Some(n) = trimmed.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Value::Number(n)
            } else {
                Value::from(trimmed)
            }
        }
        ValueType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::from(trimmed),
        },
        _ => Value::from(trimmed),
    }
}
