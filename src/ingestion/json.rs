//! JSON row ingestion.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"id":1}, {"id":2}]`
//! - A single JSON object: `{"id":1}`
//! - Newline-delimited JSON (NDJSON): `{"id":1}\n{"id":2}\n`
//!
//! Values are kept as-is; the grid coerces them at comparison time.

use std::fs;
use std::path::Path;

use crate::error::{GridError, GridResult};
use crate::types::{Row, Value};

/// Read rows from a JSON or NDJSON file.
pub fn rows_from_json_path(path: impl AsRef<Path>) -> GridResult<Vec<Row>> {
    let text = fs::read_to_string(path)?;
    rows_from_json_str(&text)
}

/// Parse rows from an in-memory JSON document or NDJSON stream.
///
/// Empty input yields no rows. A non-object entry is an error naming its 1-based row.
pub fn rows_from_json_str(input: &str) -> GridResult<Vec<Row>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    // A single document first, NDJSON otherwise.
    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        return match v {
            Value::Array(items) => rows_from_values(items),
            Value::Object(_) => rows_from_values(vec![v]),
            _ => Err(GridError::Ingestion {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        };
    }

    let mut values = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v = serde_json::from_str::<Value>(line).map_err(|e| GridError::Ingestion {
            message: format!("invalid ndjson at line {}: {}", i + 1, e),
        })?;
        values.push(v);
    }
    rows_from_values(values)
}

fn rows_from_values(values: Vec<Value>) -> GridResult<Vec<Row>> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx0, v)| match v {
            Value::Object(map) => Ok(Row::from(map)),
            _ => Err(GridError::Ingestion {
                message: format!("row {} is not a json object", idx0 + 1),
            }),
        })
        .collect()
}
