//! Single-column row sorting.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{ColumnDefinition, Row, Value, ValueType, display_string, parse_float};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sort column plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// How values of a column are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// Lower-cased display strings.
    Text,
    /// Parsed floats.
    Numeric,
    /// Parsed timestamps.
    Temporal,
    /// `false` before `true`.
    Boolean,
}

impl Comparison {
    /// Default comparison of a declared value type.
    pub fn for_value_type(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Number => Self::Numeric,
            ValueType::Date | ValueType::CreatedDate => Self::Temporal,
            ValueType::Boolean => Self::Boolean,
            ValueType::Text | ValueType::Email | ValueType::Url => Self::Text,
        }
    }

    /// Comparison of a column: its kind wins over its declared value type.
    pub fn for_column(def: &ColumnDefinition) -> Self {
        match &def.kind {
            Some(kind) => kind.comparison(),
            None => Self::for_value_type(def.value_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum SortKey {
    Number(f64),
    Text(String),
}

fn sort_key(value: Option<&Value>, comparison: Comparison) -> Option<SortKey> {
    match comparison {
        Comparison::Numeric => parse_float(&display_string(value)).map(SortKey::Number),
        Comparison::Temporal => temporal_millis(value).map(SortKey::Number),
        Comparison::Boolean => match value {
            Some(Value::Bool(b)) => Some(SortKey::Number(if *b { 1.0 } else { 0.0 })),
            None | Some(Value::Null) => None,
            other => match display_string(other).to_lowercase().as_str() {
                "true" => Some(SortKey::Number(1.0)),
                "false" => Some(SortKey::Number(0.0)),
                _ => None,
            },
        },
        Comparison::Text => {
            let text = display_string(value);
            if text.is_empty() {
                None
            } else {
                Some(SortKey::Text(text.to_lowercase()))
            }
        }
    }
}

/// Milliseconds since the Unix epoch for a date-like value.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS[.f]`,
/// `YYYY-MM-DD`, and raw numbers (taken as epoch milliseconds).
pub fn temporal_millis(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_timestamp(s.trim()),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
}

/// Compare two rows on `spec.column`.
///
/// Rows without a sortable value order after all others in both directions.
pub fn compare_rows(a: &Row, b: &Row, spec: &SortSpec, comparison: Comparison) -> Ordering {
    let ka = sort_key(a.get(&spec.column), comparison);
    let kb = sort_key(b.get(&spec.column), comparison);
    match (ka, kb) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match spec.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Stable in-place sort of `rows` by `spec`.
pub fn sort_rows(rows: &mut [Row], spec: &SortSpec, comparison: Comparison) {
    rows.sort_by(|a, b| compare_rows(a, b, spec, comparison));
}
