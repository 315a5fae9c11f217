//! Core data model types for the grid.
//!
//! Rows are externally supplied records ([`Row`]) mapping field names to JSON [`Value`]s. The
//! grid never invents row identity: each row exposes a stable key through a configurable field
//! (see [`crate::grid::GridOptions::row_key`]).

use serde::{Deserialize, Serialize};
use serde_json::Map;

pub use serde_json::Value;

use crate::columns::ColumnKind;

/// Stable unique identifier of a row, independent of its position.
pub type RowKey = String;

/// Declared value type of a column.
///
/// Drives default comparison semantics (sorting) and the default input widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free text (default).
    #[default]
    Text,
    /// Numeric value.
    Number,
    /// Email address.
    Email,
    /// URL.
    Url,
    /// Calendar date or timestamp.
    Date,
    /// Boolean flag.
    Boolean,
    /// Server-assigned creation timestamp.
    CreatedDate,
}

impl ValueType {
    /// Returns `true` for types compared as timestamps.
    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::CreatedDate)
    }
}

/// An externally supplied record.
///
/// Serializes as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Map<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns the raw value of `field`, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set `field` to `value`, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Returns the row key read from `key_field`.
    ///
    /// Missing and null keys yield `None`.
    pub fn key(&self, key_field: &str) -> Option<RowKey> {
        match self.fields.get(key_field) {
            None | Some(Value::Null) => None,
            Some(v) => Some(display_string(Some(v))),
        }
    }

    /// Iterate `(field, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Describes one field projection of the grid.
///
/// The boolean policies are `Option`s: `None` means "use the feature-dependent default"
/// (see the `is_*` resolvers on [`crate::grid::DataGrid`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Field name, unique within a grid.
    pub key: String,
    /// Display text.
    pub label: String,
    #[serde(default)]
    pub sortable: Option<bool>,
    #[serde(default)]
    pub filterable: Option<bool>,
    #[serde(default)]
    pub editable: Option<bool>,
    #[serde(default)]
    pub required: Option<bool>,
    /// Declared value type.
    #[serde(default)]
    pub value_type: ValueType,
    /// Semantic column kind attached by the [`crate::columns`] factories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ColumnKind>,
}

impl ColumnDefinition {
    /// Create a text column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = Some(filterable);
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Attach a semantic kind; the value type follows the kind.
    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.value_type = kind.value_type();
        self.kind = Some(kind);
        self
    }

    /// Whether the column must be non-empty before a draft row can be created.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Stringify a value the way the grid compares text.
///
/// Missing and null values become the empty string.
pub fn display_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) => format_f64(f),
            _ => n.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| display_string(Some(v)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn format_f64(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        (if f > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else {
        // f64's Display drops a zero fraction ("10" rather than "10.0").
        format!("{f}")
    }
}

/// Returns `true` for null, missing, `false`, `0` and `""`.
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f == 0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Leading-prefix float parser.
///
/// Skips leading whitespace, accepts an optional sign followed by `Infinity` or a decimal
/// mantissa with optional exponent, and ignores any trailing text. Returns `None` when no
/// numeric prefix exists (the NaN case).
pub fn parse_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Strict whole-value numeric conversion used by aggregation.
///
/// Returns `None` for null, missing, objects and anything that does not convert to a
/// number as a whole (the NaN case). Empty and whitespace-only strings convert to `0`.
pub fn to_number(value: Option<&Value>) -> Option<f64> {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => None,
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => string_to_number(s),
        Some(v @ Value::Array(_)) => string_to_number(&display_string(Some(v))),
    }
}

fn string_to_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(rest) = t.strip_prefix(prefix) {
            return u64::from_str_radix(rest, radix).ok().map(|v| v as f64);
        }
    }

    match t {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // Rust's float grammar also accepts "inf"/"nan", which are not numeric here.
    let body = t.trim_start_matches(['+', '-']);
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    t.parse::<f64>().ok().filter(|f| !f.is_nan())
}
