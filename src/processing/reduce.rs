//! Aggregations over a single column of a row set.

use serde::{Deserialize, Serialize};

use crate::types::{Row, to_number};

/// Built-in aggregation over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    /// Count all rows, whatever their value.
    Count,
    /// Sum of numeric values.
    Sum,
    /// Mean of numeric values, `0` if there are none.
    Avg,
    /// Minimum numeric value, `0` if there are none.
    Min,
    /// Maximum numeric value, `0` if there are none.
    Max,
}

/// Aggregation of `column` using `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationSpec {
    pub column_key: String,
    #[serde(rename = "type")]
    pub kind: AggregationType,
}

impl AggregationSpec {
    pub fn new(column_key: impl Into<String>, kind: AggregationType) -> Self {
        Self {
            column_key: column_key.into(),
            kind,
        }
    }
}

/// Reduce `column` over `rows`.
///
/// Values that do not convert to a number (including null and missing) are excluded from
/// `Sum`/`Avg`/`Min`/`Max` rather than treated as zero. `Count` is the row count.
pub fn reduce(rows: &[Row], column: &str, kind: AggregationType) -> f64 {
    if kind == AggregationType::Count {
        return rows.len() as f64;
    }

    let values: Vec<f64> = rows.iter().filter_map(|r| to_number(r.get(column))).collect();
    if values.is_empty() {
        return 0.0;
    }

    match kind {
        AggregationType::Sum => values.iter().sum(),
        AggregationType::Avg => values.iter().sum::<f64>() / values.len() as f64,
        AggregationType::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregationType::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        AggregationType::Count => rows.len() as f64,
    }
}

/// Display form of an aggregate: integers for `Count`, two decimals otherwise.
pub fn format_aggregate(kind: AggregationType, value: f64) -> String {
    match kind {
        AggregationType::Count => format!("{value:.0}"),
        _ => format!("{value:.2}"),
    }
}
