//! Single-predicate evaluation against a row field.
//!
//! All text operators compare lower-cased display strings, so matching is case-insensitive
//! and type-coercing. Numeric operators parse both sides with [`parse_float`]; a side with no
//! numeric prefix compares as NaN, which makes every numeric comparison `false`. Numeric
//! filters on non-numeric data therefore match nothing.

use serde::{Deserialize, Serialize};

use crate::types::{Row, display_string, is_falsy, parse_float};

/// Comparison applied by a [`FilterRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    /// Ignores the rule value.
    IsEmpty,
    /// Ignores the rule value.
    IsNotEmpty,
    /// Any operator name this crate does not know. Always passes.
    #[serde(other)]
    Unknown,
}

impl FilterOperator {
    /// All known operators, in menu order.
    pub const ALL: [FilterOperator; 12] = [
        Self::Equals,
        Self::NotEquals,
        Self::Contains,
        Self::NotContains,
        Self::StartsWith,
        Self::EndsWith,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterOrEqual,
        Self::LessOrEqual,
        Self::IsEmpty,
        Self::IsNotEmpty,
    ];

    /// Returns `true` if the operator reads the rule value.
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::IsEmpty | Self::IsNotEmpty | Self::Unknown)
    }

    /// Returns `true` for the operators that compare parsed numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::LessThan | Self::GreaterOrEqual | Self::LessOrEqual
        )
    }
}

/// One typed comparison: `row[column] <operator> value`.
///
/// `value` is always stored as text; numeric operators parse it at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    pub id: String,
    pub column: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: String,
}

impl FilterRule {
    pub fn new(
        id: impl Into<String>,
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Evaluate `rule` against `row`.
pub fn evaluate(row: &Row, rule: &FilterRule) -> bool {
    let raw = row.get(&rule.column);

    match rule.operator {
        FilterOperator::IsEmpty => return is_empty(raw),
        FilterOperator::IsNotEmpty => return !is_empty(raw),
        FilterOperator::Unknown => return true,
        _ => {}
    }

    let text = display_string(raw);

    if rule.operator.is_numeric() {
        let (Some(lhs), Some(rhs)) = (parse_float(&text), parse_float(&rule.value)) else {
            return false;
        };
        return match rule.operator {
            FilterOperator::GreaterThan => lhs > rhs,
            FilterOperator::LessThan => lhs < rhs,
            FilterOperator::GreaterOrEqual => lhs >= rhs,
            FilterOperator::LessOrEqual => lhs <= rhs,
            _ => true,
        };
    }

    let cell = text.to_lowercase();
    let needle = rule.value.to_lowercase();
    match rule.operator {
        FilterOperator::Equals => cell == needle,
        FilterOperator::NotEquals => cell != needle,
        FilterOperator::Contains => cell.contains(&needle),
        FilterOperator::NotContains => !cell.contains(&needle),
        FilterOperator::StartsWith => cell.starts_with(&needle),
        FilterOperator::EndsWith => cell.ends_with(&needle),
        _ => true,
    }
}

fn is_empty(raw: Option<&serde_json::Value>) -> bool {
    is_falsy(raw) || display_string(raw).is_empty()
}
