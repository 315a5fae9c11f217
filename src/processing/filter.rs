//! Row filtering: global search, per-column filters and AND/OR rule groups.
//!
//! The three layers are independent state and compose in sequence
//! (search, then column filters, then the advanced [`FilterGroup`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::predicate::{FilterRule, evaluate};
use crate::types::{ColumnDefinition, Row, display_string};

/// Boolean operator combining the rules of a [`FilterGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterLogic {
    /// Every rule must pass.
    #[default]
    And,
    /// At least one rule must pass.
    Or,
}

/// An ordered list of rules under a single boolean operator.
///
/// An empty rule list matches every row, for both `And` and `Or`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterGroup {
    pub logic: FilterLogic,
    #[serde(default)]
    pub rules: Vec<FilterRule>,
}

impl FilterGroup {
    pub fn new(logic: FilterLogic, rules: Vec<FilterRule>) -> Self {
        Self { logic, rules }
    }

    /// Returns `true` if this group matches everything.
    pub fn is_identity(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate the group against one row.
    pub fn matches(&self, row: &Row) -> bool {
        if self.rules.is_empty() {
            return true;
        }
        match self.logic {
            FilterLogic::And => self.rules.iter().all(|r| evaluate(row, r)),
            FilterLogic::Or => self.rules.iter().any(|r| evaluate(row, r)),
        }
    }
}

/// Returns the rows that pass `group`, preserving order.
///
/// `None` and an empty group return `rows` unchanged.
pub fn apply(rows: &[Row], group: Option<&FilterGroup>) -> Vec<Row> {
    match group {
        Some(g) if !g.is_identity() => rows.iter().filter(|r| g.matches(r)).cloned().collect(),
        _ => rows.to_vec(),
    }
}

/// Returns `true` if any of `columns` contains `query` (case-insensitive).
///
/// An empty query matches every row.
pub fn matches_search(row: &Row, columns: &[ColumnDefinition], query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    columns
        .iter()
        .any(|c| display_string(row.get(&c.key)).to_lowercase().contains(&needle))
}

/// Returns `true` if every per-column filter text is contained in its column.
pub fn matches_column_filters(row: &Row, filters: &BTreeMap<String, String>) -> bool {
    filters.iter().all(|(column, text)| {
        display_string(row.get(column))
            .to_lowercase()
            .contains(&text.to_lowercase())
    })
}

/// Complete filtering state of a grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Free-text search across all searchable columns.
    #[serde(default)]
    pub search: String,
    /// Per-column "contains" filters. Empty texts are never stored.
    #[serde(default)]
    pub column_filters: BTreeMap<String, String>,
    /// Advanced rule group, if one is applied.
    #[serde(default)]
    pub advanced: Option<FilterGroup>,
}

impl FilterState {
    /// Returns `true` if no layer filters anything out.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.column_filters.is_empty()
            && self.advanced.as_ref().is_none_or(FilterGroup::is_identity)
    }

    /// Combined row predicate over all three layers.
    pub fn matches(&self, row: &Row, searchable: &[ColumnDefinition]) -> bool {
        matches_search(row, searchable, &self.search)
            && matches_column_filters(row, &self.column_filters)
            && self.advanced.as_ref().is_none_or(|g| g.matches(row))
    }
}
