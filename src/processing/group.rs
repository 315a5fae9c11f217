//! Grouping of rows by a column value, with per-group aggregates.
//!
//! Groups are keyed by the display string of the grouped column. Null and missing values
//! collapse into a single group keyed [`EMPTY_GROUP_KEY`]. Output is ordered by descending
//! row count; ties keep first-encounter order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::reduce::{AggregationSpec, AggregationType, format_aggregate, reduce};
use crate::types::{Row, Value, display_string};

/// Key of the group holding rows whose grouped value is null or missing.
pub const EMPTY_GROUP_KEY: &str = "(Empty)";

/// Grouping configuration: the column to partition by and the aggregates to compute.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    pub column_key: String,
    #[serde(default)]
    pub aggregations: Vec<AggregationSpec>,
}

impl GroupConfig {
    pub fn new(column_key: impl Into<String>) -> Self {
        Self {
            column_key: column_key.into(),
            aggregations: Vec::new(),
        }
    }

    pub fn aggregate(mut self, column_key: impl Into<String>, kind: AggregationType) -> Self {
        self.aggregations.push(AggregationSpec::new(column_key, kind));
        self
    }
}

/// One computed aggregate of a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub column_key: String,
    #[serde(rename = "type")]
    pub kind: AggregationType,
    pub value: f64,
}

impl Aggregate {
    /// Display form (see [`format_aggregate`]).
    pub fn formatted(&self) -> String {
        format_aggregate(self.kind, self.value)
    }
}

/// An aggregated bucket of rows sharing one grouped value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedRow {
    pub group_key: String,
    pub group_value: String,
    pub count: usize,
    pub rows: Vec<Row>,
    pub aggregations: Vec<Aggregate>,
    pub is_expanded: bool,
}

impl GroupedRow {
    /// First aggregate computed for `column_key`.
    pub fn aggregation(&self, column_key: &str) -> Option<&Aggregate> {
        self.aggregations.iter().find(|a| a.column_key == column_key)
    }
}

/// A row of the flattened display list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rowType", rename_all = "camelCase")]
pub enum DisplayRow {
    /// A group header.
    #[serde(rename_all = "camelCase")]
    Group {
        group_key: String,
        group_value: String,
        count: usize,
        /// `(column, formatted value)` pairs, in configuration order.
        aggregations: Vec<(String, String)>,
        is_expanded: bool,
        depth: usize,
    },
    /// A data row.
    Data { row: Row, depth: usize },
}

impl DisplayRow {
    pub fn depth(&self) -> usize {
        match self {
            Self::Group { depth, .. } | Self::Data { depth, .. } => *depth,
        }
    }

    /// The data row, if this is not a group header.
    pub fn row(&self) -> Option<&Row> {
        match self {
            Self::Data { row, .. } => Some(row),
            Self::Group { .. } => None,
        }
    }
}

/// Group key of a row for `column`.
pub fn group_key(row: &Row, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => EMPTY_GROUP_KEY.to_string(),
        v => display_string(v),
    }
}

/// Partition `rows` by `config.column_key`. All groups start collapsed.
pub fn group(rows: &[Row], config: &GroupConfig) -> Vec<GroupedRow> {
    group_with_expansion(rows, config, &HashSet::new())
}

/// Like [`group`], marking groups whose key is in `expanded` as expanded.
pub fn group_with_expansion(
    rows: &[Row],
    config: &GroupConfig,
    expanded: &HashSet<String>,
) -> Vec<GroupedRow> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<Row>)> = Vec::new();

    for row in rows {
        let key = group_key(row, &config.column_key);
        match index.get(&key) {
            Some(&i) => buckets[i].1.push(row.clone()),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![row.clone()]));
            }
        }
    }

    let mut groups: Vec<GroupedRow> = buckets
        .into_iter()
        .map(|(key, rows)| {
            let aggregations = config
                .aggregations
                .iter()
                .map(|spec| Aggregate {
                    column_key: spec.column_key.clone(),
                    kind: spec.kind,
                    value: reduce(&rows, &spec.column_key, spec.kind),
                })
                .collect();
            GroupedRow {
                is_expanded: expanded.contains(&key),
                group_value: key.clone(),
                group_key: key,
                count: rows.len(),
                rows,
                aggregations,
            }
        })
        .collect();

    // Stable: equal counts keep encounter order.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Flip `is_expanded` on the group keyed `group_key` only.
///
/// Returns `false` if no such group exists.
pub fn toggle(groups: &mut [GroupedRow], group_key: &str) -> bool {
    match groups.iter_mut().find(|g| g.group_key == group_key) {
        Some(g) => {
            g.is_expanded = !g.is_expanded;
            true
        }
        None => false,
    }
}

/// Flatten groups into display rows: each header at depth 0, followed by its members at
/// depth 1 when expanded.
pub fn flatten(groups: &[GroupedRow]) -> Vec<DisplayRow> {
    let mut out = Vec::new();
    for g in groups {
        out.push(DisplayRow::Group {
            group_key: g.group_key.clone(),
            group_value: g.group_value.clone(),
            count: g.count,
            aggregations: g
                .aggregations
                .iter()
                .map(|a| (a.column_key.clone(), a.formatted()))
                .collect(),
            is_expanded: g.is_expanded,
            depth: 0,
        });
        if g.is_expanded {
            out.extend(g.rows.iter().map(|r| DisplayRow::Data {
                row: r.clone(),
                depth: 1,
            }));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{DisplayRow, EMPTY_GROUP_KEY, GroupConfig, flatten, group, toggle};
    use crate::processing::reduce::AggregationType;
    use crate::types::{Row, Value};

    fn tiers(counts: &[(&str, usize)]) -> Vec<Row> {
        let mut out = Vec::new();
        for (tier, n) in counts {
            for i in 0..*n {
                out.push(Row::new().with("tier", *tier).with("price", i as i64));
            }
        }
        out
    }

    #[test]
    fn sum_excludes_malformed_values_and_count_includes_them() {
        let rows = vec![
            Row::new().with("tier", "a").with("price", "10"),
            Row::new().with("tier", "a").with("price", "bad"),
            Row::new().with("tier", "a").with("price", 20),
        ];
        let config = GroupConfig::new("tier")
            .aggregate("price", AggregationType::Sum)
            .aggregate("tier", AggregationType::Count);
        let groups = group(&rows, &config);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 3);
        assert_eq!(groups[0].aggregation("price").map(|a| a.value), Some(30.0));
        assert_eq!(groups[0].aggregation("tier").map(|a| a.value), Some(3.0));
    }

    #[test]
    fn groups_are_ordered_by_descending_count() {
        let rows = tiers(&[("one", 1), ("five", 5), ("three", 3)]);
        let keys: Vec<_> = group(&rows, &GroupConfig::new("tier"))
            .into_iter()
            .map(|g| g.group_key)
            .collect();
        assert_eq!(keys, vec!["five", "three", "one"]);
    }

    #[test]
    fn counts_sum_to_input_size() {
        let mut rows = tiers(&[("a", 4), ("b", 2)]);
        rows.push(Row::new().with("price", 1));
        rows.push(Row::new().with("tier", Value::Null));
        let groups = group(&rows, &GroupConfig::new("tier"));
        assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), rows.len());
        let empty = groups.iter().find(|g| g.group_key == EMPTY_GROUP_KEY).unwrap();
        assert_eq!(empty.count, 2);
    }

    #[test]
    fn empty_string_is_its_own_group() {
        let rows = vec![
            Row::new().with("tier", ""),
            Row::new().with("tier", Value::Null),
        ];
        let groups = group(&rows, &GroupConfig::new("tier"));
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn toggle_flips_only_the_target_group() {
        let rows = tiers(&[("a", 2), ("b", 1)]);
        let mut groups = group(&rows, &GroupConfig::new("tier"));
        assert!(toggle(&mut groups, "b"));
        assert!(!groups[0].is_expanded);
        assert!(groups[1].is_expanded);
        assert!(!toggle(&mut groups, "zzz"));
    }

    #[test]
    fn flatten_emits_members_of_expanded_groups() {
        let rows = tiers(&[("a", 2), ("b", 1)]);
        let mut groups = group(&rows, &GroupConfig::new("tier").aggregate("price", AggregationType::Max));
        toggle(&mut groups, "a");
        let flat = flatten(&groups);

        let depths: Vec<_> = flat.iter().map(DisplayRow::depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 0]);
        match &flat[0] {
            DisplayRow::Group { aggregations, .. } => {
                assert_eq!(aggregations, &vec![("price".to_string(), "1.00".to_string())]);
            }
            other => panic!("expected group header, got {other:?}"),
        }
        assert!(flat[3].row().is_none());
    }
}
