use rust_data_grid::grid::{DataGrid, GridOptions};
use rust_data_grid::ingestion::{rows_from_csv_path, rows_from_json_path};
use rust_data_grid::columns::RelationKind;
use rust_data_grid::columns::kind::relation;
use rust_data_grid::processing::group::GroupConfig;
use rust_data_grid::processing::reduce::AggregationType;
use rust_data_grid::types::{ColumnDefinition, Value, ValueType};

fn columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("id", "ID").value_type(ValueType::Number),
        ColumnDefinition::new("holder", "Holder"),
        ColumnDefinition::new("tier", "Tier"),
        ColumnDefinition::new("price", "Price").value_type(ValueType::Number),
        ColumnDefinition::new("checked_in", "Checked in").value_type(ValueType::Boolean),
    ]
}

#[test]
fn json_fixture_feeds_a_grouped_grid() {
    let rows = rows_from_json_path("tests/fixtures/tickets.json").unwrap();
    assert_eq!(rows.len(), 5);

    let mut defs = columns();
    defs.push(relation("event", "Event", Some(RelationKind::Event)));
    let mut grid = DataGrid::new(rows, defs, GridOptions::with_all_features()).unwrap();
    grid.set_grouping(Some(
        GroupConfig::new("tier")
            .aggregate("price", AggregationType::Sum)
            .aggregate("price", AggregationType::Avg),
    ))
    .unwrap();

    let groups = grid.groups().unwrap();
    let keys: Vec<&str> = groups.iter().map(|g| g.group_key.as_str()).collect();
    assert_eq!(keys, vec!["vip", "general", "(Empty)"]);
    assert_eq!(groups[0].aggregations[0].formatted(), "270.00");
    // "bad" is excluded from the general sum and average.
    assert_eq!(groups[1].aggregations[0].formatted(), "40.00");
    assert_eq!(groups[1].aggregations[1].formatted(), "40.00");
    assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), 5);
}

#[test]
fn csv_fixture_is_typed_by_columns() {
    let rows = rows_from_csv_path("tests/fixtures/tickets.csv", &columns()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("price"), Some(&Value::from(120)));
    assert_eq!(rows[1].get("checked_in"), Some(&Value::Bool(false)));

    let mut grid = DataGrid::new(rows, columns(), GridOptions::with_all_features()).unwrap();
    grid.set_search("turing").unwrap();
    let view = grid.view();
    assert_eq!(view.filtered_count, 1);
    assert_eq!(view.data_rows().next().and_then(|r| r.key("id")).as_deref(), Some("3"));
}
