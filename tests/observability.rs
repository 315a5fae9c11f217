use std::sync::{Arc, Mutex};

use rust_data_grid::GridError;
use rust_data_grid::grid::{DataGrid, GridOptions};
use rust_data_grid::observability::{GridContext, GridEvent, GridObserver, GridSeverity};
use rust_data_grid::processing::filter::FilterGroup;
use rust_data_grid::processing::preset::{FilterPreset, PresetStore};
use rust_data_grid::types::{ColumnDefinition, Row};
use rust_data_grid::CollaboratorError;

#[derive(Default)]
struct Recording {
    events: Mutex<Vec<(String, GridEvent)>>,
}

impl Recording {
    fn events(&self) -> Vec<GridEvent> {
        self.events.lock().unwrap().iter().map(|(_, e)| e.clone()).collect()
    }
}

impl GridObserver for Recording {
    fn on_event(&self, ctx: &GridContext, event: &GridEvent) {
        self.events
            .lock()
            .unwrap()
            .push((ctx.resource_name.clone(), event.clone()));
    }
}

#[derive(Default)]
struct Presets {
    calls: Mutex<Vec<String>>,
}

impl PresetStore for Presets {
    fn on_save_preset(&self, preset: &FilterPreset) {
        self.calls.lock().unwrap().push(format!("save:{}", preset.name));
    }

    fn on_load_preset(&self, preset: &FilterPreset) {
        self.calls.lock().unwrap().push(format!("load:{}", preset.id));
    }

    fn on_delete_preset(&self, id: &str) {
        self.calls.lock().unwrap().push(format!("delete:{id}"));
    }
}

fn grid(observer: Arc<Recording>, presets: Arc<Presets>) -> DataGrid {
    let mut options = GridOptions::with_all_features();
    options.resource_name = Some("tickets".to_string());
    options.observer = Some(observer);
    options.preset_store = Some(presets);
    DataGrid::new(
        (1..=3).map(|i| Row::new().with("id", i).with("name", format!("T{i}"))).collect(),
        vec![
            ColumnDefinition::new("id", "ID"),
            ColumnDefinition::new("name", "Name").editable(true).required(true),
        ],
        options,
    )
    .unwrap()
}

#[test]
fn state_transitions_are_reported_with_context() {
    let rec = Arc::new(Recording::default());
    let mut g = grid(rec.clone(), Arc::new(Presets::default()));

    g.set_search("t").unwrap();
    g.toggle_sort("name").unwrap();
    g.toggle_row("2").unwrap();
    g.set_data(vec![Row::new().with("id", 1)]);

    let events = rec.events();
    assert_eq!(events[0], GridEvent::FilterChanged);
    assert!(matches!(events[1], GridEvent::SortChanged { sort: Some(_) }));
    assert_eq!(events[2], GridEvent::SelectionChanged { selected: 1 });
    assert_eq!(events[3], GridEvent::DataReplaced { rows: 1, deselected: 1 });
    assert!(rec.events.lock().unwrap().iter().all(|(r, _)| r == "tickets"));
}

#[test]
fn failures_carry_error_severity() {
    let rec = Arc::new(Recording::default());
    let mut g = grid(rec.clone(), Arc::new(Presets::default()));

    g.start_edit("1", "name").unwrap();
    g.stage_edit("renamed").unwrap();
    g.begin_commit_edit().unwrap();
    let _ = g.finish_commit_edit(Err(CollaboratorError::new("timeout")));

    g.start_create();
    assert!(matches!(g.begin_commit_create(), Err(GridError::Validation { .. })));

    let events = rec.events();
    let rolled_back = events
        .iter()
        .find(|e| matches!(e, GridEvent::EditRolledBack { .. }))
        .unwrap();
    assert_eq!(rolled_back.severity(), GridSeverity::Error);
    let invalid = events.last().unwrap();
    assert_eq!(
        invalid,
        &GridEvent::DraftValidationFailed {
            missing: vec!["name".to_string()]
        }
    );
    assert_eq!(invalid.severity(), GridSeverity::Warning);
}

#[test]
fn preset_lifecycle_notifies_store_and_observer() {
    let rec = Arc::new(Recording::default());
    let store = Arc::new(Presets::default());
    let mut g = grid(rec.clone(), store.clone());

    g.apply_advanced_filter(FilterGroup::default()).unwrap();
    g.save_preset("p1", "Everything");
    g.apply_preset("p1").unwrap();
    g.delete_preset("p1").unwrap();
    assert!(matches!(g.delete_preset("p1"), Err(GridError::UnknownPreset { .. })));

    assert_eq!(
        store.calls.lock().unwrap().as_slice(),
        &["save:Everything", "load:p1", "delete:p1"]
    );
    let events = rec.events();
    assert!(events.contains(&GridEvent::PresetSaved { id: "p1".into() }));
    assert!(events.contains(&GridEvent::PresetLoaded { id: "p1".into() }));
    assert!(events.contains(&GridEvent::PresetDeleted { id: "p1".into() }));
}

#[test]
fn presets_stay_silent_while_filtering_is_disabled() {
    let store = Arc::new(Presets::default());
    let mut options = GridOptions::with_all_features();
    options.features.filtering = false;
    options.preset_store = Some(store.clone());
    let mut g = DataGrid::new(Vec::new(), vec![ColumnDefinition::new("id", "ID")], options).unwrap();
    g.load_presets(vec![FilterPreset {
        id: "p1".into(),
        name: "Everything".into(),
        group: FilterGroup::default(),
    }]);

    assert!(matches!(
        g.apply_preset("p1"),
        Err(GridError::FeatureDisabled { feature: "filtering" })
    ));
    assert!(store.calls.lock().unwrap().is_empty());
}

#[test]
fn bulk_group_expansion_is_reported() {
    use rust_data_grid::processing::group::GroupConfig;

    let rec = Arc::new(Recording::default());
    let mut g = grid(rec.clone(), Arc::new(Presets::default()));
    g.set_grouping(Some(GroupConfig::new("name"))).unwrap();
    g.expand_all_groups().unwrap();
    g.collapse_all_groups().unwrap();

    let events = rec.events();
    let n = events.len();
    assert_eq!(
        events[n - 2],
        GridEvent::AllGroupsToggled { expanded: true, groups: 3 }
    );
    assert_eq!(
        events[n - 1],
        GridEvent::AllGroupsToggled { expanded: false, groups: 3 }
    );
}
