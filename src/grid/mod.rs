//! The grid state coordinator.
//!
//! [`DataGrid`] owns the canonical rows plus the filter, presentation (sort or grouping),
//! pagination, selection, edit and draft state. Every read of the visible rows goes through
//! [`DataGrid::view`], which recomputes the whole pipeline:
//!
//! filter (search, column filters, advanced group) -> group or sort -> paginate
//!
//! Nothing derived is cached, so the view is always a pure function of the data and the
//! current state.
//!
//! ```rust
//! use rust_data_grid::grid::{DataGrid, GridOptions};
//! use rust_data_grid::types::{ColumnDefinition, Row, ValueType};
//!
//! # fn main() -> Result<(), rust_data_grid::GridError> {
//! let rows = (1..=25)
//!     .map(|i| Row::new().with("id", i).with("name", format!("Event {i}")))
//!     .collect();
//! let columns = vec![
//!     ColumnDefinition::new("id", "ID").value_type(ValueType::Number),
//!     ColumnDefinition::new("name", "Name"),
//! ];
//! let mut grid = DataGrid::new(rows, columns, GridOptions::with_all_features())?;
//!
//! grid.go_to_page(3)?;
//! grid.set_search("event 2")?;
//! let view = grid.view();
//! assert_eq!(view.page, 1);
//! assert_eq!(view.filtered_count, 7); // 2, 20..=25
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod creation;
pub mod editing;
pub mod options;
pub mod source;
pub mod view;

use std::collections::{HashSet, btree_map::Entry};
use std::io::Write;

pub use actions::{BulkAction, RowAction};
pub use creation::Draft;
pub use editing::EditSession;
pub use options::{
    DEFAULT_PAGE_SIZE, GridFeatures, GridOptions, PaginationOptions, ToolbarOptions,
};
pub use source::{CreateRequest, GridDataSource, UpdateRequest};
pub use view::GridView;

use crate::columns::ColumnConfigModel;
use crate::error::{GridError, GridResult};
use crate::execution;
use crate::export;
use crate::observability::{GridContext, GridEvent};
use crate::processing::filter::{FilterGroup, FilterState};
use crate::processing::group::{DisplayRow, GroupConfig, GroupedRow, flatten, group_with_expansion};
use crate::processing::paginate;
use crate::processing::preset::{FilterPreset, PresetManager};
use crate::processing::sort::{Comparison, SortDirection, SortSpec, sort_rows};
use crate::types::{ColumnDefinition, Row, RowKey};

/// Presentation mode of the rows that pass the filters.
///
/// Free column sorting and grouping are mutually exclusive: grouped rows are ordered by
/// group size.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationMode {
    Flat(Option<SortSpec>),
    Grouped {
        config: GroupConfig,
        /// Keys of expanded groups. Cleared when the grouping column changes.
        expanded: HashSet<String>,
    },
}

impl Default for PresentationMode {
    fn default() -> Self {
        Self::Flat(None)
    }
}

/// A configurable data grid over externally supplied rows.
pub struct DataGrid {
    data: Vec<Row>,
    definitions: Vec<ColumnDefinition>,
    options: GridOptions,
    filters: FilterState,
    mode: PresentationMode,
    /// Requested 1-based page; clamped at derivation time.
    page: usize,
    page_size: usize,
    selection: HashSet<RowKey>,
    edit: Option<EditSession>,
    draft: Option<Draft>,
    presets: PresetManager,
    columns: ColumnConfigModel,
}

impl std::fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("rows", &self.data.len())
            .field("columns", &self.definitions.len())
            .field("filters", &self.filters)
            .field("mode", &self.mode)
            .field("page", &self.page)
            .field("selected", &self.selection.len())
            .field("editing", &self.edit.is_some())
            .field("draft_open", &self.draft.is_some())
            .finish()
    }
}

impl DataGrid {
    /// Build a grid. Column keys must be unique.
    pub fn new(
        data: Vec<Row>,
        definitions: Vec<ColumnDefinition>,
        options: GridOptions,
    ) -> GridResult<Self> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if !seen.insert(def.key.as_str()) {
                return Err(GridError::DuplicateColumn {
                    key: def.key.clone(),
                });
            }
        }

        let mut presets = PresetManager::new();
        if let Some(store) = &options.preset_store {
            presets = presets.with_store(store.clone());
        }
        let mut columns = ColumnConfigModel::from_definitions(&definitions);
        if let Some(store) = &options.column_config_store {
            columns = columns.with_store(store.clone());
        }
        let page_size = options
            .features
            .pagination
            .map_or(DEFAULT_PAGE_SIZE, |p| p.page_size.max(1));

        Ok(Self {
            data,
            definitions,
            options,
            filters: FilterState::default(),
            mode: PresentationMode::default(),
            page: 1,
            page_size,
            selection: HashSet::new(),
            edit: None,
            draft: None,
            presets,
            columns,
        })
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn definitions(&self) -> &[ColumnDefinition] {
        &self.definitions
    }

    pub(crate) fn definition(&self, key: &str) -> GridResult<&ColumnDefinition> {
        self.definitions
            .iter()
            .find(|d| d.key == key)
            .ok_or_else(|| GridError::UnknownColumn {
                key: key.to_string(),
            })
    }

    pub fn is_sortable(&self, def: &ColumnDefinition) -> bool {
        self.options.features.sorting && def.sortable.unwrap_or(true)
    }

    pub fn is_filterable(&self, def: &ColumnDefinition) -> bool {
        self.options.features.filtering && def.filterable.unwrap_or(true)
    }

    pub fn is_editable(&self, def: &ColumnDefinition) -> bool {
        def.editable.unwrap_or(false)
    }

    fn context(&self) -> GridContext {
        GridContext {
            resource_name: self
                .options
                .resource_name
                .clone()
                .unwrap_or_else(|| "rows".to_string()),
        }
    }

    pub(crate) fn emit(&self, event: GridEvent) {
        if let Some(observer) = &self.options.observer {
            observer.on_event(&self.context(), &event);
        }
    }

    // ---- data ----

    /// The full local data set.
    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Look up a row by key.
    pub fn row(&self, key: &str) -> Option<&Row> {
        let field = self.options.row_key.as_str();
        self.data
            .iter()
            .find(|r| r.key(field).as_deref() == Some(key))
    }

    /// Replace the data wholesale. Selected keys absent from `data` are deselected.
    pub fn set_data(&mut self, data: Vec<Row>) {
        let field = self.options.row_key.as_str();
        let present: HashSet<RowKey> = data.iter().filter_map(|r| r.key(field)).collect();
        let before = self.selection.len();
        self.selection.retain(|k| present.contains(k));
        let deselected = before - self.selection.len();
        self.data = data;
        self.emit(GridEvent::DataReplaced {
            rows: self.data.len(),
            deselected,
        });
    }

    // ---- filtering ----

    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    fn require_filtering(&self) -> GridResult<()> {
        if self.options.features.filtering {
            Ok(())
        } else {
            Err(GridError::FeatureDisabled {
                feature: "filtering",
            })
        }
    }

    fn filters_changed(&mut self) {
        self.page = 1;
        self.emit(GridEvent::FilterChanged);
    }

    /// Set the global search text.
    ///
    /// Search covers the filterable columns, so a non-empty text is rejected when there are
    /// none.
    pub fn set_search(&mut self, text: impl Into<String>) -> GridResult<()> {
        self.require_filtering()?;
        let text = text.into();
        if !text.trim().is_empty() && !self.definitions.iter().any(|d| self.is_filterable(d)) {
            return Err(GridError::FeatureDisabled { feature: "search" });
        }
        self.filters.search = text;
        self.filters_changed();
        Ok(())
    }

    /// Set the "contains" filter of one column. An empty text removes it.
    pub fn set_column_filter(&mut self, column: &str, text: impl Into<String>) -> GridResult<()> {
        self.require_filtering()?;
        let def = self.definition(column)?;
        if !self.is_filterable(def) {
            return Err(GridError::ColumnNotFilterable {
                key: column.to_string(),
            });
        }
        let text = text.into();
        match self.filters.column_filters.entry(column.to_string()) {
            Entry::Occupied(e) if text.is_empty() => {
                e.remove();
            }
            Entry::Occupied(mut e) => {
                e.insert(text);
            }
            Entry::Vacant(e) if !text.is_empty() => {
                e.insert(text);
            }
            Entry::Vacant(_) => {}
        }
        self.filters_changed();
        Ok(())
    }

    pub fn clear_column_filter(&mut self, column: &str) -> GridResult<()> {
        self.set_column_filter(column, String::new())
    }

    /// Replace the advanced rule group wholesale.
    pub fn apply_advanced_filter(&mut self, group: FilterGroup) -> GridResult<()> {
        self.require_filtering()?;
        self.filters.advanced = Some(group);
        self.filters_changed();
        Ok(())
    }

    pub fn clear_advanced_filter(&mut self) -> GridResult<()> {
        self.require_filtering()?;
        self.filters.advanced = None;
        self.filters_changed();
        Ok(())
    }

    /// Clear search, column filters and the advanced group.
    pub fn clear_filters(&mut self) -> GridResult<()> {
        self.require_filtering()?;
        self.filters = FilterState::default();
        self.filters_changed();
        Ok(())
    }

    fn searchable_columns(&self) -> Vec<ColumnDefinition> {
        self.definitions
            .iter()
            .filter(|d| self.is_filterable(d))
            .cloned()
            .collect()
    }

    /// Rows passing every filter layer, in data order.
    pub fn filtered_rows(&self) -> Vec<Row> {
        if self.filters.is_empty() {
            return self.data.clone();
        }
        let searchable = self.searchable_columns();
        let filters = &self.filters;
        execution::filter_rows(&self.data, &self.options.execution, |row| {
            filters.matches(row, &searchable)
        })
    }

    // ---- presets ----

    pub fn presets(&self) -> &[FilterPreset] {
        self.presets.presets()
    }

    /// Seed presets loaded from storage.
    pub fn load_presets(&mut self, presets: Vec<FilterPreset>) {
        self.presets = std::mem::take(&mut self.presets).with_presets(presets);
    }

    /// Save the active advanced group (empty if none) as a preset.
    pub fn save_preset(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> FilterPreset {
        let group = self.filters.advanced.clone().unwrap_or_default();
        let preset = self.presets.save(id, name, group);
        self.emit(GridEvent::PresetSaved {
            id: preset.id.clone(),
        });
        preset
    }

    /// Replace the advanced group with a preset's group.
    pub fn apply_preset(&mut self, id: &str) -> GridResult<()> {
        self.require_filtering()?;
        let group = self.presets.load(id).ok_or_else(|| GridError::UnknownPreset {
            id: id.to_string(),
        })?;
        self.apply_advanced_filter(group)?;
        self.emit(GridEvent::PresetLoaded { id: id.to_string() });
        Ok(())
    }

    pub fn delete_preset(&mut self, id: &str) -> GridResult<()> {
        if !self.presets.delete(id) {
            return Err(GridError::UnknownPreset { id: id.to_string() });
        }
        self.emit(GridEvent::PresetDeleted { id: id.to_string() });
        Ok(())
    }

    // ---- sorting ----

    pub fn mode(&self) -> &PresentationMode {
        &self.mode
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        match &self.mode {
            PresentationMode::Flat(sort) => sort.as_ref(),
            PresentationMode::Grouped { .. } => None,
        }
    }

    fn check_sortable(&self, column: &str) -> GridResult<()> {
        if !self.options.features.sorting {
            return Err(GridError::FeatureDisabled { feature: "sorting" });
        }
        let def = self.definition(column)?;
        if !self.is_sortable(def) {
            return Err(GridError::ColumnNotSortable {
                key: column.to_string(),
            });
        }
        if matches!(self.mode, PresentationMode::Grouped { .. }) {
            return Err(GridError::GroupedMode);
        }
        Ok(())
    }

    /// Cycle `column` through ascending, descending and unsorted.
    ///
    /// A column other than the current sort column starts ascending.
    pub fn toggle_sort(&mut self, column: &str) -> GridResult<Option<SortSpec>> {
        self.check_sortable(column)?;
        let next = match self.sort() {
            Some(s) if s.column == column => match s.direction {
                SortDirection::Asc => Some(SortSpec::new(column, SortDirection::Desc)),
                SortDirection::Desc => None,
            },
            _ => Some(SortSpec::new(column, SortDirection::Asc)),
        };
        self.mode = PresentationMode::Flat(next.clone());
        self.emit(GridEvent::SortChanged { sort: next.clone() });
        Ok(next)
    }

    pub fn set_sort(&mut self, spec: SortSpec) -> GridResult<()> {
        self.check_sortable(&spec.column)?;
        self.mode = PresentationMode::Flat(Some(spec.clone()));
        self.emit(GridEvent::SortChanged { sort: Some(spec) });
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        if let PresentationMode::Flat(sort) = &mut self.mode {
            if sort.take().is_some() {
                self.emit(GridEvent::SortChanged { sort: None });
            }
        }
    }

    // ---- grouping ----

    /// Group rows by a column, or return to the flat mode with `None`.
    ///
    /// Any previous column sort is dropped. Expanded groups are kept when the grouping
    /// column stays the same.
    pub fn set_grouping(&mut self, config: Option<GroupConfig>) -> GridResult<()> {
        let column = match config {
            None => {
                if matches!(self.mode, PresentationMode::Grouped { .. }) {
                    self.mode = PresentationMode::Flat(None);
                }
                None
            }
            Some(config) => {
                let def = self.definition(&config.column_key)?;
                if def.kind.as_ref().is_some_and(|k| !k.aggregatable()) {
                    return Err(GridError::NotGroupable {
                        key: config.column_key.clone(),
                    });
                }
                for spec in &config.aggregations {
                    self.definition(&spec.column_key)?;
                }
                let expanded = match &mut self.mode {
                    PresentationMode::Grouped {
                        config: current,
                        expanded,
                    } if current.column_key == config.column_key => std::mem::take(expanded),
                    _ => HashSet::new(),
                };
                let column = config.column_key.clone();
                self.mode = PresentationMode::Grouped { config, expanded };
                Some(column)
            }
        };
        self.page = 1;
        self.emit(GridEvent::GroupingChanged { column });
        Ok(())
    }

    pub fn grouping(&self) -> Option<&GroupConfig> {
        match &self.mode {
            PresentationMode::Grouped { config, .. } => Some(config),
            PresentationMode::Flat(_) => None,
        }
    }

    /// Current groups over the filtered rows, ordered by size.
    pub fn groups(&self) -> Option<Vec<GroupedRow>> {
        match &self.mode {
            PresentationMode::Grouped { config, expanded } => Some(group_with_expansion(
                &self.filtered_rows(),
                config,
                expanded,
            )),
            PresentationMode::Flat(_) => None,
        }
    }

    /// Flip one group's expanded state. Returns the new state.
    pub fn toggle_group(&mut self, group_key: &str) -> GridResult<bool> {
        let PresentationMode::Grouped { expanded, .. } = &mut self.mode else {
            return Err(GridError::NotGrouped);
        };
        let now = if expanded.remove(group_key) {
            false
        } else {
            expanded.insert(group_key.to_string());
            true
        };
        self.emit(GridEvent::GroupToggled {
            group_key: group_key.to_string(),
            expanded: now,
        });
        Ok(now)
    }

    pub fn expand_all_groups(&mut self) -> GridResult<()> {
        let keys: Vec<String> = self
            .groups()
            .ok_or(GridError::NotGrouped)?
            .into_iter()
            .map(|g| g.group_key)
            .collect();
        let groups = keys.len();
        if let PresentationMode::Grouped { expanded, .. } = &mut self.mode {
            expanded.extend(keys);
        }
        self.emit(GridEvent::AllGroupsToggled {
            expanded: true,
            groups,
        });
        Ok(())
    }

    pub fn collapse_all_groups(&mut self) -> GridResult<()> {
        let PresentationMode::Grouped { expanded, .. } = &mut self.mode else {
            return Err(GridError::NotGrouped);
        };
        let groups = expanded.len();
        expanded.clear();
        self.emit(GridEvent::AllGroupsToggled {
            expanded: false,
            groups,
        });
        Ok(())
    }

    // ---- pagination ----

    fn require_pagination(&self) -> GridResult<()> {
        if self.options.features.pagination.is_some() {
            Ok(())
        } else {
            Err(GridError::FeatureDisabled {
                feature: "pagination",
            })
        }
    }

    /// Number of paginated items: groups when grouped, rows otherwise.
    fn item_count(&self) -> usize {
        match self.groups() {
            Some(groups) => groups.len(),
            None => self.filtered_rows().len(),
        }
    }

    /// Effective 1-based page.
    pub fn page(&self) -> usize {
        if self.options.features.pagination.is_none() {
            return 1;
        }
        paginate::clamp_page(self.page, self.item_count(), self.page_size)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Jump to `page`, clamped into range. Returns the page landed on.
    pub fn go_to_page(&mut self, page: usize) -> GridResult<usize> {
        self.require_pagination()?;
        let page = paginate::clamp_page(page, self.item_count(), self.page_size);
        if page != self.page {
            self.page = page;
            self.emit(GridEvent::PageChanged { page });
        }
        Ok(page)
    }

    pub fn next_page(&mut self) -> GridResult<usize> {
        self.go_to_page(self.page() + 1)
    }

    pub fn previous_page(&mut self) -> GridResult<usize> {
        self.go_to_page(self.page().saturating_sub(1))
    }

    pub fn first_page(&mut self) -> GridResult<usize> {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> GridResult<usize> {
        self.go_to_page(usize::MAX)
    }

    /// Change the page size and return to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> GridResult<()> {
        self.require_pagination()?;
        if page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        self.page_size = page_size;
        self.page = 1;
        self.emit(GridEvent::PageSizeChanged { page_size });
        Ok(())
    }

    // ---- view ----

    /// Recompute the visible page.
    pub fn view(&self) -> GridView {
        let filtered = self.filtered_rows();
        let filtered_count = filtered.len();
        let paging = self.options.features.pagination.is_some();

        let (rows, items, group_count) = match &self.mode {
            PresentationMode::Flat(sort) => {
                let mut rows = filtered;
                if let Some(spec) = sort {
                    let comparison = self
                        .definition(&spec.column)
                        .map_or(Comparison::Text, Comparison::for_column);
                    sort_rows(&mut rows, spec, comparison);
                }
                let items = rows.len();
                let page_rows: Vec<DisplayRow> = if paging {
                    paginate::page_slice(&rows, self.page, self.page_size).to_vec()
                } else {
                    rows
                }
                .into_iter()
                .map(|row| DisplayRow::Data { row, depth: 0 })
                .collect();
                (page_rows, items, None)
            }
            PresentationMode::Grouped { config, expanded } => {
                let groups = group_with_expansion(&filtered, config, expanded);
                let items = groups.len();
                let page_groups = if paging {
                    paginate::page_slice(&groups, self.page, self.page_size)
                } else {
                    &groups[..]
                };
                (flatten(page_groups), items, Some(items))
            }
        };

        let (page, page_size, total_pages) = if paging {
            (
                paginate::clamp_page(self.page, items, self.page_size),
                Some(self.page_size),
                paginate::total_pages(items, self.page_size),
            )
        } else {
            (1, None, 1)
        };

        let key_field = self.options.row_key.as_str();
        let selected_on_page = rows
            .iter()
            .filter_map(DisplayRow::row)
            .filter_map(|r| r.key(key_field))
            .filter(|k| self.selection.contains(k))
            .count();

        GridView {
            rows,
            filtered_count,
            group_count,
            page,
            page_size,
            total_pages,
            selected_on_page,
        }
    }

    // ---- selection ----

    fn require_selection(&self) -> GridResult<()> {
        if self.options.features.selection {
            Ok(())
        } else {
            Err(GridError::FeatureDisabled {
                feature: "selection",
            })
        }
    }

    fn selection_changed(&self) {
        self.emit(GridEvent::SelectionChanged {
            selected: self.selection.len(),
        });
    }

    fn page_keys(&self) -> Vec<RowKey> {
        let field = self.options.row_key.as_str();
        self.view().data_rows().filter_map(|r| r.key(field)).collect()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selection.contains(key)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn selected_keys(&self) -> &HashSet<RowKey> {
        &self.selection
    }

    /// Flip one row's selection. Returns the new state.
    pub fn toggle_row(&mut self, key: &str) -> GridResult<bool> {
        self.require_selection()?;
        if self.row(key).is_none() {
            return Err(GridError::RowNotFound {
                key: key.to_string(),
            });
        }
        let now = if self.selection.remove(key) {
            false
        } else {
            self.selection.insert(key.to_string());
            true
        };
        self.selection_changed();
        Ok(now)
    }

    /// Select every listed key present in the data. Unknown keys are skipped.
    pub fn select_rows<I, K>(&mut self, keys: I) -> GridResult<usize>
    where
        I: IntoIterator<Item = K>,
        K: Into<RowKey>,
    {
        self.require_selection()?;
        let mut added = 0;
        for key in keys {
            let key = key.into();
            if self.row(&key).is_some() && self.selection.insert(key) {
                added += 1;
            }
        }
        self.selection_changed();
        Ok(added)
    }

    /// Select the data rows of the current page.
    pub fn select_page(&mut self) -> GridResult<()> {
        self.require_selection()?;
        let keys = self.page_keys();
        self.selection.extend(keys);
        self.selection_changed();
        Ok(())
    }

    /// Select every row passing the filters, across all pages.
    pub fn select_all_filtered(&mut self) -> GridResult<()> {
        self.require_selection()?;
        let field = self.options.row_key.clone();
        let keys: Vec<RowKey> = self
            .filtered_rows()
            .iter()
            .filter_map(|r| r.key(&field))
            .collect();
        self.selection.extend(keys);
        self.selection_changed();
        Ok(())
    }

    pub fn deselect_page(&mut self) -> GridResult<()> {
        self.require_selection()?;
        for key in self.page_keys() {
            self.selection.remove(&key);
        }
        self.selection_changed();
        Ok(())
    }

    pub fn clear_selection(&mut self) -> GridResult<()> {
        self.require_selection()?;
        self.selection.clear();
        self.selection_changed();
        Ok(())
    }

    /// Selected rows, in data order, taken from the full data set regardless of filters.
    pub fn get_selected_data(&self) -> Vec<Row> {
        let field = self.options.row_key.as_str();
        self.data
            .iter()
            .filter(|r| r.key(field).is_some_and(|k| self.selection.contains(&k)))
            .cloned()
            .collect()
    }

    // ---- actions ----

    pub fn register_bulk_action(&mut self, action: BulkAction) {
        self.options.bulk_actions.retain(|a| a.id != action.id);
        self.options.bulk_actions.push(action);
    }

    pub fn register_row_action(&mut self, action: RowAction) {
        self.options.row_actions.retain(|a| a.id != action.id);
        self.options.row_actions.push(action);
    }

    pub fn bulk_actions(&self) -> &[BulkAction] {
        &self.options.bulk_actions
    }

    pub fn row_actions(&self) -> &[RowAction] {
        &self.options.row_actions
    }

    /// Run a bulk action over the selected rows. Returns how many rows it received.
    pub fn run_bulk_action(&self, id: &str) -> GridResult<usize> {
        let action = self
            .options
            .bulk_actions
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| GridError::UnknownAction { id: id.to_string() })?;
        let rows = self.get_selected_data();
        action.invoke(&rows);
        self.emit(GridEvent::ActionInvoked {
            id: id.to_string(),
            rows: rows.len(),
        });
        Ok(rows.len())
    }

    pub fn run_row_action(&self, id: &str, row_key: &str) -> GridResult<()> {
        let action = self
            .options
            .row_actions
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| GridError::UnknownAction { id: id.to_string() })?;
        let row = self.row(row_key).ok_or_else(|| GridError::RowNotFound {
            key: row_key.to_string(),
        })?;
        action.invoke(row);
        self.emit(GridEvent::ActionInvoked {
            id: id.to_string(),
            rows: 1,
        });
        Ok(())
    }

    // ---- column configuration ----

    pub fn columns(&self) -> &ColumnConfigModel {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnConfigModel {
        &mut self.columns
    }

    pub fn save_column_configuration(&self) {
        self.columns.save();
        self.emit(GridEvent::ColumnConfigurationSaved);
    }

    pub fn reset_column_configuration(&mut self) {
        self.columns.reset();
        self.emit(GridEvent::ColumnConfigurationReset);
    }

    // ---- export ----

    /// Write the selected rows as CSV using the visible columns.
    pub fn export_selected_csv<W: Write>(&self, writer: W) -> GridResult<()> {
        export::write_csv(writer, &self.columns, &self.get_selected_data())
    }

    /// Write every filtered row (all pages, current sort order) as CSV.
    pub fn export_filtered_csv<W: Write>(&self, writer: W) -> GridResult<()> {
        let mut rows = self.filtered_rows();
        if let Some(spec) = self.sort() {
            let comparison = self
                .definition(&spec.column)
                .map_or(Comparison::Text, Comparison::for_column);
            sort_rows(&mut rows, spec, comparison);
        }
        export::write_csv(writer, &self.columns, &rows)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{BulkAction, DataGrid, GridOptions, PresentationMode};
    use crate::error::GridError;
    use crate::processing::group::{DisplayRow, GroupConfig};
    use crate::processing::reduce::AggregationType;
    use crate::processing::sort::{SortDirection, SortSpec};
    use crate::types::{ColumnDefinition, Row, ValueType};

    fn tickets(n: i64) -> Vec<Row> {
        (1..=n)
            .map(|i| {
                Row::new()
                    .with("id", i)
                    .with("tier", if i % 3 == 0 { "vip" } else { "general" })
                    .with("price", i * 10)
            })
            .collect()
    }

    fn grid(n: i64) -> DataGrid {
        DataGrid::new(
            tickets(n),
            vec![
                ColumnDefinition::new("id", "ID").value_type(ValueType::Number),
                ColumnDefinition::new("tier", "Tier"),
                ColumnDefinition::new("price", "Price").value_type(ValueType::Number),
            ],
            GridOptions::with_all_features(),
        )
        .unwrap()
    }

    #[test]
    fn duplicate_column_keys_are_rejected() {
        let err = DataGrid::new(
            Vec::new(),
            vec![ColumnDefinition::new("a", "A"), ColumnDefinition::new("a", "B")],
            GridOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GridError::DuplicateColumn { key } if key == "a"));
    }

    #[test]
    fn sort_toggle_cycles_and_keeps_page() {
        let mut g = grid(30);
        g.go_to_page(2).unwrap();
        let s = g.toggle_sort("price").unwrap();
        assert_eq!(s, Some(SortSpec::new("price", SortDirection::Asc)));
        assert_eq!(
            g.toggle_sort("price").unwrap().map(|s| s.direction),
            Some(SortDirection::Desc)
        );
        assert_eq!(g.toggle_sort("price").unwrap(), None);
        assert_eq!(g.page(), 2);
    }

    #[test]
    fn numeric_sort_orders_page_rows() {
        let mut g = grid(12);
        g.set_sort(SortSpec::new("price", SortDirection::Desc)).unwrap();
        let view = g.view();
        let first = view.data_rows().next().and_then(|r| r.get("id")).cloned();
        assert_eq!(first, Some(12.into()));
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.total_pages, 2);
    }

    #[test]
    fn grouping_excludes_sorting_and_paginates_groups() {
        let mut g = grid(9);
        g.toggle_sort("price").unwrap();
        g.set_grouping(Some(GroupConfig::new("tier").aggregate("price", AggregationType::Sum)))
            .unwrap();
        assert!(g.sort().is_none());
        assert!(matches!(g.toggle_sort("price"), Err(GridError::GroupedMode)));

        let view = g.view();
        assert_eq!(view.group_count, Some(2));
        assert_eq!(view.filtered_count, 9);
        match &view.rows[0] {
            DisplayRow::Group { group_key, count, aggregations, .. } => {
                assert_eq!(group_key, "general");
                assert_eq!(*count, 6);
                assert_eq!(aggregations[0].1, "270.00");
            }
            other => panic!("expected group header, got {other:?}"),
        }
    }

    #[test]
    fn expanded_groups_survive_filters_but_not_column_change() {
        let mut g = grid(9);
        g.set_grouping(Some(GroupConfig::new("tier"))).unwrap();
        assert!(g.toggle_group("vip").unwrap());
        g.set_search("").unwrap();
        g.set_grouping(Some(GroupConfig::new("tier").aggregate("price", AggregationType::Max)))
            .unwrap();
        assert!(matches!(
            g.mode(),
            PresentationMode::Grouped { expanded, .. } if expanded.contains("vip")
        ));
        assert_eq!(g.view().rows.len(), 2 + 3);

        g.set_grouping(Some(GroupConfig::new("price"))).unwrap();
        assert!(matches!(
            g.mode(),
            PresentationMode::Grouped { expanded, .. } if expanded.is_empty()
        ));
    }

    #[test]
    fn page_clamps_and_size_change_resets() {
        let mut g = grid(25);
        assert_eq!(g.go_to_page(99).unwrap(), 3);
        assert_eq!(g.next_page().unwrap(), 3);
        g.set_page_size(5).unwrap();
        assert_eq!(g.page(), 1);
        assert!(matches!(g.set_page_size(0), Err(GridError::InvalidPageSize)));
        assert_eq!(g.last_page().unwrap(), 5);
    }

    #[test]
    fn disabled_features_return_errors() {
        let mut g = DataGrid::new(tickets(3), vec![ColumnDefinition::new("id", "ID")], GridOptions::default())
            .unwrap();
        assert!(matches!(g.toggle_sort("id"), Err(GridError::FeatureDisabled { feature: "sorting" })));
        assert!(matches!(g.set_search("x"), Err(GridError::FeatureDisabled { .. })));
        assert!(matches!(g.toggle_row("1"), Err(GridError::FeatureDisabled { .. })));
        assert!(matches!(g.go_to_page(2), Err(GridError::FeatureDisabled { .. })));
        let view = g.view();
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.page_size, None);
    }

    #[test]
    fn set_data_drops_selection_of_removed_rows_only() {
        let mut g = grid(5);
        g.select_rows(["1", "2", "3"]).unwrap();
        g.set_column_filter("tier", "vip").unwrap();
        assert_eq!(g.selected_count(), 3);
        g.set_data(tickets(2));
        assert_eq!(g.selected_count(), 2);
        assert!(!g.is_selected("3"));
    }

    #[test]
    fn selected_on_page_counts_visible_selection() {
        let mut g = grid(15);
        g.select_page().unwrap();
        assert_eq!(g.view().selected_on_page, 10);
        g.next_page().unwrap();
        assert_eq!(g.view().selected_on_page, 0);
        g.select_all_filtered().unwrap();
        assert_eq!(g.selected_count(), 15);
        g.deselect_page().unwrap();
        assert_eq!(g.selected_count(), 10);
    }

    #[test]
    fn bulk_action_receives_selected_rows() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let mut g = grid(4);
        g.register_bulk_action(BulkAction::new("refund", "Refund", move |rows| {
            counter.fetch_add(rows.len(), Ordering::SeqCst);
        }));
        g.select_rows(["2", "4"]).unwrap();
        assert_eq!(g.run_bulk_action("refund").unwrap(), 2);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(matches!(g.run_bulk_action("nope"), Err(GridError::UnknownAction { .. })));
    }

    #[test]
    fn presets_replace_the_advanced_group() {
        use crate::processing::filter::{FilterGroup, FilterLogic};
        use crate::processing::predicate::{FilterOperator, FilterRule};

        let mut g = grid(9);
        g.apply_advanced_filter(FilterGroup::new(
            FilterLogic::And,
            vec![FilterRule::new("r", "tier", FilterOperator::Equals, "VIP")],
        ))
        .unwrap();
        g.save_preset("vip", "VIP only");
        g.clear_advanced_filter().unwrap();
        assert_eq!(g.view().filtered_count, 9);
        g.apply_preset("vip").unwrap();
        assert_eq!(g.view().filtered_count, 3);
        g.delete_preset("vip").unwrap();
        assert!(matches!(g.apply_preset("vip"), Err(GridError::UnknownPreset { .. })));
    }

    #[test]
    fn search_needs_a_filterable_column() {
        let mut g = DataGrid::new(
            vec![Row::new().with("id", 1).with("name", "Ada")],
            vec![
                ColumnDefinition::new("id", "ID").filterable(false),
                ColumnDefinition::new("name", "Name").filterable(false),
            ],
            GridOptions::with_all_features(),
        )
        .unwrap();
        assert!(matches!(
            g.set_search("ada"),
            Err(GridError::FeatureDisabled { feature: "search" })
        ));
        g.set_search("").unwrap();
        assert_eq!(g.view().filtered_count, 1);
    }
}
