//! Construction-time configuration of a [`super::DataGrid`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::actions::{BulkAction, RowAction};
use crate::columns::ColumnConfigStore;
use crate::execution::ExecutionOptions;
use crate::observability::GridObserver;
use crate::processing::preset::PresetStore;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pagination settings. Presence of this struct enables paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOptions {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Which subsystems are active. An omitted feature is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridFeatures {
    #[serde(default)]
    pub sorting: bool,
    #[serde(default)]
    pub filtering: bool,
    /// `None` disables paging: every filtered/sorted row is returned.
    #[serde(default)]
    pub pagination: Option<PaginationOptions>,
    #[serde(default)]
    pub selection: bool,
}

impl GridFeatures {
    /// Every feature on, with default page size.
    pub fn all() -> Self {
        Self {
            sorting: true,
            filtering: true,
            pagination: Some(PaginationOptions::default()),
            selection: true,
        }
    }
}

/// Toolbar controls the presentation layer should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarOptions {
    #[serde(default = "yes")]
    pub search: bool,
    #[serde(default = "yes")]
    pub column_settings: bool,
    #[serde(default)]
    pub export: bool,
}

fn yes() -> bool {
    true
}

impl Default for ToolbarOptions {
    fn default() -> Self {
        Self {
            search: true,
            column_settings: true,
            export: false,
        }
    }
}

/// Options controlling a grid instance.
///
/// Use [`Default`] (all features off, key field `id`) or [`GridOptions::with_all_features`].
#[derive(Clone)]
pub struct GridOptions {
    pub features: GridFeatures,
    /// Field holding the stable row key.
    pub row_key: String,
    /// Name of the rows shown (`"tickets"`, `"events"`), used in observer context.
    pub resource_name: Option<String>,
    pub toolbar: ToolbarOptions,
    pub execution: ExecutionOptions,
    /// Optional observer for logging.
    pub observer: Option<Arc<dyn GridObserver>>,
    pub preset_store: Option<Arc<dyn PresetStore>>,
    pub column_config_store: Option<Arc<dyn ColumnConfigStore>>,
    pub bulk_actions: Vec<BulkAction>,
    pub row_actions: Vec<RowAction>,
}

impl fmt::Debug for GridOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridOptions")
            .field("features", &self.features)
            .field("row_key", &self.row_key)
            .field("resource_name", &self.resource_name)
            .field("toolbar", &self.toolbar)
            .field("execution", &self.execution)
            .field("observer_set", &self.observer.is_some())
            .field("preset_store_set", &self.preset_store.is_some())
            .field("column_config_store_set", &self.column_config_store.is_some())
            .field("bulk_actions", &self.bulk_actions)
            .field("row_actions", &self.row_actions)
            .finish()
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            features: GridFeatures::default(),
            row_key: "id".to_string(),
            resource_name: None,
            toolbar: ToolbarOptions::default(),
            execution: ExecutionOptions::default(),
            observer: None,
            preset_store: None,
            column_config_store: None,
            bulk_actions: Vec::new(),
            row_actions: Vec::new(),
        }
    }
}

impl GridOptions {
    pub fn with_all_features() -> Self {
        Self {
            features: GridFeatures::all(),
            ..Default::default()
        }
    }
}
