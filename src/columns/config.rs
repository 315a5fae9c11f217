//! View-layer column configuration: visibility, order, freezing, label overrides.
//!
//! This state never touches the filter/sort/group pipeline. It is derived from the column
//! definitions on first use and persisted by an optional [`ColumnConfigStore`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::types::{ColumnDefinition, ValueType};

/// Override state for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    pub key: String,
    pub visible: bool,
    /// Display position; compared only, gaps permitted.
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
    #[serde(rename = "type", default)]
    pub column_type: ValueType,
}

/// Derived column statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnStats {
    pub total: usize,
    pub visible: usize,
    pub hidden: usize,
    pub frozen: usize,
    pub renamed: usize,
}

/// Persistence hooks for column configuration. All methods default to no-ops.
pub trait ColumnConfigStore: Send + Sync {
    fn on_save_configuration(&self, _configs: &[ColumnConfig]) {}

    fn on_reset_configuration(&self) {}
}

/// Column configuration for one grid.
pub struct ColumnConfigModel {
    definitions: Vec<ColumnDefinition>,
    configs: Vec<ColumnConfig>,
    store: Option<Arc<dyn ColumnConfigStore>>,
}

impl fmt::Debug for ColumnConfigModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnConfigModel")
            .field("configs", &self.configs)
            .field("store_set", &self.store.is_some())
            .finish()
    }
}

fn defaults_for(definitions: &[ColumnDefinition]) -> Vec<ColumnConfig> {
    definitions
        .iter()
        .enumerate()
        .map(|(i, d)| ColumnConfig {
            key: d.key.clone(),
            visible: true,
            order: i as i64,
            width: None,
            frozen: false,
            custom_label: None,
            column_type: d.value_type,
        })
        .collect()
}

impl ColumnConfigModel {
    /// Default configuration derived from definition order and declared types.
    pub fn from_definitions(definitions: &[ColumnDefinition]) -> Self {
        Self {
            definitions: definitions.to_vec(),
            configs: defaults_for(definitions),
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ColumnConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Merge previously persisted configs.
    ///
    /// Configs for unknown keys are dropped; columns without a persisted config keep their
    /// defaults.
    pub fn load(&mut self, persisted: Vec<ColumnConfig>) {
        for saved in persisted {
            if let Some(slot) = self.configs.iter_mut().find(|c| c.key == saved.key) {
                *slot = saved;
            }
        }
    }

    /// Configs in definition order.
    pub fn configs(&self) -> &[ColumnConfig] {
        &self.configs
    }

    pub fn get(&self, key: &str) -> Option<&ColumnConfig> {
        self.configs.iter().find(|c| c.key == key)
    }

    fn get_mut(&mut self, key: &str) -> GridResult<&mut ColumnConfig> {
        self.configs
            .iter_mut()
            .find(|c| c.key == key)
            .ok_or_else(|| GridError::UnknownColumn { key: key.to_string() })
    }

    /// The structural definition behind `key`.
    pub fn definition(&self, key: &str) -> Option<&ColumnDefinition> {
        self.definitions.iter().find(|d| d.key == key)
    }

    fn original_label(&self, key: &str) -> Option<&str> {
        self.definition(key).map(|d| d.label.as_str())
    }

    /// Label shown for `key`: the override if set, else the definition label.
    pub fn effective_label(&self, key: &str) -> Option<&str> {
        let config = self.get(key)?;
        config.custom_label.as_deref().or_else(|| self.original_label(key))
    }

    /// Configs sorted by `order` (stable for equal orders).
    pub fn ordered(&self) -> Vec<&ColumnConfig> {
        let mut out: Vec<&ColumnConfig> = self.configs.iter().collect();
        out.sort_by_key(|c| c.order);
        out
    }

    /// Visible configs in display order.
    pub fn visible_columns(&self) -> Vec<&ColumnConfig> {
        self.ordered().into_iter().filter(|c| c.visible).collect()
    }

    pub fn toggle_visibility(&mut self, key: &str) -> GridResult<bool> {
        let c = self.get_mut(key)?;
        c.visible = !c.visible;
        Ok(c.visible)
    }

    pub fn toggle_frozen(&mut self, key: &str) -> GridResult<bool> {
        let c = self.get_mut(key)?;
        c.frozen = !c.frozen;
        Ok(c.frozen)
    }

    /// Set a label override.
    ///
    /// The trimmed label is stored only when it differs from the definition label and is
    /// not blank; otherwise any override is cleared.
    pub fn rename(&mut self, key: &str, label: &str) -> GridResult<()> {
        let original = self
            .original_label(key)
            .ok_or_else(|| GridError::UnknownColumn { key: key.to_string() })?
            .to_string();
        let trimmed = label.trim();
        let c = self.get_mut(key)?;
        c.custom_label = if trimmed.is_empty() || trimmed == original {
            None
        } else {
            Some(trimmed.to_string())
        };
        Ok(())
    }

    pub fn set_width(&mut self, key: &str, width: Option<u32>) -> GridResult<()> {
        self.get_mut(key)?.width = width;
        Ok(())
    }

    pub fn set_type(&mut self, key: &str, column_type: ValueType) -> GridResult<()> {
        self.get_mut(key)?.column_type = column_type;
        Ok(())
    }

    /// Move `key` to position `index` of the display order and renumber densely.
    pub fn move_column(&mut self, key: &str, index: usize) -> GridResult<()> {
        let mut keys: Vec<String> = self.ordered().into_iter().map(|c| c.key.clone()).collect();
        let from = keys
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| GridError::UnknownColumn { key: key.to_string() })?;
        let moved = keys.remove(from);
        keys.insert(index.min(keys.len()), moved);
        for (pos, k) in keys.iter().enumerate() {
            if let Some(c) = self.configs.iter_mut().find(|c| &c.key == k) {
                c.order = pos as i64;
            }
        }
        Ok(())
    }

    pub fn show_all(&mut self) {
        self.configs.iter_mut().for_each(|c| c.visible = true);
    }

    pub fn hide_all(&mut self) {
        self.configs.iter_mut().for_each(|c| c.visible = false);
    }

    pub fn unfreeze_all(&mut self) {
        self.configs.iter_mut().for_each(|c| c.frozen = false);
    }

    pub fn reset_labels(&mut self) {
        self.configs.iter_mut().for_each(|c| c.custom_label = None);
    }

    /// Discard all overrides and notify the store.
    pub fn reset(&mut self) {
        self.configs = defaults_for(&self.definitions);
        if let Some(store) = &self.store {
            store.on_reset_configuration();
        }
    }

    /// Hand the current configs to the store.
    pub fn save(&self) {
        if let Some(store) = &self.store {
            store.on_save_configuration(&self.configs);
        }
    }

    pub fn stats(&self) -> ColumnStats {
        let total = self.configs.len();
        let visible = self.configs.iter().filter(|c| c.visible).count();
        ColumnStats {
            total,
            visible,
            hidden: total - visible,
            frozen: self.configs.iter().filter(|c| c.frozen).count(),
            renamed: self.configs.iter().filter(|c| c.custom_label.is_some()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{ColumnConfig, ColumnConfigModel, ColumnConfigStore};
    use crate::types::{ColumnDefinition, ValueType};

    fn defs() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("name", "Name"),
            ColumnDefinition::new("price", "Price").value_type(ValueType::Number),
            ColumnDefinition::new("starts_at", "Starts").value_type(ValueType::Date),
        ]
    }

    #[test]
    fn rename_to_original_label_clears_override() {
        let mut model = ColumnConfigModel::from_definitions(&defs());
        model.rename("name", "  Event  ").unwrap();
        assert_eq!(model.get("name").unwrap().custom_label.as_deref(), Some("Event"));
        assert_eq!(model.effective_label("name"), Some("Event"));
        assert_eq!(model.stats().renamed, 1);

        model.rename("name", " Name ").unwrap();
        assert_eq!(model.get("name").unwrap().custom_label, None);
        assert_eq!(model.effective_label("name"), Some("Name"));
        assert_eq!(model.stats().renamed, 0);

        model.rename("price", "   ").unwrap();
        assert_eq!(model.get("price").unwrap().custom_label, None);
        assert!(model.rename("nope", "x").is_err());
    }

    #[test]
    fn toggles_affect_only_their_column() {
        let mut model = ColumnConfigModel::from_definitions(&defs());
        assert!(!model.toggle_visibility("price").unwrap());
        assert!(model.toggle_frozen("name").unwrap());

        let s = model.stats();
        assert_eq!((s.total, s.visible, s.hidden, s.frozen), (3, 2, 1, 1));
        assert!(model.get("starts_at").unwrap().visible);
        assert!(!model.get("starts_at").unwrap().frozen);
    }

    #[test]
    fn bulk_operations_and_reset() {
        let mut model = ColumnConfigModel::from_definitions(&defs());
        model.hide_all();
        assert_eq!(model.stats().visible, 0);
        model.show_all();
        assert_eq!(model.stats().hidden, 0);

        model.toggle_frozen("name").unwrap();
        model.toggle_frozen("price").unwrap();
        model.unfreeze_all();
        assert_eq!(model.stats().frozen, 0);

        model.rename("name", "Event").unwrap();
        model.reset_labels();
        assert_eq!(model.stats().renamed, 0);

        model.move_column("starts_at", 0).unwrap();
        model.set_type("price", ValueType::Text).unwrap();
        model.reset();
        let keys: Vec<_> = model.ordered().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "price", "starts_at"]);
        assert_eq!(model.get("price").unwrap().column_type, ValueType::Number);
    }

    #[test]
    fn ordering_tolerates_gaps_and_moves() {
        let mut model = ColumnConfigModel::from_definitions(&defs());
        model.load(vec![ColumnConfig {
            key: "name".to_string(),
            visible: true,
            order: 100,
            width: Some(240),
            frozen: false,
            custom_label: None,
            column_type: ValueType::Text,
        }]);
        let keys: Vec<_> = model.ordered().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["price", "starts_at", "name"]);

        model.move_column("name", 1).unwrap();
        let keys: Vec<_> = model.ordered().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["price", "name", "starts_at"]);
        assert_eq!(model.get("name").unwrap().width, Some(240));
    }

    #[test]
    fn load_drops_unknown_keys() {
        let mut model = ColumnConfigModel::from_definitions(&defs());
        let persisted: Vec<ColumnConfig> = serde_json::from_str(
            r#"[{"key":"ghost","visible":false,"order":0,"type":"text"},
                {"key":"price","visible":false,"order":1,"type":"number","customLabel":"Cost"}]"#,
        )
        .unwrap();
        model.load(persisted);
        assert_eq!(model.configs().len(), 3);
        assert_eq!(model.effective_label("price"), Some("Cost"));
        assert_eq!(model.visible_columns().len(), 2);
    }

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<usize>>,
        resets: Mutex<usize>,
    }

    impl ColumnConfigStore for RecordingStore {
        fn on_save_configuration(&self, configs: &[ColumnConfig]) {
            self.saved.lock().unwrap().push(configs.len());
        }
        fn on_reset_configuration(&self) {
            *self.resets.lock().unwrap() += 1;
        }
    }

    #[test]
    fn save_and_reset_notify_store() {
        let store = Arc::new(RecordingStore::default());
        let mut model = ColumnConfigModel::from_definitions(&defs()).with_store(store.clone());
        model.save();
        model.reset();
        assert_eq!(*store.saved.lock().unwrap(), vec![3]);
        assert_eq!(*store.resets.lock().unwrap(), 1);
    }
}
