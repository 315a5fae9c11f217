//! Named, persisted filter groups.
//!
//! The [`PresetManager`] holds presets in memory and notifies an optional [`PresetStore`];
//! actual persistence belongs to the store implementation.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::filter::FilterGroup;

/// A named [`FilterGroup`] keyed by a caller-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPreset {
    pub id: String,
    pub name: String,
    pub group: FilterGroup,
}

/// Persistence hooks for presets. All methods default to no-ops.
pub trait PresetStore: Send + Sync {
    fn on_save_preset(&self, _preset: &FilterPreset) {}

    fn on_load_preset(&self, _preset: &FilterPreset) {}

    fn on_delete_preset(&self, _id: &str) {}
}

/// In-memory preset list.
///
/// Names are not deduplicated; saving an existing id replaces that preset in place.
#[derive(Default)]
pub struct PresetManager {
    presets: Vec<FilterPreset>,
    store: Option<Arc<dyn PresetStore>>,
}

impl fmt::Debug for PresetManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresetManager")
            .field("presets", &self.presets)
            .field("store_set", &self.store.is_some())
            .finish()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a persistence store.
    pub fn with_store(mut self, store: Arc<dyn PresetStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Seed the manager with previously persisted presets without notifying the store.
    pub fn with_presets(mut self, presets: Vec<FilterPreset>) -> Self {
        self.presets = presets;
        self
    }

    pub fn presets(&self) -> &[FilterPreset] {
        &self.presets
    }

    pub fn get(&self, id: &str) -> Option<&FilterPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Save `group` under `name`.
    pub fn save(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        group: FilterGroup,
    ) -> FilterPreset {
        let preset = FilterPreset {
            id: id.into(),
            name: name.into(),
            group,
        };
        match self.presets.iter_mut().find(|p| p.id == preset.id) {
            Some(existing) => *existing = preset.clone(),
            None => self.presets.push(preset.clone()),
        }
        if let Some(store) = &self.store {
            store.on_save_preset(&preset);
        }
        preset
    }

    /// Returns a copy of the preset's group for the caller to apply wholesale.
    pub fn load(&self, id: &str) -> Option<FilterGroup> {
        let preset = self.get(id)?;
        if let Some(store) = &self.store {
            store.on_load_preset(preset);
        }
        Some(preset.group.clone())
    }

    /// Remove a preset. Returns `false` if the id was unknown.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.id != id);
        let removed = self.presets.len() != before;
        if removed {
            if let Some(store) = &self.store {
                store.on_delete_preset(id);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{FilterPreset, PresetManager, PresetStore};
    use crate::processing::filter::{FilterGroup, FilterLogic};
    use crate::processing::predicate::{FilterOperator, FilterRule};

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
    }

    impl PresetStore for RecordingStore {
        fn on_save_preset(&self, preset: &FilterPreset) {
            self.calls.lock().unwrap().push(format!("save:{}", preset.id));
        }
        fn on_load_preset(&self, preset: &FilterPreset) {
            self.calls.lock().unwrap().push(format!("load:{}", preset.id));
        }
        fn on_delete_preset(&self, id: &str) {
            self.calls.lock().unwrap().push(format!("delete:{id}"));
        }
    }

    fn vip_group() -> FilterGroup {
        FilterGroup::new(
            FilterLogic::And,
            vec![FilterRule::new("r1", "tier", FilterOperator::Equals, "vip")],
        )
    }

    #[test]
    fn save_load_delete_notify_store() {
        let store = Arc::new(RecordingStore::default());
        let mut mgr = PresetManager::new().with_store(store.clone());

        mgr.save("p1", "VIP only", vip_group());
        mgr.save("p2", "VIP only", FilterGroup::default());
        assert_eq!(mgr.presets().len(), 2);

        assert_eq!(mgr.load("p1"), Some(vip_group()));
        assert!(mgr.load("nope").is_none());
        assert!(mgr.delete("p2"));
        assert!(!mgr.delete("p2"));

        assert_eq!(
            *store.calls.lock().unwrap(),
            vec!["save:p1", "save:p2", "load:p1", "delete:p2"]
        );
    }

    #[test]
    fn saving_existing_id_replaces_in_place() {
        let mut mgr = PresetManager::new();
        mgr.save("p1", "first", FilterGroup::default());
        mgr.save("p2", "second", FilterGroup::default());
        mgr.save("p1", "renamed", vip_group());

        let names: Vec<_> = mgr.presets().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["renamed", "second"]);
        assert_eq!(mgr.get("p1").map(|p| &p.group), Some(&vip_group()));
    }
}
