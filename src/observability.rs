//! Observer hooks for grid state transitions.
//!
//! The coordinator reports every state transition as a [`GridEvent`] to an optional
//! [`GridObserver`]. [`TracingObserver`] forwards events to `tracing`; the other built-ins
//! log to stderr, append to a file, or fan out to several observers.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::processing::sort::SortSpec;
use crate::types::RowKey;

/// Severity classification of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GridSeverity {
    Info,
    /// Recoverable problem (validation failure, stale result).
    Warning,
    /// A collaborator rejected a change.
    Error,
}

/// Identifies the grid an event came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridContext {
    /// `GridOptions::resource_name`, or `"rows"`.
    pub resource_name: String,
}

/// State transitions reported by the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    DataReplaced { rows: usize, deselected: usize },
    FilterChanged,
    PageChanged { page: usize },
    PageSizeChanged { page_size: usize },
    SortChanged { sort: Option<SortSpec> },
    GroupingChanged { column: Option<String> },
    GroupToggled { group_key: String, expanded: bool },
    /// Every group was expanded (`true`) or collapsed (`false`) at once.
    AllGroupsToggled { expanded: bool, groups: usize },
    SelectionChanged { selected: usize },
    EditStarted { row_key: RowKey, column: String },
    EditCancelled { row_key: RowKey, column: String },
    EditCommitted { row_key: RowKey, column: String },
    EditRolledBack { row_key: RowKey, column: String, error: String },
    /// A commit resolved after its target row left the data set.
    EditDiscarded { row_key: RowKey, column: String },
    /// A commit was abandoned before the data source answered.
    EditAborted { row_key: RowKey, column: String },
    DraftOpened,
    DraftCancelled,
    DraftValidationFailed { missing: Vec<String> },
    RowCreated { row_key: RowKey },
    CreateFailed { error: String },
    CreateAborted,
    PresetSaved { id: String },
    PresetLoaded { id: String },
    PresetDeleted { id: String },
    ColumnConfigurationSaved,
    ColumnConfigurationReset,
    ActionInvoked { id: String, rows: usize },
}

impl GridEvent {
    pub fn severity(&self) -> GridSeverity {
        match self {
            Self::EditRolledBack { .. } | Self::CreateFailed { .. } => GridSeverity::Error,
            Self::EditDiscarded { .. }
            | Self::EditAborted { .. }
            | Self::CreateAborted
            | Self::DraftValidationFailed { .. } => GridSeverity::Warning,
            _ => GridSeverity::Info,
        }
    }
}

/// Observer interface for grid events.
pub trait GridObserver: Send + Sync {
    fn on_event(&self, _ctx: &GridContext, _event: &GridEvent) {}
}

/// Fans events out to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn GridObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn GridObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl GridObserver for CompositeObserver {
    fn on_event(&self, ctx: &GridContext, event: &GridEvent) {
        for o in &self.observers {
            o.on_event(ctx, event);
        }
    }
}

/// Forwards events to `tracing`: info events at `debug`, warnings at `warn`, errors at
/// `error`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl GridObserver for TracingObserver {
    fn on_event(&self, ctx: &GridContext, event: &GridEvent) {
        let resource = ctx.resource_name.as_str();
        match event.severity() {
            GridSeverity::Info => tracing::debug!(resource, ?event, "grid event"),
            GridSeverity::Warning => tracing::warn!(resource, ?event, "grid event"),
            GridSeverity::Error => tracing::error!(resource, ?event, "grid event"),
        }
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl GridObserver for StdErrObserver {
    fn on_event(&self, ctx: &GridContext, event: &GridEvent) {
        eprintln!(
            "[grid][{:?}] resource={} event={:?}",
            event.severity(),
            ctx.resource_name,
            event
        );
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Writes are best-effort; failures to open or write the file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl GridObserver for FileObserver {
    fn on_event(&self, ctx: &GridContext, event: &GridEvent) {
        self.append_line(&format!(
            "{} severity={:?} resource={} event={:?}",
            unix_ts(),
            event.severity(),
            ctx.resource_name,
            event
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<GridEvent>>,
    }

    impl GridObserver for Recording {
        fn on_event(&self, _ctx: &GridContext, event: &GridEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn ctx() -> GridContext {
        GridContext {
            resource_name: "tickets".to_string(),
        }
    }

    #[test]
    fn composite_fans_out() {
        let a = Arc::new(Recording::default());
        let b = Arc::new(Recording::default());
        let composite = CompositeObserver::new(vec![a.clone(), b.clone(), Arc::new(TracingObserver)]);
        composite.on_event(&ctx(), &GridEvent::FilterChanged);
        assert_eq!(a.events.lock().unwrap().len(), 1);
        assert_eq!(b.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn severities() {
        assert_eq!(GridEvent::FilterChanged.severity(), GridSeverity::Info);
        assert_eq!(
            GridEvent::DraftValidationFailed { missing: vec!["name".into()] }.severity(),
            GridSeverity::Warning
        );
        assert_eq!(
            GridEvent::CreateFailed { error: "boom".into() }.severity(),
            GridSeverity::Error
        );
        assert!(GridSeverity::Error > GridSeverity::Warning);
    }

    #[test]
    fn file_observer_appends_lines() {
        let path = std::env::temp_dir().join(format!(
            "rust-data-grid-observer-{}.log",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let obs = FileObserver::new(&path);
        obs.on_event(&ctx(), &GridEvent::PageChanged { page: 2 });
        obs.on_event(&ctx(), &GridEvent::DraftOpened);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("resource=tickets"));
        let _ = std::fs::remove_file(path);
    }
}
