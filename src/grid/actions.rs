//! Caller-supplied row and bulk actions.
//!
//! The grid guarantees which rows an action receives; what the action does is up to the
//! caller.

use std::fmt;
use std::sync::Arc;

use crate::types::Row;

type BulkHandler = Arc<dyn Fn(&[Row]) + Send + Sync>;
type RowHandler = Arc<dyn Fn(&Row) + Send + Sync>;

/// Action over the selected rows.
#[derive(Clone)]
pub struct BulkAction {
    pub id: String,
    pub label: String,
    handler: BulkHandler,
}

impl BulkAction {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn(&[Row]) + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            handler: Arc::new(handler),
        }
    }

    pub(crate) fn invoke(&self, rows: &[Row]) {
        (self.handler)(rows)
    }
}

impl fmt::Debug for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

/// Action over a single row.
#[derive(Clone)]
pub struct RowAction {
    pub id: String,
    pub label: String,
    handler: RowHandler,
}

impl RowAction {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn(&Row) + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            handler: Arc::new(handler),
        }
    }

    pub(crate) fn invoke(&self, row: &Row) {
        (self.handler)(row)
    }
}

impl fmt::Debug for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}
