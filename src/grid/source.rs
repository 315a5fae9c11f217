//! The external data source the grid commits edits and new rows through.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::CollaboratorError;
use crate::types::{Row, RowKey, Value};

/// Backend collaborator for inline edits and row creation.
///
/// Methods return boxed futures so the source can be used as a trait object
/// (`&dyn GridDataSource`, `Arc<dyn GridDataSource>`). A rejected future triggers the grid's
/// rollback semantics. Nothing is retried.
pub trait GridDataSource: Send + Sync {
    /// Persist `value` into `column` of `row`.
    fn update<'a>(
        &'a self,
        row: &'a Row,
        column: &'a str,
        value: &'a Value,
    ) -> BoxFuture<'a, Result<(), CollaboratorError>>;

    /// Persist a new row and return it with server-assigned fields filled in.
    ///
    /// Defaults to rejecting, for sources that only support updates.
    fn create<'a>(&'a self, _draft: &'a Row) -> BoxFuture<'a, Result<Row, CollaboratorError>> {
        Box::pin(futures::future::ready(Err(CollaboratorError::new(
            "row creation is not supported by this data source",
        ))))
    }
}

impl<T: GridDataSource + ?Sized> GridDataSource for Arc<T> {
    fn update<'a>(
        &'a self,
        row: &'a Row,
        column: &'a str,
        value: &'a Value,
    ) -> BoxFuture<'a, Result<(), CollaboratorError>> {
        (**self).update(row, column, value)
    }

    fn create<'a>(&'a self, draft: &'a Row) -> BoxFuture<'a, Result<Row, CollaboratorError>> {
        (**self).create(draft)
    }
}

/// An in-flight cell update, produced by [`super::DataGrid::begin_commit_edit`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub row_key: RowKey,
    /// Last known-good row.
    pub row: Row,
    pub column: String,
    pub value: Value,
}

/// An in-flight row creation, produced by [`super::DataGrid::begin_commit_create`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub draft: Row,
}
