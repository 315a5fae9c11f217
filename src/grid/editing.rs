//! Inline cell editing.
//!
//! An edit stages a value locally. Committing hands the staged value to the data source and
//! only writes it into the row once the source confirms; a rejection discards the staged
//! value so the cell shows the last known-good value again.

use super::DataGrid;
use super::source::{GridDataSource, UpdateRequest};
use crate::error::{CollaboratorError, GridError, GridResult};
use crate::observability::GridEvent;
use crate::types::{RowKey, Value};

/// The single in-progress cell edit of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub row_key: RowKey,
    pub column: String,
    /// Value of the cell when editing started.
    pub original: Value,
    pub staged: Value,
    /// A commit is awaiting the data source.
    pub pending: bool,
}

impl EditSession {
    pub fn is_dirty(&self) -> bool {
        self.staged != self.original
    }
}

impl DataGrid {
    /// Open an edit on one cell, replacing any edit that is not yet committing.
    pub fn start_edit(&mut self, row_key: &str, column: &str) -> GridResult<()> {
        if self.edit.as_ref().is_some_and(|e| e.pending) {
            return Err(GridError::CommitPending);
        }
        let def = self.definition(column)?;
        if !self.is_editable(def) {
            return Err(GridError::ColumnNotEditable {
                key: column.to_string(),
            });
        }
        let row = self.row(row_key).ok_or_else(|| GridError::RowNotFound {
            key: row_key.to_string(),
        })?;
        let original = row.get(column).cloned().unwrap_or(Value::Null);

        if let Some(previous) = self.edit.take() {
            self.emit(GridEvent::EditCancelled {
                row_key: previous.row_key,
                column: previous.column,
            });
        }
        self.edit = Some(EditSession {
            row_key: row_key.to_string(),
            column: column.to_string(),
            staged: original.clone(),
            original,
            pending: false,
        });
        self.emit(GridEvent::EditStarted {
            row_key: row_key.to_string(),
            column: column.to_string(),
        });
        Ok(())
    }

    pub fn stage_edit(&mut self, value: impl Into<Value>) -> GridResult<()> {
        let session = self.edit.as_mut().ok_or(GridError::NoActiveEdit)?;
        if session.pending {
            return Err(GridError::CommitPending);
        }
        session.staged = value.into();
        Ok(())
    }

    /// Discard the staged value.
    pub fn cancel_edit(&mut self) -> GridResult<()> {
        match &self.edit {
            None => return Err(GridError::NoActiveEdit),
            Some(e) if e.pending => return Err(GridError::CommitPending),
            Some(_) => {}
        }
        if let Some(session) = self.edit.take() {
            self.emit(GridEvent::EditCancelled {
                row_key: session.row_key,
                column: session.column,
            });
        }
        Ok(())
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Value to display for a cell: the staged value while that cell is being edited,
    /// the row value otherwise.
    pub fn cell_value(&self, row_key: &str, column: &str) -> Option<Value> {
        if let Some(e) = &self.edit {
            if e.row_key == row_key && e.column == column {
                return Some(e.staged.clone());
            }
        }
        self.row(row_key).and_then(|r| r.get(column).cloned())
    }

    /// Mark the edit as committing and return the request for the data source.
    ///
    /// Returns `Ok(None)` and closes the edit when the staged value equals the original.
    pub fn begin_commit_edit(&mut self) -> GridResult<Option<UpdateRequest>> {
        let (row_key, dirty) = match &self.edit {
            None => return Err(GridError::NoActiveEdit),
            Some(e) if e.pending => return Err(GridError::CommitPending),
            Some(e) => (e.row_key.clone(), e.is_dirty()),
        };
        if !dirty {
            self.edit = None;
            return Ok(None);
        }
        let Some(row) = self.row(&row_key).cloned() else {
            self.edit = None;
            return Err(GridError::RowNotFound { key: row_key });
        };
        let Some(session) = self.edit.as_mut() else {
            return Err(GridError::NoActiveEdit);
        };
        session.pending = true;
        Ok(Some(UpdateRequest {
            row_key,
            row,
            column: session.column.clone(),
            value: session.staged.clone(),
        }))
    }

    /// Apply the data source's answer to the committing edit.
    ///
    /// On success the confirmed value is written into the row, unless the row has left
    /// the data in the meantime. On failure nothing is written and the error is returned.
    /// The edit is closed either way.
    pub fn finish_commit_edit(&mut self, result: Result<(), CollaboratorError>) -> GridResult<()> {
        let session = match self.edit.take() {
            Some(e) if e.pending => e,
            other => {
                self.edit = other;
                return Err(GridError::NoActiveEdit);
            }
        };
        match result {
            Ok(()) => {
                let key_field = self.options.row_key.clone();
                let target = self
                    .data
                    .iter_mut()
                    .find(|r| r.key(&key_field).as_deref() == Some(session.row_key.as_str()));
                match target {
                    Some(row) => {
                        row.set(session.column.clone(), session.staged);
                        self.emit(GridEvent::EditCommitted {
                            row_key: session.row_key,
                            column: session.column,
                        });
                    }
                    None => self.emit(GridEvent::EditDiscarded {
                        row_key: session.row_key,
                        column: session.column,
                    }),
                }
                Ok(())
            }
            Err(err) => {
                self.emit(GridEvent::EditRolledBack {
                    row_key: session.row_key,
                    column: session.column,
                    error: err.to_string(),
                });
                Err(GridError::Collaborator(err))
            }
        }
    }

    /// Give up on the committing edit without an answer from the data source.
    ///
    /// Nothing is written and the edit closes, so the cell shows the last known-good value.
    pub fn abort_commit_edit(&mut self) -> GridResult<()> {
        let session = match self.edit.take() {
            Some(e) if e.pending => e,
            other => {
                self.edit = other;
                return Err(GridError::NoActiveEdit);
            }
        };
        self.emit(GridEvent::EditAborted {
            row_key: session.row_key,
            column: session.column,
        });
        Ok(())
    }

    /// Commit the open edit through `source`.
    ///
    /// Dropping the returned future before it completes aborts the commit.
    pub async fn commit_edit<S>(&mut self, source: &S) -> GridResult<()>
    where
        S: GridDataSource + ?Sized,
    {
        let Some(request) = self.begin_commit_edit()? else {
            return Ok(());
        };
        let mut guard = PendingEdit {
            grid: self,
            armed: true,
        };
        let result = source
            .update(&request.row, &request.column, &request.value)
            .await;
        guard.armed = false;
        guard.grid.finish_commit_edit(result)
    }
}

/// Clears the pending edit if `commit_edit` is dropped mid-flight.
struct PendingEdit<'a> {
    grid: &'a mut DataGrid,
    armed: bool,
}

impl Drop for PendingEdit<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.grid.abort_commit_edit();
        }
    }
}
