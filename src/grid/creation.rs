//! New-row drafts.
//!
//! At most one draft is open at a time. Required columns are checked locally before the
//! data source is called; a rejected create keeps the draft open with the error attached.

use super::DataGrid;
use super::source::{CreateRequest, GridDataSource};
use crate::error::{CollaboratorError, GridError, GridResult};
use crate::observability::GridEvent;
use crate::types::{Row, RowKey, Value};

/// The open new-row draft.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft {
    pub row: Row,
    /// Last validation or collaborator error.
    pub error: Option<String>,
    pub pending: bool,
}

/// Returns `true` if a value does not satisfy a required column.
///
/// Missing, null, whitespace-only strings and empty arrays are blank.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

impl DataGrid {
    /// Open a draft. Returns `false` if one was already open; the existing draft is kept.
    pub fn start_create(&mut self) -> bool {
        if self.draft.is_some() {
            return false;
        }
        self.draft = Some(Draft::default());
        self.emit(GridEvent::DraftOpened);
        true
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn set_draft_value(&mut self, column: &str, value: impl Into<Value>) -> GridResult<()> {
        self.definition(column)?;
        let draft = self.draft.as_mut().ok_or(GridError::NoDraft)?;
        if draft.pending {
            return Err(GridError::CommitPending);
        }
        draft.row.set(column, value.into());
        Ok(())
    }

    pub fn cancel_create(&mut self) -> GridResult<()> {
        match &self.draft {
            None => Err(GridError::NoDraft),
            Some(d) if d.pending => Err(GridError::CommitPending),
            Some(_) => {
                self.draft = None;
                self.emit(GridEvent::DraftCancelled);
                Ok(())
            }
        }
    }

    /// Required columns that are blank on the draft, in column order.
    pub fn missing_required(&self) -> Vec<String> {
        let Some(draft) = &self.draft else {
            return Vec::new();
        };
        self.definitions
            .iter()
            .filter(|d| d.is_required() && is_blank(draft.row.get(&d.key)))
            .map(|d| d.key.clone())
            .collect()
    }

    /// Validate the draft and mark it as committing.
    pub fn begin_commit_create(&mut self) -> GridResult<CreateRequest> {
        match &self.draft {
            None => return Err(GridError::NoDraft),
            Some(d) if d.pending => return Err(GridError::CommitPending),
            Some(_) => {}
        }
        let missing = self.missing_required();
        if !missing.is_empty() {
            let err = GridError::Validation {
                missing: missing.clone(),
            };
            if let Some(draft) = self.draft.as_mut() {
                draft.error = Some(err.to_string());
            }
            self.emit(GridEvent::DraftValidationFailed { missing });
            return Err(err);
        }
        let draft = self.draft.as_mut().ok_or(GridError::NoDraft)?;
        draft.pending = true;
        draft.error = None;
        Ok(CreateRequest {
            draft: draft.row.clone(),
        })
    }

    /// Apply the data source's answer to the committing draft.
    ///
    /// On success the returned row is appended to the local data, the draft closes and the
    /// new row's key is returned. A returned row without a key is not appended: the draft
    /// stays open and [`GridError::MissingRowKey`] is returned. On failure the draft stays
    /// open with the error.
    pub fn finish_commit_create(
        &mut self,
        result: Result<Row, CollaboratorError>,
    ) -> GridResult<RowKey> {
        if !self.draft.as_ref().is_some_and(|d| d.pending) {
            return Err(GridError::NoDraft);
        }
        let err = match result {
            Ok(row) => match row.key(&self.options.row_key) {
                Some(key) => {
                    self.data.push(row);
                    self.draft = None;
                    self.emit(GridEvent::RowCreated {
                        row_key: key.clone(),
                    });
                    return Ok(key);
                }
                None => GridError::MissingRowKey {
                    field: self.options.row_key.clone(),
                },
            },
            Err(err) => GridError::Collaborator(err),
        };
        if let Some(draft) = self.draft.as_mut() {
            draft.pending = false;
            draft.error = Some(err.to_string());
        }
        self.emit(GridEvent::CreateFailed {
            error: err.to_string(),
        });
        Err(err)
    }

    /// Give up on the committing draft without an answer from the data source.
    ///
    /// The draft stays open with its values and can be committed again.
    pub fn abort_commit_create(&mut self) -> GridResult<()> {
        let draft = self
            .draft
            .as_mut()
            .filter(|d| d.pending)
            .ok_or(GridError::NoDraft)?;
        draft.pending = false;
        self.emit(GridEvent::CreateAborted);
        Ok(())
    }

    /// Validate and create the draft through `source`.
    ///
    /// Dropping the returned future before it completes aborts the commit.
    pub async fn commit_create<S>(&mut self, source: &S) -> GridResult<RowKey>
    where
        S: GridDataSource + ?Sized,
    {
        let request = self.begin_commit_create()?;
        let mut guard = PendingCreate {
            grid: self,
            armed: true,
        };
        let result = source.create(&request.draft).await;
        guard.armed = false;
        guard.grid.finish_commit_create(result)
    }
}

/// Clears the pending flag if `commit_create` is dropped mid-flight.
struct PendingCreate<'a> {
    grid: &'a mut DataGrid,
    armed: bool,
}

impl Drop for PendingCreate<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.grid.abort_commit_create();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_blank;
    use crate::error::{CollaboratorError, GridError};
    use crate::grid::{DataGrid, GridOptions};
    use crate::types::{ColumnDefinition, Row, Value};

    fn grid() -> DataGrid {
        DataGrid::new(
            vec![Row::new().with("id", 1).with("name", "Launch")],
            vec![
                ColumnDefinition::new("id", "ID"),
                ColumnDefinition::new("name", "Name").required(true),
                ColumnDefinition::new("venue", "Venue"),
            ],
            GridOptions::with_all_features(),
        )
        .unwrap()
    }

    #[test]
    fn blank_values() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&Value::Null)));
        assert!(is_blank(Some(&Value::from("  "))));
        assert!(is_blank(Some(&serde_json::json!([]))));
        assert!(!is_blank(Some(&Value::from(0))));
        assert!(!is_blank(Some(&Value::Bool(false))));
    }

    #[test]
    fn only_one_draft_at_a_time() {
        let mut g = grid();
        assert!(g.start_create());
        g.set_draft_value("venue", "Hall A").unwrap();
        assert!(!g.start_create());
        assert_eq!(
            g.draft().and_then(|d| d.row.get("venue")),
            Some(&Value::from("Hall A"))
        );
    }

    #[test]
    fn required_fields_block_commit() {
        let mut g = grid();
        g.start_create();
        let err = g.begin_commit_create().unwrap_err();
        match err {
            GridError::Validation { missing } => assert_eq!(missing, vec!["name".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(g.draft().is_some_and(|d| d.error.is_some() && !d.pending));
    }

    #[test]
    fn failed_create_keeps_draft_open() {
        let mut g = grid();
        g.start_create();
        g.set_draft_value("name", "Gala").unwrap();
        g.begin_commit_create().unwrap();
        assert!(g.finish_commit_create(Err(CollaboratorError::new("denied"))).is_err());
        let draft = g.draft().unwrap();
        assert!(!draft.pending);
        assert!(draft.error.as_deref().is_some_and(|e| e.contains("denied")));
        assert_eq!(g.data().len(), 1);
    }

    #[test]
    fn successful_create_appends_returned_row() {
        let mut g = grid();
        g.start_create();
        g.set_draft_value("name", "Gala").unwrap();
        let req = g.begin_commit_create().unwrap();
        let saved = req.draft.clone().with("id", 2);
        assert_eq!(g.finish_commit_create(Ok(saved)).unwrap(), "2");
        assert!(g.draft().is_none());
        assert_eq!(g.data().len(), 2);
        assert!(g.row("2").is_some());
    }

    #[test]
    fn created_row_without_key_keeps_draft() {
        let mut g = grid();
        g.start_create();
        g.set_draft_value("name", "Gala").unwrap();
        let req = g.begin_commit_create().unwrap();
        let err = g.finish_commit_create(Ok(req.draft)).unwrap_err();
        assert!(matches!(err, GridError::MissingRowKey { ref field } if field == "id"));
        assert!(g.draft().is_some_and(|d| !d.pending && d.error.is_some()));
        assert_eq!(g.data().len(), 1);
    }

    #[test]
    fn aborted_create_can_be_committed_again() {
        let mut g = grid();
        g.start_create();
        g.set_draft_value("name", "Gala").unwrap();
        assert!(matches!(g.abort_commit_create(), Err(GridError::NoDraft)));
        g.begin_commit_create().unwrap();
        g.abort_commit_create().unwrap();
        assert!(g.draft().is_some_and(|d| !d.pending));
        assert_eq!(g.draft().unwrap().row.get("name"), Some(&Value::from("Gala")));
        g.cancel_create().unwrap();
        assert!(g.start_create());
    }
}
