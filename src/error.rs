use std::error::Error as StdError;

use thiserror::Error;

/// Convenience result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Error type returned by grid operations.
///
/// Malformed filter input and unknown filter operators are not errors: they evaluate to
/// `false` and `true` respectively (see [`crate::processing::predicate`]).
#[derive(Debug, Error)]
pub enum GridError {
    /// Two column definitions share the same key.
    #[error("duplicate column key '{key}'")]
    DuplicateColumn { key: String },

    /// A column key is not part of the grid definition.
    #[error("unknown column '{key}'")]
    UnknownColumn { key: String },

    #[error("column '{key}' is not sortable")]
    ColumnNotSortable { key: String },

    #[error("column '{key}' is not filterable")]
    ColumnNotFilterable { key: String },

    #[error("column '{key}' is not editable")]
    ColumnNotEditable { key: String },

    /// The column's kind holds structured values that cannot be grouped.
    #[error("column '{key}' cannot be grouped")]
    NotGroupable { key: String },

    /// The operation belongs to a feature that is not enabled for this grid.
    #[error("feature '{feature}' is disabled for this grid")]
    FeatureDisabled { feature: &'static str },

    /// Free column sorting is unavailable while rows are grouped.
    #[error("cannot sort by column while rows are grouped")]
    GroupedMode,

    #[error("rows are not grouped")]
    NotGrouped,

    #[error("row '{key}' not found")]
    RowNotFound { key: String },

    /// The row has no value in the configured key field.
    #[error("row has no value for key field '{field}'")]
    MissingRowKey { field: String },

    #[error("no cell is being edited")]
    NoActiveEdit,

    #[error("no draft row is open")]
    NoDraft,

    /// A commit for the same transaction is already in flight.
    #[error("a commit is already pending")]
    CommitPending,

    /// Required columns are empty on the draft row.
    #[error("required fields are empty: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("page size must be > 0")]
    InvalidPageSize,

    #[error("unknown action '{id}'")]
    UnknownAction { id: String },

    #[error("unknown preset '{id}'")]
    UnknownPreset { id: String },

    /// The external data source rejected an update or create.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rows do not have the expected shape.
    #[error("ingestion error: {message}")]
    Ingestion { message: String },
}

/// Failure signalled by an external collaborator (update/create callbacks).
#[derive(Debug, Error)]
#[error("collaborator failed: {message}")]
pub struct CollaboratorError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CollaboratorError {
    /// Create an error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
