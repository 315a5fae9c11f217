//! Column kinds and view-layer column configuration.
//!
//! - [`kind`]: the [`ColumnKind`] tagged variant plus declarative factories
//!   (`kind::date`, `kind::relation`, ...)
//! - [`config`]: [`ColumnConfigModel`], the per-column visibility/order/freeze/label state

pub mod config;
pub mod kind;

pub use config::{ColumnConfig, ColumnConfigModel, ColumnConfigStore, ColumnStats};
pub use kind::{ColumnKind, RelationDescriptor, RelationKind, display_value};
