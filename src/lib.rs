//! `rust-data-grid` is an in-memory data-grid engine: it holds externally supplied rows and
//! derives, on every read, the filtered, grouped or sorted, and paginated projection a table
//! UI renders.
//!
//! The primary entrypoint is [`grid::DataGrid`]. It composes the pure transforms in
//! [`processing`] in a fixed order and owns the stateful parts of a grid: selection, the
//! inline-edit transaction, the new-row draft, filter presets and column configuration.
//!
//! ## What the grid does
//!
//! - **Filtering**: global search, per-column "contains" filters, and an advanced AND/OR rule
//!   group over 12 typed operators ([`processing::predicate::FilterOperator`]).
//! - **Grouping**: partition by a column with count/sum/avg/min/max aggregates, groups
//!   ordered by size, independent expand/collapse per group.
//! - **Sorting**: single column, by value type, blanks last.
//! - **Pagination**, **selection** (by row key, across the whole data set), **bulk and row
//!   actions**.
//! - **Inline edits and row creation** through an async [`grid::GridDataSource`], with
//!   rollback on rejection.
//! - **Column configuration** ([`columns::ColumnConfigModel`]): visibility, order, freezing
//!   and label overrides.
//!
//! ## Quick example
//!
//! ```rust
//! use rust_data_grid::grid::{DataGrid, GridOptions};
//! use rust_data_grid::processing::filter::{FilterGroup, FilterLogic};
//! use rust_data_grid::processing::predicate::{FilterOperator, FilterRule};
//! use rust_data_grid::types::{ColumnDefinition, Row, ValueType};
//!
//! # fn main() -> Result<(), rust_data_grid::GridError> {
//! let rows = vec![
//!     Row::new().with("id", 1).with("name", "A").with("v", 5),
//!     Row::new().with("id", 2).with("name", "B").with("v", 15),
//! ];
//! let columns = vec![
//!     ColumnDefinition::new("id", "ID"),
//!     ColumnDefinition::new("name", "Name"),
//!     ColumnDefinition::new("v", "Value").value_type(ValueType::Number),
//! ];
//! let mut grid = DataGrid::new(rows, columns, GridOptions::with_all_features())?;
//!
//! let rules = vec![
//!     FilterRule::new("r1", "name", FilterOperator::Equals, "a"),
//!     FilterRule::new("r2", "v", FilterOperator::GreaterThan, "10"),
//! ];
//! grid.apply_advanced_filter(FilterGroup::new(FilterLogic::Or, rules.clone()))?;
//! assert_eq!(grid.view().filtered_count, 2);
//!
//! grid.apply_advanced_filter(FilterGroup::new(FilterLogic::And, rules))?;
//! assert_eq!(grid.view().filtered_count, 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`grid`]: the coordinator, its options, data-source trait and view
//! - [`processing`]: filter, group/aggregate, sort and paginate transforms
//! - [`columns`]: column kinds and view-layer column configuration
//! - [`types`]: rows, column definitions and value coercion
//! - [`observability`]: grid event observers
//! - [`ingestion`] / [`export`]: rows from JSON or CSV, rows to CSV
//! - [`execution`]: sequential or parallel filter evaluation
//! - [`error`]: error types

pub mod columns;
pub mod error;
pub mod execution;
pub mod export;
pub mod grid;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod types;

pub use error::{CollaboratorError, GridError, GridResult};
