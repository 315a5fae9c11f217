//! Pure row transforms used by the grid pipeline.
//!
//! Every function here takes rows (or a row) by reference and returns a new value; none of
//! them hold state. The [`crate::grid::DataGrid`] composes them in a fixed order:
//!
//! - [`filter`]: global search, column filters and the AND/OR rule engine
//!   (built on [`predicate::evaluate`])
//! - [`group`]: partitioning and per-group aggregates ([`reduce`])
//! - [`sort`]: single-column ordering
//! - [`paginate`]: page slicing
//!
//! ## Example: filter -> group
//!
//! ```rust
//! use rust_data_grid::processing::filter::{apply, FilterGroup, FilterLogic};
//! use rust_data_grid::processing::group::{group, GroupConfig};
//! use rust_data_grid::processing::predicate::{FilterOperator, FilterRule};
//! use rust_data_grid::processing::reduce::AggregationType;
//! use rust_data_grid::types::Row;
//!
//! let rows = vec![
//!     Row::new().with("tier", "vip").with("price", 120),
//!     Row::new().with("tier", "general").with("price", 40),
//!     Row::new().with("tier", "vip").with("price", "150"),
//! ];
//!
//! let rules = FilterGroup::new(
//!     FilterLogic::And,
//!     vec![FilterRule::new("r1", "price", FilterOperator::GreaterThan, "50")],
//! );
//! let filtered = apply(&rows, Some(&rules));
//!
//! let groups = group(&filtered, &GroupConfig::new("tier").aggregate("price", AggregationType::Sum));
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].aggregation("price").unwrap().formatted(), "270.00");
//! ```

pub mod filter;
pub mod group;
pub mod paginate;
pub mod predicate;
pub mod preset;
pub mod reduce;
pub mod sort;

pub use filter::{FilterGroup, FilterLogic, FilterState, apply};
pub use group::{DisplayRow, GroupConfig, GroupedRow, flatten, group, toggle};
pub use predicate::{FilterOperator, FilterRule, evaluate};
pub use preset::{FilterPreset, PresetManager, PresetStore};
pub use reduce::{AggregationSpec, AggregationType, reduce};
pub use sort::{Comparison, SortDirection, SortSpec};
