//! Loading grid rows from files and strings.
//!
//! The grid never fetches data itself; these helpers turn common inputs into
//! [`crate::types::Row`]s for [`crate::grid::DataGrid::new`] and
//! [`crate::grid::DataGrid::set_data`].
//!
//! - [`json`]: JSON arrays, single objects and NDJSON
//! - [`csv`]: headed CSV, typed by the grid's column definitions

pub mod csv;
pub mod json;

pub use self::csv::{rows_from_csv_path, rows_from_csv_reader};
pub use self::json::{rows_from_json_path, rows_from_json_str};
