//! Row-predicate execution with optional data parallelism.
//!
//! The grid itself is single-threaded; this module only decides how the filter stage of a
//! view recomputation evaluates its predicate. Above [`ExecutionOptions::parallel_threshold`]
//! rows (and with the `parallel` feature enabled), rows are evaluated on the `rayon` global
//! pool. Output order always matches input order, so results are identical either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::types::Row;

/// Default row count at which filtering goes parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 50_000;

/// Configuration for filter execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Minimum row count for parallel evaluation. `None` disables parallelism.
    pub parallel_threshold: Option<usize>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: Some(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}

impl ExecutionOptions {
    /// Sequential evaluation regardless of row count.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: None,
        }
    }

    /// Returns `true` if `row_count` rows would be evaluated in parallel.
    pub fn is_parallel_for(&self, row_count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel_threshold.is_some_and(|t| row_count >= t)
    }
}

/// Clone the rows of `rows` that satisfy `predicate`, preserving order.
pub fn filter_rows<F>(rows: &[Row], opts: &ExecutionOptions, predicate: F) -> Vec<Row>
where
    F: Fn(&Row) -> bool + Send + Sync,
{
    #[cfg(feature = "parallel")]
    if opts.is_parallel_for(rows.len()) {
        return rows.par_iter().filter(|r| predicate(r)).cloned().collect();
    }

    let _ = opts;
    rows.iter().filter(|r| predicate(r)).cloned().collect()
}
