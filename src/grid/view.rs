//! The derived, render-ready projection of a grid.

use serde::Serialize;

use crate::processing::group::DisplayRow;

/// One page of the grid, recomputed from scratch by [`super::DataGrid::view`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    /// Rows of the current page, group headers included.
    pub rows: Vec<DisplayRow>,
    /// Rows that passed the active filters.
    pub filtered_count: usize,
    /// Number of groups, when grouped.
    pub group_count: Option<usize>,
    /// Effective 1-based page.
    pub page: usize,
    /// `None` when pagination is disabled.
    pub page_size: Option<usize>,
    pub total_pages: usize,
    /// Selected data rows on this page.
    pub selected_on_page: usize,
}

impl GridView {
    /// Data rows of the page, skipping group headers.
    pub fn data_rows(&self) -> impl Iterator<Item = &crate::types::Row> {
        self.rows.iter().filter_map(DisplayRow::row)
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}
