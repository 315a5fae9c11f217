//! Page arithmetic. Pages are 1-based.

/// Number of pages for `items` at `page_size`; at least 1.
pub fn total_pages(items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    items.div_ceil(page_size).max(1)
}

/// Clamp `page` into `[1, total_pages]`.
pub fn clamp_page(page: usize, items: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(items, page_size))
}

/// The slice of `items` shown on `page` (clamped).
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return items;
    }
    let page = clamp_page(page, items.len(), page_size);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    &items[start.min(items.len())..end]
}
