//! Pagination of listing results

use serde::{Deserialize, Serialize};

/// One page of an ordered result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page, in result-set order
    pub items: Vec<T>,
    /// Zero-based page index this page was cut for
    pub page: usize,
    /// Requested page size (the last page may hold fewer items)
    pub page_size: usize,
    /// Size of the whole result set, not just this page
    pub total: usize,
}

/// Slice one page out of an already ordered result set.
///
/// `page` is zero-based. A start offset at or beyond the end of the set
/// yields an empty page rather than an error; the end offset clamps to
/// the set length. `total` always reports the full set size.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let total = items.len();
    let start = page.saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(total);

    let items = if start >= total {
        Vec::new()
    } else {
        let mut items = items;
        items.truncate(end);
        items.split_off(start)
    };

    Page {
        items,
        page,
        page_size,
        total,
    }
}
