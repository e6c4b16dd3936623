//! Result pages and pagination.

use serde::{Deserialize, Serialize};

use crate::product::ProductRecord;

/// One page of search results.
///
/// Built fresh by every fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    rows: Vec<ProductRecord>,
    total_count: u64,
}

impl ResultPage {
    /// Create a page. The count is raised to at least the number of rows.
    pub fn new(rows: Vec<ProductRecord>, total_count: u64) -> Self {
        let total_count = total_count.max(rows.len() as u64);
        Self { rows, total_count }
    }

    /// Create an empty page.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
        }
    }

    /// Rows on this page, in API order.
    pub fn rows(&self) -> &[ProductRecord] {
        &self.rows
    }

    /// Total matches for the term, independent of pagination.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split into rows and count.
    pub fn into_parts(self) -> (Vec<ProductRecord>, u64) {
        (self.rows, self.total_count)
    }
}

impl Default for ResultPage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(u64::from(per_page))
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }

    /// Get page numbers for display (e.g., [3, 4, 5, 6, 7]).
    pub fn page_numbers(&self, max_visible: usize) -> Vec<u64> {
        if self.total_pages <= max_visible as u64 {
            return (1..=self.total_pages).collect();
        }

        let max_visible = max_visible as u64;
        let half = max_visible / 2;
        let start = u64::from(self.page).saturating_sub(half).max(1);
        let end = (start + max_visible - 1).min(self.total_pages);
        let start = (end + 1).saturating_sub(max_visible).max(1);

        (start..=end).collect()
    }

    /// Check if on first page.
    pub fn is_first(&self) -> bool {
        self.page == 1
    }

    /// Check if on last page.
    pub fn is_last(&self) -> bool {
        u64::from(self.page) >= self.total_pages
    }

    /// Get start item number (1-indexed).
    pub fn start_item(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            (u64::from(self.page) - 1) * u64::from(self.per_page) + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.per_page)).min(self.total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, crate::query::DEFAULT_PAGE_SIZE, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_page_count_covers_rows() {
        let rows = vec![ProductRecord::named("a"), ProductRecord::named("b")];
        let page = ResultPage::new(rows, 0);
        assert_eq!(page.total_count(), 2);
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn test_result_page_into_parts() {
        let page = ResultPage::new(vec![ProductRecord::named("a")], 137);
        let (rows, total) = page.into_parts();
        assert_eq!(rows.len(), 1);
        assert_eq!(total, 137);
    }

    #[test]
    fn test_pagination_basics() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_pagination_first_page() {
        let p = Pagination::new(1, 10, 137);
        assert_eq!(p.total_pages, 14);
        assert!(!p.has_prev);
        assert!(p.has_next);
        assert!(p.is_first());
        assert!(!p.is_last());
    }

    #[test]
    fn test_pagination_last_page() {
        let p = Pagination::new(5, 10, 45);
        assert!(p.has_prev);
        assert!(!p.has_next);
        assert!(p.is_last());
    }

    #[test]
    fn test_pagination_empty() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.start_item(), 0);
        assert_eq!(p.end_item(), 0);
        assert!(p.is_last());
    }

    #[test]
    fn test_pagination_page_numbers() {
        let p = Pagination::new(5, 10, 100);
        assert_eq!(p.page_numbers(5), vec![3, 4, 5, 6, 7]);

        let p = Pagination::new(1, 10, 100);
        assert_eq!(p.page_numbers(5), vec![1, 2, 3, 4, 5]);

        let p = Pagination::new(10, 10, 100);
        assert_eq!(p.page_numbers(5), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_pagination_item_range() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.start_item(), 11);
        assert_eq!(p.end_item(), 20);
    }
}
