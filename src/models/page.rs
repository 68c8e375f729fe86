//! Listing windows and search results

use serde::Serialize;
use utoipa::ToSchema;

use super::book::Book;

/// Number of books shown on one listing page
pub const PAGE_SIZE: i64 = 6;

/// Page links shown on each side of the active page
pub const PAGE_LINK_SPAN: i64 = 4;

/// Position of a listing page within the whole catalog.
///
/// `next_page` and `prev_page` are plain neighbours and may point outside
/// `1..=total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    /// Current page, 1-based
    pub page: i64,
    pub page_size: i64,
    pub offset: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub next_page: i64,
    pub prev_page: i64,
}

impl Pagination {
    pub fn new(page: i64, total_count: i64) -> Self {
        Self {
            page,
            page_size: PAGE_SIZE,
            offset: Self::offset_for(page).unwrap_or(i64::MAX),
            total_count,
            total_pages: total_count / PAGE_SIZE + i64::from(total_count % PAGE_SIZE != 0),
            next_page: page.saturating_add(1),
            prev_page: page.saturating_sub(1),
        }
    }

    /// Row offset of `page`, or `None` when it does not fit in an `i64`
    pub fn offset_for(page: i64) -> Option<i64> {
        page.checked_sub(1)?.checked_mul(PAGE_SIZE)
    }

    /// Page numbers to link from this page: a window around the current page,
    /// clamped to `1..=total_pages`
    pub fn page_links(&self) -> Vec<i64> {
        let first = self.page.saturating_sub(PAGE_LINK_SPAN).max(1);
        let last = self.page.saturating_add(PAGE_LINK_SPAN).min(self.total_pages);
        (first..=last).collect()
    }
}

/// One listing page: books newest first plus where the page sits
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub pagination: Pagination,
}

/// Every book matching a free-text query
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResults {
    pub books: Vec<Book>,
    pub total_results: usize,
    /// The query text as received
    pub query: String,
}
