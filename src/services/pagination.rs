use serde::Serialize;

use crate::error::{AppError, AppResult};

/// The catalog does not serve pages beyond this bound
pub const MAX_PAGES: u32 = 500;

/// Number of page buttons shown around the current page
const WINDOW: u32 = 5;

/// Clamps the upstream page count to what can actually be requested
pub fn clamp_total_pages(upstream_total_pages: u32) -> u32 {
    upstream_total_pages.min(MAX_PAGES)
}

/// Normalizes a requested page number: missing or zero means the first page.
pub fn requested_page(page: Option<u32>) -> AppResult<u32> {
    match page.unwrap_or(1) {
        0 => Ok(1),
        p if p > MAX_PAGES => Err(AppError::InvalidInput(format!(
            "page must be between 1 and {}",
            MAX_PAGES
        ))),
        p => Ok(p),
    }
}

/// Pagination state for list pages
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    /// Page numbers to render as buttons
    pub pages: Vec<u32>,
    /// Pagination is hidden for single-page results
    pub visible: bool,
}

impl Pagination {
    /// `current_page` is the page that was requested. It is kept as is even
    /// past the last page, so the view matches the (empty) results it shows.
    pub fn new(current_page: u32, upstream_total_pages: u32) -> Self {
        let total_pages = clamp_total_pages(upstream_total_pages).max(1);
        let current_page = current_page.max(1);

        Self {
            current_page,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
            pages: page_window(current_page, total_pages),
            visible: total_pages > 1,
        }
    }
}

/// Up to `WINDOW` consecutive pages, centered on `current` where possible
fn page_window(current: u32, total: u32) -> Vec<u32> {
    let width = WINDOW.min(total);
    let start = current
        .saturating_sub(WINDOW / 2)
        .max(1)
        .min(total - width + 1);
    (start..start + width).collect()
}
