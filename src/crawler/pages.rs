//! Pagination arithmetic for the title search

/// Number of titles the search endpoint returns per page
pub const PAGE_SIZE: usize = 50;

/// Returns the number of pages needed to collect `limit` titles
///
/// This is the smallest `P` with `P * page_size >= limit`. A limit of zero
/// needs zero pages.
///
/// # Panics
///
/// Panics if `page_size` is zero.
///
/// # Example
///
/// ```
/// use imdb_crawl::crawler::pages_needed;
///
/// assert_eq!(pages_needed(500, 50), 10);
/// assert_eq!(pages_needed(501, 50), 11);
/// ```
pub fn pages_needed(limit: usize, page_size: usize) -> usize {
    assert!(page_size > 0, "page size must be positive");
    limit.div_ceil(page_size)
}

/// Returns the 1-based `start` offset of a 0-based page index
pub fn start_offset(page: usize, page_size: usize) -> usize {
    page * page_size + 1
}
