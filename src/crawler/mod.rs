//! Crawler module for genre-partitioned title crawling
//!
//! This module contains the core crawling logic, including:
//! - Page-count and offset arithmetic
//! - Search query construction
//! - HTTP fetching
//! - The per-genre worker
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod pages;
mod query;
mod worker;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, USER_AGENT};
pub use pages::{pages_needed, start_offset, PAGE_SIZE};
pub use query::SearchQuery;
pub use worker::{GenreWorker, WorkerContext};
