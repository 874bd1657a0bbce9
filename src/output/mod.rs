//! Output module
//!
//! This module handles:
//! - Writing per-genre JSON-Lines files
//! - Summarizing a crawl run once every worker has finished

mod jsonl;
mod summary;

pub use jsonl::JsonLinesWriter;
pub use summary::{print_summary, CrawlSummary, GenreFailure, GenreReport};
