//! Configuration module
//!
//! Configuration is built once at startup from defaults, an optional TOML
//! file, and command-line overrides, then passed read-only into the crawler.
//!
//! # Example
//!
//! ```no_run
//! use imdb_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("imdb-crawl.toml")).unwrap();
//! println!("Crawling up to {} titles per genre", config.crawl.limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, ErrorPolicy, OutputConfig, SearchConfig, DEFAULT_LIMIT,
    DEFAULT_OUTPUT_DIR, DEFAULT_SEARCH_URL, DEFAULT_SORT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
