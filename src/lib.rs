//! imdb-crawl: a genre-partitioned title crawler
//!
//! This crate crawls IMDB's paginated title search, one concurrent worker per
//! genre, and streams the extracted titles to per-genre JSON-Lines files.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to extract titles from {url}: {source}")]
    Extract {
        url: String,
        source: extract::ExtractError,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Failed to write {path}: {source}")]
    Output {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to encode record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::WorkerState,
        to: state::WorkerState,
    },

    #[error("Genre worker task failed: {0}")]
    WorkerJoin(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{pages_needed, run_crawl, Coordinator, PAGE_SIZE};
pub use extract::{Extractor, Genre, ImdbExtractor, Title};
pub use output::CrawlSummary;
pub use state::WorkerState;
