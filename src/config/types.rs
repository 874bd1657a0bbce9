use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default IMDB title search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://www.imdb.com/search/title";

/// Default per-genre record limit
pub const DEFAULT_LIMIT: usize = 500;

/// Default sort directives
pub const DEFAULT_SORT: &str = "user_rating,desc";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "results";

/// Main configuration structure
///
/// Every section and field is optional in the TOML file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,

    /// Verbose progress logging
    pub debug: bool,
}

/// Search endpoint and query filters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Title search endpoint; also serves as the landing page
    #[serde(rename = "search-url")]
    pub search_url: String,

    /// Comma-separated sort directives, e.g. `user_rating,desc`
    pub sort: String,

    /// Include adult-rated results
    pub adult: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            sort: DEFAULT_SORT.to_string(),
            adult: true,
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Maximum records written per genre
    pub limit: usize,

    /// Maximum number of genres crawled at once (unset means unbounded)
    #[serde(rename = "max-concurrent-genres")]
    pub max_concurrent_genres: Option<usize>,

    /// What to do when a genre worker fails
    #[serde(rename = "on-error")]
    pub on_error: ErrorPolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            max_concurrent_genres: None,
            on_error: ErrorPolicy::default(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one `<genre>.jsonl` file per genre
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Policy applied when a genre worker fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abort every in-flight worker and fail the crawl
    #[default]
    Abort,

    /// Record the failure and let the other genres finish
    Continue,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            other => Err(format!(
                "unknown error policy '{}', expected 'abort' or 'continue'",
                other
            )),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Continue => write!(f, "continue"),
        }
    }
}
