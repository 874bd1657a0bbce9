//! HTTP fetcher implementation
//!
//! Every request is a plain GET with no retry. Transport failures and
//! non-success status codes are both surfaced as errors and left to the
//! caller's error policy.

use crate::CrawlError;
use reqwest::Client;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("imdb-crawl/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by the landing-page fetch and every worker
///
/// # Example
///
/// ```no_run
/// use imdb_crawl::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// # Returns
///
/// * `Ok(String)` - Body of a 2xx response
/// * `Err(CrawlError::Http)` - Connection or body read failure
/// * `Err(CrawlError::HttpStatus)` - Any non-success status code
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, CrawlError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| CrawlError::Http {
        url: url.to_string(),
        source,
    })
}
