//! HTML extraction for search pages
//!
//! The crawler never looks at markup directly. It goes through the
//! [`Extractor`] trait, which turns a response body into either the genre
//! list (landing page) or the titles on one result page.
//!
//! [`ImdbExtractor`] is the implementation for IMDB's advanced title search.

mod genre;
mod title;

pub use genre::{extract_genres, Genre};
pub use title::{extract_titles, Title};

use serde::Serialize;
use thiserror::Error;

/// Errors raised while extracting records from a page body
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Result item {index} is missing its {field}")]
    MissingField { index: usize, field: &'static str },
}

/// Titles extracted from one result page, plus the extraction error if any
///
/// An error means the page could not be trusted; titles collected before
/// the error are not meant to be written.
#[derive(Debug)]
pub struct PageResult<R> {
    pub titles: Vec<R>,
    pub error: Option<ExtractError>,
}

impl<R> PageResult<R> {
    /// A page that extracted cleanly
    pub fn ok(titles: Vec<R>) -> Self {
        Self {
            titles,
            error: None,
        }
    }

    /// A page that failed to extract
    pub fn failed(error: ExtractError) -> Self {
        Self {
            titles: Vec::new(),
            error: Some(error),
        }
    }

    /// Converts into a `Result`, with the error taking precedence
    pub fn into_result(self) -> Result<Vec<R>, ExtractError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.titles),
        }
    }
}

/// Capability interface for turning search pages into crawl inputs
///
/// Implementations must be shareable across genre workers.
pub trait Extractor: Send + Sync + 'static {
    /// The record written, one JSON line each, to a genre's output file
    type Record: Serialize + Send + Sync + 'static;

    /// Extracts the genre tokens offered on the search landing page
    fn extract_genres(&self, body: &str) -> Vec<Genre>;

    /// Extracts the titles listed on one result page
    fn extract_titles(&self, body: &str) -> PageResult<Self::Record>;
}

/// Extractor for IMDB's `/search/title` markup
#[derive(Debug, Clone, Copy, Default)]
pub struct ImdbExtractor;

impl Extractor for ImdbExtractor {
    type Record = Title;

    fn extract_genres(&self, body: &str) -> Vec<Genre> {
        extract_genres(body)
    }

    fn extract_titles(&self, body: &str) -> PageResult<Title> {
        match extract_titles(body) {
            Ok(titles) => PageResult::ok(titles),
            Err(e) => PageResult::failed(e),
        }
    }
}

/// Builds a CSS selector, mapping parse failures into [`ExtractError`]
pub(crate) fn selector(css: &str) -> Result<scraper::Selector, ExtractError> {
    scraper::Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}
