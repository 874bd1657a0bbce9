//! Search query construction
//!
//! The base query (sort directives and the adult filter) is built once from
//! configuration and shared read-only between workers. Each worker derives
//! its own copy per page by appending its genre and the page offset.

use crate::config::SearchConfig;
use crate::extract::Genre;
use url::Url;

/// An ordered list of search query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    params: Vec<(String, String)>,
}

impl SearchQuery {
    /// Creates an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the shared base query from the search configuration
    ///
    /// Each comma-separated piece of `sort` becomes its own `sort` parameter,
    /// so `user_rating,desc` yields `sort=user_rating&sort=desc`.
    pub fn from_config(config: &SearchConfig) -> Self {
        let mut query = Self::new();

        for directive in config.sort.split(',').map(str::trim) {
            if !directive.is_empty() {
                query.push("sort", directive);
            }
        }

        if config.adult {
            query.push("adult", "include");
        }

        query
    }

    /// Appends a parameter, keeping any existing ones with the same key
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.push((key.into(), value.into()));
    }

    /// Returns a copy of this query filtered to one genre and positioned at `start`
    pub fn for_page(&self, genre: &Genre, start: usize) -> Self {
        let mut query = self.clone();
        query.push("genres", genre.as_str());
        query.push("start", start.to_string());
        query
    }

    /// Returns the values of every parameter named `key`, in order
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Appends this query to `base`, after any query `base` already carries
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        url
    }
}
