use scraper::Html;
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// A genre filter token, e.g. `sci-fi`
///
/// Doubles as the base name of the genre's output file, so tokens that could
/// escape the output directory are never constructed. Tokens are stored
/// lowercase: the search filter ignores case, and `Drama` and `drama` must
/// not become two files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genre(String);

impl Genre {
    /// Parses a raw token, returning `None` if it is not usable
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();

        if token.is_empty()
            || token.contains('/')
            || token.contains('\\')
            || token.contains("..")
            || token.contains(',')
            || token.chars().any(char::is_control)
        {
            return None;
        }

        Some(Self(token.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of this genre's JSON-Lines output file
    pub fn file_name(&self) -> String {
        format!("{}.jsonl", self.0)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the genre tokens offered on the search landing page
///
/// # Extraction Rules
///
/// - `<input name="genres" value="...">` checkboxes of the search form
/// - `<a href="...?genres=...">` links, for pages that list genres as links
///
/// Tokens are returned in first-seen order with duplicates removed, so each
/// genre maps to exactly one worker and one file.
///
/// # Example
///
/// ```
/// use imdb_crawl::extract::extract_genres;
///
/// let html = r#"<form><input name="genres" value="comedy"><input name="genres" value="drama"></form>"#;
/// let genres = extract_genres(html);
/// assert_eq!(genres.len(), 2);
/// assert_eq!(genres[0].as_str(), "comedy");
/// ```
pub fn extract_genres(body: &str) -> Vec<Genre> {
    let document = Html::parse_document(body);
    let mut seen = HashSet::new();
    let mut genres = Vec::new();

    let mut push = |raw: &str| {
        if let Some(genre) = Genre::parse(raw) {
            if seen.insert(genre.clone()) {
                genres.push(genre);
            }
        }
    };

    if let Ok(input_selector) = super::selector("input[name='genres'][value]") {
        for element in document.select(&input_selector) {
            if let Some(value) = element.value().attr("value") {
                push(value);
            }
        }
    }

    if let Ok(link_selector) = super::selector("a[href*='genres=']") {
        for element in document.select(&link_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(token) = genre_from_href(href) {
                    push(&token);
                }
            }
        }
    }

    genres
}

/// Pulls the `genres` query value out of a (possibly relative) link
fn genre_from_href(href: &str) -> Option<String> {
    let base = Url::parse("https://www.imdb.com/").ok()?;
    let url = base.join(href.trim()).ok()?;

    url.query_pairs()
        .find(|(key, _)| key == "genres")
        .map(|(_, value)| value.into_owned())
}
