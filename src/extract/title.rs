use super::{selector, ExtractError};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// A title listed on a search result page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    /// IMDB identifier, e.g. `tt0111161`
    pub id: String,
    pub name: String,
    /// Year as printed, e.g. `1994` or `2011–2019`
    pub year: Option<String>,
    pub certificate: Option<String>,
    pub runtime: Option<String>,
    pub genres: Vec<String>,
    pub rating: Option<f32>,
    pub votes: Option<u64>,
    pub summary: Option<String>,
}

struct TitleSelectors {
    item: Selector,
    link: Selector,
    year: Selector,
    certificate: Selector,
    runtime: Selector,
    genre: Selector,
    rating: Selector,
    votes: Selector,
    text_muted: Selector,
}

impl TitleSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            item: selector("div.lister-item")?,
            link: selector("h3.lister-item-header a[href]")?,
            year: selector("span.lister-item-year")?,
            certificate: selector("span.certificate")?,
            runtime: selector("span.runtime")?,
            genre: selector("span.genre")?,
            rating: selector("div.ratings-imdb-rating")?,
            votes: selector("span[name='nv']")?,
            text_muted: selector("div.lister-item-content > p.text-muted")?,
        })
    }
}

/// Extracts every title listed on a search result page
///
/// A page past the end of the results simply yields no titles. A listed item
/// without a title link or title id is treated as a malformed page.
///
/// # Example
///
/// ```
/// use imdb_crawl::extract::extract_titles;
///
/// let html = r#"<div class="lister-item"><div class="lister-item-content">
///     <h3 class="lister-item-header"><a href="/title/tt0068646/">The Godfather</a></h3>
/// </div></div>"#;
/// let titles = extract_titles(html).unwrap();
/// assert_eq!(titles[0].id, "tt0068646");
/// ```
pub fn extract_titles(body: &str) -> Result<Vec<Title>, ExtractError> {
    let selectors = TitleSelectors::new()?;
    let document = Html::parse_document(body);

    document
        .select(&selectors.item)
        .enumerate()
        .map(|(index, item)| extract_title(&selectors, index, item))
        .collect()
}

fn extract_title(
    selectors: &TitleSelectors,
    index: usize,
    item: ElementRef<'_>,
) -> Result<Title, ExtractError> {
    let link = item
        .select(&selectors.link)
        .next()
        .ok_or(ExtractError::MissingField {
            index,
            field: "title link",
        })?;

    let id = link
        .value()
        .attr("href")
        .and_then(title_id_from_href)
        .ok_or(ExtractError::MissingField {
            index,
            field: "title id",
        })?;

    let name = collapse_text(link);
    if name.is_empty() {
        return Err(ExtractError::MissingField {
            index,
            field: "title name",
        });
    }

    let year = first_text(item, &selectors.year)
        .map(|y| y.trim_matches(|c| c == '(' || c == ')').to_string())
        .filter(|y| !y.is_empty());

    let genres = first_text(item, &selectors.genre)
        .map(|g| {
            g.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let rating = item.select(&selectors.rating).next().and_then(|el| {
        el.value()
            .attr("data-value")
            .map(str::to_string)
            .or_else(|| Some(collapse_text(el)))
            .and_then(|v| v.trim().parse::<f32>().ok())
    });

    let votes = item.select(&selectors.votes).next().and_then(|el| {
        el.value()
            .attr("data-value")
            .map(str::to_string)
            .unwrap_or_else(|| collapse_text(el))
            .replace(',', "")
            .parse::<u64>()
            .ok()
    });

    // The second muted paragraph holds the plot outline
    let summary = item
        .select(&selectors.text_muted)
        .nth(1)
        .map(collapse_text)
        .filter(|s| !s.is_empty());

    Ok(Title {
        id,
        name,
        year,
        certificate: first_text(item, &selectors.certificate),
        runtime: first_text(item, &selectors.runtime),
        genres,
        rating,
        votes,
        summary,
    })
}

/// Extracts `tt1234567` from links like `/title/tt1234567/?ref_=adv_li_tt`
fn title_id_from_href(href: &str) -> Option<String> {
    href.split(['/', '?'])
        .find(|segment| {
            segment.len() > 2
                && segment.starts_with("tt")
                && segment[2..].chars().all(|c| c.is_ascii_digit())
        })
        .map(str::to_string)
}

fn first_text(item: ElementRef<'_>, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(collapse_text)
        .filter(|s| !s.is_empty())
}

/// Joins an element's text nodes and collapses runs of whitespace
fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
