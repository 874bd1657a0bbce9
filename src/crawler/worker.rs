//! Genre worker
//!
//! A worker crawls a single genre to completion: it requests result pages in
//! order, extracts titles, and appends them to the genre's JSON-Lines file
//! until either the per-genre limit is reached or the pages run out.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::pages::{pages_needed, start_offset, PAGE_SIZE};
use crate::crawler::query::SearchQuery;
use crate::extract::{Extractor, Genre};
use crate::output::{GenreReport, JsonLinesWriter};
use crate::state::WorkerState;
use crate::CrawlError;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Read-only inputs shared by every genre worker of a crawl
pub struct WorkerContext<E> {
    client: Client,
    search_url: Url,
    base_query: Arc<SearchQuery>,
    extractor: Arc<E>,
    limit: usize,
    page_size: usize,
    output_dir: PathBuf,
}

impl<E: Extractor> WorkerContext<E> {
    /// Creates a context using the search endpoint's fixed page size
    pub fn new(
        client: Client,
        search_url: Url,
        base_query: Arc<SearchQuery>,
        extractor: Arc<E>,
        limit: usize,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            client,
            search_url,
            base_query,
            extractor,
            limit,
            page_size: PAGE_SIZE,
            output_dir,
        }
    }

    /// Overrides the page size, for endpoints that page differently
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Crawls one genre and writes its titles to `<output-dir>/<genre>.jsonl`
pub struct GenreWorker<E> {
    genre: Genre,
    context: Arc<WorkerContext<E>>,
    state: WorkerState,
}

impl<E: Extractor> GenreWorker<E> {
    pub fn new(genre: Genre, context: Arc<WorkerContext<E>>) -> Self {
        Self {
            genre,
            context,
            state: WorkerState::Created,
        }
    }

    pub fn genre(&self) -> &Genre {
        &self.genre
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Path of this genre's output file
    pub fn output_path(&self) -> PathBuf {
        self.context.output_dir.join(self.genre.file_name())
    }

    /// Builds the request URL for a 0-based page index
    pub fn page_url(&self, page: usize) -> Url {
        let start = start_offset(page, self.context.page_size);
        self.context
            .base_query
            .for_page(&self.genre, start)
            .to_url(&self.context.search_url)
    }

    /// Runs the crawl for this genre
    ///
    /// # Flow
    ///
    /// 1. Create (truncate) the output file
    /// 2. For each page needed to reach the limit, in order:
    ///    a. Fetch the page
    ///    b. Extract titles
    ///    c. Append titles until the limit is reached
    /// 3. Stop as soon as the limit is reached, even mid-page
    /// 4. Flush and close the file
    ///
    /// Any fetch, extraction or write failure ends the worker with an error;
    /// the file is left as it was at that point.
    pub async fn run(mut self) -> Result<GenreReport, CrawlError> {
        let context = Arc::clone(&self.context);
        let path = self.output_path();
        let mut writer = JsonLinesWriter::create(&path).await?;

        let npage = pages_needed(context.limit, context.page_size);
        tracing::debug!("start collect {} ({} pages)", self.genre, npage);

        let mut pages_fetched = 0;
        let mut limit_reached = false;

        for page in 0..npage {
            self.transition(WorkerState::Fetching { page })?;

            let url = self.page_url(page);
            tracing::debug!("send request to {}", url);

            let body = match fetch_page(&context.client, url.as_str()).await {
                Ok(body) => body,
                Err(e) => return Err(self.abort(e)),
            };
            pages_fetched += 1;

            self.transition(WorkerState::Extracting { page })?;

            let titles = match context.extractor.extract_titles(&body).into_result() {
                Ok(titles) => titles,
                Err(source) => {
                    return Err(self.abort(CrawlError::Extract {
                        url: url.to_string(),
                        source,
                    }))
                }
            };

            for title in &titles {
                if writer.lines_written() >= context.limit {
                    break;
                }
                if let Err(e) = writer.append(title).await {
                    return Err(self.abort(e));
                }
                tracing::debug!(
                    "{}: wrote title {} from page {}",
                    self.genre,
                    writer.lines_written(),
                    page
                );
            }

            tracing::debug!(
                "{}: page {} gave {} titles, {} written so far",
                self.genre,
                page,
                titles.len(),
                writer.lines_written()
            );

            if writer.lines_written() >= context.limit {
                self.transition(WorkerState::LimitReached)?;
                limit_reached = true;
                break;
            }
        }

        let records_written = writer.finish().await?;
        self.transition(WorkerState::Done)?;

        tracing::debug!(
            "finish collect {}: {} titles in {} pages",
            self.genre,
            records_written,
            pages_fetched
        );

        Ok(GenreReport {
            genre: self.genre,
            path,
            records_written,
            pages_fetched,
            limit_reached,
        })
    }

    fn transition(&mut self, next: WorkerState) -> Result<(), CrawlError> {
        if !self.state.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    fn abort(&mut self, error: CrawlError) -> CrawlError {
        tracing::debug!("{}: aborting in state {}: {}", self.genre, self.state, error);
        if self.state.can_transition_to(WorkerState::Aborted) {
            self.state = WorkerState::Aborted;
        }
        error
    }
}
