//! Crawler coordinator - genre discovery and worker supervision
//!
//! The coordinator:
//! - Fetches the search landing page once and extracts the genre list
//! - Creates the output directory
//! - Spawns one worker task per genre, behind a concurrency cap
//! - Waits for every worker and applies the configured error policy

use crate::config::{validate, Config, ErrorPolicy};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::query::SearchQuery;
use crate::crawler::worker::{GenreWorker, WorkerContext};
use crate::extract::{Extractor, Genre, ImdbExtractor};
use crate::output::{CrawlSummary, GenreFailure, GenreReport};
use crate::CrawlError;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<E = ImdbExtractor> {
    config: Arc<Config>,
    client: Client,
    extractor: Arc<E>,
}

impl Coordinator<ImdbExtractor> {
    /// Creates a coordinator using the IMDB markup extractor
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the HTTP client was built
    /// * `Err(CrawlError)` - Invalid configuration or client setup failure
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        Self::with_extractor(config, ImdbExtractor)
    }
}

impl<E: Extractor> Coordinator<E> {
    /// Creates a coordinator with a custom extractor
    pub fn with_extractor(config: Config, extractor: E) -> Result<Self, CrawlError> {
        validate(&config)?;
        let client = build_http_client().map_err(CrawlError::Client)?;

        Ok(Self {
            config: Arc::new(config),
            client,
            extractor: Arc::new(extractor),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of genres allowed to crawl at the same time
    pub fn concurrency_cap(&self) -> usize {
        self.config
            .crawl
            .max_concurrent_genres
            .unwrap_or(Semaphore::MAX_PERMITS)
            .min(Semaphore::MAX_PERMITS)
    }

    /// Runs the crawl
    ///
    /// 1. Fetch the landing page and extract genres
    /// 2. Create the output directory
    /// 3. Spawn one worker per genre
    /// 4. Collect worker results:
    ///    - `abort`: the first failure cancels every other worker and is returned
    ///    - `continue`: failures are recorded and the remaining workers finish
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Every worker finished (or failed under `continue`)
    /// * `Err(CrawlError)` - Landing page, output directory, or a worker failed
    pub async fn run(&self) -> Result<CrawlSummary, CrawlError> {
        let search_url = Url::parse(&self.config.search.search_url)?;

        tracing::info!("Fetching genre list from {}", search_url);
        let landing = fetch_page(&self.client, search_url.as_str()).await?;
        let genres = self.extractor.extract_genres(&landing);
        tracing::info!("Discovered {} genres", genres.len());

        let output_dir = self.config.output.directory.clone();
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|source| CrawlError::Output {
                path: output_dir.display().to_string(),
                source,
            })?;

        let limit = self.config.crawl.limit;
        if limit == 0 {
            tracing::warn!("limit is 0, every genre file will be empty");
        }

        let context = Arc::new(WorkerContext::new(
            self.client.clone(),
            search_url,
            Arc::new(SearchQuery::from_config(&self.config.search)),
            Arc::clone(&self.extractor),
            limit,
            output_dir,
        ));

        let mut summary = CrawlSummary::new(genres.len());
        let (mut join_set, mut tasks) = self.spawn_workers(genres, context);

        while let Some(joined) = join_set.join_next_with_id().await {
            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(join_err) => (
                    join_err.id(),
                    Err(CrawlError::WorkerJoin(join_err.to_string())),
                ),
            };

            let Some(genre) = tasks.remove(&id) else {
                join_set.abort_all();
                return Err(CrawlError::WorkerJoin(format!("unknown task {}", id)));
            };

            match result {
                Ok(report) => {
                    tracing::info!(
                        "Finished {}: {} titles in {} pages",
                        report.genre,
                        report.records_written,
                        report.pages_fetched
                    );
                    summary.reports.push(report);
                }
                Err(e) => match self.config.crawl.on_error {
                    ErrorPolicy::Abort => {
                        tracing::error!("Genre {} failed, aborting crawl: {}", genre, e);
                        join_set.abort_all();
                        return Err(e);
                    }
                    ErrorPolicy::Continue => {
                        tracing::warn!("Genre {} failed: {}", genre, e);
                        summary.failures.push(GenreFailure {
                            genre,
                            message: e.to_string(),
                        });
                    }
                },
            }
        }

        summary.finish();
        tracing::info!(
            "Crawl completed: {} titles across {} genres ({} failed)",
            summary.total_records(),
            summary.reports.len(),
            summary.failures.len()
        );

        Ok(summary)
    }

    /// Spawns one worker task per genre
    ///
    /// Tasks start immediately but each waits on the semaphore before its
    /// first request, so at most `concurrency_cap()` genres are in flight.
    /// The returned map names the genre behind each task, including tasks
    /// that end in a panic.
    fn spawn_workers(
        &self,
        genres: Vec<Genre>,
        context: Arc<WorkerContext<E>>,
    ) -> (JoinSet<Result<GenreReport, CrawlError>>, HashMap<Id, Genre>) {
        let semaphore = Arc::new(Semaphore::new(self.concurrency_cap()));
        let mut join_set = JoinSet::new();
        let mut tasks = HashMap::with_capacity(genres.len());

        for genre in genres {
            let handle = join_set.spawn(run_genre(
                genre.clone(),
                Arc::clone(&context),
                Arc::clone(&semaphore),
            ));
            tasks.insert(handle.id(), genre);
        }

        (join_set, tasks)
    }
}

async fn run_genre<E: Extractor>(
    genre: Genre,
    context: Arc<WorkerContext<E>>,
    semaphore: Arc<Semaphore>,
) -> Result<GenreReport, CrawlError> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| CrawlError::WorkerJoin(e.to_string()))?;

    GenreWorker::new(genre, context).run().await
}

/// Runs a complete crawl with the IMDB extractor
///
/// # Example
///
/// ```no_run
/// use imdb_crawl::config::Config;
/// use imdb_crawl::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(Config::default()).await?;
/// println!("{} titles written", summary.total_records());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, CrawlError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
