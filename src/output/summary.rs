//! Crawl summary
//!
//! Collects what each genre worker produced and prints a short report once
//! the crawl is over.

use crate::extract::Genre;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Outcome of one successful genre worker
#[derive(Debug, Clone, PartialEq)]
pub struct GenreReport {
    pub genre: Genre,

    /// The genre's `.jsonl` file
    pub path: PathBuf,

    /// Records written to the file
    pub records_written: usize,

    /// Result pages requested
    pub pages_fetched: usize,

    /// Whether the crawl stopped because the limit was hit
    pub limit_reached: bool,
}

/// A genre whose worker failed
#[derive(Debug, Clone, PartialEq)]
pub struct GenreFailure {
    pub genre: Genre,
    pub message: String,
}

/// Summary of a whole crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Genres found on the landing page
    pub genres_discovered: usize,

    /// Completed genres, in completion order
    pub reports: Vec<GenreReport>,

    /// Failed genres (only populated under the `continue` error policy)
    pub failures: Vec<GenreFailure>,
}

impl CrawlSummary {
    /// Starts a new summary stamped with the current time
    pub fn new(genres_discovered: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            genres_discovered,
            reports: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Marks the crawl as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total records written across all genres
    pub fn total_records(&self) -> usize {
        self.reports.iter().map(|r| r.records_written).sum()
    }

    /// Total result pages requested across all genres
    pub fn total_pages(&self) -> usize {
        self.reports.iter().map(|r| r.pages_fetched).sum()
    }

    /// True when every discovered genre completed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Looks up the report for a genre
    pub fn report(&self, genre: &str) -> Option<&GenreReport> {
        self.reports.iter().find(|r| r.genre.as_str() == genre)
    }
}

/// Prints a crawl summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Started:  {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = summary.duration_seconds() {
        println!("Duration: {}s", seconds);
    }

    println!("\nGenres discovered: {}", summary.genres_discovered);
    println!("Genres completed:  {}", summary.reports.len());
    println!("Pages fetched:     {}", summary.total_pages());
    println!("Titles written:    {}", summary.total_records());

    if !summary.reports.is_empty() {
        let mut reports: Vec<_> = summary.reports.iter().collect();
        reports.sort_by(|a, b| a.genre.as_str().cmp(b.genre.as_str()));

        println!("\nPer genre:");
        for report in reports {
            println!(
                "  {:<14} {:>6} titles  {:>4} pages  {}",
                report.genre.as_str(),
                report.records_written,
                report.pages_fetched,
                report.path.display()
            );
        }
    }

    if !summary.failures.is_empty() {
        println!("\nFailed genres ({}):", summary.failures.len());
        for failure in &summary.failures {
            println!("  - {}: {}", failure.genre, failure.message);
        }
    }
}
