//! imdb-crawl main entry point
//!
//! This is the command-line interface for the genre-partitioned IMDB crawler.

use anyhow::{bail, Context};
use clap::Parser;
use imdb_crawl::config::{load_config_with_hash, validate, Config, ErrorPolicy};
use imdb_crawl::crawler::Coordinator;
use imdb_crawl::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// imdb-crawl: crawl IMDB title search, one JSON-Lines file per genre
///
/// Discovers the genres offered by the search page, then crawls each genre
/// concurrently, writing up to LIMIT titles to <OUTPUT_DIR>/<genre>.jsonl.
#[derive(Parser, Debug)]
#[command(name = "imdb-crawl")]
#[command(version)]
#[command(about = "Crawl IMDB title search into per-genre JSON-Lines files", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum titles written per genre [default: 500]
    #[arg(long)]
    limit: Option<usize>,

    /// Include adult-rated results [default: true]
    #[arg(long, value_name = "BOOL")]
    adult: Option<bool>,

    /// Comma-separated sort directives [default: user_rating,desc]
    #[arg(long)]
    sort: Option<String>,

    /// Verbose progress logging
    #[arg(long)]
    debug: bool,

    /// Directory receiving the .jsonl files [default: results]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Title search endpoint, also used as the landing page
    #[arg(long, value_name = "URL")]
    search_url: Option<String>,

    /// Maximum genres crawled at once [default: unbounded]
    #[arg(long, value_name = "N")]
    max_concurrent_genres: Option<usize>,

    /// What to do when a genre fails: abort or continue [default: abort]
    #[arg(long, value_name = "POLICY")]
    on_error: Option<ErrorPolicy>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = build_config(&cli)?;

    // Setup logging once the debug setting is known
    let verbosity = if config.debug {
        cli.verbose.max(1)
    } else {
        cli.verbose
    };
    setup_logging(verbosity, cli.quiet);

    if let (Some(path), Some(hash)) = (&cli.config, &config_hash) {
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
    }

    tracing::info!(
        "Limit per genre: {}, sort: {}, adult: {}, output: {}",
        config.crawl.limit,
        config.search.sort,
        config.search.adult,
        config.output.directory.display()
    );

    let quiet = cli.quiet;
    let coordinator = Coordinator::new(config).context("failed to initialize crawler")?;

    let summary = match coordinator.run().await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).context("crawl aborted");
        }
    };

    if !quiet {
        print_summary(&summary);
    }

    if !summary.is_success() {
        bail!("{} genre(s) failed", summary.failures.len());
    }

    Ok(())
}

/// Builds the configuration: defaults, then the TOML file, then flags
fn build_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(limit) = cli.limit {
        config.crawl.limit = limit;
    }
    if let Some(adult) = cli.adult {
        config.search.adult = adult;
    }
    if let Some(sort) = &cli.sort {
        config.search.sort = sort.clone();
    }
    if cli.debug {
        config.debug = true;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(url) = &cli.search_url {
        config.search.search_url = url.clone();
    }
    if let Some(cap) = cli.max_concurrent_genres {
        config.crawl.max_concurrent_genres = Some(cap);
    }
    if let Some(policy) = cli.on_error {
        config.crawl.on_error = policy;
    }

    validate(&config).context("invalid configuration")?;
    Ok((config, hash))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("imdb_crawl=info,warn"),
            1 => EnvFilter::new("imdb_crawl=debug,info"),
            2 => EnvFilter::new("imdb_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
