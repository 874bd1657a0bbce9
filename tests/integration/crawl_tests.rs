//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a fake title search and run the full
//! crawl cycle end-to-end with the IMDB markup extractor.

use imdb_crawl::config::{Config, ErrorPolicy};
use imdb_crawl::crawler::Coordinator;
use imdb_crawl::{CrawlError, Title};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Landing page offering the given genres as search-form checkboxes
fn landing_page(genres: &[&str]) -> String {
    let inputs: String = genres
        .iter()
        .enumerate()
        .map(|(i, g)| {
            format!(
                r#"<input type="checkbox" id="genres-{}" name="genres" value="{}">"#,
                i + 1,
                g
            )
        })
        .collect();
    format!(
        r#"<html><body><form action="/search/title">{}</form></body></html>"#,
        inputs
    )
}

/// Result page listing titles `first..first + count` for a genre
fn results_page(genre: &str, first: usize, count: usize) -> String {
    let items: String = (first..first + count)
        .map(|n| {
            format!(
                r#"<div class="lister-item mode-advanced"><div class="lister-item-content">
                <h3 class="lister-item-header"><span class="lister-item-index">{n}.</span>
                <a href="/title/tt{n:07}/">{genre} title {n}</a>
                <span class="lister-item-year text-muted unbold">(2001)</span></h3>
                <p class="text-muted"><span class="genre">{genre}</span></p>
                </div></div>"#,
                n = n,
                genre = genre
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="lister-list">{}</div></body></html>"#,
        items
    )
}

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer, output_dir: &Path, limit: usize) -> Config {
    let mut config = Config::default();
    config.search.search_url = format!("{}/search/title", server.uri());
    config.crawl.limit = limit;
    config.output.directory = output_dir.to_path_buf();
    config
}

async fn mount_landing(server: &MockServer, genres: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/search/title"))
        .and(|req: &Request| !req.url.query_pairs().any(|(k, _)| k == "genres"))
        .respond_with(ResponseTemplate::new(200).set_body_string(landing_page(genres)))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts one result page; `start` is the 1-based offset
async fn mount_results(server: &MockServer, genre: &str, start: usize, count: usize) {
    Mock::given(method("GET"))
        .and(path("/search/title"))
        .and(query_param("genres", genre))
        .and(query_param("start", start.to_string()))
        .and(query_param("adult", "include"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(results_page(genre, start, count)),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_never_requested(server: &MockServer, genre: &str, start: usize) {
    Mock::given(method("GET"))
        .and(path("/search/title"))
        .and(query_param("genres", genre))
        .and(query_param("start", start.to_string()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

fn read_titles(path: &Path) -> Vec<Title> {
    std::fs::read_to_string(path)
        .expect("Failed to read output file")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect()
}

#[tokio::test]
async fn test_full_crawl_two_genres() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_landing(&server, &["action", "drama"]).await;

    // action: plenty available, limit 70 needs two pages
    mount_results(&server, "action", 1, 50).await;
    mount_results(&server, "action", 51, 50).await;
    mount_never_requested(&server, "action", 101).await;

    // drama: both pages full as well
    mount_results(&server, "drama", 1, 50).await;
    mount_results(&server, "drama", 51, 50).await;

    let config = create_test_config(&server, dir.path(), 70);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(summary.genres_discovered, 2);
    assert_eq!(summary.total_records(), 140);
    assert!(summary.is_success());

    for genre in ["action", "drama"] {
        let titles = read_titles(&dir.path().join(format!("{}.jsonl", genre)));
        assert_eq!(titles.len(), 70, "wrong count for {}", genre);

        // Written titles are the ordered prefix of what was served
        let expected_ids: Vec<String> = (1..=70).map(|n| format!("tt{:07}", n)).collect();
        let ids: Vec<String> = titles.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, expected_ids);

        // No cross-writes between genres
        assert!(titles.iter().all(|t| t.genres == vec![genre.to_string()]));
        assert!(titles.iter().all(|t| t.name.starts_with(genre)));
    }

    let report = summary.report("action").unwrap();
    assert_eq!(report.pages_fetched, 2);
    assert!(report.limit_reached);
}

#[tokio::test]
async fn test_under_supply_writes_available_titles() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_landing(&server, &["film-noir"]).await;
    mount_results(&server, "film-noir", 1, 50).await;
    mount_results(&server, "film-noir", 51, 12).await;
    mount_results(&server, "film-noir", 101, 0).await;

    let config = create_test_config(&server, dir.path(), 150);
    let summary = Coordinator::new(config)
        .unwrap()
        .run()
        .await
        .expect("Crawl failed");

    let titles = read_titles(&dir.path().join("film-noir.jsonl"));
    assert_eq!(titles.len(), 62);

    let report = summary.report("film-noir").unwrap();
    assert_eq!(report.records_written, 62);
    assert_eq!(report.pages_fetched, 3);
    assert!(!report.limit_reached);
}

#[tokio::test]
async fn test_output_file_is_truncated() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("war.jsonl"), "old line\nold line\nold line\n").unwrap();

    mount_landing(&server, &["war"]).await;
    mount_results(&server, "war", 1, 5).await;

    let config = create_test_config(&server, dir.path(), 5);
    Coordinator::new(config).unwrap().run().await.unwrap();

    let titles = read_titles(&dir.path().join("war.jsonl"));
    assert_eq!(titles.len(), 5);
}

#[tokio::test]
async fn test_output_directory_created() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("nested").join("results");

    mount_landing(&server, &["music"]).await;
    mount_results(&server, "music", 1, 3).await;

    let config = create_test_config(&server, &output_dir, 3);
    Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(read_titles(&output_dir.join("music.jsonl")).len(), 3);
}

#[tokio::test]
async fn test_failure_aborts_every_genre() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_landing(&server, &["horror", "comedy"]).await;

    // horror fails on its first page
    Mock::given(method("GET"))
        .and(query_param("genres", "horror"))
        .and(query_param("start", "1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    // comedy's first page is slow; the abort lands before its second page
    Mock::given(method("GET"))
        .and(query_param("genres", "comedy"))
        .and(query_param("start", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(results_page("comedy", 1, 50))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    mount_never_requested(&server, "comedy", 51).await;

    let config = create_test_config(&server, dir.path(), 100);
    let result = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(
        result,
        Err(CrawlError::HttpStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_continue_policy_reports_failures() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_landing(&server, &["horror", "comedy"]).await;

    // horror's page is malformed: a result item without a title link
    Mock::given(method("GET"))
        .and(query_param("genres", "horror"))
        .and(query_param("start", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="lister-item"><div class="lister-item-content"><h3 class="lister-item-header">?</h3></div></div>"#,
        ))
        .mount(&server)
        .await;
    mount_results(&server, "comedy", 1, 20).await;

    let mut config = create_test_config(&server, dir.path(), 20);
    config.crawl.on_error = ErrorPolicy::Continue;
    config.crawl.max_concurrent_genres = Some(1);

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert!(!summary.is_success());
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].genre.as_str(), "horror");
    assert_eq!(summary.report("comedy").unwrap().records_written, 20);
    assert_eq!(read_titles(&dir.path().join("comedy.jsonl")).len(), 20);
}

#[tokio::test]
async fn test_request_query_parameters() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_landing(&server, &["western"]).await;
    Mock::given(method("GET"))
        .and(path("/search/title"))
        .and(query_param("genres", "western"))
        .and(query_param("start", "1"))
        .and(|req: &Request| {
            let sorts: Vec<String> = req
                .url
                .query_pairs()
                .filter(|(k, _)| k == "sort")
                .map(|(_, v)| v.into_owned())
                .collect();
            let adult = req.url.query_pairs().any(|(k, _)| k == "adult");
            sorts == ["num_votes", "asc"] && !adult
        })
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page("western", 1, 4)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, dir.path(), 4);
    config.search.sort = "num_votes,asc".to_string();
    config.search.adult = false;

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.total_records(), 4);
}

#[tokio::test]
async fn test_no_genres_means_no_workers() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_landing(&server, &[]).await;

    let config = create_test_config(&server, dir.path(), 10);
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.genres_discovered, 0);
    assert!(summary.reports.is_empty());
    assert!(summary.is_success());
}
