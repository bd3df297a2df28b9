//! Integration tests for the crawler
//!
//! A mock server plays the site; the crawler runs with the real HTTP fetcher.

use crate::common::{
    http_client, mount_forbidden_page, mount_page, mount_robots, paths,
};
use hermes::crawler::{
    progress_channel, CrawlError, CrawlOutcome, CrawlRequest, Crawler, HttpPageFetcher,
    ProgressSink, Surface,
};
use hermes::robots::RobotsCache;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn crawl(
    server: &MockServer,
    max_pages: usize,
    respect_robots: bool,
    progress: &ProgressSink,
) -> Result<CrawlOutcome, CrawlError> {
    let client = http_client();
    let crawler = Crawler::new(
        HttpPageFetcher::new(client.clone()),
        RobotsCache::new(client, "TestBot"),
    )
    .with_page_load_timeout(Duration::from_secs(5));

    let request = CrawlRequest {
        start_url: Url::parse(&format!("{}/", server.uri())).unwrap(),
        max_pages,
        delay: Duration::from_millis(10),
        respect_robots,
    };

    let mut surface = Surface::new();
    crawler.crawl(&mut surface, request, progress).await
}

#[tokio::test]
async fn test_breadth_first_crawl_stops_at_budget() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/a">A</a> <a href="/b">B</a> <a href="/c">C</a>"#,
    )
    .await;
    mount_page(&server, "/a", "A", r#"<a href="/a/deep">Deep</a>"#).await;
    mount_page(&server, "/b", "B", r#"<a href="/">Home</a>"#).await;
    mount_forbidden_page(&server, "/c").await;
    mount_forbidden_page(&server, "/a/deep").await;

    let outcome = crawl(&server, 3, true, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    assert_eq!(paths(&outcome.documents), vec!["/", "/a", "/b"]);
    assert_eq!(outcome.document_count, 3);
    assert_eq!(outcome.max_pages, 3);
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.documents[1].title, "A");
}

#[tokio::test]
async fn test_crawl_ends_when_site_is_exhausted() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "Home", r#"<a href="/only">Only</a>"#).await;
    mount_page(&server, "/only", "Only", r#"<a href="/">Back</a>"#).await;

    let outcome = crawl(&server, 10, true, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    assert_eq!(paths(&outcome.documents), vec!["/", "/only"]);
    assert_eq!(outcome.max_pages, 10);
}

#[tokio::test]
async fn test_links_are_filtered() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r##"
        <a href="/report.pdf">Report</a>
        <a href="/archive.zip">Archive</a>
        <a href="#top">Top</a>
        <a href="https://elsewhere.example/page">Elsewhere</a>
        <a href="mailto:someone@example.com">Mail</a>
        <a href="/next#section">Next</a>
        "##,
    )
    .await;
    mount_page(&server, "/next", "Next", "The next page").await;
    mount_forbidden_page(&server, "/report.pdf").await;
    mount_forbidden_page(&server, "/archive.zip").await;

    let outcome = crawl(&server, 10, true, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    assert_eq!(paths(&outcome.documents), vec!["/", "/next"]);
}

#[tokio::test]
async fn test_robots_disallowed_pages_are_skipped() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nDisallow: /private").await;
    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/private/area">Private</a> <a href="/public">Public</a>"#,
    )
    .await;
    mount_page(&server, "/public", "Public", "Public content").await;
    mount_forbidden_page(&server, "/private/area").await;

    let outcome = crawl(&server, 10, true, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    assert_eq!(paths(&outcome.documents), vec!["/", "/public"]);
    assert!(outcome.failures.is_empty());
}

#[tokio::test]
async fn test_blocked_start_url_is_refused() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: TestBot\nDisallow: /").await;
    mount_forbidden_page(&server, "/").await;

    let result = crawl(&server, 5, true, &ProgressSink::none()).await;

    match result {
        Err(CrawlError::PolicyBlocked { pattern, .. }) => assert_eq!(pattern, "/"),
        other => panic!("Expected PolicyBlocked, got {:?}", other.map(|o| o.document_count)),
    }
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nDisallow: /").await;
    mount_page(&server, "/", "Home", "Welcome").await;

    let outcome = crawl(&server, 5, false, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    assert_eq!(paths(&outcome.documents), vec!["/"]);
}

#[tokio::test]
async fn test_robots_crawl_delay_overrides_request() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nCrawl-delay: 0.05").await;
    mount_page(&server, "/", "Home", "Welcome").await;

    let outcome = crawl(&server, 5, true, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.delay, Duration::from_millis(50));
}

#[tokio::test]
async fn test_failed_pages_do_not_stop_the_crawl() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/broken">Broken</a> <a href="/data">Data</a> <a href="/fine">Fine</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{\"key\": 1}", "application/json"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fine", "Fine", "All good").await;

    let outcome = crawl(&server, 10, true, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    assert_eq!(paths(&outcome.documents), vec!["/", "/fine"]);
    assert_eq!(outcome.failures.len(), 2);
    assert!(outcome.failures[0].url.ends_with("/broken"));
    assert!(outcome.failures[1].url.ends_with("/data"));
}

#[tokio::test]
async fn test_progress_reports_each_visit() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "Home", r#"<a href="/a">A</a>"#).await;
    mount_page(&server, "/a", "A", "Leaf").await;

    let (sink, mut events) = progress_channel(16);
    let outcome = crawl(&server, 5, true, &sink).await.expect("Crawl failed");
    drop(sink);

    let mut seen = Vec::new();
    while let Some(event) = events.recv().await {
        seen.push(event);
    }

    assert_eq!(outcome.document_count, 2);
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].current, 1);
    assert!(seen[0].current_url.ends_with('/'));
    assert_eq!(seen[1].current, 2);
    assert!(seen[1].current_url.ends_with("/a"));
    assert!(seen.iter().all(|e| e.total <= 5));
}
