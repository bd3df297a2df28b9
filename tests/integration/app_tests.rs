//! Integration tests for the application workflows

use crate::common::{mount_page, paths, test_config};
use hermes::app::Hermes;
use hermes::crawler::ProgressSink;
use hermes::storage::{ChatRole, SqliteStorage, Storage};
use hermes::url::extract_host;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(server: &MockServer, max_pages: u32) -> Hermes {
    let config = test_config(max_pages, &format!("{}/v1/messages", server.uri()));
    Hermes::new(config, SqliteStorage::new_in_memory().unwrap()).unwrap()
}

fn server_host(server: &MockServer) -> String {
    extract_host(&url::Url::parse(&server.uri()).unwrap()).unwrap()
}

async fn mount_small_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        "Garden Handbook",
        r#"Everything about gardens. <a href="/tomatoes">Tomatoes</a> <a href="/roses">Roses</a>"#,
    )
    .await;
    mount_page(
        server,
        "/tomatoes",
        "Growing tomatoes",
        "Tomatoes need full sunlight and regular watering.",
    )
    .await;
    mount_page(server, "/roses", "Pruning roses", "Prune roses in late winter.").await;
}

#[tokio::test]
async fn test_crawl_site_stores_documents_and_domain() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let mut app = app(&server, 2);
    let outcome = app
        .crawl_site(&server.uri(), None, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.document_count, 2);
    assert_eq!(outcome.max_pages, 2);

    let stored = app.storage().get_documents(None).unwrap();
    assert_eq!(paths(&stored), vec!["/", "/tomatoes"]);

    let domains = app.domains().unwrap();
    assert_eq!(domains.len(), 1);
    assert_eq!(domains[0].domain, server_host(&server));
    assert_eq!(domains[0].page_count, 2);
    assert!(domains[0].last_crawled.is_some());
}

#[tokio::test]
async fn test_requested_budget_is_capped_by_settings() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let mut app = app(&server, 1);
    let outcome = app
        .crawl_site(&server.uri(), Some(50), &ProgressSink::none())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.max_pages, 1);
    assert_eq!(app.storage().count_documents().unwrap(), 1);
}

#[tokio::test]
async fn test_recrawl_replaces_documents() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let mut app = app(&server, 3);
    for _ in 0..2 {
        app.crawl_site(&server.uri(), None, &ProgressSink::none())
            .await
            .expect("Crawl failed");
    }

    assert_eq!(app.storage().count_documents().unwrap(), 3);
    assert_eq!(app.domains().unwrap()[0].page_count, 3);
}

#[tokio::test]
async fn test_index_page_stores_one_document() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let mut app = app(&server, 5);
    let document = app
        .index_page(&format!("{}/roses#top", server.uri()))
        .await
        .expect("Indexing failed");

    assert_eq!(document.title, "Pruning roses");
    assert!(document.content.contains("late winter"));
    assert!(!document.url.contains('#'));

    let stored = app.storage().get_document(&document.url).unwrap().unwrap();
    assert_eq!(stored.title, "Pruning roses");
    assert_eq!(app.domains().unwrap()[0].page_count, 1);
}

#[tokio::test]
async fn test_index_page_reports_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut app = app(&server, 5);
    let result = app.index_page(&format!("{}/missing", server.uri())).await;

    assert!(result.is_err());
    assert_eq!(app.storage().count_documents().unwrap(), 0);
}

#[tokio::test]
async fn test_ask_records_chat_history() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "Give tomatoes full sunlight." }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app(&server, 3);
    app.crawl_site(&server.uri(), None, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    let model = hermes::answer::AnthropicModel::new(
        reqwest::Client::new(),
        &app.config().answering,
        "secret-key",
    );
    let host = server_host(&server);
    let answer = app
        .ask_with(model, "what do tomatoes need", Some(&host))
        .await
        .expect("Ask failed");

    assert_eq!(answer.answer, "Give tomatoes full sunlight.");
    assert!(answer.sources[0].url.ends_with("/tomatoes"));

    let history = app.chat_history().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, ChatRole::User);
    assert_eq!(history[0].content, "what do tomatoes need");
    assert_eq!(history[1].role, ChatRole::Assistant);
    assert_eq!(history[1].sources, answer.sources);
    assert_eq!(history[1].domain.as_deref(), Some(host.as_str()));
}

#[tokio::test]
async fn test_failed_ask_records_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    mount_small_site(&server).await;

    let mut app = app(&server, 3);
    app.crawl_site(&server.uri(), None, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    let model = hermes::answer::AnthropicModel::new(
        reqwest::Client::new(),
        &app.config().answering,
        "secret-key",
    );
    let result = app.ask_with(model, "pruning roses", None).await;

    assert!(result.is_err());
    assert!(app.chat_history().unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_domain_and_clear() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let mut app = app(&server, 3);
    app.crawl_site(&server.uri(), None, &ProgressSink::none())
        .await
        .expect("Crawl failed");

    let removed = app.remove_domain(&server_host(&server)).unwrap();
    assert_eq!(removed, 3);
    assert_eq!(app.storage().count_documents().unwrap(), 0);
    assert!(app.domains().unwrap().is_empty());

    app.index_page(&server.uri()).await.expect("Indexing failed");
    app.clear_all().unwrap();
    let stats = app.stats().unwrap();
    assert_eq!(stats.total_documents, 0);
    assert_eq!(stats.total_domains, 0);
}

#[tokio::test]
async fn test_index_survives_reopen() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;
    let dir = TempDir::new().unwrap();

    let mut config = test_config(5, &format!("{}/v1/messages", server.uri()));
    config.storage.database_path = dir.path().join("hermes.db").display().to_string();

    {
        let mut app = Hermes::open(config.clone()).unwrap();
        app.index_page(&format!("{}/tomatoes", server.uri()))
            .await
            .expect("Indexing failed");
    }

    let app = Hermes::open(config).unwrap();
    let stored = app.storage().get_documents(None).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Growing tomatoes");
}
