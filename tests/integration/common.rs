//! Shared fixtures for the integration tests

use hermes::config::{parse_config, Config, UserAgentConfig};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    }
}

pub fn http_client() -> reqwest::Client {
    hermes::crawler::build_http_client(&user_agent(), Duration::from_secs(5))
        .expect("Failed to build client")
}

/// Builds a config whose answering endpoint points at `api_url`
pub fn test_config(max_pages: u32, api_url: &str) -> Config {
    parse_config(&format!(
        r#"
[crawler]
max-pages-per-crawl = {}
crawl-delay-ms = 500
page-load-timeout-secs = 5

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"

[storage]
database-path = ":memory:"

[answering]
api-url = "{}"
model = "test-model"
max-tokens = 256
api-key-env = "HERMES_TEST_API_KEY"
"#,
        max_pages, api_url
    ))
    .expect("Failed to parse test config")
}

pub fn html(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><main>{}</main></body></html>",
        title, body
    )
}

/// Serves an HTML page at `route`
pub async fn mount_page(server: &MockServer, route: &str, title: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html(title, body), "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Serves an HTML page at `route` that must never be requested
pub async fn mount_forbidden_page(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html("Forbidden", "should not be fetched"), "text/html"),
        )
        .expect(0)
        .mount(server)
        .await;
}

pub async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

/// Returns the path part of each document URL, in crawl order
pub fn paths(documents: &[hermes::document::Document]) -> Vec<String> {
    documents
        .iter()
        .map(|d| {
            url::Url::parse(&d.url)
                .expect("Stored URL should parse")
                .path()
                .to_string()
        })
        .collect()
}
