//! Page fetcher capability and its HTTP implementation
//!
//! This module handles loading pages for the crawler, including:
//! - The [`Surface`] token that holds the page currently loaded
//! - The [`PageFetcher`] trait the orchestrator drives
//! - Building HTTP clients with proper user agent strings
//! - An HTTP-backed fetcher that parses pages with `scraper`

use crate::config::UserAgentConfig;
use crate::crawler::parser::parse_html;
use crate::crawler::FetchError;
use crate::url::crawlable_link;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{redirect::Policy, Client};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use url::Url;

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// A page as the fetcher loaded it
#[derive(Debug, Clone)]
struct LoadedPage {
    url: Url,
    body: String,
}

/// The browsing surface a crawl runs on
///
/// A surface holds at most one loaded page. It is deliberately not `Clone`:
/// a crawl borrows it mutably for its whole duration, so two crawls can never
/// drive the same surface at once.
#[derive(Debug)]
pub struct Surface {
    id: u64,
    loaded: Option<LoadedPage>,
}

impl Surface {
    /// Creates an empty surface with a process-unique id
    pub fn new() -> Self {
        Self {
            id: NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed),
            loaded: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// URL of the page currently loaded, after redirects
    pub fn current_url(&self) -> Option<&Url> {
        self.loaded.as_ref().map(|page| &page.url)
    }

    /// Raw body of the page currently loaded
    pub fn body(&self) -> Option<&str> {
        self.loaded.as_ref().map(|page| page.body.as_str())
    }

    /// Replaces whatever is loaded with a new page
    pub fn load(&mut self, url: Url, body: String) {
        self.loaded = Some(LoadedPage { url, body });
    }

    pub fn clear(&mut self) {
        self.loaded = None;
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw content pulled from the loaded page
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    /// Final URL of the page (after redirects)
    pub url: String,

    /// Page title, empty when the page has none
    pub title: String,

    /// Readable text
    pub content: String,

    /// Meta description, empty when absent
    pub description: String,

    /// When the page was extracted
    pub timestamp: DateTime<Utc>,
}

/// Loads pages onto a surface and reads them back
///
/// Extraction operates on whatever the last successful `navigate` loaded.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Loads `url` onto the surface, replacing the current page
    async fn navigate(&self, surface: &mut Surface, url: &Url) -> Result<(), FetchError>;

    /// Reads title, text, and description from the loaded page
    async fn extract_document(&self, surface: &Surface) -> Result<ExtractedPage, FetchError>;

    /// Returns same-origin, non-binary, fragment-free links from the loaded page
    ///
    /// Order follows the document; duplicates are removed.
    async fn extract_links(&self, surface: &Surface) -> Result<Vec<Url>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use hermes::config::UserAgentConfig;
/// use hermes::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "Hermes".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/bot".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP and parses them with `scraper`
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn loaded<'a>(&self, surface: &'a Surface) -> Result<(&'a Url, &'a str), FetchError> {
        match (surface.current_url(), surface.body()) {
            (Some(url), Some(body)) => Ok((url, body)),
            _ => Err(FetchError::NothingLoaded),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn navigate(&self, surface: &mut Surface, url: &Url) -> Result<(), FetchError> {
        surface.clear();

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Navigation {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html_content_type(&content_type) {
            return Err(FetchError::NotHtml {
                url: url.to_string(),
                content_type,
            });
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        surface.load(final_url, body);
        Ok(())
    }

    async fn extract_document(&self, surface: &Surface) -> Result<ExtractedPage, FetchError> {
        let (url, body) = self.loaded(surface)?;
        let parsed = parse_html(body, url);

        Ok(ExtractedPage {
            url: url.to_string(),
            title: parsed.title.unwrap_or_default(),
            content: parsed.text,
            description: parsed.description.unwrap_or_default(),
            timestamp: Utc::now(),
        })
    }

    async fn extract_links(&self, surface: &Surface) -> Result<Vec<Url>, FetchError> {
        let (url, body) = self.loaded(surface)?;
        let parsed = parse_html(body, url);

        let mut links: Vec<Url> = Vec::new();
        for href in &parsed.links {
            if let Some(link) = crawlable_link(href, url, url) {
                if !links.contains(&link) {
                    links.push(link);
                }
            }
        }

        Ok(links)
    }
}

/// Missing content types are given the benefit of the doubt
fn is_html_content_type(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.is_empty() || lower.contains("text/html") || lower.contains("application/xhtml+xml")
}

fn classify_request_error(url: &Url, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else {
        error.to_string()
    };

    FetchError::Navigation {
        url: url.to_string(),
        message,
    }
}
