//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates a single bounded,
//! same-origin, breadth-first crawl:
//! - Validating the request and the start URL's robots.txt verdict
//! - Managing the frontier queue
//! - Driving the page fetcher for navigation and extraction
//! - Filtering and enqueuing discovered links
//! - Reporting progress

use crate::crawler::fetcher::{PageFetcher, Surface};
use crate::crawler::frontier::Frontier;
use crate::crawler::progress::{CrawlProgress, ProgressSink};
use crate::crawler::{CrawlError, FetchError};
use crate::document::Document;
use crate::robots::{effective_delay, RobotsCache, RobotsRuleset};
use crate::url::{crawlable_link, extract_host, normalize_url, same_origin};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default time allowed for a single navigation
const DEFAULT_PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameters for one crawl
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Where the crawl starts; also fixes the origin
    pub start_url: Url,

    /// Upper bound on collected documents
    pub max_pages: usize,

    /// Settle time after each navigation
    pub delay: Duration,

    /// Whether robots.txt is consulted at all
    pub respect_robots: bool,
}

/// A page the crawl gave up on
#[derive(Debug, Clone, PartialEq)]
pub struct PageFailure {
    pub url: String,
    pub error: String,
}

/// What a crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Host of the start URL; every document carries it as its domain
    pub origin_host: String,

    /// Collected documents in visit order
    pub documents: Vec<Document>,

    pub document_count: usize,

    /// The page budget the crawl ran with
    pub max_pages: usize,

    /// Delay actually used, after any robots.txt override
    pub delay: Duration,

    /// Pages that were dequeued but produced no document
    pub failures: Vec<PageFailure>,
}

/// A successfully visited page
struct PageVisit {
    final_url: Url,
    document: Document,
    links: Vec<Url>,
}

/// Runs crawls with a page fetcher and a robots.txt cache
pub struct Crawler<F: PageFetcher> {
    fetcher: F,
    robots: RobotsCache,
    page_load_timeout: Duration,
}

impl<F: PageFetcher> Crawler<F> {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Loads and extracts pages
    /// * `robots` - Shared robots.txt cache, consulted when a request asks for it
    pub fn new(fetcher: F, robots: RobotsCache) -> Self {
        Self {
            fetcher,
            robots,
            page_load_timeout: DEFAULT_PAGE_LOAD_TIMEOUT,
        }
    }

    /// Overrides the per-navigation timeout
    pub fn with_page_load_timeout(mut self, timeout: Duration) -> Self {
        self.page_load_timeout = timeout;
        self
    }

    pub fn robots(&self) -> &RobotsCache {
        &self.robots
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawls one site breadth-first and returns the collected documents
    ///
    /// The surface is borrowed exclusively for the whole crawl. Per-page
    /// failures are recorded in the outcome and never abort the crawl.
    ///
    /// # Errors
    ///
    /// * `CrawlError::InvalidStartUrl` - Start URL is not http(s) or has no host
    /// * `CrawlError::InvalidBudget` - `max_pages` is zero
    /// * `CrawlError::PolicyBlocked` - robots.txt disallows the start URL
    pub async fn crawl(
        &self,
        surface: &mut Surface,
        request: CrawlRequest,
        progress: &ProgressSink,
    ) -> Result<CrawlOutcome, CrawlError> {
        if request.max_pages < 1 {
            return Err(CrawlError::InvalidBudget(request.max_pages));
        }

        let start = normalize_url(request.start_url.as_str())
            .map_err(|e| CrawlError::InvalidStartUrl(format!("{}: {}", request.start_url, e)))?;
        let origin_host = extract_host(&start)
            .map_err(|e| CrawlError::InvalidStartUrl(format!("{}: {}", start, e)))?;

        let mut delay = request.delay;
        let ruleset = if request.respect_robots {
            let ruleset = self.check_start_url(&start).await?;
            delay = effective_delay(delay, &ruleset);
            if let Some(ms) = ruleset.crawl_delay_ms {
                tracing::info!("robots.txt sets crawl delay of {}ms for {}", ms, origin_host);
            }
            Some(ruleset)
        } else {
            None
        };

        tracing::info!(
            "Starting crawl of {} (max {} pages, {}ms delay)",
            start,
            request.max_pages,
            delay.as_millis()
        );

        let mut frontier = Frontier::new(start.clone());
        let mut documents: Vec<Document> = Vec::new();
        let mut failures: Vec<PageFailure> = Vec::new();

        while documents.len() < request.max_pages {
            let Some(url) = frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if !frontier.mark_visited(&url) {
                continue;
            }

            if let Some(ruleset) = &ruleset {
                let verdict = ruleset.is_allowed(url.as_str());
                if !verdict.allowed {
                    tracing::debug!("URL {} disallowed by robots.txt, skipping", url);
                    continue;
                }
            }

            progress.emit(CrawlProgress {
                current: documents.len() + 1,
                total: request.max_pages.min(documents.len() + frontier.len() + 1),
                current_url: url.to_string(),
            });

            let visit = match self.visit(surface, &url, delay, &origin_host).await {
                Ok(visit) => visit,
                Err(e) => {
                    tracing::warn!("Failed to crawl {}: {}", url, e);
                    failures.push(PageFailure {
                        url: url.to_string(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if visit.final_url != url {
                if !same_origin(&visit.final_url, &start) {
                    tracing::warn!("{} redirected off-origin to {}", url, visit.final_url);
                    failures.push(PageFailure {
                        url: url.to_string(),
                        error: format!("redirected off-origin to {}", visit.final_url),
                    });
                    continue;
                }
                if !frontier.mark_visited(&visit.final_url) {
                    tracing::debug!("{} redirected to already visited {}", url, visit.final_url);
                    continue;
                }
            }

            let mut added = 0;
            for link in &visit.links {
                if let Some(link) = crawlable_link(link.as_str(), &visit.final_url, &start) {
                    if frontier.enqueue(link) {
                        added += 1;
                    }
                }
            }
            tracing::debug!(
                "Found {} links on {}, {} new",
                visit.links.len(),
                visit.final_url,
                added
            );

            documents.push(visit.document);
            tracing::info!(
                "Crawled {} ({}/{})",
                visit.final_url,
                documents.len(),
                request.max_pages
            );
        }

        tracing::info!(
            "Crawl of {} finished: {} pages collected, {} failed, {} visited",
            origin_host,
            documents.len(),
            failures.len(),
            frontier.visited_count()
        );

        Ok(CrawlOutcome {
            origin_host,
            document_count: documents.len(),
            documents,
            max_pages: request.max_pages,
            delay,
            failures,
        })
    }

    /// Resolves robots.txt for the origin and refuses a disallowed start URL
    async fn check_start_url(&self, start: &Url) -> Result<Arc<RobotsRuleset>, CrawlError> {
        let ruleset = self.robots.resolve(start).await;
        let verdict = ruleset.is_allowed(start.as_str());

        if !verdict.allowed {
            tracing::info!("URL {} disallowed by robots.txt", start);
            return Err(CrawlError::PolicyBlocked {
                url: start.to_string(),
                pattern: verdict.matched_pattern.unwrap_or_default(),
            });
        }

        tracing::debug!("robots.txt verdict for {}: {}", start, verdict.reason);
        Ok(ruleset)
    }

    /// Navigates, waits for the page to settle, and extracts it
    async fn visit(
        &self,
        surface: &mut Surface,
        url: &Url,
        delay: Duration,
        origin_host: &str,
    ) -> Result<PageVisit, FetchError> {
        match tokio::time::timeout(self.page_load_timeout, self.fetcher.navigate(surface, url))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetchError::NavigationTimeout {
                    url: url.to_string(),
                    timeout: self.page_load_timeout,
                })
            }
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let page = self.fetcher.extract_document(surface).await?;

        let links = match self.fetcher.extract_links(surface).await {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("Failed to extract links from {}: {}", url, e);
                Vec::new()
            }
        };

        let final_url = normalize_url(&page.url).unwrap_or_else(|_| url.clone());

        let document = Document {
            url: final_url.to_string(),
            title: page.title,
            content: page.content,
            description: page.description,
            domain: origin_host.to_string(),
            fetched_at: page.timestamp,
        };

        Ok(PageVisit {
            final_url,
            document,
            links,
        })
    }
}
