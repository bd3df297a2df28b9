//! Crawler module for same-origin site indexing
//!
//! This module contains the crawl orchestration logic, including:
//! - The page fetcher capability and its HTTP implementation
//! - HTML parsing for readable text, metadata, and links
//! - The breadth-first frontier with URL deduplication
//! - Progress reporting over a channel
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod progress;

pub use coordinator::{CrawlOutcome, CrawlRequest, Crawler, PageFailure};
pub use fetcher::{build_http_client, ExtractedPage, HttpPageFetcher, PageFetcher, Surface};
pub use frontier::Frontier;
pub use parser::{parse_html, ParsedPage};
pub use progress::{progress_channel, CrawlProgress, ProgressSink};

use std::time::Duration;
use thiserror::Error;

/// Errors that abort a whole crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("robots.txt disallows {url} (matched pattern '{pattern}')")]
    PolicyBlocked { url: String, pattern: String },

    #[error("Invalid start URL: {0}")]
    InvalidStartUrl(String),

    #[error("max_pages must be at least 1, got {0}")]
    InvalidBudget(usize),
}

/// Errors for a single page; the crawl records them and moves on
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Expected HTML from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },

    #[error("Could not extract content from {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("No page is loaded on the surface")]
    NothingLoaded,
}
