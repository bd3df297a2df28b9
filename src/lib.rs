//! Hermes: a polite site indexer with keyword retrieval
//!
//! This crate crawls a single website breadth-first while respecting robots.txt,
//! stores the readable text of each page, and answers questions over the indexed
//! corpus by ranking pages against the question and handing the best ones to a
//! language model.

pub mod answer;
pub mod app;
pub mod config;
pub mod crawler;
pub mod document;
pub mod output;
pub mod retrieval;
pub mod robots;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Hermes operations
#[derive(Debug, Error)]
pub enum HermesError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] crawler::CrawlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] retrieval::RetrievalError),

    #[error("Answering error: {0}")]
    Answer(#[from] answer::AnswerError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Hermes operations
pub type Result<T> = std::result::Result<T, HermesError>;

// Re-export commonly used types
pub use config::Config;
pub use document::{Document, Source};
pub use crate::url::{extract_host, normalize_url, origin_key};
