//! Configuration module for Hermes
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use hermes::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hermes.toml")).unwrap();
//! println!("Crawls stop after {} pages", config.crawler.max_pages_per_crawl);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AnsweringConfig, Config, CrawlSettings, CrawlerConfig, RetrievalConfig, StorageConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate_settings;
