//! URL handling module for Hermes
//!
//! This module provides URL normalization (document identity), host and origin
//! extraction, and the filter deciding which discovered links may enter a crawl
//! frontier.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, origin_key, same_origin};
pub use filter::{crawlable_link, is_binary_path, BINARY_EXTENSIONS};
pub use normalize::normalize_url;
