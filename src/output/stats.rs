//! Statistics generation from the index database
//!
//! This module provides functionality for extracting and displaying
//! index statistics from the storage layer.

use crate::storage::{DomainRecord, Storage};
use crate::HermesError;
use serde::Serialize;

/// Index statistics summary
#[derive(Debug, Clone, Serialize)]
pub struct IndexStatistics {
    /// Total number of stored documents
    pub total_documents: u64,

    /// Number of registered domains
    pub total_domains: u64,

    /// Whether an answering API key is available
    pub has_api_key: bool,

    /// Per-domain page counts and crawl times
    pub domains: Vec<DomainRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `has_api_key` - Whether the answering model can be reached
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(HermesError)` - Failed to query statistics
pub fn load_statistics(
    storage: &dyn Storage,
    has_api_key: bool,
) -> Result<IndexStatistics, HermesError> {
    Ok(IndexStatistics {
        total_documents: storage.count_documents()?,
        total_domains: storage.count_domains()?,
        has_api_key,
        domains: storage.get_domains()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &IndexStatistics) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Pages indexed: {}", stats.total_documents);
    println!("  Domains: {}", stats.total_domains);
    println!(
        "  API key: {}",
        if stats.has_api_key { "configured" } else { "missing" }
    );
    println!();

    if !stats.domains.is_empty() {
        print_domains(&stats.domains);
    }
}

/// Prints one line per domain, largest first
pub fn print_domains(domains: &[DomainRecord]) {
    let mut sorted: Vec<&DomainRecord> = domains.iter().collect();
    sorted.sort_by(|a, b| b.page_count.cmp(&a.page_count));

    println!("Domains ({}):", sorted.len());
    for domain in sorted {
        let last_crawled = domain
            .last_crawled
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  {} - {} pages (last crawled {})",
            domain.domain, domain.page_count, last_crawled
        );
    }
    println!();
}
