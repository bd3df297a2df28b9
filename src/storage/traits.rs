//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::config::CrawlSettings;
use crate::document::Document;
use crate::storage::{ChatMessage, DomainRecord, NewChatMessage};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The crawler and the retrieval engine never touch storage directly; the
/// application layer persists crawl output and loads retrieval input here.
pub trait Storage {
    // ===== Documents =====

    /// Inserts or replaces a document, keyed by URL
    ///
    /// The document's domain is registered if needed, and its page count and
    /// last-crawled time are refreshed.
    fn put_document(&mut self, document: &Document) -> StorageResult<()>;

    /// Stores many documents in one transaction
    ///
    /// # Returns
    ///
    /// The number of documents written
    fn put_documents(&mut self, documents: &[Document]) -> StorageResult<usize>;

    /// Gets a document by URL
    fn get_document(&self, url: &str) -> StorageResult<Option<Document>>;

    /// Gets documents in the order they were last stored
    ///
    /// # Arguments
    ///
    /// * `domain` - When set, only documents from this domain
    fn get_documents(&self, domain: Option<&str>) -> StorageResult<Vec<Document>>;

    /// Counts all stored documents
    fn count_documents(&self) -> StorageResult<u64>;

    // ===== Domains =====

    /// Registers a domain, or refreshes its last-crawled time if known
    fn add_domain(&mut self, domain: &str) -> StorageResult<()>;

    /// Gets all registered domains, oldest first
    fn get_domains(&self) -> StorageResult<Vec<DomainRecord>>;

    /// Removes a domain and all of its documents
    ///
    /// # Returns
    ///
    /// The number of documents removed, or `StorageError::NotFound` if the
    /// domain is unknown
    fn remove_domain(&mut self, domain: &str) -> StorageResult<u64>;

    /// Counts registered domains
    fn count_domains(&self) -> StorageResult<u64>;

    /// Removes every document and domain; settings and chat history stay
    fn clear_all(&mut self) -> StorageResult<()>;

    // ===== Chat History =====

    /// Appends a message to the chat history
    ///
    /// # Returns
    ///
    /// The ID of the new message
    fn add_chat_message(&mut self, message: &NewChatMessage) -> StorageResult<i64>;

    /// Gets the whole chat history, oldest first
    fn get_chat_history(&self) -> StorageResult<Vec<ChatMessage>>;

    /// Deletes the chat history
    fn clear_chat_history(&mut self) -> StorageResult<()>;

    // ===== Settings =====

    /// Gets persisted crawl settings, if any were saved
    fn get_settings(&self) -> StorageResult<Option<CrawlSettings>>;

    /// Saves crawl settings, replacing any previous ones
    fn update_settings(&mut self, settings: &CrawlSettings) -> StorageResult<()>;
}
