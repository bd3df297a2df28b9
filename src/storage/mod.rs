//! Storage module for persisting indexed data
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Document persistence, keyed by normalized URL
//! - The domain registry and its page counts
//! - Chat history
//! - Persisted crawl settings

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::document::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub domain: String,
    pub added_at: DateTime<Utc>,
    pub last_crawled: Option<DateTime<Utc>>,

    /// Number of stored documents for this domain
    pub page_count: u64,
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// A chat message about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sources: Vec<Source>,
    pub domain: Option<String>,
}

impl NewChatMessage {
    pub fn user(question: impl Into<String>, domain: Option<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: question.into(),
            sources: Vec::new(),
            domain,
        }
    }

    pub fn assistant(answer: impl Into<String>, sources: Vec<Source>, domain: Option<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: answer.into(),
            sources,
            domain,
        }
    }
}

/// A stored chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub role: ChatRole,
    pub content: String,
    pub sources: Vec<Source>,
    pub domain: Option<String>,
    pub created_at: DateTime<Utc>,
}
