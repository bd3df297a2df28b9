//! Shared document types
//!
//! A [`Document`] is the unit the crawler produces, the store persists, and the
//! retrieval engine ranks. Its identity is the normalized absolute URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indexed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Normalized absolute URL (identity key)
    pub url: String,

    /// Page title, possibly empty
    pub title: String,

    /// Readable text content of the page
    pub content: String,

    /// `<meta name="description">` content, possibly empty
    pub description: String,

    /// Hostname the page was fetched from
    pub domain: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl Document {
    /// Returns the citation tuple for this document
    pub fn source(&self) -> Source {
        Source {
            url: self.url.clone(),
            title: self.title.clone(),
            domain: self.domain.clone(),
        }
    }
}

/// Citation for a document that contributed to an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub title: String,
    pub domain: String,
}
