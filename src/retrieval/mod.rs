//! Retrieval and context engine
//!
//! Ranks an in-memory corpus snapshot against a question and renders the
//! winners as a size-bounded context block. Everything here is synchronous
//! and pure; callers load the snapshot from storage first.

mod context;
mod scorer;
mod tokenizer;

pub use context::{build_context, DEFAULT_CHARS_PER_DOCUMENT, TRUNCATION_MARKER};
pub use scorer::{score_document, search, Ranker, ScoredDocument, ScoringWeights};
pub use tokenizer::{is_stop_word, keywords, STOP_WORDS};

use crate::document::Document;
use thiserror::Error;

/// Why retrieval produced nothing usable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("No pages indexed{}. Please index some pages first.", scope(.domain))]
    EmptyCorpus { domain: Option<String> },

    #[error("The question is empty")]
    NoKeywords,

    #[error("No relevant pages found. Try a different question or index more pages.")]
    NoRelevantDocuments,
}

fn scope(domain: &Option<String>) -> String {
    domain
        .as_ref()
        .map(|d| format!(" for {}", d))
        .unwrap_or_default()
}

/// Runs a search and turns empty outcomes into errors
///
/// A blank question is rejected outright. A question made only of stop
/// words still goes through the recency fallback.
pub fn retrieve(
    ranker: &Ranker,
    question: &str,
    documents: &[Document],
    limit: usize,
    domain: Option<&str>,
) -> Result<Vec<Document>, RetrievalError> {
    if question.trim().is_empty() {
        return Err(RetrievalError::NoKeywords);
    }

    let pool_is_empty = !documents
        .iter()
        .any(|doc| domain.map_or(true, |d| doc.domain == d));
    if pool_is_empty {
        return Err(RetrievalError::EmptyCorpus {
            domain: domain.map(str::to_string),
        });
    }

    let results = ranker.search(question, documents, limit, domain);
    if results.is_empty() {
        return Err(RetrievalError::NoRelevantDocuments);
    }

    Ok(results)
}
