//! Keyword scoring and ranking
//!
//! Each keyword contributes three additive terms to a document's score:
//! occurrences in title + content, occurrences in the title alone, and a
//! bonus for every whitespace-delimited word that contains it. Title hits
//! therefore count twice.

use crate::config::RetrievalConfig;
use crate::document::Document;
use crate::retrieval::tokenizer::keywords;

/// Weights for the three scoring terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Per occurrence in lower-cased `title + " " + content`
    pub combined: f64,

    /// Per occurrence in the lower-cased title
    pub title: f64,

    /// Per word of the combined text containing the keyword
    pub partial: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            combined: 2.0,
            title: 5.0,
            partial: 0.5,
        }
    }
}

impl From<&RetrievalConfig> for ScoringWeights {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            combined: config.combined_weight,
            title: config.title_weight,
            partial: config.partial_weight,
        }
    }
}

/// A document paired with its score for one query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f64,
}

/// Scores one document against already-extracted keywords
pub fn score_document(document: &Document, keywords: &[String], weights: &ScoringWeights) -> f64 {
    let title = document.title.to_lowercase();
    let combined = format!("{} {}", title, document.content.to_lowercase());
    let words: Vec<&str> = combined.split_whitespace().collect();

    keywords
        .iter()
        .map(|keyword| {
            let exact = combined.matches(keyword.as_str()).count() as f64;
            let in_title = title.matches(keyword.as_str()).count() as f64;
            let partial = words.iter().filter(|w| w.contains(keyword.as_str())).count() as f64;

            exact * weights.combined + in_title * weights.title + partial * weights.partial
        })
        .sum()
}

/// Ranks documents for a query
///
/// Keeps its weights so every search in a session scores the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    weights: ScoringWeights,
}

impl Ranker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Returns up to `limit` documents, most relevant first
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text question
    /// * `documents` - Corpus snapshot, at most one document per URL
    /// * `limit` - Maximum number of documents returned
    /// * `domain` - When set, only documents from this domain are considered
    ///
    /// # Returns
    ///
    /// When the query has no keywords, the `limit` most recently fetched
    /// documents of the pool. Otherwise the documents with a positive score,
    /// sorted by descending score with ties kept in pool order.
    pub fn search(
        &self,
        query: &str,
        documents: &[Document],
        limit: usize,
        domain: Option<&str>,
    ) -> Vec<Document> {
        let pool: Vec<&Document> = documents
            .iter()
            .filter(|doc| domain.map_or(true, |d| doc.domain == d))
            .collect();

        let keywords = keywords(query);
        if keywords.is_empty() {
            tracing::debug!("No keywords in query, falling back to most recent documents");
            return most_recent(pool, limit);
        }

        let mut scored: Vec<ScoredDocument<'_>> = pool
            .into_iter()
            .map(|document| ScoredDocument {
                document,
                score: score_document(document, &keywords, &self.weights),
            })
            .filter(|scored| scored.score > 0.0)
            .collect();

        // Stable: equal scores keep pool order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(
            "Scored {} matching documents for keywords {:?}",
            scored.len(),
            keywords
        );

        scored
            .into_iter()
            .take(limit)
            .map(|scored| scored.document.clone())
            .collect()
    }
}

/// Searches with the default weights
pub fn search(
    query: &str,
    documents: &[Document],
    limit: usize,
    domain: Option<&str>,
) -> Vec<Document> {
    Ranker::default().search(query, documents, limit, domain)
}

fn most_recent(mut pool: Vec<&Document>, limit: usize) -> Vec<Document> {
    pool.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at));
    pool.into_iter().take(limit).cloned().collect()
}
