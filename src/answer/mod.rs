//! Answering façade
//!
//! Turns a question plus a corpus snapshot into an answer with citations:
//! retrieve the best documents, render them as context, hand context and
//! question to an [`AnsweringModel`], and pair the reply with the sources
//! that went into the context.

mod anthropic;

pub use anthropic::AnthropicModel;

use crate::config::RetrievalConfig;
use crate::document::{Document, Source};
use crate::retrieval::{build_context, retrieve, Ranker, RetrievalError, ScoringWeights};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from answering a question
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("API key not configured (set the {0} environment variable)")]
    MissingApiKey(String),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("Claude API error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP error calling answering model: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed answering model response: {0}")]
    MalformedResponse(String),
}

/// A language model that completes a single prompt
#[async_trait]
pub trait AnsweringModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AnswerError>;
}

/// An answer with the documents it was grounded on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,

    /// Citations in context order
    pub sources: Vec<Source>,

    /// Number of documents placed in the context
    pub context_used: usize,
}

/// Builds the prompt sent to the answering model
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "You are Hermes, an intelligent assistant that helps users understand website content.\n\
         \n\
         Based on the following context from indexed web pages, answer the user's question. \
         Provide a clear, helpful answer and reference the sources when relevant.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         User Question: {question}\n\
         \n\
         Please provide a helpful, accurate answer based on the context above. \
         If the answer isn't clearly in the context, say so and offer your best interpretation. \
         Always be honest about the limitations of the available information.",
        context = context,
        question = question,
    )
}

/// Answers questions over a corpus snapshot with one model
pub struct Answerer<M: AnsweringModel> {
    model: M,
    ranker: Ranker,
    limit: usize,
    context_chars: usize,
}

impl<M: AnsweringModel> Answerer<M> {
    /// Creates an answerer
    ///
    /// # Arguments
    ///
    /// * `model` - The model that writes the answer
    /// * `ranker` - Scores documents against the question
    /// * `limit` - Maximum documents placed in the context
    /// * `context_chars` - Character budget per document
    pub fn new(model: M, ranker: Ranker, limit: usize, context_chars: usize) -> Self {
        Self {
            model,
            ranker,
            limit,
            context_chars,
        }
    }

    pub fn from_config(model: M, config: &RetrievalConfig) -> Self {
        Self::new(
            model,
            Ranker::new(ScoringWeights::from(config)),
            config.limit,
            config.context_chars_per_document,
        )
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Answers `question` from `documents`, optionally restricted to one domain
    ///
    /// Retrieval failures are returned before the model is called.
    pub async fn ask(
        &self,
        question: &str,
        documents: &[Document],
        domain: Option<&str>,
    ) -> Result<Answer, AnswerError> {
        let relevant = retrieve(&self.ranker, question, documents, self.limit, domain)?;
        let context = build_context(&relevant, self.context_chars);

        tracing::info!(
            "Answering with {} source(s), {} context characters",
            relevant.len(),
            context.chars().count()
        );

        let answer = self.model.complete(&build_prompt(question, &context)).await?;

        Ok(Answer {
            answer,
            sources: relevant.iter().map(Document::source).collect(),
            context_used: relevant.len(),
        })
    }
}
