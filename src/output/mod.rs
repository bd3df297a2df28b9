//! Output module for human-readable reports
//!
//! This module handles:
//! - Index statistics
//! - Crawl summaries
//! - Answers with their sources
//! - Chat history

pub mod stats;

pub use stats::{load_statistics, print_domains, print_statistics, IndexStatistics};

use crate::answer::Answer;
use crate::crawler::CrawlOutcome;
use crate::storage::{ChatMessage, ChatRole};

/// Prints how many pages a crawl collected versus its budget
pub fn print_crawl_summary(outcome: &CrawlOutcome) {
    println!("=== Crawl Summary ===\n");
    println!("  Domain: {}", outcome.origin_host);
    println!(
        "  Pages collected: {} of {} requested",
        outcome.document_count, outcome.max_pages
    );
    println!("  Delay per page: {}ms", outcome.delay.as_millis());

    if !outcome.failures.is_empty() {
        println!();
        println!("Failed pages ({}):", outcome.failures.len());
        for failure in &outcome.failures {
            println!("  - {}: {}", failure.url, failure.error);
        }
    }
    println!();
}

/// Prints an answer followed by its numbered sources
pub fn print_answer(answer: &Answer) {
    println!("{}\n", answer.answer);

    println!("Sources ({}):", answer.sources.len());
    for (i, source) in answer.sources.iter().enumerate() {
        let title = if source.title.is_empty() {
            &source.url
        } else {
            &source.title
        };
        println!("  [{}] {} - {}", i + 1, title, source.url);
    }
}

/// Prints the chat history, oldest first
pub fn print_history(messages: &[ChatMessage]) {
    if messages.is_empty() {
        println!("No chat history.");
        return;
    }

    for message in messages {
        let speaker = match message.role {
            ChatRole::User => "You",
            ChatRole::Assistant => "Hermes",
        };
        let scope = message
            .domain
            .as_deref()
            .map(|d| format!(" [{}]", d))
            .unwrap_or_default();

        println!(
            "{} {}{}: {}",
            message.created_at.format("%Y-%m-%d %H:%M"),
            speaker,
            scope,
            message.content
        );
        for source in &message.sources {
            println!("    - {}", source.url);
        }
    }
}
