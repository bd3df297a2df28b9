//! Crawl progress reporting
//!
//! The crawler pushes a [`CrawlProgress`] event before each page visit. Events
//! travel over a bounded tokio channel; a slow or absent listener never stalls
//! the crawl, it just misses events.

use tokio::sync::mpsc;
use tracing::trace;

/// A single progress event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlProgress {
    /// 1-based index of the page about to be visited
    pub current: usize,

    /// Best current estimate of pages this crawl will visit
    pub total: usize,

    /// URL about to be visited
    pub current_url: String,
}

/// Sending half of a progress channel
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    sender: Option<mpsc::Sender<CrawlProgress>>,
}

impl ProgressSink {
    /// A sink that discards every event
    pub fn none() -> Self {
        Self { sender: None }
    }

    /// Sends an event without waiting
    pub fn emit(&self, progress: CrawlProgress) {
        if let Some(sender) = &self.sender {
            if let Err(e) = sender.try_send(progress) {
                trace!("Dropped progress event: {}", e);
            }
        }
    }
}

/// Creates a connected sink and receiver
pub fn progress_channel(capacity: usize) -> (ProgressSink, mpsc::Receiver<CrawlProgress>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        ProgressSink {
            sender: Some(sender),
        },
        receiver,
    )
}
