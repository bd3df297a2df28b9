//! Breadth-first crawl frontier
//!
//! Tracks the FIFO queue of URLs still to visit together with the set of
//! URLs already visited. URLs are keyed by their normalized string form, so
//! callers are expected to pass URLs that went through
//! [`normalize_url`](crate::url::normalize_url).

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Per-crawl queue and visited set
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be visited, in discovery order
    queue: VecDeque<Url>,

    /// Mirror of `queue` for constant-time membership checks
    queued: HashSet<String>,

    /// URLs that have been taken off the queue
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with the start URL
    pub fn new(start: Url) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(start);
        frontier
    }

    /// Appends a URL unless it has been visited or is already waiting
    ///
    /// # Returns
    ///
    /// `true` if the URL was added
    pub fn enqueue(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }

        self.queued.insert(key.to_string());
        self.queue.push_back(url);
        true
    }

    /// Takes the oldest waiting URL
    pub fn pop(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.queued.remove(url.as_str());
        Some(url)
    }

    /// Records a URL as visited
    ///
    /// # Returns
    ///
    /// `false` if it had already been visited
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Number of URLs waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
