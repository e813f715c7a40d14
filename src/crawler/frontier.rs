//! Crawl frontier: pending FIFO queue plus visited set
//!
//! FIFO order makes the traversal breadth-first. A URL is accepted into the
//! queue only if it has not been visited and is not already waiting, so no URL
//! is ever pending twice, and the visited set only grows.

use std::collections::{HashSet, VecDeque};

/// Pending queue and visited set of a crawl session
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs awaiting processing, oldest first
    pending: VecDeque<String>,

    /// Mirror of `pending` for constant-time membership checks
    queued: HashSet<String>,

    /// URLs already dequeued and processed
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` unless it was visited or is already pending
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Removes and returns the oldest pending URL
    pub fn dequeue(&mut self) -> Option<String> {
        let url = self.pending.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Marks `url` as visited; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    /// Returns whether the pending queue is empty
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
