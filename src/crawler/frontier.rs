//! Crawl frontier: what remains to visit
//!
//! The frontier is a FIFO queue of pending tasks plus the set of every URL it has
//! ever accepted. A URL is marked visited the moment it is accepted, so it can be
//! queued at most once per crawl even if its fetch later fails. Tasks deeper than
//! the configured maximum are rejected. Rejections are routine and silent.

use std::collections::{HashSet, VecDeque};

/// A unit of crawl work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTask {
    /// Absolute URL, compared by exact string equality
    pub url: String,

    /// Link hops from a seed (seeds are depth 0)
    pub depth: u32,

    /// The page this URL was discovered on, if any
    pub parent_url: Option<String>,
}

impl UrlTask {
    /// Creates a depth-0 task for a seed URL
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            parent_url: None,
        }
    }

    /// Creates the task for a link found while processing this task
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: self.depth.saturating_add(1),
            parent_url: Some(self.url.clone()),
        }
    }
}

/// Result of offering a task to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Task was queued and its URL marked visited
    Accepted,
    /// Task depth exceeds the frontier's maximum depth
    TooDeep,
    /// URL was already accepted earlier in the crawl
    Duplicate,
}

impl AddOutcome {
    /// Returns true if the task was queued
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Pending and visited URL state for one crawl run
#[derive(Debug)]
pub struct Frontier {
    pending: VecDeque<UrlTask>,
    visited: HashSet<String>,
    max_depth: u32,
}

impl Frontier {
    /// Creates an empty frontier that accepts tasks up to `max_depth`
    pub fn new(max_depth: u32) -> Self {
        Self {
            pending: VecDeque::new(),
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Offers a task to the frontier
    ///
    /// The task is queued only if its depth is within bounds and its URL has never
    /// been accepted before.
    pub fn add(&mut self, task: UrlTask) -> AddOutcome {
        if task.depth > self.max_depth {
            tracing::trace!("Rejected {} at depth {}: too deep", task.url, task.depth);
            return AddOutcome::TooDeep;
        }

        if !self.visited.insert(task.url.clone()) {
            tracing::trace!("Rejected {}: already seen", task.url);
            return AddOutcome::Duplicate;
        }

        self.pending.push_back(task);
        AddOutcome::Accepted
    }

    /// Removes and returns the oldest pending task
    pub fn next(&mut self) -> Option<UrlTask> {
        self.pending.pop_front()
    }

    /// Returns whether no tasks are pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the number of pending tasks
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of URLs ever accepted
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns whether a URL has been accepted at some point in this crawl
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
