use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Output of a single page fetch.
///
/// An empty `links` list means either the page had no same-origin links or the
/// fetch failed. The crawl engine treats both the same way; `error` only feeds
/// logging and round statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub links: Vec<String>,
    pub error: Option<String>,
}

impl PageResult {
    /// Builds a result, dropping repeated links while keeping first-seen order.
    pub fn new(url: String, links: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let links = links
            .into_iter()
            .filter(|link| seen.insert(link.clone()))
            .collect();

        Self {
            url,
            links,
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            url,
            links: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Statistics for one completed crawl round, reported after the merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// 1-based round number.
    pub round: usize,
    /// Fetch tasks spawned this round.
    pub dispatched: usize,
    /// Results received before the barrier released.
    pub collected: usize,
    /// Collected results that carried a fetch error.
    pub failed: usize,
    /// Distinct URLs known after the merge.
    pub visited: usize,
    /// URLs queued for the next round.
    pub next_frontier: usize,
}
