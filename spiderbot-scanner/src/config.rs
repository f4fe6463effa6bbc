use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_ROOT_URL: &str = "https://monzo.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
/// Non-positive depth means the crawl runs until the frontier is empty.
pub const DEFAULT_MAX_DEPTH: i64 = -1;
pub const DEFAULT_MAX_URLS_PER_ROUND: i64 = 0;

/// Settings for one crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlConfig {
    pub root_url: String,
    pub timeout_secs: u64,
    /// Rounds beyond the root, `<= 0` for unlimited.
    pub max_depth: i64,
    /// Frontier cap per round, `<= 0` for unbounded.
    pub max_urls_per_round: i64,
}

impl CrawlConfig {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_depth: DEFAULT_MAX_DEPTH,
            max_urls_per_round: DEFAULT_MAX_URLS_PER_ROUND,
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_max_depth(mut self, max_depth: i64) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_urls_per_round(mut self, max_urls_per_round: i64) -> Self {
        self.max_urls_per_round = max_urls_per_round;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn depth_limit(&self) -> Option<usize> {
        positive_limit(self.max_depth)
    }

    pub fn round_limit(&self) -> Option<usize> {
        positive_limit(self.max_urls_per_round)
    }

    pub fn root(&self) -> Result<Url> {
        parse_root(&self.root_url)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_URL)
    }
}

/// Parses a crawl root. It must be an absolute URL with a host that relative paths
/// can be joined onto.
pub fn parse_root(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ScanError::InvalidUrl(format!(
            "{}: not an absolute URL with a host",
            raw
        )));
    }

    Ok(url)
}

pub(crate) fn positive_limit(value: i64) -> Option<usize> {
    usize::try_from(value).ok().filter(|limit| *limit > 0)
}
