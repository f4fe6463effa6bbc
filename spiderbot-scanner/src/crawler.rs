use crate::config::{CrawlConfig, parse_root, positive_limit};
use crate::error::Result;
use crate::fetch::{Fetch, HttpFetcher};
use crate::result::{PageResult, RoundSummary};
use crate::sitemap::Sitemap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

/// Called with `(round, url)` every time a fetch task is dispatched.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;
/// Called once per round after its results have been merged.
pub type RoundCallback = Arc<dyn Fn(RoundSummary) + Send + Sync>;

/// Breadth-first, same-origin crawler.
///
/// Each round spawns one task per frontier URL, waits for every task to report, and
/// only then merges the results into the sitemap. Links discovered during a round are
/// fetched in the next one.
pub struct Crawler<F = HttpFetcher> {
    root: Url,
    fetcher: Arc<F>,
    max_depth: Option<usize>,
    max_urls_per_round: Option<usize>,
    progress_callback: Option<ProgressCallback>,
    round_callback: Option<RoundCallback>,
}

impl Crawler<HttpFetcher> {
    /// Builds a crawler that fetches over HTTP with the configured timeout.
    pub fn from_config(config: &CrawlConfig) -> Result<Self> {
        let root = config.root()?;
        let fetcher = HttpFetcher::new(&root, config.timeout())?;

        Ok(Self::with_root(root, fetcher)
            .with_max_depth(config.max_depth)
            .with_max_urls_per_round(config.max_urls_per_round))
    }
}

impl<F: Fetch> Crawler<F> {
    pub fn new(root_url: &str, fetcher: F) -> Result<Self> {
        let root = parse_root(root_url)?;
        Ok(Self::with_root(root, fetcher))
    }

    fn with_root(root: Url, fetcher: F) -> Self {
        Self {
            root,
            fetcher: Arc::new(fetcher),
            max_depth: None,
            max_urls_per_round: None,
            progress_callback: None,
            round_callback: None,
        }
    }

    /// Non-positive values mean unlimited.
    ///
    /// With a limit of `n` the crawler runs `n + 1` rounds: pages up to `n` hops from
    /// the root are fetched and pages `n + 1` hops away are recorded but not fetched.
    pub fn with_max_depth(mut self, depth: i64) -> Self {
        self.max_depth = positive_limit(depth);
        self
    }

    /// Caps how many frontier URLs are fetched per round. Non-positive values mean
    /// unbounded. URLs cut from a round stay in the sitemap but are never fetched.
    pub fn with_max_urls_per_round(mut self, limit: i64) -> Self {
        self.max_urls_per_round = positive_limit(limit);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_round_callback(mut self, callback: RoundCallback) -> Self {
        self.round_callback = Some(callback);
        self
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Crawls from the root and returns the sitemap. Page failures never abort the crawl.
    pub async fn crawl(&self) -> Sitemap {
        let root = self.root.to_string();
        info!("Starting crawl of {}", root);

        let mut sitemap = Sitemap::new(root.clone());
        let mut frontier = vec![root];
        let mut depth = 0;

        while !frontier.is_empty() {
            if let Some(max_depth) = self.max_depth
                && depth > max_depth
            {
                info!(
                    "Reached max depth {}, leaving {} URLs unvisited",
                    max_depth,
                    frontier.len()
                );
                break;
            }
            depth += 1;

            if let Some(limit) = self.max_urls_per_round
                && frontier.len() > limit
            {
                debug!(
                    "Round {}: dropping {} URLs over the per-round limit",
                    depth,
                    frontier.len() - limit
                );
                frontier.truncate(limit);
            }

            let dispatched = frontier.len();
            info!("Round {}: going to visit {} URLs", depth, dispatched);
            let mut results = self.dispatch(depth, &mut frontier);

            let mut collected = 0;
            let mut failed = 0;
            while collected < dispatched {
                let Some(page) = results.recv().await else {
                    warn!(
                        "Round {}: {} fetch tasks ended without reporting",
                        depth,
                        dispatched - collected
                    );
                    break;
                };
                collected += 1;
                if page.is_failure() {
                    failed += 1;
                }
                merge(&mut sitemap, &mut frontier, page, depth);
            }

            let summary = RoundSummary {
                round: depth,
                dispatched,
                collected,
                failed,
                visited: sitemap.len(),
                next_frontier: frontier.len(),
            };
            info!(
                "Round {}: visited {}, to visit {}, failed {}",
                summary.round, summary.visited, summary.next_frontier, summary.failed
            );
            if let Some(ref callback) = self.round_callback {
                callback(summary);
            }
        }

        info!(
            "Crawl complete. {} pages, {} links",
            sitemap.len(),
            sitemap.link_count()
        );
        sitemap
    }

    /// Spawns one fetch task per frontier URL and leaves the frontier empty, so
    /// discoveries from this round land in the next one.
    fn dispatch(
        &self,
        round: usize,
        frontier: &mut Vec<String>,
    ) -> mpsc::UnboundedReceiver<PageResult> {
        let (tx, rx) = mpsc::unbounded_channel();

        for url in frontier.drain(..) {
            if let Some(ref callback) = self.progress_callback {
                callback(round, url.clone());
            }

            let fetcher = Arc::clone(&self.fetcher);
            let tx = tx.clone();
            tokio::spawn(async move {
                let page = fetcher.fetch(url).await;
                // The receiver lives until the round has collected every result
                let _ = tx.send(page);
            });
        }

        rx
    }
}

/// Folds one page's links into the sitemap, queueing pages seen for the first time.
fn merge(sitemap: &mut Sitemap, frontier: &mut Vec<String>, page: PageResult, round: usize) {
    if !sitemap.contains(&page.url) {
        debug!("Ignoring result for unknown page {}", page.url);
        return;
    }

    for link in page.links {
        if sitemap.insert(&link, round) {
            frontier.push(link.clone());
        }
        sitemap.add_link(&page.url, &link);
    }
}
