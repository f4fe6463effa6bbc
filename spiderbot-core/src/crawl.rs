use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use spiderbot_scanner::config::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_URLS_PER_ROUND, DEFAULT_ROOT_URL, DEFAULT_TIMEOUT_SECS,
};
use spiderbot_scanner::{CrawlConfig, Crawler, RoundSummary, ScanError, Sitemap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tracing::info;
use url::Url;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub timeout_secs: u64,
    pub max_depth: i64,
    pub max_urls_per_round: i64,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::new(self.url.clone())
            .with_timeout_secs(self.timeout_secs)
            .with_max_depth(self.max_depth)
            .with_max_urls_per_round(self.max_urls_per_round)
    }
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_ROOT_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_depth: DEFAULT_MAX_DEPTH,
            max_urls_per_round: DEFAULT_MAX_URLS_PER_ROUND,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Everything a finished crawl produced.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub config: CrawlConfig,
    pub sitemap: Sitemap,
    pub rounds: Vec<RoundSummary>,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options.
///
/// Only a malformed root URL (or an HTTP client that cannot be built) is an error;
/// unreachable pages just end up without links in the sitemap.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome, ScanError> {
    let config = options.to_config();

    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    // Counter for tracking dispatched fetches
    let dispatched_count = Arc::new(AtomicUsize::new(0));

    let count_clone = dispatched_count.clone();
    let pb_clone = progress_bar.clone();
    let internal_progress_callback: spiderbot_scanner::ProgressCallback =
        Arc::new(move |round: usize, url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!(
                    "Round {}: {} URLs dispatched, last {}",
                    round,
                    count,
                    extract_url_path(&url)
                ));
            }
        });

    let rounds: Arc<StdMutex<Vec<RoundSummary>>> = Arc::new(StdMutex::new(Vec::new()));
    let rounds_clone = rounds.clone();
    let pb_clone = progress_bar.clone();
    let round_callback: spiderbot_scanner::RoundCallback =
        Arc::new(move |summary: RoundSummary| {
            let message = format!(
                "Round {} done: {} pages known, {} queued",
                summary.round, summary.visited, summary.next_frontier
            );
            if let Some(ref pb) = pb_clone {
                pb.set_message(message.clone());
            }
            if let Some(ref callback) = progress_callback {
                callback(message);
            }
            if let Ok(mut rounds) = rounds_clone.lock() {
                rounds.push(summary);
            }
        });

    let crawler = Crawler::from_config(&config)?
        .with_progress_callback(internal_progress_callback)
        .with_round_callback(round_callback);

    let started_at = Utc::now();
    let start = Instant::now();
    let sitemap = crawler.crawl().await;
    let duration = start.elapsed();

    // Finish progress bar (only if enabled)
    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Crawl complete! {} pages, {} URLs fetched",
            sitemap.len(),
            dispatched_count.load(Ordering::Relaxed)
        ));
    }
    info!(
        "Crawled {} in {:.2}s",
        config.root_url,
        duration.as_secs_f64()
    );

    let rounds = rounds
        .lock()
        .map(|mut rounds| std::mem::take(&mut *rounds))
        .unwrap_or_default();

    Ok(CrawlOutcome {
        config,
        sitemap,
        rounds,
        started_at,
        duration,
    })
}
