use crate::error::{Result, ScanError};
use crate::normalize::Normalizer;
use crate::result::PageResult;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Retrieves one page and reports the same-origin links found on it.
///
/// Implementations never fail: any problem is reported as a `PageResult` without
/// links so a single bad page cannot abort a crawl.
pub trait Fetch: Send + Sync + 'static {
    fn fetch(&self, url: String) -> impl Future<Output = PageResult> + Send;
}

/// HTTP fetcher backed by a single shared `reqwest::Client`.
pub struct HttpFetcher {
    client: Client,
    normalizer: Normalizer,
}

impl HttpFetcher {
    pub fn new(root: &Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(
                "Spiderbot/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/trapdoorsec/spiderbot)"
            ))
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self::with_client(client, Normalizer::new(root)))
    }

    /// Uses a caller-built client; timeouts and redirects are whatever it was built with.
    pub fn with_client(client: Client, normalizer: Normalizer) -> Self {
        Self { client, normalizer }
    }

    async fn fetch_links(&self, url: &str) -> Result<Vec<String>> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            // Dropping the response releases the connection without reading the body
            return Err(ScanError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(extract_links(&body, &self.normalizer))
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: String) -> PageResult {
        match self.fetch_links(&url).await {
            Ok(links) => {
                debug!("Found {} links on {}", links.len(), url);
                PageResult::new(url, links)
            }
            Err(e) => {
                debug!("Skipping {}: {}", url, e);
                PageResult::with_error(url, e.to_string())
            }
        }
    }
}

/// Extracts every anchor href in `html` that the normalizer accepts, in document order.
pub fn extract_links(html: &str, normalizer: &Normalizer) -> Vec<String> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").expect("static selector is valid");

    document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| normalizer.normalize(href))
        .collect()
}
