pub mod config;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod result;
pub mod sitemap;

pub use config::CrawlConfig;
pub use crawler::{Crawler, ProgressCallback, RoundCallback};
pub use error::ScanError;
pub use fetch::{Fetch, HttpFetcher};
pub use normalize::Normalizer;
pub use result::{PageResult, RoundSummary};
pub use sitemap::{Sitemap, SitemapNode, WalkEntry};
