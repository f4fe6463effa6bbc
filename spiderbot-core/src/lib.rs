pub mod crawl;
pub mod report;

pub use crawl::{CrawlOptions, CrawlOutcome, CrawlProgressCallback, execute_crawl};
pub use report::{ReportData, ReportFormat};

pub fn print_banner() {
    eprintln!(
        "spiderbot {} - same-origin sitemap crawler",
        env!("CARGO_PKG_VERSION")
    );
}
