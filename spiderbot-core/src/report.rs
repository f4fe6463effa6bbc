// Report generation from a finished crawl

use crate::crawl::CrawlOutcome;
use serde::{Deserialize, Serialize};
use spiderbot_scanner::{RoundSummary, Sitemap};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Bare sitemap: each page followed by its tab-indented links
    Tree,
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tree" | "sitemap" => Some(ReportFormat::Tree),
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub root_url: String,
    pub settings: CrawlSettings,
    pub total_pages: usize,
    pub total_links: usize,
    pub started_at: String,
    pub duration_ms: u64,
    pub rounds: Vec<RoundSummary>,
    /// Every page in discovery order, reachable or not.
    pub pages: Vec<PageEntry>,
    /// Breadth-first walk from the root, one entry per reachable page.
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSettings {
    pub timeout_secs: u64,
    pub max_depth: i64,
    pub max_urls_per_round: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    pub url: String,
    pub depth: usize,
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub url: String,
    pub hops: usize,
    pub links: Vec<String>,
}

pub fn gather_report_data(outcome: &CrawlOutcome) -> ReportData {
    let sitemap = &outcome.sitemap;

    let pages = sitemap
        .nodes()
        .map(|node| PageEntry {
            url: node.address.clone(),
            depth: node.depth,
            links: sitemap
                .links(&node.address)
                .into_iter()
                .map(String::from)
                .collect(),
        })
        .collect();

    ReportData {
        root_url: sitemap.root().address.clone(),
        settings: CrawlSettings {
            timeout_secs: outcome.config.timeout_secs,
            max_depth: outcome.config.max_depth,
            max_urls_per_round: outcome.config.max_urls_per_round,
        },
        total_pages: sitemap.len(),
        total_links: sitemap.link_count(),
        started_at: outcome.started_at.to_rfc3339(),
        duration_ms: u64::try_from(outcome.duration.as_millis()).unwrap_or(u64::MAX),
        rounds: outcome.rounds.clone(),
        pages,
        tree: walk_entries(sitemap),
    }
}

fn walk_entries(sitemap: &Sitemap) -> Vec<TreeEntry> {
    sitemap
        .walk()
        .into_iter()
        .map(|entry| TreeEntry {
            url: entry.url.to_string(),
            hops: entry.hops,
            links: entry.links.into_iter().map(String::from).collect(),
        })
        .collect()
}

/// Renders the sitemap as one line per reachable page followed by its links,
/// each on its own tab-indented line. Every page is printed once.
pub fn render_sitemap(sitemap: &Sitemap) -> String {
    generate_sitemap_tree(&walk_entries(sitemap))
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    // Header
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                           SPIDERBOT SITEMAP REPORT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("Root:         {}\n", data.root_url));
    report.push_str(&format!("Crawl Date:   {}\n", data.started_at));
    report.push_str(&format!(
        "Duration:     {:.2} seconds\n",
        data.duration_ms as f64 / 1000.0
    ));
    report.push_str(&format!("Max Depth:    {}\n", format_limit(data.settings.max_depth)));
    report.push_str(&format!(
        "Per Round:    {}\n",
        format_limit(data.settings.max_urls_per_round)
    ));
    report.push_str(&format!("Timeout:      {} seconds\n", data.settings.timeout_secs));
    report.push('\n');

    // Summary
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("SUMMARY\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str(&format!("  Pages found:     {}\n", data.total_pages));
    report.push_str(&format!("  Links recorded:  {}\n", data.total_links));
    report.push_str(&format!("  Rounds:          {}\n", data.rounds.len()));

    let failed: usize = data.rounds.iter().map(|r| r.failed).sum();
    if failed > 0 {
        report.push_str(&format!("  Failed fetches:  {}\n", failed));
    }
    report.push('\n');

    for round in &data.rounds {
        report.push_str(&format!(
            "  [round {}] fetched {}/{}, {} pages known, {} queued\n",
            round.round, round.collected, round.dispatched, round.visited, round.next_frontier
        ));
    }
    if !data.rounds.is_empty() {
        report.push('\n');
    }

    // Sitemap
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("SITE MAP\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str(&generate_sitemap_tree(&data.tree));
    report.push('\n');

    // Footer
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                          End of Report\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Spiderbot",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "crawl": {
                "root": data.root_url,
                "started_at": data.started_at,
                "duration_ms": data.duration_ms,
                "settings": data.settings,
                "rounds": data.rounds
            },
            "summary": {
                "total_pages": data.total_pages,
                "total_links": data.total_links
            },
            "sitemap": {
                "root": data.root_url,
                "nodes": data.pages
            }
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_report(data: &ReportData, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Tree => Ok(generate_sitemap_tree(&data.tree)),
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => generate_json_report(data),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Renders a depth or per-round limit, where non-positive means no limit.
pub fn format_limit(limit: i64) -> String {
    if limit > 0 {
        limit.to_string()
    } else {
        "unlimited".to_string()
    }
}

fn generate_sitemap_tree(entries: &[TreeEntry]) -> String {
    let mut result = String::new();

    for entry in entries {
        result.push_str(&entry.url);
        result.push('\n');
        for link in &entry.links {
            result.push('\t');
            result.push_str(link);
            result.push('\n');
        }
    }

    result
}
