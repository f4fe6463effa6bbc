// Tests for report generation functionality

use chrono::Utc;
use spiderbot_core::crawl::CrawlOutcome;
use spiderbot_core::report::{
    ReportFormat, format_limit, gather_report_data, generate_json_report, generate_report,
    generate_text_report, render_sitemap, save_report,
};
use spiderbot_scanner::{CrawlConfig, RoundSummary, Sitemap};
use std::time::Duration;
use tempfile::NamedTempFile;

const ROOT: &str = "https://x.com/";

fn sample_sitemap() -> Sitemap {
    let mut sitemap = Sitemap::new(ROOT);
    for (url, depth) in [
        ("https://x.com/a", 1),
        ("https://x.com/b", 1),
        ("https://x.com/c", 2),
        ("https://x.com/orphan", 2),
    ] {
        sitemap.insert(url, depth);
    }
    for (from, to) in [
        (ROOT, "https://x.com/a"),
        (ROOT, "https://x.com/b"),
        ("https://x.com/a", "https://x.com/c"),
        ("https://x.com/b", "https://x.com/c"),
        ("https://x.com/c", ROOT),
    ] {
        sitemap.add_link(from, to);
    }
    sitemap
}

fn sample_outcome() -> CrawlOutcome {
    CrawlOutcome {
        config: CrawlConfig::new(ROOT).with_max_depth(2),
        sitemap: sample_sitemap(),
        rounds: vec![
            RoundSummary {
                round: 1,
                dispatched: 1,
                collected: 1,
                failed: 0,
                visited: 3,
                next_frontier: 2,
            },
            RoundSummary {
                round: 2,
                dispatched: 2,
                collected: 2,
                failed: 1,
                visited: 5,
                next_frontier: 2,
            },
        ],
        started_at: Utc::now(),
        duration: Duration::from_millis(1500),
    }
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("tree"), Some(ReportFormat::Tree));
    assert_eq!(ReportFormat::from_str("sitemap"), Some(ReportFormat::Tree));
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert_eq!(ReportFormat::from_str("TEXT"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("Json"), Some(ReportFormat::Json));
}

#[test]
fn test_report_format_from_str_unknown() {
    assert_eq!(ReportFormat::from_str("csv"), None);
    assert_eq!(ReportFormat::from_str(""), None);
}

#[test]
fn test_format_limit() {
    assert_eq!(format_limit(3), "3");
    assert_eq!(format_limit(0), "unlimited");
    assert_eq!(format_limit(-1), "unlimited");
}

// ============================================================================
// Sitemap Printer Tests
// ============================================================================

#[test]
fn test_render_sitemap_lists_each_page_once() {
    let rendered = render_sitemap(&sample_sitemap());

    let expected = "\
https://x.com/
\thttps://x.com/a
\thttps://x.com/b
https://x.com/a
\thttps://x.com/c
https://x.com/b
\thttps://x.com/c
https://x.com/c
\thttps://x.com/
";
    assert_eq!(rendered, expected);
}

#[test]
fn test_render_sitemap_root_only() {
    let rendered = render_sitemap(&Sitemap::new(ROOT));
    assert_eq!(rendered, "https://x.com/\n");
}

// ============================================================================
// Report Data Tests
// ============================================================================

#[test]
fn test_gather_report_data() {
    let data = gather_report_data(&sample_outcome());

    assert_eq!(data.root_url, ROOT);
    assert_eq!(data.total_pages, 5);
    assert_eq!(data.total_links, 5);
    assert_eq!(data.duration_ms, 1500);
    assert_eq!(data.settings.max_depth, 2);
    assert_eq!(data.rounds.len(), 2);

    // Every page, including ones the walk cannot reach
    assert_eq!(data.pages.len(), 5);
    assert_eq!(data.pages[0].url, ROOT);
    assert_eq!(data.pages[0].depth, 0);
    assert_eq!(data.pages[4].url, "https://x.com/orphan");

    // Only reachable pages in the tree
    assert_eq!(data.tree.len(), 4);
    assert_eq!(data.tree[3].hops, 2);
}

#[test]
fn test_generate_text_report() {
    let data = gather_report_data(&sample_outcome());
    let report = generate_text_report(&data);

    assert!(report.contains("SPIDERBOT SITEMAP REPORT"));
    assert!(report.contains("Root:         https://x.com/"));
    assert!(report.contains("Duration:     1.50 seconds"));
    assert!(report.contains("Max Depth:    2"));
    assert!(report.contains("Per Round:    unlimited"));
    assert!(report.contains("Pages found:     5"));
    assert!(report.contains("Failed fetches:  1"));
    assert!(report.contains("[round 2] fetched 2/2, 5 pages known, 2 queued"));
    assert!(report.contains("SITE MAP"));
    assert!(report.contains("https://x.com/a\n\thttps://x.com/c\n"));
    assert!(!report.contains("orphan"));
}

#[test]
fn test_generate_text_report_hides_failures_when_none() {
    let mut outcome = sample_outcome();
    outcome.rounds.iter_mut().for_each(|r| r.failed = 0);
    let report = generate_text_report(&gather_report_data(&outcome));
    assert!(!report.contains("Failed fetches"));
}

#[test]
fn test_generate_json_report() -> Result<(), Box<dyn std::error::Error>> {
    let data = gather_report_data(&sample_outcome());
    let json = generate_json_report(&data)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "Spiderbot");
    assert_eq!(report["summary"]["total_pages"], 5);
    assert_eq!(report["summary"]["total_links"], 5);
    assert_eq!(report["crawl"]["settings"]["max_depth"], 2);
    assert_eq!(report["crawl"]["rounds"].as_array().map(Vec::len), Some(2));

    let nodes = report["sitemap"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0]["url"], ROOT);
    assert_eq!(nodes[0]["links"][1], "https://x.com/b");
    assert_eq!(nodes[3]["depth"], 2);

    Ok(())
}

#[test]
fn test_generate_report_dispatches_on_format() -> Result<(), Box<dyn std::error::Error>> {
    let data = gather_report_data(&sample_outcome());

    let tree = generate_report(&data, ReportFormat::Tree)?;
    assert_eq!(tree, render_sitemap(&sample_sitemap()));

    let text = generate_report(&data, ReportFormat::Text)?;
    assert!(text.starts_with("━"));

    let json = generate_report(&data, ReportFormat::Json)?;
    assert!(json.trim_start().starts_with('{'));

    Ok(())
}

#[test]
fn test_save_report() -> Result<(), Box<dyn std::error::Error>> {
    let temp_file = NamedTempFile::new()?;
    save_report("https://x.com/\n", temp_file.path())?;

    let content = std::fs::read_to_string(temp_file.path())?;
    assert_eq!(content, "https://x.com/\n");

    Ok(())
}
