use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use spiderbot_core::crawl::{CrawlOptions, execute_crawl};
use spiderbot_core::report::{
    ReportFormat, format_limit, gather_report_data, generate_report, save_report,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use url::Url;

// Helper functions for crawl handler

/// Parse a root URL argument, trying to add https:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Try to parse as-is
    if let Ok(url) = Url::parse(line) {
        if matches!(url.scheme(), "http" | "https") {
            return url.has_host().then(|| line.to_string());
        }
        // `host:port` parses as a scheme followed by a numeric path; anything
        // else with a scheme (mailto:, ftp://, ...) is not crawlable
        let is_host_and_port = url.cannot_be_a_base()
            && url.path().starts_with(|c: char| c.is_ascii_digit());
        if !is_host_and_port {
            return None;
        }
    }

    // Try adding https://
    let with_scheme = format!("https://{}", line);
    match Url::parse(&with_scheme) {
        Ok(url) if url.has_host() => Some(with_scheme),
        _ => None,
    }
}

/// Build crawl options from the `crawl` subcommand arguments.
///
/// The spinner is only shown when log lines stay quiet: not with `-q`, not with `-v`.
pub fn crawl_options_from_args(args: &ArgMatches, quiet: bool) -> Result<CrawlOptions> {
    let defaults = CrawlOptions::default();

    let raw_url = args
        .get_one::<String>("url")
        .map(String::as_str)
        .unwrap_or(&defaults.url);
    let Some(url) = parse_url_line(raw_url) else {
        bail!("Invalid root URL '{}'", raw_url);
    };

    Ok(CrawlOptions {
        url,
        timeout_secs: args
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(defaults.timeout_secs),
        max_depth: args
            .get_one::<i64>("max-depth")
            .copied()
            .unwrap_or(defaults.max_depth),
        max_urls_per_round: args
            .get_one::<i64>("max-urls-per-round")
            .copied()
            .unwrap_or(defaults.max_urls_per_round),
        show_progress_bars: !quiet && !args.get_flag("verbose"),
    })
}

/// Log level for a run. Progress is shown by the spinner, so round and crawl
/// events only reach the log with `-v`.
pub fn log_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}

/// Install the stderr log subscriber. Later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level(verbose))
        .with_writer(io::stderr)
        .try_init();
}

/// Write rendered output to a file, or to stdout when no path is given
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => save_report(content, path)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write report to stdout")
        }
    }
}

pub async fn handle_crawl(args: &ArgMatches, quiet: bool) -> Result<()> {
    init_tracing(args.get_flag("verbose"));

    let options = crawl_options_from_args(args, quiet)?;
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Tree);
    let output = args.get_one::<PathBuf>("output");

    if !quiet {
        eprintln!("\n🕷️  Crawling {}", options.url.bold());
        eprintln!("Timeout: {}s", options.timeout_secs);
        eprintln!("Max depth: {}", format_limit(options.max_depth));
        eprintln!("URLs per round: {}\n", format_limit(options.max_urls_per_round));
    }

    let outcome = execute_crawl(options, None)
        .await
        .context("Crawl failed")?;

    if !quiet {
        eprintln!(
            "\n{} Crawl complete! {} pages, {} links in {:.2}s\n",
            "✓".green().bold(),
            outcome.sitemap.len(),
            outcome.sitemap.link_count(),
            outcome.duration.as_secs_f64()
        );
    }

    let data = gather_report_data(&outcome);
    let content = generate_report(&data, format).context("Failed to render report")?;
    write_output(&content, output.map(PathBuf::as_path))?;

    if let Some(path) = output
        && !quiet
    {
        eprintln!("{} Report saved to {}", "✓".green().bold(), path.display());
    }

    Ok(())
}
