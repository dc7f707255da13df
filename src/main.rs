//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl site mapper.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config_with_hash, Config, CrawlerConfig};
use ripple_crawl::crawler::{crawl, CrawlLimits};
use ripple_crawl::output::{
    generate_markdown_summary, generate_summary, print_statistics, write_csv_report,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a concurrent single-domain site mapper
///
/// Crawls every page reachable from URL on the same host, with at most
/// MAX_CONCURRENCY fetches in flight and at most MAX_PAGES pages recorded,
/// then writes a CSV report of the pages found.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent single-domain site mapper", long_about = None)]
struct Cli {
    /// Seed URL; only pages on its host are crawled
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of concurrent fetches (>= 1)
    #[arg(value_name = "MAX_CONCURRENCY")]
    max_concurrency: usize,

    /// Maximum number of pages to record (>= 1)
    #[arg(value_name = "MAX_PAGES")]
    max_pages: usize,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the CSV report here instead of the configured path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Also write a markdown summary here
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    let limits = CrawlLimits::from_config(&CrawlerConfig {
        seed_url: cli.url.clone(),
        max_concurrency: cli.max_concurrency,
        max_pages: cli.max_pages,
    })
    .context("invalid crawl arguments")?;

    let report_path = cli
        .report
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.report_path));
    let summary_path = cli
        .summary
        .clone()
        .or_else(|| config.output.summary_path.as_ref().map(PathBuf::from));

    let started_at = chrono::Utc::now();
    let snapshot = crawl(&config, limits.clone())
        .await
        .context("crawl failed")?;
    let finished_at = chrono::Utc::now();

    tracing::info!("Generating CSV report: {}", report_path.display());
    let rows = write_csv_report(&snapshot, &report_path)
        .with_context(|| format!("failed to write report to {}", report_path.display()))?;

    let summary = generate_summary(&snapshot, &limits, started_at, finished_at, config_hash);

    if let Some(path) = summary_path {
        tracing::info!("Generating markdown summary: {}", path.display());
        generate_markdown_summary(&summary, &path)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
    }

    if !cli.quiet {
        print_statistics(&summary.stats);
        println!();
        println!(
            "Crawl completed: {} pages found (max: {})",
            rows, limits.max_pages
        );
        println!("Report saved to {}", report_path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
