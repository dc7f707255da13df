//! Output module for generating crawl reports and summaries
//!
//! This module handles:
//! - Writing the per-page CSV report
//! - Generating markdown summaries of crawl results
//! - Computing and printing crawl statistics

mod csv_report;
mod markdown;
pub mod stats;
mod summary;

pub use csv_report::{write_csv, write_csv_report, REPORT_HEADERS};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, CrawlStatistics};
pub use summary::{CrawlSummary, OutputError, OutputResult};

use crate::crawler::CrawlLimits;
use crate::state::CrawlSnapshot;
use chrono::{DateTime, Utc};

/// Builds a crawl summary from a finished crawl
///
/// # Arguments
///
/// * `snapshot` - The final registry
/// * `limits` - The limits the crawl ran with
/// * `started_at` / `finished_at` - Wall-clock bounds of the crawl
/// * `config_hash` - Hash of the configuration file, if one was used
pub fn generate_summary(
    snapshot: &CrawlSnapshot,
    limits: &CrawlLimits,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    config_hash: Option<String>,
) -> CrawlSummary {
    let duration = finished_at - started_at;

    CrawlSummary {
        seed_url: limits.base_url.to_string(),
        max_concurrency: limits.max_concurrency,
        max_pages: limits.max_pages,
        started_at: started_at.to_rfc3339(),
        finished_at: Some(finished_at.to_rfc3339()),
        duration_seconds: Some(duration.num_milliseconds() as f64 / 1000.0),
        config_hash,
        stats: CrawlStatistics::from_snapshot(snapshot, &limits.base_url),
        unreachable: snapshot
            .unpopulated_keys()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}
