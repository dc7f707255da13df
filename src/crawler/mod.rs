//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML parsing and link extraction
//! - Fetch-slot scheduling (the concurrency bound)
//! - Outstanding-work tracking for the recursive fan-out
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod tracker;

pub use coordinator::{run_crawl, Coordinator, CrawlLimits};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use parser::{extract_images, extract_links, extract_page_data};
pub use scheduler::{FetchSlot, Scheduler};
pub use tracker::{WorkGuard, WorkTracker};

use crate::config::Config;
use crate::state::CrawlSnapshot;
use crate::CrawlError;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Seed one task for the root URL
/// 3. Let tasks fetch, extract, and fan out over discovered links
/// 4. Wait for every task to finish
/// 5. Return the final registry
///
/// # Returns
///
/// * `Ok(CrawlSnapshot)` - Crawl completed; per-page failures are not errors
/// * `Err(CrawlError)` - The HTTP client could not be built
pub async fn crawl(config: &Config, limits: CrawlLimits) -> Result<CrawlSnapshot, CrawlError> {
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.fetcher)?;
    Ok(run_crawl(fetcher, limits).await)
}
