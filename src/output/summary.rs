//! Output error and crawl summary types
//!
//! This module defines the error type shared by the report writers and the
//! data structure behind the markdown summary.

use crate::output::stats::CrawlStatistics;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary of one finished crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub seed_url: String,
    pub max_concurrency: usize,
    pub max_pages: usize,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<f64>,
    pub config_hash: Option<String>,

    // Registry statistics
    pub stats: CrawlStatistics,

    // Keys claimed but never recorded (failed fetches)
    pub unreachable: Vec<String>,
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the share of claimed pages that were recorded, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.stats.total_entries == 0 {
            return 0.0;
        }
        (self.stats.pages_recorded as f64 / self.stats.total_entries as f64) * 100.0
    }

    /// Returns true if the registry filled up to the page cap
    pub fn hit_page_cap(&self) -> bool {
        self.max_pages > 0 && self.stats.total_entries >= self.max_pages
    }
}
