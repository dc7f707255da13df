//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a finished
//! crawl: run information, registry statistics, and unreachable pages.

use crate::output::summary::{CrawlSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Maximum number of unreachable keys listed in the summary
const UNREACHABLE_LIST_LIMIT: usize = 50;

/// Generates a markdown summary from crawl statistics
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();
    let stats = &summary.stats;

    md.push_str("# Ripple-Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", summary.seed_url));
    md.push_str(&format!(
        "- **Max Concurrency**: {}\n",
        summary.max_concurrency
    ));
    md.push_str(&format!("- **Max Pages**: {}\n", summary.max_pages));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", duration));
    }
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages Claimed | {} |\n", stats.total_entries));
    md.push_str(&format!("| Pages Recorded | {} |\n", stats.pages_recorded));
    md.push_str(&format!("| Pages Failed | {} |\n", stats.pages_failed));
    md.push_str(&format!("| Outgoing Links | {} |\n", stats.total_links));
    md.push_str(&format!("| Internal Links | {} |\n", stats.internal_links));
    md.push_str(&format!("| External Links | {} |\n", stats.external_links));
    md.push_str(&format!("| Images | {} |\n\n", stats.total_images));

    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n",
        summary.success_rate()
    ));
    if summary.hit_page_cap() {
        md.push_str("- **Page cap reached**: the crawl stopped accepting new pages\n");
    }
    md.push('\n');

    // Unreachable pages
    if !summary.unreachable.is_empty() {
        md.push_str("## Unreachable Pages\n\n");
        md.push_str(&format!("Total: {}\n\n", summary.unreachable.len()));
        for key in summary.unreachable.iter().take(UNREACHABLE_LIST_LIMIT) {
            md.push_str(&format!("- {}\n", key));
        }
        if summary.unreachable.len() > UNREACHABLE_LIST_LIMIT {
            md.push_str(&format!(
                "\n... and {} more\n",
                summary.unreachable.len() - UNREACHABLE_LIST_LIMIT
            ));
        }
        md.push('\n');
    }

    md
}
