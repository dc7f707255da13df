//! Statistics derived from the final crawl registry

use crate::state::CrawlSnapshot;
use crate::url::same_host;
use url::Url;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Registry entries, claimed and populated
    pub total_entries: usize,

    /// Entries with a recorded page
    pub pages_recorded: usize,

    /// Entries claimed but never recorded (fetch failures)
    pub pages_failed: usize,

    /// Outgoing links across all recorded pages, duplicates included
    pub total_links: usize,

    /// Outgoing links that stay on the seed's host
    pub internal_links: usize,

    /// Outgoing links to other hosts
    pub external_links: usize,

    /// Image references across all recorded pages
    pub total_images: usize,
}

impl CrawlStatistics {
    /// Computes statistics for a snapshot, classifying links against `base_url`
    pub fn from_snapshot(snapshot: &CrawlSnapshot, base_url: &Url) -> Self {
        let mut stats = Self {
            total_entries: snapshot.len(),
            ..Self::default()
        };

        for (_, record) in snapshot.populated() {
            stats.pages_recorded += 1;
            stats.total_images += record.image_urls.len();

            for link in &record.outgoing_links {
                stats.total_links += 1;
                match Url::parse(link) {
                    Ok(url) if same_host(base_url, &url) => stats.internal_links += 1,
                    _ => stats.external_links += 1,
                }
            }
        }

        stats.pages_failed = stats.total_entries - stats.pages_recorded;
        stats
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages claimed: {}", stats.total_entries);
    println!("  Pages recorded: {}", stats.pages_recorded);
    println!("  Pages failed: {}", stats.pages_failed);
    println!();

    println!("Links:");
    println!("  Total outgoing links: {}", stats.total_links);
    println!("  Internal: {}", stats.internal_links);
    println!("  External: {}", stats.external_links);
    println!("  Images: {}", stats.total_images);
    println!();

    let success_rate = if stats.total_entries > 0 {
        (stats.pages_recorded as f64 / stats.total_entries as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully recorded)",
        success_rate, stats.pages_recorded, stats.total_entries
    );
}
