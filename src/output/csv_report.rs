//! CSV report of recorded pages
//!
//! One row per populated registry entry. Entries that were claimed but never
//! fetched successfully have no data and are left out.

use crate::output::summary::OutputResult;
use crate::state::CrawlSnapshot;
use std::io::Write;
use std::path::Path;

/// Column headers of the report
pub const REPORT_HEADERS: [&str; 5] = [
    "page_url",
    "h1",
    "first_paragraph",
    "outgoing_link_urls",
    "image_urls",
];

/// Separator for list-valued columns
const LIST_SEPARATOR: &str = ";";

/// Writes the CSV report to `path`, replacing any existing file
///
/// Returns the number of data rows written.
pub fn write_csv_report(snapshot: &CrawlSnapshot, path: &Path) -> OutputResult<usize> {
    let file = std::fs::File::create(path)?;
    write_csv(snapshot, file)
}

/// Writes the CSV report to any writer, rows ordered by dedup key
pub fn write_csv<W: Write>(snapshot: &CrawlSnapshot, writer: W) -> OutputResult<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(REPORT_HEADERS)?;

    let mut rows = 0;
    for (_, record) in snapshot.populated() {
        let outgoing_links = record.outgoing_links.join(LIST_SEPARATOR);
        let image_urls = record.image_urls.join(LIST_SEPARATOR);
        writer.write_record([
            record.url.as_str(),
            record.h1.as_str(),
            record.first_paragraph.as_str(),
            outgoing_links.as_str(),
            image_urls.as_str(),
        ])?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}
