//! Page record definitions for the visited registry
//!
//! A registry key moves from `Claimed` to `Populated` at most once and never
//! goes back.
use serde::Serialize;
use std::fmt;

/// Metadata extracted from a fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// The page URL as it was crawled
    pub url: String,

    /// Text of the first `<h1>` (empty if none)
    pub h1: String,

    /// Lead paragraph text (empty if none)
    pub first_paragraph: String,

    /// Absolute outgoing link URLs, in document order, duplicates preserved
    pub outgoing_links: Vec<String>,

    /// Absolute image URLs, in document order
    pub image_urls: Vec<String>,
}

/// A slot in the visited registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEntry {
    /// A task has committed to visiting this URL; no data yet
    Claimed,

    /// The page was fetched and extracted
    Populated(PageRecord),
}

impl PageEntry {
    /// Returns true if the page data has been recorded
    pub fn is_populated(&self) -> bool {
        matches!(self, Self::Populated(_))
    }

    /// Returns the record, if populated
    pub fn record(&self) -> Option<&PageRecord> {
        match self {
            Self::Populated(record) => Some(record),
            Self::Claimed => None,
        }
    }
}

impl fmt::Display for PageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claimed => write!(f, "claimed"),
            Self::Populated(record) => write!(f, "populated ({})", record.url),
        }
    }
}
