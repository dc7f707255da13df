//! State module for tracking crawl progress
//!
//! This module owns the visited registry shared by every crawl task.
//!
//! # Components
//!
//! - `PageRecord`: Metadata extracted from one successfully fetched page
//! - `PageEntry`: A registry slot, either claimed or populated
//! - `CrawlState`: The lock-guarded registry with atomic claim semantics
//! - `CrawlSnapshot`: An owned copy of the registry for reporting

mod page_record;
mod registry;

// Re-export main types
pub use page_record::{PageEntry, PageRecord};
pub use registry::{CrawlSnapshot, CrawlState};
