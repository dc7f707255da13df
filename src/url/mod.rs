//! URL handling module for Ripple-Crawl
//!
//! This module provides dedup-key normalization and the host comparison used
//! to keep a crawl inside its seed's domain.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use normalize::normalize_url;
