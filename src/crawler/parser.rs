//! HTML parser for extracting links and page metadata
//!
//! This module handles parsing HTML content to extract:
//! - The first `<h1>` heading
//! - The lead paragraph
//! - Links to follow (from `<a>` tags)
//! - Image sources
//!
//! None of these functions fail: malformed markup yields empty fields.

use crate::state::PageRecord;
use scraper::{Html, Selector};
use url::Url;

/// Extracts the page record from fetched HTML
///
/// Relative references are resolved against `page_url`, the URL the page was
/// actually fetched from.
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::extract_page_data;
/// use url::Url;
///
/// let html = r#"<html><body><h1>Test</h1><p>Hello.</p><a href="/next">Next</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let record = extract_page_data(html, &page_url);
/// assert_eq!(record.h1, "Test");
/// assert_eq!(record.outgoing_links, vec!["https://example.com/next".to_string()]);
/// ```
pub fn extract_page_data(html: &str, page_url: &Url) -> PageRecord {
    let document = Html::parse_document(html);

    PageRecord {
        url: page_url.to_string(),
        h1: extract_h1(&document),
        first_paragraph: extract_first_paragraph(&document),
        outgoing_links: links_in(&document, page_url),
        image_urls: images_in(&document, page_url),
    }
}

/// Extracts all followable links from the HTML, resolved against `base_url`
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document, in document order
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    links_in(&Html::parse_document(html), base_url)
}

/// Extracts all image sources from the HTML, resolved against `base_url`
pub fn extract_images(html: &str, base_url: &Url) -> Vec<String> {
    images_in(&Html::parse_document(html), base_url)
}

/// Text of the first `<h1>`, trimmed
fn extract_h1(document: &Html) -> String {
    let Ok(selector) = Selector::parse("h1") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Text of the first `<p>` inside `<main>`, else the first `<p>` anywhere
fn extract_first_paragraph(document: &Html) -> String {
    let first_text = |css: &str| -> Option<String> {
        let selector = Selector::parse(css).ok()?;
        document
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
    };

    first_text("main p")
        .or_else(|| first_text("p"))
        .unwrap_or_default()
}

fn links_in(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

fn images_in(document: &Html, base_url: &Url) -> Vec<String> {
    let mut images = Vec::new();

    if let Ok(img_selector) = Selector::parse("img[src]") {
        for element in document.select(&img_selector) {
            let Some(src) = element.value().attr("src").map(str::trim) else {
                continue;
            };
            if src.is_empty() {
                continue;
            }

            if let Ok(absolute_url) = base_url.join(src) {
                images.push(absolute_url.to_string());
            }
        }
    }

    images
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only references
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
