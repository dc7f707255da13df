use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (e.g. `mailto:` links), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true when `candidate` is served by the same host as `base`
///
/// Hosts are compared case-insensitively together with any explicit port.
/// Default ports are elided during parsing, so `https://x.test:443/` and
/// `https://x.test/` match. The scheme is not compared.
pub fn same_host(base: &Url, candidate: &Url) -> bool {
    match (extract_domain(base), extract_domain(candidate)) {
        (Some(a), Some(b)) => a == b && base.port() == candidate.port(),
        _ => false,
    }
}
