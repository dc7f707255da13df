use crate::UrlError;
use url::Url;

/// Normalizes a URL into the dedup key used by the visited registry
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject URLs without a host
/// 3. Join host (with explicit port, if any) and path
/// 4. Remove one trailing slash
/// 5. Lowercase the whole key
///
/// Scheme, query string and fragment do not take part in the key, so
/// `http://` and `https://` spellings of a page collapse to one entry.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - The dedup key
/// * `Err(UrlError)` - Failed to parse the URL or it has no host
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::normalize_url;
///
/// let key = normalize_url("https://Blog.Boot.dev/Path/").unwrap();
/// assert_eq!(key, "blog.boot.dev/path");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    let host = url.host_str().ok_or(UrlError::MissingDomain)?;
    if host.is_empty() {
        return Err(UrlError::MissingDomain);
    }

    let mut key = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let path = url.path();
    key.push_str(path.strip_suffix('/').unwrap_or(path));

    Ok(key.to_lowercase())
}
