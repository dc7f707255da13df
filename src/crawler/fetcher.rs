//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Status and Content-Type validation
//! - Error classification
//!
//! The crawl engine only sees the `Fetcher` trait, so tests can substitute an
//! in-memory site.

use crate::config::{FetcherConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Reasons a single page fetch can fail
///
/// Every variant is a per-page failure: the crawl logs it and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, TLS error and similar
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Request did not complete within the configured timeout
    #[error("request timeout for {url}")]
    Timeout { url: String },

    /// Server answered with status >= 400
    #[error("HTTP error for {url}: status code {status_code}")]
    HttpStatus { url: String, status_code: u16 },

    /// Response is not HTML
    #[error("invalid content type for {url}: {content_type} (expected text/html)")]
    ContentMismatch { url: String, content_type: String },

    /// Response body could not be read
    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// Source of raw HTML for the crawl engine
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches `url` and returns its HTML body
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetcher` - Timeouts and redirect policy
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::{FetcherConfig, UserAgentConfig};
/// use ripple_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .redirect(Policy::limited(fetcher.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        fetcher: &FetcherConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, fetcher)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL and validates the response
    ///
    /// # Response Handling
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `Timeout` |
    /// | Connection/transport failure | `Network` |
    /// | HTTP status >= 400 | `HttpStatus` |
    /// | Content-Type without `text/html` | `ContentMismatch` |
    /// | Body read failure | `Body` |
    ///
    /// Nothing is retried.
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.to_ascii_lowercase().contains("text/html") {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

fn classify_request_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
