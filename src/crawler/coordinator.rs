//! Crawler coordinator - concurrent crawl orchestration
//!
//! This module contains the traversal unit that every crawl task runs and the
//! driver that seeds the root task and waits for the fan-out to drain:
//! - Cheap cap pre-check, then a concurrency slot
//! - Domain check and dedup-key normalization
//! - Atomic claim in the shared registry
//! - Fetch, extraction, and one spawned task per discovered link
//!
//! Per-page failures never propagate; the unit logs and abandons.

use crate::config::{validate_crawler_config, CrawlerConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_page_data;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::tracker::{WorkGuard, WorkTracker};
use crate::state::{CrawlSnapshot, CrawlState};
use crate::url::{normalize_url, same_host};
use crate::ConfigError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use url::Url;

/// Immutable bounds of one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Seed URL; only pages on its host are visited
    pub base_url: Url,

    /// Maximum number of fetches in flight at once
    pub max_concurrency: usize,

    /// Maximum number of registry entries
    pub max_pages: usize,
}

impl CrawlLimits {
    pub fn new(base_url: Url, max_concurrency: usize, max_pages: usize) -> Self {
        Self {
            base_url,
            max_concurrency,
            max_pages,
        }
    }

    /// Validates command-line limits and parses the seed
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        validate_crawler_config(config)?;

        let base_url = Url::parse(&config.seed_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed_url, e))
        })?;

        Ok(Self::new(base_url, config.max_concurrency, config.max_pages))
    }
}

type VisitFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Main crawler coordinator structure
///
/// Shared by every crawl task through an `Arc`. The registry lock and the
/// fetch slots are independent: the lock is only taken for claim/store/size
/// and is never held across a fetch.
pub struct Coordinator<F> {
    limits: CrawlLimits,
    state: CrawlState,
    scheduler: Scheduler,
    tracker: WorkTracker,
    fetcher: F,
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a new coordinator instance
    pub fn new(limits: CrawlLimits, fetcher: F) -> Self {
        Self {
            state: CrawlState::new(limits.max_pages),
            scheduler: Scheduler::new(limits.max_concurrency),
            tracker: WorkTracker::new(),
            limits,
            fetcher,
        }
    }

    pub fn limits(&self) -> &CrawlLimits {
        &self.limits
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn tracker(&self) -> &WorkTracker {
        &self.tracker
    }

    /// Runs the crawl to completion
    ///
    /// Registers and spawns the root task, then performs the single join on
    /// the outstanding-work counter. All further spawning is done by the
    /// tasks themselves.
    pub async fn run(self: Arc<Self>) -> CrawlSnapshot {
        tracing::info!(
            "Starting crawl of {} (max concurrency: {}, max pages: {})",
            self.limits.base_url,
            self.limits.max_concurrency,
            self.limits.max_pages
        );

        let root = self.tracker.register();
        Self::spawn_visit(&self, self.limits.base_url.to_string(), root);

        self.tracker.wait().await;

        let snapshot = self.state.snapshot();
        tracing::info!(
            "Crawl finished: {} pages recorded, {} claimed without data",
            snapshot.populated_count(),
            snapshot.len() - snapshot.populated_count()
        );
        snapshot
    }

    /// Spawns one crawl task that owns `guard`
    ///
    /// The caller registers the guard first, so the outstanding count already
    /// covers this task before the runtime can observe it.
    fn spawn_visit(this: &Arc<Self>, raw_url: String, guard: WorkGuard) {
        tokio::spawn(Arc::clone(this).visit(raw_url, guard));
    }

    fn visit(self: Arc<Self>, raw_url: String, guard: WorkGuard) -> VisitFuture {
        Box::pin(async move {
            // Released when the task ends, whichever way it ends
            let _guard = guard;
            self.crawl_page(&raw_url).await;
        })
    }

    /// Processes a single candidate URL
    ///
    /// Every early return drops the fetch slot (once held) and, in `visit`,
    /// the work guard.
    async fn crawl_page(self: &Arc<Self>, raw_url: &str) {
        // Best-effort; `claim` is the authoritative cap check
        if self.state.size() >= self.limits.max_pages {
            tracing::trace!("Page cap reached, skipping {}", raw_url);
            return;
        }

        let Some(_slot) = self.scheduler.acquire().await else {
            tracing::warn!("Fetch slots closed, skipping {}", raw_url);
            return;
        };

        let current_url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Error parsing URL {}: {}", raw_url, e);
                return;
            }
        };

        if !same_host(&self.limits.base_url, &current_url) {
            tracing::trace!("Skipping off-domain URL {}", raw_url);
            return;
        }

        let key = match normalize_url(raw_url) {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!("Error normalizing URL {}: {}", raw_url, e);
                return;
            }
        };

        if !self.state.claim(&key) {
            return;
        }

        if self.state.size() > self.limits.max_pages {
            tracing::debug!("Page cap exceeded after claiming {}", key);
            return;
        }

        tracing::info!("crawling: {}", raw_url);

        // Failed URLs stay claimed so they are not fetched again this run
        let html = match self.fetcher.fetch(raw_url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Error fetching {}: {}", raw_url, e);
                return;
            }
        };

        let record = extract_page_data(&html, &current_url);
        let links = record.outgoing_links.clone();
        self.state.store(&key, record);

        tracing::debug!("Discovered {} links on {}", links.len(), raw_url);

        for link in links {
            let guard = self.tracker.register();
            Self::spawn_visit(self, link, guard);
        }
    }
}

/// Runs a complete crawl and returns the final registry
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::{FetcherConfig, UserAgentConfig};
/// use ripple_crawl::crawler::{run_crawl, CrawlLimits, HttpFetcher};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = HttpFetcher::from_config(&UserAgentConfig::default(), &FetcherConfig::default())?;
/// let limits = CrawlLimits::new(Url::parse("https://example.com/")?, 3, 10);
/// let snapshot = run_crawl(fetcher, limits).await;
/// println!("{} pages", snapshot.populated_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<F: Fetcher>(fetcher: F, limits: CrawlLimits) -> CrawlSnapshot {
    Arc::new(Coordinator::new(limits, fetcher)).run().await
}
