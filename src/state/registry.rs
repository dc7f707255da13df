//! Shared visited registry
//!
//! Every crawl task goes through `CrawlState::claim` before fetching, which
//! makes the check-and-insert of a dedup key a single critical section. The
//! lock is never held across an await point.

use crate::state::{PageEntry, PageRecord};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock-guarded registry of claimed and populated pages
#[derive(Debug)]
pub struct CrawlState {
    /// Dedup key -> registry slot
    pages: Mutex<HashMap<String, PageEntry>>,

    /// Ceiling on the number of registry entries
    max_pages: usize,
}

impl CrawlState {
    /// Creates an empty registry that accepts at most `max_pages` claims
    pub fn new(max_pages: usize) -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            max_pages,
        }
    }

    /// Returns the configured page ceiling
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    // A panicking holder cannot leave the map half-written: every mutation
    // below is a single insert.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, PageEntry>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically claims `key` for the calling task
    ///
    /// Returns false without mutating if the ceiling is already reached or
    /// another task holds the key. Otherwise inserts a `Claimed` placeholder
    /// and returns true.
    pub fn claim(&self, key: &str) -> bool {
        let mut pages = self.lock();

        if pages.len() >= self.max_pages {
            tracing::trace!("Claim of {} refused: page cap {} reached", key, self.max_pages);
            return false;
        }

        if pages.contains_key(key) {
            tracing::trace!("Claim of {} refused: already claimed", key);
            return false;
        }

        pages.insert(key.to_string(), PageEntry::Claimed);
        true
    }

    /// Replaces the placeholder at `key` with the extracted page record
    ///
    /// The key must have been claimed by the caller. Storing under an
    /// unclaimed key is ignored so the ceiling cannot be bypassed.
    pub fn store(&self, key: &str, record: PageRecord) {
        let mut pages = self.lock();

        match pages.get_mut(key) {
            Some(entry) => *entry = PageEntry::Populated(record),
            None => tracing::warn!("Ignoring record for unclaimed key {}", key),
        }
    }

    /// Returns the number of entries, claimed and populated
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    /// Copies the registry for reporting
    pub fn snapshot(&self) -> CrawlSnapshot {
        CrawlSnapshot {
            pages: self.lock().clone(),
        }
    }
}

/// Owned copy of the registry, taken after all crawl work has finished
#[derive(Debug, Clone, Default)]
pub struct CrawlSnapshot {
    pages: HashMap<String, PageEntry>,
}

impl CrawlSnapshot {
    /// Total number of entries, including claimed-but-unpopulated ones
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Looks up an entry by dedup key
    pub fn get(&self, key: &str) -> Option<&PageEntry> {
        self.pages.get(key)
    }

    /// Populated entries, ordered by dedup key
    pub fn populated(&self) -> Vec<(&str, &PageRecord)> {
        let mut records: Vec<_> = self
            .pages
            .iter()
            .filter_map(|(key, entry)| entry.record().map(|record| (key.as_str(), record)))
            .collect();
        records.sort_by(|a, b| a.0.cmp(b.0));
        records
    }

    /// Number of populated entries
    pub fn populated_count(&self) -> usize {
        self.pages.values().filter(|e| e.is_populated()).count()
    }

    /// Keys that were claimed but never populated (fetch failures), sorted
    pub fn unpopulated_keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self
            .pages
            .iter()
            .filter(|(_, entry)| !entry.is_populated())
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Iterates over every entry in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PageEntry)> {
        self.pages.iter()
    }
}

impl From<HashMap<String, PageEntry>> for CrawlSnapshot {
    fn from(pages: HashMap<String, PageEntry>) -> Self {
        Self { pages }
    }
}
