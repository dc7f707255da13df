//! Fetch-slot scheduling
//!
//! The scheduler owns the global semaphore that bounds how many fetches are in
//! flight at once. It does not bound how many crawl tasks exist: tasks are
//! spawned freely and wait here for a slot.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A held concurrency slot; the slot is returned when this is dropped
#[derive(Debug)]
pub struct FetchSlot {
    _permit: OwnedSemaphorePermit,
}

/// Scheduler hands out concurrency slots for fetches
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    max_concurrency: usize,
}

impl Scheduler {
    /// Creates a scheduler with `max_concurrency` slots
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            global_semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        }
    }

    /// Waits for a free slot
    ///
    /// Returns None only if the semaphore has been closed, which the crawler
    /// never does.
    pub async fn acquire(&self) -> Option<FetchSlot> {
        let permit = Arc::clone(&self.global_semaphore)
            .acquire_owned()
            .await
            .ok()?;
        Some(FetchSlot { _permit: permit })
    }

    /// Number of slots currently free
    pub fn available_slots(&self) -> usize {
        self.global_semaphore.available_permits()
    }

    /// Total number of slots
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}
