//! Outstanding-work tracking for the crawl fan-out
//!
//! Every crawl task owns exactly one `WorkGuard`. The guard is created by
//! `WorkTracker::register` before the task is spawned and released when the
//! task drops it, so the count cannot reach zero while a child is about to
//! start, and every exit path (including a panic) decrements it once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    outstanding: AtomicUsize,
    idle: Notify,
}

/// Counting join over dynamically spawned crawl tasks
#[derive(Debug, Clone, Default)]
pub struct WorkTracker {
    inner: Arc<Inner>,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of outstanding work
    ///
    /// Must be called before the task that will own the guard is spawned.
    pub fn register(&self) -> WorkGuard {
        self.inner.outstanding.fetch_add(1, Ordering::SeqCst);
        WorkGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of units registered and not yet finished
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::SeqCst)
    }

    /// Waits until every registered unit has finished
    ///
    /// Returns immediately if nothing is outstanding.
    pub async fn wait(&self) {
        loop {
            // Created before the check so a wakeup between the check and the
            // await is not lost.
            let idle = self.inner.idle.notified();
            if self.outstanding() == 0 {
                return;
            }
            idle.await;
        }
    }
}

/// Proof of one outstanding unit of work; dropping it marks the unit finished
#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the work as finished"]
pub struct WorkGuard {
    inner: Arc<Inner>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
