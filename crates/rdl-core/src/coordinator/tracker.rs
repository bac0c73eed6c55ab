//! Outstanding-work counter that the coordinator waits on.
//!
//! A [`WorkGuard`] is taken before a unit is queued and released exactly once
//! when the guard drops, on success, error, or panic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct WorkTracker {
    outstanding: AtomicUsize,
    idle: Notify,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more unit; the count drops again when the guard is dropped.
    pub fn begin(self: &Arc<Self>) -> WorkGuard {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        WorkGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Units started but not yet finished.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Resolves once no unit is outstanding.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a release between check and await is not lost.
            notified.as_mut().enable();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Releases one outstanding unit when dropped.
#[derive(Debug)]
pub struct WorkGuard {
    tracker: Arc<WorkTracker>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.tracker.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.tracker.idle.notify_waiters();
        }
    }
}
