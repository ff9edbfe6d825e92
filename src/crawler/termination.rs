//! Termination detection for a crawl run
//!
//! A run is finished when every submitted task has completed. Tasks hold an
//! [`OutstandingGuard`] for their whole lifetime; the guard is created at
//! submit time and decrements the counter when dropped, including when the
//! task panics. The driver sleeps in [`OutstandingTasks::wait_idle`] and is
//! woken when the counter reaches zero.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counter of submitted-but-not-completed tasks
#[derive(Debug, Default)]
pub struct OutstandingTasks {
    count: AtomicUsize,
    idle: Notify,
}

impl OutstandingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new outstanding task
    pub fn begin(self: &Arc<Self>) -> OutstandingGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        OutstandingGuard {
            tasks: Arc::clone(self),
        }
    }

    fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Current number of outstanding tasks
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Suspends until no task is outstanding
    ///
    /// Returns immediately if nothing was ever submitted.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before reading the count so a transition to zero
            // between the load and the await still wakes us
            notified.as_mut().enable();

            if self.count() == 0 {
                return;
            }

            notified.await;
        }
    }
}

/// Keeps one task counted as outstanding until dropped
#[derive(Debug)]
pub struct OutstandingGuard {
    tasks: Arc<OutstandingTasks>,
}

impl Drop for OutstandingGuard {
    fn drop(&mut self) {
        self.tasks.finish();
    }
}
