//! Scheduler turning admitted URLs into running fetch tasks
//!
//! This module handles:
//! - Gating every candidate URL through the frontier
//! - Running fetch tasks on a bounded worker pool
//! - Feeding discovered links back through `submit`
//! - Tracking outstanding tasks for termination
//!
//! There is no separate queue of URLs to visit: a URL the frontier admits
//! immediately becomes a spawned task, which waits for a pool permit before
//! fetching. Children are submitted before their parent task is counted as
//! complete, so the outstanding count only reaches zero once the whole
//! crawl has drained.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::termination::OutstandingTasks;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// State shared between the scheduler handle and its running tasks
struct Shared {
    frontier: Arc<Frontier>,
    fetcher: Arc<Fetcher>,

    /// Worker pool: one permit per concurrent fetch
    pool: Arc<Semaphore>,

    outstanding: Arc<OutstandingTasks>,
    closed: AtomicBool,
    persist_failures: AtomicUsize,
}

impl Shared {
    fn submit(shared: &Arc<Self>, url: Url) -> bool {
        if shared.closed.load(Ordering::SeqCst) {
            tracing::debug!("Scheduler shut down, dropping {}", url);
            return false;
        }

        if !shared.frontier.try_admit(&url) {
            tracing::trace!("Not admitted (known or frontier full): {}", url);
            return false;
        }

        tracing::debug!(
            "Admitted {} ({}/{})",
            url,
            shared.frontier.admitted(),
            shared.frontier.max_pages()
        );

        let guard = shared.outstanding.begin();
        let task_shared = Arc::clone(shared);
        tokio::spawn(async move {
            let _guard = guard;
            task_shared.run_task(url).await;
        });

        true
    }

    async fn run_task(self: Arc<Self>, url: Url) {
        let permit = match Arc::clone(&self.pool).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                self.frontier.mark_failed(&url, "worker pool closed");
                return;
            }
        };

        let result = self.fetcher.fetch(&url).await;
        drop(permit);

        match result {
            Ok(page) => {
                tracing::debug!(
                    "Completed {} ({} bytes, {} attempt(s), {} links)",
                    url,
                    page.content_length,
                    page.attempts,
                    page.links.len()
                );
                self.frontier.mark_done(&url);
                if !page.persisted() {
                    self.persist_failures.fetch_add(1, Ordering::SeqCst);
                }

                for child in page.links {
                    Self::submit(&self, child);
                }
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.frontier.mark_failed(&url, e.to_string());
            }
        }
    }
}

/// Runs fetch tasks for admitted URLs on a bounded worker pool
pub struct CrawlScheduler {
    shared: Arc<Shared>,
}

impl CrawlScheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `frontier` - The admission gate for this run
    /// * `fetcher` - The fetch logic executed by workers
    /// * `worker_count` - Maximum concurrent fetches (at least 1)
    pub fn new(frontier: Arc<Frontier>, fetcher: Arc<Fetcher>, worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);

        Self {
            shared: Arc::new(Shared {
                frontier,
                fetcher,
                pool: Arc::new(Semaphore::new(worker_count)),
                outstanding: Arc::new(OutstandingTasks::new()),
                closed: AtomicBool::new(false),
                persist_failures: AtomicUsize::new(0),
            }),
        }
    }

    /// Submits a candidate URL
    ///
    /// Returns true if the frontier admitted it and a task was created. A
    /// duplicate, a URL past the cap, or a submit after shutdown is a no-op.
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, url: Url) -> bool {
        Shared::submit(&self.shared, url)
    }

    /// Suspends until every submitted task has completed
    pub async fn wait_idle(&self) {
        self.shared.outstanding.wait_idle().await;
    }

    /// Closes the worker pool; later submissions are rejected
    pub fn shutdown(&self) {
        self.shared.closed.store(true, Ordering::SeqCst);
        self.shared.pool.close();
        tracing::debug!("Worker pool shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Number of tasks submitted but not yet completed
    pub fn outstanding(&self) -> usize {
        self.shared.outstanding.count()
    }

    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.shared.frontier
    }

    /// Pages fetched successfully but not persisted
    pub fn persist_failures(&self) -> usize {
        self.shared.persist_failures.load(Ordering::SeqCst)
    }
}
