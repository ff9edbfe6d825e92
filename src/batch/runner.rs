//! Concurrent execution of crawl jobs
//!
//! Each job is one [`CrawlManager::run`] call. At most
//! `max_concurrent_jobs` runs are in progress at a time; a job that cannot
//! start (malformed seed, unusable storage) is recorded and the others
//! carry on.

use crate::batch::jobs::{CrawlJob, JobError, JobList};
use crate::crawler::CrawlManager;
use crate::output::CrawlSummary;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Completed runs, in job file order
    pub summaries: Vec<(CrawlJob, CrawlSummary)>,

    /// Job lines rejected while reading the job file
    pub format_errors: Vec<JobError>,

    /// Jobs that could not run, with the reason
    pub failed_jobs: Vec<(CrawlJob, String)>,
}

impl BatchReport {
    /// Number of jobs that were started
    pub fn jobs_started(&self) -> usize {
        self.summaries.len() + self.failed_jobs.len()
    }
}

/// Runs every job in `list` through `manager`
///
/// # Arguments
///
/// * `list` - Parsed jobs and the format errors found while reading them
/// * `manager` - Shared crawl manager; each job gets its own run state
/// * `max_concurrent_jobs` - Upper bound on simultaneous runs (at least 1)
pub async fn run_batch(
    list: JobList,
    manager: &CrawlManager,
    max_concurrent_jobs: usize,
) -> BatchReport {
    let JobList { jobs, errors } = list;
    let mut report = BatchReport {
        format_errors: errors,
        ..Default::default()
    };

    tracing::info!(
        "Running {} job(s), {} at a time",
        jobs.len(),
        max_concurrent_jobs.max(1)
    );

    let limiter = Arc::new(Semaphore::new(max_concurrent_jobs.max(1)));
    let mut running = JoinSet::new();
    let mut started = HashMap::new();

    for job in jobs {
        let permit = match Arc::clone(&limiter).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let manager = manager.clone();
        let task_job = job.clone();

        let handle = running.spawn(async move {
            let _permit = permit;
            manager.run(&task_job.seed, task_job.max_pages).await
        });
        started.insert(handle.id(), job);
    }

    while let Some(joined) = running.join_next_with_id().await {
        let (id, outcome) = match joined {
            Ok((id, result)) => (id, result.map_err(|e| e.to_string())),
            Err(e) => (e.id(), Err(format!("crawl task panicked: {}", e))),
        };
        let Some(job) = started.remove(&id) else {
            continue;
        };

        match outcome {
            Ok(summary) => report.summaries.push((job, summary)),
            Err(reason) => {
                tracing::error!("Job on line {} ({}) failed: {}", job.line, job.seed, reason);
                report.failed_jobs.push((job, reason));
            }
        }
    }

    report.summaries.sort_by_key(|(job, _)| job.line);
    report.failed_jobs.sort_by_key(|(job, _)| job.line);
    report
}
