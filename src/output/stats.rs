//! Crawl run statistics
//!
//! This module provides the summary record returned by a crawl run and
//! functionality for displaying it.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Seed URL as given in the job
    pub seed: String,

    /// Site root the crawl started from
    pub root: String,

    /// Page cap for the run
    pub max_pages: usize,

    /// URLs admitted by the frontier
    pub admitted: usize,

    /// Pages fetched successfully
    pub fetched: usize,

    /// Pages that failed every attempt
    pub failed: usize,

    /// Fetched pages whose content could not be persisted
    pub persist_failures: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Failed URLs with the reason, sorted by URL
    pub failures: Vec<(String, String)>,
}

impl CrawlSummary {
    /// Share of admitted pages fetched successfully, in percent
    pub fn success_rate(&self) -> f64 {
        if self.admitted > 0 {
            (self.fetched as f64 / self.admitted as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Pages fetched per second
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.fetched as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints one run summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl: {} ===\n", summary.seed);

    println!("Overview:");
    println!("  Site root: {}", summary.root);
    println!(
        "  Admitted: {} / {} max pages",
        summary.admitted, summary.max_pages
    );
    println!("  Fetched: {}", summary.fetched);
    println!("  Failed: {}", summary.failed);
    if summary.persist_failures > 0 {
        println!("  Not persisted: {}", summary.persist_failures);
    }
    println!(
        "  Duration: {:.2}s ({:.2} pages/sec)",
        summary.elapsed.as_secs_f64(),
        summary.pages_per_second()
    );
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!();

    if !summary.failures.is_empty() {
        println!("Failed URLs ({}):", summary.failures.len());
        for (url, reason) in &summary.failures {
            println!("  - {}: {}", url, reason);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        summary.success_rate(),
        summary.fetched,
        summary.admitted
    );
    println!();
}
