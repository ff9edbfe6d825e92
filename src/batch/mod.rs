//! Batch driver for running many crawl jobs from one job file
//!
//! This module handles:
//! - Parsing `seedUrl,maxPages` job lines
//! - Collecting malformed lines without aborting the batch
//! - Running jobs concurrently with a bounded job count

mod jobs;
mod runner;

pub use jobs::{load_jobs, parse_job_line, read_jobs, CrawlJob, JobError, JobList};
pub use runner::{run_batch, BatchReport};
