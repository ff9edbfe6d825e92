//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - The per-run summary record
//! - Printing run summaries and the batch report

mod report;
pub mod stats;

pub use report::print_batch_report;
pub use stats::{print_summary, CrawlSummary};
