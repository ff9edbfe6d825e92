//! Batch report printing

use crate::batch::BatchReport;
use crate::output::stats::print_summary;

/// Prints every run summary followed by the batch totals
pub fn print_batch_report(report: &BatchReport) {
    for (_, summary) in &report.summaries {
        print_summary(summary);
    }

    println!("=== Batch Report ===\n");
    println!("  Jobs completed: {}", report.summaries.len());
    println!("  Jobs failed to start: {}", report.failed_jobs.len());
    println!("  Malformed job lines: {}", report.format_errors.len());

    let fetched: usize = report.summaries.iter().map(|(_, s)| s.fetched).sum();
    let failed: usize = report.summaries.iter().map(|(_, s)| s.failed).sum();
    println!("  Pages fetched: {}", fetched);
    println!("  Pages failed: {}", failed);
    println!();

    if !report.failed_jobs.is_empty() {
        println!("Failed Jobs:");
        for (job, reason) in &report.failed_jobs {
            println!("  - line {} ({}): {}", job.line, job.seed, reason);
        }
        println!();
    }

    if !report.format_errors.is_empty() {
        println!("Malformed Lines:");
        for error in &report.format_errors {
            println!("  - {}", error);
        }
        println!();
    }
}
