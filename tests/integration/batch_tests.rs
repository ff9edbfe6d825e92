//! Integration tests for the batch driver

use crate::crawl_tests::{create_test_config, mount_page};
use site_crawler::batch::{load_jobs, run_batch, JobError};
use site_crawler::CrawlManager;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::MockServer;

fn write_jobs(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create job file");
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[tokio::test]
async fn test_batch_skips_malformed_lines() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>home</p>".to_string(), 1).await;

    let jobs = write_jobs(&[
        "this line is not a job".to_string(),
        format!("{}/ , 5", mock_server.uri()),
    ]);
    let list = load_jobs(jobs.path()).expect("Failed to read jobs");
    assert_eq!(list.jobs.len(), 1);
    assert_eq!(list.errors, vec![JobError::FieldCount { line: 1, fields: 1 }]);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let max_jobs = config.batch.max_concurrent_jobs;
    let manager = CrawlManager::from_config(config).unwrap();

    let report = run_batch(list, &manager, max_jobs).await;

    assert_eq!(report.jobs_started(), 1);
    assert_eq!(report.summaries[0].1.fetched, 1);
    assert_eq!(report.format_errors.len(), 1);
}

#[tokio::test]
async fn test_batch_runs_jobs_independently() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_page(&first, "/", r#"<a href="/a">A</a>"#.to_string(), 1).await;
    mount_page(&first, "/a", String::new(), 1).await;
    mount_page(&second, "/", String::new(), 1).await;

    let jobs = write_jobs(&[
        format!("{}/,10", first.uri()),
        "http://example.com,lots".to_string(),
        format!("{}/,10", second.uri()),
        "not-a-url,3".to_string(),
    ]);
    let list = load_jobs(jobs.path()).unwrap();

    let dir = TempDir::new().unwrap();
    let manager = CrawlManager::from_config(create_test_config(dir.path())).unwrap();

    let report = run_batch(list, &manager, 2).await;

    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.summaries[0].1.fetched, 2);
    assert_eq!(report.summaries[1].1.fetched, 1);
    assert_eq!(report.failed_jobs.len(), 1);
    assert_eq!(report.failed_jobs[0].0.line, 4);
    assert_eq!(report.format_errors.len(), 1);
    assert_eq!(report.format_errors[0].line(), 2);
}
