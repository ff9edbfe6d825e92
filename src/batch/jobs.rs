//! Job file parsing
//!
//! A job file holds one crawl job per line in the form `seedUrl,maxPages`.
//! All whitespace is removed before the line is split, so `  http://a.com/ ,
//! 5` is a valid job. Trailing empty fields are dropped before counting, so
//! `http://a.com/,5,` is valid too. Malformed lines are collected as
//! [`JobError`]s and never stop the remaining lines from being read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// A single crawl job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlJob {
    /// 1-based line number in the job file
    pub line: usize,

    /// Seed URL, not yet validated
    pub seed: String,

    /// Page cap for the run
    pub max_pages: usize,
}

/// A job line that could not be parsed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobError {
    /// Not exactly two fields once trailing empty fields are dropped
    #[error("line {line}: expected 'seedUrl,maxPages', found {fields} field(s)")]
    FieldCount { line: usize, fields: usize },

    /// The page cap is not an integer; negative caps parse and mean zero pages
    #[error("line {line}: max pages '{value}' is not a number")]
    InvalidMaxPages { line: usize, value: String },
}

impl JobError {
    pub fn line(&self) -> usize {
        match self {
            JobError::FieldCount { line, .. } | JobError::InvalidMaxPages { line, .. } => *line,
        }
    }
}

/// Jobs read from a job file, with the lines that were rejected
#[derive(Debug, Clone, Default)]
pub struct JobList {
    pub jobs: Vec<CrawlJob>,
    pub errors: Vec<JobError>,
}

/// Parses one job line
///
/// # Returns
///
/// * `Ok(Some(CrawlJob))` - A well-formed job
/// * `Ok(None)` - The line is blank
/// * `Err(JobError)` - Wrong field count or a non-numeric page cap
pub fn parse_job_line(line: usize, raw: &str) -> Result<Option<CrawlJob>, JobError> {
    let clean: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if clean.is_empty() {
        return Ok(None);
    }

    let mut fields: Vec<&str> = clean.split(',').collect();
    while fields.last() == Some(&"") {
        fields.pop();
    }

    let [seed, max_pages] = fields.as_slice() else {
        return Err(JobError::FieldCount {
            line,
            fields: fields.len(),
        });
    };

    let max_pages = max_pages
        .parse::<i64>()
        .map_err(|_| JobError::InvalidMaxPages {
            line,
            value: max_pages.to_string(),
        })?;

    Ok(Some(CrawlJob {
        line,
        seed: seed.to_string(),
        max_pages: usize::try_from(max_pages).unwrap_or(0),
    }))
}

/// Reads every job from `reader`
pub fn read_jobs<R: BufRead>(reader: R) -> crate::Result<JobList> {
    let mut list = JobList::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_job_line(index + 1, &line) {
            Ok(Some(job)) => list.jobs.push(job),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Skipping job: {}", e);
                list.errors.push(e);
            }
        }
    }

    Ok(list)
}

/// Reads the job file at `path`
pub fn load_jobs(path: &Path) -> crate::Result<JobList> {
    let file = File::open(path)?;
    read_jobs(BufReader::new(file))
}
