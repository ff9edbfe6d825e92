//! Site-Crawler main entry point
//!
//! This is the command-line interface for the batch site crawler.

use anyhow::Context;
use clap::Parser;
use site_crawler::batch::{load_jobs, run_batch, JobList};
use site_crawler::config::{load_config_with_hash, validate, Config};
use site_crawler::output::print_batch_report;
use site_crawler::{site_root, CrawlManager};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Crawler: a bounded concurrent site crawler
///
/// Reads crawl jobs (`seedUrl,maxPages`, one per line) from a job file and
/// crawls each site from its root, saving every fetched page.
#[derive(Parser, Debug)]
#[command(name = "site-crawler")]
#[command(version)]
#[command(about = "A bounded concurrent site crawler", long_about = None)]
struct Cli {
    /// Path to the job file
    #[arg(value_name = "JOBS_FILE")]
    jobs: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Concurrent fetches per crawl (overrides the config file)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Directory for saved pages (overrides the config file)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Parse jobs and configuration and show what would be crawled
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli)?;

    tracing::info!("Reading jobs from: {}", cli.jobs.display());
    let jobs = load_jobs(&cli.jobs)
        .with_context(|| format!("Failed to read job file {}", cli.jobs.display()))?;
    tracing::info!(
        "{} job(s) loaded, {} malformed line(s) skipped",
        jobs.jobs.len(),
        jobs.errors.len()
    );

    if cli.dry_run {
        handle_dry_run(&config, &jobs);
        return Ok(());
    }

    handle_batch(config, jobs).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_crawler=info,warn"),
            1 => EnvFilter::new("site_crawler=debug,info"),
            2 => EnvFilter::new("site_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given and applies command-line overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(workers) = cli.workers {
        config.crawler.worker_count = workers;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, jobs: &JobList) {
    println!("=== Site-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers per crawl: {}", config.crawler.worker_count);
    println!("  Attempts per page: {}", config.crawler.max_attempts);
    println!("  Retry delay: {}ms", config.crawler.retry_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Concurrent jobs: {}", config.batch.max_concurrent_jobs);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Backend: {:?}", config.output.backend);
    println!("  Directory: {}", config.output.directory.display());
    println!("  Database: {}", config.output.database_path.display());

    println!("\nJobs ({}):", jobs.jobs.len());
    for job in &jobs.jobs {
        println!(
            "  - line {}: {} (root {}, max {} pages)",
            job.line,
            job.seed,
            site_root(&job.seed),
            job.max_pages
        );
    }

    if !jobs.errors.is_empty() {
        println!("\nMalformed Lines ({}):", jobs.errors.len());
        for error in &jobs.errors {
            println!("  - {}", error);
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would run {} crawl job(s)", jobs.jobs.len());
}

/// Handles the main batch operation
async fn handle_batch(config: Config, jobs: JobList) -> anyhow::Result<()> {
    let max_concurrent_jobs = config.batch.max_concurrent_jobs;
    let manager = CrawlManager::from_config(config).context("Failed to set up crawler")?;

    let report = run_batch(jobs, &manager, max_concurrent_jobs).await;
    tracing::info!(
        "Batch completed: {} crawl(s) finished, {} failed to start",
        report.summaries.len(),
        report.failed_jobs.len()
    );

    print_batch_report(&report);
    Ok(())
}
