//! Crawl manager - one crawl run per seed URL
//!
//! The manager owns the long-lived collaborators (transport, link
//! extractor, page store, configuration) and builds a fresh frontier and
//! scheduler for every call to [`CrawlManager::run`]. Runs never share
//! crawl state, so one manager can drive several runs concurrently.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{Fetcher, RetryPolicy};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::scheduler::CrawlScheduler;
use crate::crawler::transport::{HttpTransport, Transport};
use crate::output::CrawlSummary;
use crate::storage::{open_store, PageStore};
use crate::url::{normalize_url, site_root};
use crate::{CrawlError, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Drives complete crawl runs
#[derive(Clone)]
pub struct CrawlManager {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn LinkExtractor>,
    store: Arc<dyn PageStore>,
}

impl CrawlManager {
    /// Creates a manager from explicit collaborators
    pub fn new(
        config: Config,
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn LinkExtractor>,
        store: Arc<dyn PageStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            extractor,
            store,
        }
    }

    /// Creates a manager with the HTTP transport, HTML extractor and the
    /// page store selected by the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlManager)` - Ready to run crawls
    /// * `Err(CrawlError)` - The configuration is invalid, or the HTTP client
    ///   or the store could not be created
    pub fn from_config(config: Config) -> Result<Self> {
        validate(&config)?;
        let transport = HttpTransport::from_config(&config.user_agent, &config.crawler)?;
        let store = open_store(&config.output)?;

        Ok(Self::new(
            config,
            Arc::new(transport),
            Arc::new(HtmlLinkExtractor),
            store,
        ))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls from the site root of `seed` until no work remains
    ///
    /// The site root (the seed up to and including the last `/` after
    /// `//`) is the first URL submitted. It is a starting point only: links
    /// to other origins are followed like any other.
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed URL
    /// * `max_pages` - Maximum number of URLs admitted in this run
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The run terminated
    /// * `Err(CrawlError)` - The seed is malformed or storage is unusable
    pub async fn run(&self, seed: &str, max_pages: usize) -> Result<CrawlSummary> {
        let root = site_root(seed);
        let root_url = normalize_url(&root)
            .map_err(|e| CrawlError::MalformedInput(format!("seed '{}': {}", seed, e)))?;

        self.store.prepare()?;

        let started_at = Utc::now();
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} (root {}, max {} pages)",
            seed,
            root_url,
            max_pages
        );

        let frontier = Arc::new(Frontier::new(max_pages));
        let fetcher = Arc::new(Fetcher::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.extractor),
            Arc::clone(&self.store),
            RetryPolicy::from(&self.config.crawler),
        ));
        let scheduler = CrawlScheduler::new(
            Arc::clone(&frontier),
            fetcher,
            self.config.crawler.worker_count,
        );

        if !scheduler.submit(root_url.clone()) {
            tracing::info!("Nothing admitted for {} (max {} pages)", root_url, max_pages);
        }

        scheduler.wait_idle().await;
        scheduler.shutdown();

        let counts = frontier.counts();
        let summary = CrawlSummary {
            seed: seed.to_string(),
            root: root_url.to_string(),
            max_pages,
            admitted: counts.admitted(),
            fetched: counts.done,
            failed: counts.failed,
            persist_failures: scheduler.persist_failures(),
            started_at,
            finished_at: Utc::now(),
            elapsed: start_time.elapsed(),
            failures: frontier
                .failures()
                .into_iter()
                .map(|(url, reason)| (url.to_string(), reason))
                .collect(),
        };

        tracing::info!(
            "Crawl of {} completed: {} fetched, {} failed in {:?}",
            seed,
            summary.fetched,
            summary.failed,
            summary.elapsed
        );

        Ok(summary)
    }
}
