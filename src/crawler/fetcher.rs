//! Page fetcher
//!
//! The fetcher performs one fetch-and-discover unit of work:
//! - Retrieve the page through the transport, retrying transient failures
//! - Persist the content under its sanitized name
//! - Extract the outgoing links, resolved against the URL the page was
//!   served from (after redirects)
//!
//! It holds no per-page state and knows nothing about the frontier, so the
//! same fetcher is shared by every worker of a run.

use crate::config::CrawlerConfig;
use crate::crawler::parser::LinkExtractor;
use crate::crawler::transport::{RetrievedPage, Transport, TransportError};
use crate::storage::{page_file_name, PageStore};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Fixed retry policy: bounded attempts, constant delay, no backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Pause between two consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl From<&CrawlerConfig> for RetryPolicy {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: config.retry_delay(),
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was fetched
    pub url: Url,

    /// URL the content was served from; differs from `url` after a redirect
    pub final_url: Url,

    /// Name the content was persisted under
    pub stored_as: String,

    /// Size of the retrieved content in bytes
    pub content_length: usize,

    /// Absolute URLs linked from the page
    pub links: HashSet<Url>,

    /// Attempts needed to retrieve the page
    pub attempts: u32,

    /// Persistence failure, if the content could not be saved
    pub persist_error: Option<String>,
}

impl FetchedPage {
    /// Returns true if the content reached storage
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Terminal failure of a fetch task
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Giving up on {url} after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: TransportError,
    },
}

/// Outcome of one crawl task
pub type CrawlResult = Result<FetchedPage, FetchError>;

/// Stateless fetch-persist-extract worker logic
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn LinkExtractor>,
    store: Arc<dyn PageStore>,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn LinkExtractor>,
        store: Arc<dyn PageStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            extractor,
            store,
            retry,
        }
    }

    /// Fetches a page, persists it and extracts its links
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Any transport failure | Retry after the fixed delay |
    /// | `max_attempts` failures | Return `FetchError::RetriesExhausted` |
    /// | Storage failure | Log, keep going with link extraction |
    ///
    /// Nothing is written when retrieval fails.
    pub async fn fetch(&self, url: &Url) -> CrawlResult {
        let (retrieved, attempts) = self.retrieve(url).await?;
        let RetrievedPage {
            url: final_url,
            body: content,
        } = retrieved;
        tracing::info!("Downloaded {} ({} bytes)", url, content.len());

        let stored_as = page_file_name(url);
        let persist_error = match self.store.save(&stored_as, content.as_bytes()) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Failed to persist {} as {}: {}", url, stored_as, e);
                Some(e.to_string())
            }
        };

        let links = self.extractor.extract_links(&content, &final_url);
        tracing::debug!("Found {} links on {}", links.len(), url);

        Ok(FetchedPage {
            url: url.clone(),
            final_url,
            stored_as,
            content_length: content.len(),
            links,
            attempts,
            persist_error,
        })
    }

    /// Retrieves the raw content, applying the retry policy
    async fn retrieve(&self, url: &Url) -> Result<(RetrievedPage, u32), FetchError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.transport.fetch(url).await {
                Ok(page) => return Ok((page, attempt)),
                Err(e) if attempt >= max_attempts => {
                    tracing::warn!("Failed download from {} ({}/{}): {}", url, attempt, max_attempts, e);
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        last_error: e,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed download from {} ({}/{}), retrying in {:?}: {}",
                        url,
                        attempt,
                        max_attempts,
                        self.retry.delay,
                        e
                    );
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
