//! Crawler module for concurrent site crawling
//!
//! This module contains the core crawling logic, including:
//! - The frontier deciding which URLs are fetched
//! - Page retrieval with retry logic
//! - HTML parsing and link extraction
//! - The bounded worker pool and termination detection
//! - Overall crawl run management

mod fetcher;
mod frontier;
mod manager;
mod parser;
mod scheduler;
mod termination;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::{CrawlResult, FetchError, FetchedPage, Fetcher, RetryPolicy};
pub use frontier::{Frontier, FrontierCounts};
pub use manager::CrawlManager;
pub use parser::{parse_links, HtmlLinkExtractor, LinkExtractor};
pub use scheduler::CrawlScheduler;
pub use termination::{OutstandingGuard, OutstandingTasks};
pub use transport::{build_http_client, HttpTransport, RetrievedPage, Transport, TransportError};
