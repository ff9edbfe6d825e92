//! Page retrieval transport
//!
//! This module handles the raw HTTP side of a fetch:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests returning the page body as text
//! - Classifying failures into transport errors
//!
//! A transport makes exactly one attempt per call. Retrying is the
//! fetcher's job.

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// A single failed retrieval attempt
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Content of a retrieved page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedPage {
    /// URL the body was served from, after any redirects
    pub url: Url,

    pub body: String,
}

/// Collaborator that retrieves the raw content of a page
#[async_trait]
pub trait Transport: Send + Sync {
    /// Retrieves `url` once, following redirects
    async fn fetch(&self, url: &Url) -> Result<RetrievedPage, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Crawler settings (request timeout)
///
/// # Example
///
/// ```no_run
/// use site_crawler::config::{CrawlerConfig, UserAgentConfig};
/// use site_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(crawler.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP transport backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration and wraps it
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, crawler)?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<RetrievedPage, TransportError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        if final_url != *url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;
        Ok(RetrievedPage {
            url: final_url,
            body,
        })
    }
}

/// Maps a `reqwest` error onto the transport error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> TransportError {
    let url = url.to_string();
    if error.is_timeout() {
        TransportError::Timeout { url }
    } else if error.is_connect() {
        TransportError::Connect {
            url,
            message: error.to_string(),
        }
    } else {
        TransportError::Request {
            url,
            message: error.to_string(),
        }
    }
}
