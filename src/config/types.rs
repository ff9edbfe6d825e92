use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Site-Crawler
///
/// Every section has defaults, so an empty file (or no file at all) yields
/// a working configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub batch: BatchConfig,
}

/// Per-run crawler behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of concurrent fetches within one crawl run
    pub worker_count: usize,

    /// Fetch attempts per URL before the URL is recorded as failed
    pub max_attempts: u32,

    /// Fixed delay between attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Timeout of a single HTTP request (seconds)
    pub request_timeout_secs: u64,
}

impl CrawlerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            worker_count: 2,
            max_attempts: 3,
            retry_delay_ms: 5000,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Where fetched pages are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One file per page under `directory`
    #[default]
    Files,

    /// One row per page in the SQLite database at `database-path`
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Storage backend for fetched pages
    pub backend: StorageBackend,

    /// Directory for the `files` backend
    pub directory: PathBuf,

    /// Database file for the `sqlite` backend
    pub database_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Files,
            directory: PathBuf::from("./pages"),
            database_path: PathBuf::from("./pages.db"),
        }
    }
}

/// Batch driver configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BatchConfig {
    /// Number of crawl jobs running at the same time
    pub max_concurrent_jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 5,
        }
    }
}
