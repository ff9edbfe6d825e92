//! Storage module for persisting fetched pages
//!
//! This module handles everything written to durable storage during a crawl:
//! - Deriving a sanitized name from a page URL
//! - The `PageStore` collaborator interface
//! - File system and SQLite backends

mod files;
mod schema;
mod sqlite;
mod traits;

pub use files::FileStore;
pub use sqlite::SqliteStore;
pub use traits::{PageStore, StorageError, StorageResult};

use crate::config::{OutputConfig, StorageBackend};
use std::sync::Arc;
use url::Url;

/// Derives the storage name of a page from its URL
///
/// Every character other than ASCII letters, digits, `.` and `-` is
/// removed and `.html` is appended. The mapping is deterministic but not
/// injective: `https://a.com/b-c` and `https://a.com/b/-c` end up with
/// the same name.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_crawler::storage::page_file_name;
///
/// let url = Url::parse("https://example.com/docs/page?id=7").unwrap();
/// assert_eq!(page_file_name(&url), "httpsexample.comdocspageid7.html");
/// ```
pub fn page_file_name(url: &Url) -> String {
    let mut name: String = url
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-')
        .collect();
    name.push_str(".html");
    name
}

/// Opens the page store selected by the output configuration
pub fn open_store(config: &OutputConfig) -> StorageResult<Arc<dyn PageStore>> {
    let store: Arc<dyn PageStore> = match config.backend {
        StorageBackend::Files => Arc::new(FileStore::new(&config.directory)),
        StorageBackend::Sqlite => Arc::new(SqliteStore::new(&config.database_path)?),
    };
    Ok(store)
}
