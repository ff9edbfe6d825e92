//! Configuration module for Site-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will retry {} times", config.crawler.max_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BatchConfig, Config, CrawlerConfig, OutputConfig, StorageBackend, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
