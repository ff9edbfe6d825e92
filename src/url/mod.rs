//! URL handling module for Site-Crawler
//!
//! This module provides URL normalization (the crawl's dedup key) and seed
//! site-root computation.

mod normalize;

// Re-export main functions
pub use normalize::{normalize_parsed, normalize_url, site_root};
