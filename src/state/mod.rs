//! State module for tracking crawl progress
//!
//! This module provides the visitation state recorded for every URL the
//! frontier has admitted.

mod url_state;

// Re-export main types
pub use url_state::UrlState;
