//! End-to-end tests against mock HTTP servers

mod batch_tests;
mod crawl_tests;
