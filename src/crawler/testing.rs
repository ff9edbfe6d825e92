//! In-memory collaborators for crawler unit tests

use crate::crawler::transport::{RetrievedPage, Transport, TransportError};
use crate::storage::{PageStore, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

struct StubPage {
    body: String,
    failures_left: usize,
}

/// Transport serving canned pages; unknown URLs answer HTTP 404
#[derive(Default)]
pub struct StubTransport {
    pages: Mutex<HashMap<String, StubPage>>,
    redirects: Mutex<HashMap<String, String>>,
    calls: Mutex<HashMap<String, usize>>,
    latency: Mutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self, url: &str, body: &str) {
        self.flaky_page(url, body, 0);
    }

    /// Serves `body` after failing the first `failures` requests
    pub fn flaky_page(&self, url: &str, body: &str, failures: usize) {
        self.pages.lock().unwrap().insert(
            url.to_string(),
            StubPage {
                body: body.to_string(),
                failures_left: failures,
            },
        );
    }

    /// Serves the page at `to` for requests to `from`
    pub fn redirect(&self, from: &str, to: &str) {
        self.redirects
            .lock()
            .unwrap()
            .insert(from.to_string(), to.to_string());
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch(&self, url: &Url) -> Result<RetrievedPage, TransportError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        let target = self.redirects.lock().unwrap().get(url.as_str()).cloned();
        let served_from = match target {
            Some(to) => Url::parse(&to).unwrap(),
            None => url.clone(),
        };
        let key = served_from.to_string();

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let outcome = {
            let mut pages = self.pages.lock().unwrap();
            match pages.get_mut(&key) {
                Some(page) if page.failures_left > 0 => {
                    page.failures_left -= 1;
                    Err(TransportError::Status { url: key, status: 503 })
                }
                Some(page) => Ok(RetrievedPage {
                    url: served_from.clone(),
                    body: page.body.clone(),
                }),
                None => Err(TransportError::Status { url: key, status: 404 }),
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Page store keeping everything in a map
#[derive(Default)]
pub struct MemoryStore {
    pages: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pages.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

impl PageStore for MemoryStore {
    fn prepare(&self) -> StorageResult<()> {
        Ok(())
    }

    fn save(&self, name: &str, content: &[u8]) -> StorageResult<()> {
        self.pages
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_vec());
        Ok(())
    }
}
