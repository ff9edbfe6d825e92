//! Crawl frontier: the set of admitted URLs and the page cap
//!
//! The frontier is the only authority on whether a URL gets fetched.
//! Membership test, capacity check and insertion happen under one lock, so
//! two workers can never both admit the same URL and new admissions can
//! never push the count past `max_pages`.
//!
//! Entries are never removed. A URL that finished (or failed) stays known
//! so it cannot be admitted a second time.

use crate::state::UrlState;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// Tally of admitted URLs by state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierCounts {
    pub pending: usize,
    pub done: usize,
    pub failed: usize,
}

impl FrontierCounts {
    pub fn admitted(&self) -> usize {
        self.pending + self.done + self.failed
    }
}

/// Thread-safe registry of admitted URLs with a hard capacity
#[derive(Debug)]
pub struct Frontier {
    max_pages: usize,
    states: Mutex<HashMap<Url, UrlState>>,
}

impl Frontier {
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages,
            states: Mutex::new(HashMap::new()),
        }
    }

    // Every critical section is a single map operation, so the map is
    // consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HashMap<Url, UrlState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `url` for fetching
    ///
    /// Returns true and records the URL as `Pending` iff it was unknown and
    /// fewer than `max_pages` URLs have been admitted. A false return is the
    /// normal dedup/cap signal, not an error.
    pub fn try_admit(&self, url: &Url) -> bool {
        let mut states = self.lock();

        if states.contains_key(url) || states.len() >= self.max_pages {
            return false;
        }

        states.insert(url.clone(), UrlState::Pending);
        true
    }

    /// Records a successful fetch
    pub fn mark_done(&self, url: &Url) {
        self.set_state(url, UrlState::Done);
    }

    /// Records a terminal fetch failure
    pub fn mark_failed(&self, url: &Url, reason: impl Into<String>) {
        self.set_state(
            url,
            UrlState::Failed {
                reason: reason.into(),
            },
        );
    }

    fn set_state(&self, url: &Url, state: UrlState) {
        let mut states = self.lock();
        match states.get_mut(url) {
            Some(current) => {
                if current.is_terminal() {
                    tracing::warn!("{} reported again: {} -> {}", url, current, state);
                }
                *current = state;
            }
            // Inserting here would bypass the cap
            None => tracing::warn!("Ignoring {} for {}: URL was never admitted", state, url),
        }
    }

    /// Returns the recorded state of `url`, if it was admitted
    pub fn state_of(&self, url: &Url) -> Option<UrlState> {
        self.lock().get(url).cloned()
    }

    /// Number of URLs admitted so far
    pub fn admitted(&self) -> usize {
        self.lock().len()
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Returns true once no further URL can be admitted
    pub fn is_full(&self) -> bool {
        self.admitted() >= self.max_pages
    }

    /// Counts admitted URLs by state
    pub fn counts(&self) -> FrontierCounts {
        let states = self.lock();
        let mut counts = FrontierCounts::default();
        for state in states.values() {
            if state.is_success() {
                counts.done += 1;
            } else if state.is_failure() {
                counts.failed += 1;
            } else {
                counts.pending += 1;
            }
        }
        counts
    }

    /// Lists failed URLs with their reasons, sorted by URL
    pub fn failures(&self) -> Vec<(Url, String)> {
        let states = self.lock();
        let mut failures: Vec<(Url, String)> = states
            .iter()
            .filter_map(|(url, state)| match state {
                UrlState::Failed { reason } => Some((url.clone(), reason.clone())),
                _ => None,
            })
            .collect();
        failures.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        failures
    }
}
