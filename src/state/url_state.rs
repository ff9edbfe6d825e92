//! Visitation state definitions for admitted URLs
//!
//! Every URL the frontier admits starts as `Pending` and moves to exactly
//! one terminal state once its task completes.

use std::fmt;

/// Represents the current state of an admitted URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UrlState {
    /// Admitted and waiting for (or undergoing) its fetch
    Pending,

    /// Fetched successfully
    Done,

    /// Fetch failed after all retry attempts
    Failed {
        /// Last error reported by the transport
        reason: String,
    },
}

impl UrlState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if this represents a successful fetch
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if this represents a failed fetch
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Short lowercase label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "failed ({})", reason),
            other => write!(f, "{}", other.label()),
        }
    }
}
