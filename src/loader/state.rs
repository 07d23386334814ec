//! Loader phases and host-facing snapshots
//!
//! Pure data structures. The host renders from these; no transition logic
//! lives here.

use std::fmt;

use crate::search::{Issue, SearchError, SearchErrorKind};

/// Where a loader currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No load issued yet
    #[default]
    Idle,
    /// First page for the current query is in flight
    InitialLoading,
    /// At least one page is loaded and current
    Ready,
    /// A load-more is in flight while the loaded pages stay visible
    Appending,
    /// The last fetch failed; cleared by a retry or a filter change
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::InitialLoading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Appending => write!(f, "appending"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Record of a failed fetch, kept cloneable for snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub kind: SearchErrorKind,
    pub message: String,
}

impl From<&SearchError> for LoadFailure {
    fn from(err: &SearchError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Read-only view of a loader for rendering.
///
/// Items are ordered exactly as pages arrived. `total_count` is the
/// remote's report for the full result universe, which may exceed
/// `items.len()` while further pages remain.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: Phase,
    pub items: Vec<Issue>,
    pub total_count: u64,
    pub has_more: bool,
    pub failure: Option<LoadFailure>,
}

impl Snapshot {
    /// Initial load in flight with nothing to show yet (spinner)
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::InitialLoading && self.items.is_empty()
    }

    /// A load-more is in flight (disable the load-more affordance)
    pub fn is_loading_more(&self) -> bool {
        self.phase == Phase::Appending
    }

    /// Loaded and genuinely empty (show an empty-state message)
    pub fn is_empty_result(&self) -> bool {
        self.phase == Phase::Ready && self.total_count == 0
    }

    /// A count badge can be shown (some load has completed; after a
    /// failure only if loaded items were retained)
    pub fn has_count(&self) -> bool {
        match self.phase {
            Phase::Ready | Phase::Appending => true,
            Phase::Failed => !self.items.is_empty(),
            Phase::Idle | Phase::InitialLoading => false,
        }
    }
}
