//! Search error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while executing a remote search
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("Search rejected by remote: {message}")]
    Remote { message: String },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a [`SearchError`], used by hosts to pick a
/// user-facing message without matching on the full error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    /// Transport or connectivity failure
    Network,
    /// The remote rejected the query (commonly malformed filter syntax)
    Remote,
    /// Throttled, the caller must back off
    RateLimited,
    /// Missing or unusable credentials
    Auth,
    /// The remote answered with something we could not understand
    Malformed,
}

impl SearchError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SearchError::RateLimited { .. })
    }

    /// Get the backoff duration if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SearchError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// Classify this error for host-facing reporting
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            SearchError::RateLimited { .. } => SearchErrorKind::RateLimited,
            SearchError::Remote { .. } | SearchError::Api { .. } => SearchErrorKind::Remote,
            SearchError::Network(_) => SearchErrorKind::Network,
            SearchError::Auth(_) => SearchErrorKind::Auth,
            SearchError::InvalidResponse(_) | SearchError::Json(_) => SearchErrorKind::Malformed,
        }
    }
}
