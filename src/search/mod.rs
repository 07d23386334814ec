//! Remote search module
//!
//! Executes composed queries against a cursor-paginated issue-search
//! endpoint, one page per call.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod github;
mod types;

pub use client::SearchClient;
pub use error::{SearchError, SearchErrorKind};
pub use github::GithubSearchClient;
pub use types::{Cursor, Issue, IssueState, Label, SearchPage};

use crate::config::GithubConfig;

/// Create a search client from configuration
pub fn create_client(config: &GithubConfig) -> Result<Arc<dyn SearchClient>, SearchError> {
    debug!(endpoint = %config.endpoint, "create_client: called");
    Ok(Arc::new(GithubSearchClient::from_config(config)?))
}
