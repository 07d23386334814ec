//! SearchClient trait definition

use async_trait::async_trait;
#[allow(unused_imports)]
use tracing::debug;

use super::{Cursor, SearchError, SearchPage};

/// Stateless search client - each call fetches one page independently.
///
/// This is the engine's only seam to the remote API. Implementations hold
/// no per-query state: the caller supplies the composed query string and,
/// for anything but the first page, a cursor previously returned for that
/// same query string. Repeating a call with the same pair is expected to
/// return an equivalent page absent remote-side changes.
///
/// Implementations must not retry internally. Failures propagate to the
/// loader, which records them; whether to try again is the host's decision.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Fetch one page of results for `query`, resuming after `cursor`
    /// (or from the start of results when `cursor` is `None`).
    async fn search(&self, query: &str, cursor: Option<&Cursor>) -> Result<SearchPage, SearchError>;
}
