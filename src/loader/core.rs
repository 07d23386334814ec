//! Column loader state machine
//!
//! One loader per board column. The loader owns the accumulated result
//! buffer and the pagination cursor; the host drives it with `start`,
//! `load_more` and `retry`, and renders from `snapshot`.
//!
//! Fetches are issued through tickets so that a completion can always be
//! matched against the load it belongs to. Every logical load carries a
//! generation number; a filter change or a fresh start bumps it, and
//! `apply` silently drops any completion whose ticket generation no longer
//! matches. This is what keeps rapid filter changes from interleaving
//! pages of different queries into one buffer. Superseded fetches are not
//! actively cancelled - their results are simply discarded on arrival,
//! an accepted trade-off for short-lived calls.

use tracing::{debug, warn};

use super::state::{LoadFailure, Phase, Snapshot};
use crate::query::compose;
use crate::search::{Cursor, Issue, SearchClient, SearchError, SearchPage};

/// Which kind of load a ticket was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Initial,
    Append,
}

/// Handle for one in-flight fetch.
///
/// Carries everything the host needs to perform the fetch (the composed
/// query and the cursor to resume from) plus the generation it was issued
/// under, which `apply` uses to recognize stale completions.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    kind: FetchKind,
    query: String,
    cursor: Option<Cursor>,
}

impl LoadTicket {
    /// The composed query string to fetch with
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The cursor to resume after, `None` for the first page
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }
}

/// Internal mutable state, recreated wholesale on filter changes
#[derive(Debug, Default)]
struct LoaderState {
    phase: Phase,
    items: Vec<Issue>,
    total_count: u64,
    cursor: Option<Cursor>,
    has_more: bool,
    failure: Option<LoadFailure>,
}

/// Incremental loader for one column's search results.
///
/// The scope expression is fixed for the loader's lifetime; the filter may
/// change at any time, which discards all loaded state and starts a fresh
/// generation. Loaders are fully independent of each other - concurrent
/// columns share nothing but the search client.
#[derive(Debug)]
pub struct ColumnLoader {
    scope: String,
    filter: String,
    generation: u64,
    state: LoaderState,
}

impl ColumnLoader {
    /// Create an idle loader; no fetch is issued until `start`
    pub fn new(scope: impl Into<String>, filter: impl Into<String>) -> Self {
        let scope = scope.into();
        let filter = filter.into();
        debug!(%scope, %filter, "ColumnLoader::new: called");
        Self {
            scope,
            filter,
            generation: 0,
            state: LoaderState::default(),
        }
    }

    /// The composed query this loader fetches with
    pub fn query(&self) -> String {
        compose(&self.scope, &self.filter)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    /// Replace the filter expression.
    ///
    /// Cursors are only valid for the exact query that produced them, so a
    /// changed filter discards the buffer, returns to `Idle` and bumps the
    /// generation; any fetch still in flight for the old filter becomes
    /// stale and its completion will be dropped. Setting an identical
    /// filter is a no-op.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        let filter = filter.into();
        if filter == self.filter {
            debug!(%filter, "set_filter: unchanged");
            return;
        }
        debug!(old = %self.filter, new = %filter, "set_filter: recreating loader state");
        self.filter = filter;
        self.generation += 1;
        self.state = LoaderState::default();
    }

    /// Begin a fresh load for the current query.
    ///
    /// Valid from `Idle`, `Ready` or `Failed`; rejected while a load is in
    /// flight (overlapping fresh loads for one loader are disallowed).
    /// Clears the buffer, moves to `InitialLoading`, and returns the ticket
    /// to fetch the first page with (cursor starts from `None`).
    pub fn start(&mut self) -> Option<LoadTicket> {
        match self.state.phase {
            Phase::Idle | Phase::Ready | Phase::Failed => {}
            Phase::InitialLoading | Phase::Appending => {
                warn!(phase = %self.state.phase, "start: rejected while a load is in flight");
                return None;
            }
        }

        self.generation += 1;
        self.state = LoaderState {
            phase: Phase::InitialLoading,
            ..LoaderState::default()
        };

        let ticket = LoadTicket {
            generation: self.generation,
            kind: FetchKind::Initial,
            query: self.query(),
            cursor: None,
        };
        debug!(generation = ticket.generation, query = %ticket.query, "start: issued");
        Some(ticket)
    }

    /// Request the next page.
    ///
    /// Only valid from `Ready` with more pages available; anything else is
    /// a no-op that changes no state and issues no fetch. Moves to
    /// `Appending` - the loaded items stay visible while the increment is
    /// in flight.
    pub fn load_more(&mut self) -> Option<LoadTicket> {
        if self.state.phase != Phase::Ready {
            debug!(phase = %self.state.phase, "load_more: ignored outside Ready");
            return None;
        }
        if !self.state.has_more {
            debug!("load_more: no further pages");
            return None;
        }

        self.state.phase = Phase::Appending;
        let ticket = LoadTicket {
            generation: self.generation,
            kind: FetchKind::Append,
            query: self.query(),
            cursor: self.state.cursor.clone(),
        };
        debug!(
            generation = ticket.generation,
            cursor = ?ticket.cursor.as_ref().map(Cursor::as_str),
            "load_more: issued"
        );
        Some(ticket)
    }

    /// Re-issue a fresh load after a failure.
    ///
    /// Only valid from `Failed`; the query is unchanged and the load starts
    /// over from the beginning of results.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        if self.state.phase != Phase::Failed {
            debug!(phase = %self.state.phase, "retry: ignored outside Failed");
            return None;
        }
        debug!("retry: reissuing load");
        self.start()
    }

    /// Merge the outcome of a fetch issued through a ticket.
    ///
    /// A completion whose generation no longer matches belongs to a
    /// superseded load and is dropped without touching any state; the same
    /// goes for a ticket whose load already resolved. On an initial
    /// failure the buffer stays empty; on an append failure the already
    /// accumulated items are retained - the loaded pages are still valid,
    /// only the increment was lost.
    pub fn apply(&mut self, ticket: &LoadTicket, result: Result<SearchPage, SearchError>) {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "apply: discarding stale completion"
            );
            return;
        }

        let expected_phase = match ticket.kind {
            FetchKind::Initial => Phase::InitialLoading,
            FetchKind::Append => Phase::Appending,
        };
        if self.state.phase != expected_phase {
            debug!(
                phase = %self.state.phase,
                kind = ?ticket.kind,
                "apply: ticket does not match current phase, discarding"
            );
            return;
        }

        match result {
            Ok(page) => self.apply_page(ticket.kind, page),
            Err(err) => self.apply_failure(ticket.kind, err),
        }
    }

    fn apply_page(&mut self, kind: FetchKind, page: SearchPage) {
        debug!(
            kind = ?kind,
            page_items = page.items.len(),
            total_count = page.total_count,
            has_more = page.has_more,
            "apply_page: merging"
        );
        match kind {
            FetchKind::Initial => self.state.items = page.items,
            FetchKind::Append => self.state.items.extend(page.items),
        }
        // totals and pagination always come from the most recent page
        self.state.total_count = page.total_count;
        self.state.cursor = page.next_cursor;
        self.state.has_more = page.has_more;
        self.state.failure = None;
        self.state.phase = Phase::Ready;
    }

    fn apply_failure(&mut self, kind: FetchKind, err: SearchError) {
        warn!(kind = ?kind, error = %err, "apply_failure: load failed");
        if kind == FetchKind::Initial {
            self.state.items.clear();
        }
        self.state.failure = Some(LoadFailure::from(&err));
        self.state.phase = Phase::Failed;
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            items: self.state.items.clone(),
            total_count: self.state.total_count,
            has_more: self.state.has_more,
            failure: self.state.failure.clone(),
        }
    }

    /// Start a fresh load and drive it to completion against `client`
    pub async fn refresh(&mut self, client: &dyn SearchClient) {
        let Some(ticket) = self.start() else { return };
        let result = client.search(ticket.query(), ticket.cursor()).await;
        self.apply(&ticket, result);
    }

    /// Fetch the next page and merge it, if one is available
    pub async fn fetch_more(&mut self, client: &dyn SearchClient) {
        let Some(ticket) = self.load_more() else { return };
        let result = client.search(ticket.query(), ticket.cursor()).await;
        self.apply(&ticket, result);
    }
}
