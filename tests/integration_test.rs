//! Integration tests for issueboard
//!
//! These tests verify end-to-end loader behavior against a scripted search
//! client: paging, stale-result discarding, failure handling and board
//! loading.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use issueboard::board::Board;
use issueboard::loader::{ColumnLoader, Phase};
use issueboard::query::compose;
use issueboard::search::{Cursor, Issue, IssueState, SearchClient, SearchError, SearchErrorKind, SearchPage};
use tempfile::TempDir;

// =============================================================================
// Scripted client
// =============================================================================

/// Search client that serves queued responses per query string and records
/// every call. Safe to share across concurrent loaders.
struct ScriptedClient {
    responses: Mutex<HashMap<String, VecDeque<Result<SearchPage, SearchError>>>>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedClient {
    fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn script(self, query: &str, responses: Vec<Result<SearchPage, SearchError>>) -> Self {
        self.responses.lock().unwrap().insert(query.to_string(), responses.into());
        self
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for ScriptedClient {
    async fn search(&self, query: &str, cursor: Option<&Cursor>) -> Result<SearchPage, SearchError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), cursor.map(|c| c.as_str().to_string())));
        self.responses
            .lock()
            .unwrap()
            .get_mut(query)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(SearchError::InvalidResponse(format!("No scripted response for: {}", query))))
    }
}

fn issue(number: u64) -> Issue {
    Issue {
        number,
        title: format!("Issue {}", number),
        url: format!("https://github.com/org/name/issues/{}", number),
        state: IssueState::Open,
        author: Some("octocat".to_string()),
        repository: "org/name".to_string(),
        labels: Vec::new(),
        comment_count: 0,
        created_at: "2026-01-01T00:00:00Z".parse().unwrap(),
        updated_at: "2026-01-02T00:00:00Z".parse().unwrap(),
    }
}

fn page(numbers: &[u64], total: u64, cursor: Option<&str>) -> SearchPage {
    SearchPage::new(
        numbers.iter().copied().map(issue).collect(),
        total,
        cursor.map(Cursor::new),
        cursor.is_some(),
    )
}

fn numbers(loader: &ColumnLoader) -> Vec<u64> {
    loader.snapshot().items.iter().map(|i| i.number).collect()
}

// =============================================================================
// Paging
// =============================================================================

#[tokio::test]
async fn test_initial_load_then_load_more() {
    let query = compose("repo:org/name is:issue", "label:bug");
    assert_eq!(query, "repo:org/name is:issue label:bug");

    let client = ScriptedClient::new().script(
        &query,
        vec![Ok(page(&[1, 2], 5, Some("c1"))), Ok(page(&[3, 4, 5], 5, None))],
    );

    let mut loader = ColumnLoader::new("repo:org/name is:issue", "label:bug");
    loader.refresh(&client).await;

    assert_eq!(loader.phase(), Phase::Ready);
    assert_eq!(numbers(&loader), vec![1, 2]);
    assert_eq!(loader.snapshot().total_count, 5);
    assert!(loader.has_more());

    loader.fetch_more(&client).await;

    assert_eq!(loader.phase(), Phase::Ready);
    assert_eq!(numbers(&loader), vec![1, 2, 3, 4, 5]);
    assert_eq!(loader.snapshot().total_count, 5);
    assert!(!loader.has_more());

    // the append resumed exactly after the first page
    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], (query.clone(), None));
    assert_eq!(calls[1], (query, Some("c1".to_string())));
}

#[tokio::test]
async fn test_items_accumulate_in_arrival_order() {
    let query = compose("repo:org/name is:issue", "");
    let client = ScriptedClient::new().script(
        &query,
        vec![
            Ok(page(&[5, 3], 6, Some("c1"))),
            Ok(page(&[9, 1], 6, Some("c2"))),
            Ok(page(&[2, 8], 6, None)),
        ],
    );

    let mut loader = ColumnLoader::new("repo:org/name is:issue", "");
    loader.refresh(&client).await;
    loader.fetch_more(&client).await;
    loader.fetch_more(&client).await;

    // concatenation of the pages exactly as they arrived, untouched
    assert_eq!(numbers(&loader), vec![5, 3, 9, 1, 2, 8]);
}

#[tokio::test]
async fn test_load_more_after_exhaustion_is_a_noop() {
    let query = compose("repo:org/name is:issue", "");
    let client = ScriptedClient::new().script(&query, vec![Ok(page(&[1], 1, None))]);

    let mut loader = ColumnLoader::new("repo:org/name is:issue", "");
    loader.refresh(&client).await;
    assert!(!loader.has_more());

    loader.fetch_more(&client).await;
    loader.fetch_more(&client).await;

    assert_eq!(client.call_count(), 1);
    assert_eq!(loader.phase(), Phase::Ready);
    assert_eq!(numbers(&loader), vec![1]);
}

// =============================================================================
// Stale results
// =============================================================================

#[tokio::test]
async fn test_filter_change_discards_pending_append() {
    let mut loader = ColumnLoader::new("repo:org/name is:issue", "label:bug");

    let initial = loader.start().unwrap();
    loader.apply(&initial, Ok(page(&[1, 2], 5, Some("c1"))));

    // append for the old filter goes out, then the filter changes
    let stale = loader.load_more().unwrap();
    loader.set_filter("label:bug is:open");

    let fresh = loader.start().unwrap();
    assert_eq!(fresh.query(), "repo:org/name is:issue label:bug is:open");
    loader.apply(&fresh, Ok(page(&[7], 1, None)));

    // the stale append resolves late; the fresh load stays the sole truth
    loader.apply(&stale, Ok(page(&[3, 4], 5, None)));

    assert_eq!(numbers(&loader), vec![7]);
    assert_eq!(loader.snapshot().total_count, 1);
    assert_eq!(loader.phase(), Phase::Ready);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_rate_limited_initial_load_then_retry() {
    let query = compose("repo:org/name is:issue", "label:bug");
    let client = ScriptedClient::new().script(
        &query,
        vec![
            Err(SearchError::RateLimited {
                retry_after: Duration::from_secs(30),
            }),
            Ok(page(&[1, 2], 2, None)),
        ],
    );

    let mut loader = ColumnLoader::new("repo:org/name is:issue", "label:bug");
    loader.refresh(&client).await;

    let snapshot = loader.snapshot();
    assert_eq!(snapshot.phase, Phase::Failed);
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.failure.as_ref().unwrap().kind, SearchErrorKind::RateLimited);

    // retry re-issues the same query from the start of results
    let retry = loader.retry().unwrap();
    assert_eq!(retry.query(), query);
    assert!(retry.cursor().is_none());
    let result = client.search(retry.query(), retry.cursor()).await;
    loader.apply(&retry, result);

    assert_eq!(loader.phase(), Phase::Ready);
    assert_eq!(numbers(&loader), vec![1, 2]);
    assert!(loader.snapshot().failure.is_none());
}

#[tokio::test]
async fn test_append_failure_keeps_first_page_visible() {
    let query = compose("repo:org/name is:issue", "");
    let client = ScriptedClient::new().script(
        &query,
        vec![
            Ok(page(&[1, 2], 5, Some("c1"))),
            Err(SearchError::Remote {
                message: "Something went wrong".to_string(),
            }),
        ],
    );

    let mut loader = ColumnLoader::new("repo:org/name is:issue", "");
    loader.refresh(&client).await;
    loader.fetch_more(&client).await;

    let snapshot = loader.snapshot();
    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(numbers(&loader), vec![1, 2]);
    assert_eq!(snapshot.failure.as_ref().unwrap().kind, SearchErrorKind::Remote);
}

// =============================================================================
// Boards
// =============================================================================

#[tokio::test]
async fn test_board_columns_load_independently() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let board_path = temp_dir.path().join("bugs.yml");
    fs::write(
        &board_path,
        r#"
name: Bugs
query: "repo:org/name is:issue"
columns:
  - name: Open
    query: "label:bug is:open"
  - name: Closed
    query: "label:bug is:closed"
"#,
    )
    .expect("Failed to write board file");

    let board = Board::load(&board_path).expect("Failed to load board");
    assert_eq!(board.columns.len(), 2);

    let open_query = compose(&board.query, &board.columns[0].query);
    let closed_query = compose(&board.query, &board.columns[1].query);

    let client = Arc::new(
        ScriptedClient::new()
            .script(&open_query, vec![Ok(page(&[1, 2], 2, None))])
            .script(&closed_query, vec![Ok(page(&[3], 1, None))]),
    );

    // one loader per column, driven concurrently; they share nothing but
    // the client
    let tasks = board.columns.iter().map(|column| {
        let client = Arc::clone(&client);
        let scope = board.query.clone();
        let filter = column.query.clone();
        async move {
            let mut loader = ColumnLoader::new(scope, filter);
            loader.refresh(client.as_ref()).await;
            loader
        }
    });

    let loaders = futures::future::join_all(tasks).await;

    assert_eq!(numbers(&loaders[0]), vec![1, 2]);
    assert_eq!(numbers(&loaders[1]), vec![3]);
    assert_eq!(loaders[0].phase(), Phase::Ready);
    assert_eq!(loaders[1].phase(), Phase::Ready);
}

#[tokio::test]
async fn test_empty_result_set() {
    let query = compose("repo:org/name is:issue", "label:wontfix");
    let client = ScriptedClient::new().script(&query, vec![Ok(page(&[], 0, None))]);

    let mut loader = ColumnLoader::new("repo:org/name is:issue", "label:wontfix");
    loader.refresh(&client).await;

    let snapshot = loader.snapshot();
    assert!(snapshot.is_empty_result());
    assert_eq!(snapshot.total_count, 0);
    assert!(!snapshot.has_more);
}
