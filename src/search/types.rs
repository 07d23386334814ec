//! Search result types
//!
//! These types model one page of a cursor-paginated issue-search connection
//! (`issueCount`, `pageInfo.endCursor`, `pageInfo.hasNextPage` and the issue
//! nodes themselves). The loader treats issues as opaque, immutable records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque pagination token issued by the remote search endpoint.
///
/// A cursor marks the position after the last item of a page and is only
/// meaningful for the exact query string that produced it. `None` in the
/// surrounding `Option` means "start of results".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One batch of search results plus pagination metadata
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// Items in the order the remote returned them
    pub items: Vec<Issue>,

    /// Size of the full result universe as reported by the remote,
    /// independent of how many items this page carries
    pub total_count: u64,

    /// Cursor to resume after the last item of this page
    pub next_cursor: Option<Cursor>,

    /// Whether further pages exist
    pub has_more: bool,
}

impl SearchPage {
    /// Build a page, enforcing cursor/has-more consistency.
    ///
    /// `has_more == false` forces the cursor to `None`, and a missing cursor
    /// forces `has_more` to `false` so a follow-up fetch can never restart
    /// from the beginning and duplicate the first page.
    pub fn new(items: Vec<Issue>, total_count: u64, next_cursor: Option<Cursor>, has_more: bool) -> Self {
        let next_cursor = if has_more { next_cursor } else { None };
        let has_more = has_more && next_cursor.is_some();
        Self {
            items,
            total_count,
            next_cursor,
            has_more,
        }
    }
}

/// An issue record returned by the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: IssueState,
    /// Author login; deleted accounts come back without one
    pub author: Option<String>,
    /// Repository in `owner/name` form
    pub repository: String,
    pub labels: Vec<Label>,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Issue state as reported by the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueState {
    Open,
    Closed,
}

/// A label attached to an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color without the leading `#`
    pub color: String,
}
