//! GitHub GraphQL search client implementation
//!
//! Implements the SearchClient trait against GitHub's GraphQL `search`
//! connection (`issueCount`, `pageInfo`, issue nodes). One POST per page;
//! no internal retries - failures surface to the loader as-is.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{Cursor, Issue, IssueState, Label, SearchClient, SearchError, SearchPage};
use crate::config::GithubConfig;

/// GraphQL document for one page of issue search results
const SEARCH_DOCUMENT: &str = r#"
query IssueSearch($query: String!, $first: Int!, $after: String) {
  search(query: $query, type: ISSUE, first: $first, after: $after) {
    issueCount
    pageInfo {
      endCursor
      hasNextPage
    }
    nodes {
      ... on Issue {
        number
        title
        url
        state
        createdAt
        updatedAt
        author { login }
        repository { nameWithOwner }
        labels(first: 20) { nodes { name color } }
        comments { totalCount }
      }
    }
  }
}
"#;

/// GitHub GraphQL search client
pub struct GithubSearchClient {
    endpoint: String,
    token: String,
    page_size: u32,
    http: Client,
}

impl GithubSearchClient {
    /// Create a new client from configuration
    ///
    /// Reads the API token from the environment variable named in config.
    pub fn from_config(config: &GithubConfig) -> Result<Self, SearchError> {
        debug!(?config, "from_config: called");
        let token = config.get_token().map_err(|e| SearchError::Auth(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(SearchError::Network)?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            token,
            page_size: config.page_size,
            http,
        })
    }

    /// Build the GraphQL request body for one page
    fn build_request_body(&self, query: &str, cursor: Option<&Cursor>) -> serde_json::Value {
        debug!(%query, cursor = ?cursor.map(Cursor::as_str), "build_request_body: called");
        serde_json::json!({
            "query": SEARCH_DOCUMENT,
            "variables": {
                "query": query,
                "first": self.page_size,
                "after": cursor.map(Cursor::as_str),
            },
        })
    }
}

#[async_trait]
impl SearchClient for GithubSearchClient {
    async fn search(&self, query: &str, cursor: Option<&Cursor>) -> Result<SearchPage, SearchError> {
        debug!(%query, cursor = ?cursor.map(Cursor::as_str), "search: called");
        let body = self.build_request_body(query, cursor);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();

        if status == 429 || (status == 403 && response.headers().contains_key("retry-after")) {
            debug!(%status, "search: rate limited");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(SearchError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            debug!(%status, "search: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::Api { status, message: text });
        }

        let payload: GraphQlResponse = response.json().await?;

        if let Some(errors) = payload.errors
            && !errors.is_empty()
        {
            let message = errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ");
            debug!(%message, "search: query rejected");
            return Err(SearchError::Remote { message });
        }

        let data = payload
            .data
            .ok_or_else(|| SearchError::InvalidResponse("Response carried neither data nor errors".to_string()))?;

        debug!("search: success");
        Ok(parse_page(data.search))
    }
}

/// Convert one search connection into a page, skipping nodes that are not
/// issues (the search union can carry other node types, which come back as
/// objects without issue fields).
fn parse_page(connection: SearchConnection) -> SearchPage {
    debug!(
        node_count = connection.nodes.len(),
        issue_count = connection.issue_count,
        "parse_page: called"
    );
    let items = connection
        .nodes
        .into_iter()
        .filter_map(|node| match serde_json::from_value::<IssueNode>(node) {
            Ok(node) => Some(node.into_issue()),
            Err(e) => {
                debug!(error = %e, "parse_page: skipping non-issue node");
                None
            }
        })
        .collect();

    let next_cursor = match (connection.page_info.has_next_page, connection.page_info.end_cursor) {
        (true, Some(cursor)) => Some(Cursor::new(cursor)),
        (true, None) => {
            warn!("parse_page: hasNextPage without endCursor, treating page as final");
            None
        }
        (false, _) => None,
    };
    let has_more = next_cursor.is_some();

    SearchPage::new(items, connection.issue_count, next_cursor, has_more)
}

// GitHub GraphQL response types

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    search: SearchConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchConnection {
    issue_count: u64,
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    number: u64,
    title: String,
    url: String,
    state: IssueState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author: Option<Actor>,
    repository: Repository,
    labels: Option<LabelConnection>,
    comments: CommentCount,
}

impl IssueNode {
    fn into_issue(self) -> Issue {
        Issue {
            number: self.number,
            title: self.title,
            url: self.url,
            state: self.state,
            author: self.author.map(|a| a.login),
            repository: self.repository.name_with_owner,
            labels: self
                .labels
                .map(|l| l.nodes.into_iter().map(|n| Label { name: n.name, color: n.color }).collect())
                .unwrap_or_default(),
            comment_count: self.comments.total_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Actor {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Repository {
    name_with_owner: String,
}

#[derive(Debug, Deserialize)]
struct LabelConnection {
    nodes: Vec<LabelNode>,
}

#[derive(Debug, Deserialize)]
struct LabelNode {
    name: String,
    color: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentCount {
    total_count: u64,
}
