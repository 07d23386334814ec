//! Search query composition
//!
//! A board carries one scope expression (e.g. `repo:org/name is:issue`) and
//! each column adds its own filter expression (e.g. `label:bug is:open`).
//! Both are fragments of the same free-text search syntax; composing them is
//! a pure string join.
//!
//! Pagination cursors are only valid for the exact query string that
//! produced them, so the initial load and every load-more for the same
//! logical state must go through this function with the same inputs.

use tracing::debug;

/// Compose a scope expression and a filter expression into one query string.
///
/// Total and deterministic: equal inputs always yield a byte-identical
/// result. Fragments are trimmed and joined with a single space; an empty
/// fragment contributes nothing, so no leading or trailing separators ever
/// appear.
pub fn compose(scope: &str, filter: &str) -> String {
    let scope = scope.trim();
    let filter = filter.trim();
    debug!(%scope, %filter, "compose: called");

    match (scope.is_empty(), filter.is_empty()) {
        (true, true) => String::new(),
        (false, true) => scope.to_string(),
        (true, false) => filter.to_string(),
        (false, false) => format!("{} {}", scope, filter),
    }
}
