//! Board definitions
//!
//! A board pairs one scope expression with a set of named columns, each
//! contributing its own filter expression. Boards are described in YAML:
//!
//! ```yaml
//! name: Bugs
//! query: "repo:org/name is:issue"
//! columns:
//!   - name: Open
//!     query: "label:bug is:open"
//!   - name: Closed
//!     query: "label:bug is:closed"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading a board definition
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Failed to read board file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse board file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A board: one scope expression shared by all columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Display name
    pub name: String,

    /// Scope expression prepended to every column's filter
    #[serde(default)]
    pub query: String,

    /// Columns in display order
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// One column: a name plus a filter expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Display name
    pub name: String,

    /// Filter expression combined with the board scope
    #[serde(default)]
    pub query: String,
}

impl Board {
    /// Load a board definition from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BoardError> {
        debug!(path = %path.as_ref().display(), "Board::load: called");
        let content = fs::read_to_string(path)?;
        let board: Self = serde_yaml::from_str(&content)?;
        debug!(name = %board.name, columns = board.columns.len(), "Board::load: parsed");
        Ok(board)
    }
}
