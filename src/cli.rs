//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// issueboard - incremental issue-search board loader
#[derive(Parser)]
#[command(
    name = "ib",
    about = "Load cursor-paginated issue-search results, column by column",
    version,
    after_help = "Logs are written to: ~/.local/share/issueboard/logs/issueboard.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run a single search and page through its results
    Search {
        /// Filter expression (e.g. "label:bug is:open")
        #[arg(default_value = "")]
        filter: String,

        /// Scope expression combined with the filter (e.g. "repo:org/name is:issue")
        #[arg(short, long, default_value = "")]
        scope: String,

        /// Number of pages to fetch
        #[arg(short, long, default_value = "1")]
        pages: u32,

        /// Keep fetching until no pages remain
        #[arg(long)]
        all: bool,
    },

    /// Load every column of a board definition
    Board {
        /// Path to a board YAML file
        file: PathBuf,

        /// Number of pages to fetch per column
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },
}
