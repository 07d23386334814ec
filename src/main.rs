//! issueboard - incremental issue-search board loader
//!
//! CLI entry point: runs a single search or a whole board and prints each
//! column's snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use issueboard::board::Board;
use issueboard::cli::{Cli, Command};
use issueboard::config::Config;
use issueboard::loader::{ColumnLoader, Phase, Snapshot};
use issueboard::search::{self, IssueState, SearchClient, SearchErrorKind};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("issueboard")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("issueboard.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    info!(endpoint = %config.github.endpoint, page_size = config.github.page_size, "issueboard loaded config");

    match cli.command {
        Command::Search {
            filter,
            scope,
            pages,
            all,
        } => cmd_search(&config, &scope, &filter, pages, all).await,
        Command::Board { file, pages } => cmd_board(&config, &file, pages).await,
    }
}

/// Run one loader for a single scope+filter pair
async fn cmd_search(config: &Config, scope: &str, filter: &str, pages: u32, all: bool) -> Result<()> {
    let client = search::create_client(&config.github)?;

    let mut loader = ColumnLoader::new(scope, filter);
    drive(&mut loader, client.as_ref(), pages, all).await;

    render_column("results", filter, &loader.snapshot());
    Ok(())
}

/// Load every column of a board, concurrently - loaders are independent
async fn cmd_board(config: &Config, file: &Path, pages: u32) -> Result<()> {
    let board = Board::load(file).context(format!("Failed to load board from {}", file.display()))?;
    let client = search::create_client(&config.github)?;

    println!("{}", board.name.bold().underline());
    if !board.query.is_empty() {
        println!("{}", board.query.dimmed());
    }
    println!();

    let tasks = board.columns.iter().map(|column| {
        let client = Arc::clone(&client);
        let scope = board.query.clone();
        let column = column.clone();
        async move {
            let mut loader = ColumnLoader::new(scope, column.query.clone());
            drive(&mut loader, client.as_ref(), pages, false).await;
            (column, loader.snapshot())
        }
    });

    for (column, snapshot) in futures::future::join_all(tasks).await {
        render_column(&column.name, &column.query, &snapshot);
        println!();
    }

    Ok(())
}

/// Fetch the first page, then keep appending until the page limit, the
/// result set, or a failure ends the run
async fn drive(loader: &mut ColumnLoader, client: &dyn SearchClient, pages: u32, all: bool) {
    loader.refresh(client).await;

    let mut fetched = 1u32;
    while loader.phase() == Phase::Ready && loader.has_more() && (all || fetched < pages) {
        loader.fetch_more(client).await;
        fetched += 1;
    }
}

/// Print one column's snapshot
fn render_column(name: &str, filter: &str, snapshot: &Snapshot) {
    if snapshot.has_count() {
        println!("{} {}", name.bold(), format!("({})", snapshot.total_count).dimmed());
    } else {
        println!("{}", name.bold());
    }
    if !filter.is_empty() {
        println!("{}", filter.dimmed());
    }

    if let Some(failure) = &snapshot.failure {
        match failure.kind {
            SearchErrorKind::RateLimited => {
                println!("  {}", "rate limited - try again later".red());
            }
            _ => {
                println!("  {} {}", "search failed:".red(), failure.message);
            }
        }
    }

    if snapshot.is_empty_result() {
        println!("  {}", "No results".dimmed());
        return;
    }

    for issue in &snapshot.items {
        let state = match issue.state {
            IssueState::Open => "open".green(),
            IssueState::Closed => "closed".magenta(),
        };
        let labels = issue.labels.iter().map(|l| l.name.as_str()).collect::<Vec<_>>().join(", ");

        if labels.is_empty() {
            println!("  {} {} {}", format!("#{}", issue.number).cyan(), issue.title, state);
        } else {
            println!(
                "  {} {} {} {}",
                format!("#{}", issue.number).cyan(),
                issue.title,
                state,
                format!("[{}]", labels).yellow()
            );
        }
    }

    if snapshot.has_more {
        println!(
            "  {}",
            format!("... {} of {} loaded, pass --pages to fetch more", snapshot.items.len(), snapshot.total_count).dimmed()
        );
    }
}
