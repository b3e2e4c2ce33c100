//! Dredge main entry point
//!
//! Command-line interface for the Dredge crawler.

use anyhow::Context;
use clap::Parser;
use dredge::config::load_config;
use dredge::crawler::{crawl, RunOutcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Dredge: a sitemap-driven crawler for a search index
///
/// Dredge expands the configured sources through their sitemaps into a
/// durable queue, fetches pages one at a time with a politeness delay,
/// and stores raw documents for a downstream indexer. An interrupted
/// run resumes from its last checkpoint.
#[derive(Parser, Debug)]
#[command(name = "dredge")]
#[command(version = "1.0.0")]
#[command(about = "A sitemap-driven search crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Ignore the persisted queue and re-run sitemap discovery
    #[arg(long)]
    fresh: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "fresh")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;

    if cli.stats {
        handle_stats(&config)?;
        return Ok(());
    }

    handle_crawl(config, cli.fresh).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dredge=info,warn"),
            1 => EnvFilter::new("dredge=debug,info"),
            2 => EnvFilter::new("dredge=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &dredge::config::Config) -> anyhow::Result<()> {
    use dredge::storage::{SqliteStorage, Storage};
    use std::path::Path;

    let storage = SqliteStorage::new(Path::new(&config.db.path))
        .with_context(|| format!("failed to open database {}", config.db.path))?;

    println!("Database: {}\n", config.db.path);
    println!("Documents: {}", storage.count_documents()?);
    println!("Queued URLs: {}", storage.count_queue()?);

    let by_source = storage.count_documents_by_source()?;
    if !by_source.is_empty() {
        println!("\nDocuments by source:");
        for (source, count) in by_source {
            println!("  {:<24} {}", source, count);
        }
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: dredge::config::Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring persisted queue)");
    } else {
        tracing::info!("Starting crawl (resumes from checkpoint if one exists)");
    }

    tracing::info!(
        "Sources: {}, delay: {}s, recheck interval: {}s",
        config.logic.sources.len(),
        config.logic.delay,
        config.logic.recheck_interval
    );

    match crawl(config, fresh).await? {
        RunOutcome::Drained => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        RunOutcome::Interrupted => {
            tracing::info!("Crawl stopped by interrupt; checkpoint saved");
            Ok(())
        }
        RunOutcome::NothingToDo => {
            tracing::warn!("Nothing to crawl; check the configured sources");
            Ok(())
        }
        RunOutcome::Failed => {
            anyhow::bail!("crawl run ended after an unhandled error (checkpoint saved)")
        }
    }
}
