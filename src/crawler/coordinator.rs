//! Crawler coordinator - the main crawl loop
//!
//! Drives the whole run: restore or bootstrap the frontier, then drain
//! it one URL at a time with politeness pauses, checkpointing the queue
//! periodically and on every way out of the loop.

use crate::change::ChangeDetector;
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::frontier::Frontier;
use crate::robots::RobotsAuthority;
use crate::sitemap::SitemapResolver;
use crate::storage::SqliteStorage;
use crate::Result;
use reqwest::Client;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The frontier was fully drained
    Drained,
    /// A stop signal was honored between iterations
    Interrupted,
    /// An unhandled error ended the loop early (logged, checkpointed)
    Failed,
    /// Bootstrap produced an empty frontier; nothing to crawl
    NothingToDo,
}

/// Main crawler structure
pub struct Crawler {
    config: Config,
    client: Client,
    authority: RobotsAuthority,
    frontier: Frontier,
    detector: ChangeDetector,
    /// Normalized URLs handled this run (fetched or skipped-as-fresh).
    /// Never persisted: a restarted run re-evaluates, but document state
    /// keeps it from re-fetching anything still fresh.
    visited: HashSet<String>,
    shutdown: Arc<AtomicBool>,
    fresh: bool,
}

impl Crawler {
    /// Creates a crawler over the configured database
    ///
    /// Storage that cannot be opened is fatal here, before any crawling
    /// starts; nothing later in the run is allowed to be.
    pub fn new(config: Config, fresh: bool) -> Result<Self> {
        let storage = Arc::new(Mutex::new(SqliteStorage::new(Path::new(&config.db.path))?));

        let client = build_http_client(&config.logic.user_agent)?;
        let authority = RobotsAuthority::new(client.clone(), &config.logic);
        let frontier = Frontier::new(Arc::clone(&storage));
        let detector = ChangeDetector::new(storage, config.logic.recheck_interval);

        Ok(Self {
            config,
            client,
            authority,
            frontier,
            detector,
            visited: HashSet::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
            fresh,
        })
    }

    /// Flag observed between loop iterations; set it to request a
    /// graceful stop
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Runs the crawl to one of its terminal states
    ///
    /// Whatever happens inside - drained queue, stop signal, or an
    /// unhandled error - a final frontier checkpoint runs before this
    /// returns.
    pub async fn run(&mut self) -> RunOutcome {
        tracing::info!("Starting crawler");

        let result = self.run_inner().await;

        // Guaranteed cleanup: checkpoint on every terminal path
        if let Err(e) = self.frontier.persist() {
            tracing::error!("Failed to persist frontier on shutdown: {}", e);
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Crawl loop ended by unhandled error: {}", e);
                RunOutcome::Failed
            }
        };

        tracing::info!(
            "Run finished ({:?}): {} URLs handled, {} still queued",
            outcome,
            self.visited.len(),
            self.frontier.len()
        );

        outcome
    }

    async fn run_inner(&mut self) -> Result<RunOutcome> {
        self.bootstrap().await?;

        if self.frontier.is_empty() {
            tracing::warn!("Queue is empty, nothing to crawl");
            return Ok(RunOutcome::NothingToDo);
        }

        let mut processed: u64 = 0;

        loop {
            // Stop signals are honored between iterations only; an
            // in-flight fetch always finishes or times out on its own.
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::info!("Stop signal received, shutting down");
                return Ok(RunOutcome::Interrupted);
            }

            let Some(entry) = self.frontier.pop() else {
                tracing::info!("Queue drained, crawl complete");
                return Ok(RunOutcome::Drained);
            };

            // Already handled this run: discard without fetch or delay
            if self.visited.contains(&entry.url) {
                continue;
            }

            if !self.detector.should_recrawl(&entry.url, entry.lastmod)? {
                tracing::info!("Skipping (recently crawled): {}", entry.url);
                self.visited.insert(entry.url);
                continue;
            }

            tracing::info!(
                "Fetching [{}] [{}]: {}",
                processed + 1,
                entry.source_name,
                entry.url
            );

            match fetch_page(&self.client, &entry.url).await {
                Ok(body) => {
                    self.detector.record(&entry.url, &body, &entry.source_name)?;
                    self.visited.insert(entry.url.clone());
                    processed += 1;

                    if processed % 10 == 0 {
                        self.frontier.persist()?;
                        tracing::info!(
                            "Progress: {} documents processed, {} left in queue",
                            processed,
                            self.frontier.len()
                        );
                    }
                }
                Err(e) => {
                    // Dropped from this pass; not visited, so a future
                    // run may retry it
                    tracing::error!("Failed to fetch {}: {}", entry.url, e);
                }
            }

            // Politeness pause after every fetch attempt, success or not
            tokio::time::sleep(Duration::from_secs_f64(self.authority.delay())).await;
        }
    }

    /// Restores the persisted queue, or rebuilds it from the configured
    /// sources when it is empty (or `--fresh` was given)
    async fn bootstrap(&mut self) -> Result<()> {
        if self.fresh {
            tracing::info!("Fresh start requested, ignoring persisted queue");
        } else if self.frontier.restore()? {
            return Ok(());
        } else {
            tracing::info!("No persisted queue, initializing from sources");
        }

        let sources = self.config.logic.sources.clone();
        tracing::info!("Initializing {} sources", sources.len());

        let mut resolver = SitemapResolver::new();
        for source in &sources {
            tracing::info!("Processing source: {} ({})", source.name, source.url);
            resolver
                .discover(&self.client, &mut self.authority, &mut self.frontier, source)
                .await;
        }

        tracing::info!("Initialization complete, {} URLs queued", self.frontier.len());
        self.frontier.persist()?;
        Ok(())
    }
}
