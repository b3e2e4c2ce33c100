//! Crawler module: fetching and crawl orchestration
//!
//! Strictly sequential by design: one URL in flight at a time keeps the
//! politeness delay a real global pacing mechanism instead of a
//! per-connection nicety.

mod coordinator;
mod fetcher;

pub use coordinator::{Crawler, RunOutcome};
pub use fetcher::{build_http_client, fetch_page};

use crate::config::Config;
use crate::Result;
use std::sync::atomic::Ordering;

/// Runs a complete crawl with ctrl-c wired up for graceful shutdown
///
/// The signal is observed between loop iterations: the current fetch
/// finishes (or times out), the frontier is checkpointed, and the run
/// ends cleanly.
pub async fn crawl(config: Config, fresh: bool) -> Result<RunOutcome> {
    let mut crawler = Crawler::new(config, fresh)?;

    let shutdown = crawler.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, will stop after the current URL");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    Ok(crawler.run().await)
}
