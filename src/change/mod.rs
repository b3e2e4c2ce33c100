//! Change detection module
//!
//! Decides whether a previously-seen document is due for a re-fetch, and
//! whether a re-fetched body actually changed. Content identity is judged
//! in exactly one place: byte-for-byte hash equality, nothing semantic.

use crate::storage::{DocumentRecord, SqliteStorage, Storage};
use crate::Result;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};

/// Outcome of recording a fetched document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// New document, or content hash differs from the stored one
    Changed,
    /// Byte-identical to the stored content; only the check date advanced
    Unchanged,
}

/// Computes the hex content digest used for change comparison
pub fn content_hash(html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html.as_bytes());
    hex::encode(hasher.finalize())
}

/// Change detector over the document store
pub struct ChangeDetector {
    storage: Arc<Mutex<SqliteStorage>>,
    recheck_interval: u64,
}

impl ChangeDetector {
    pub fn new(storage: Arc<Mutex<SqliteStorage>>, recheck_interval: u64) -> Self {
        Self {
            storage,
            recheck_interval,
        }
    }

    /// Whether a URL is due for fetching
    ///
    /// True when no document exists for it; otherwise true when the
    /// sitemap `lastmod` is newer than the stored `crawl_date`; otherwise
    /// true once `recheck_interval` seconds have passed since the last
    /// content change.
    pub fn should_recrawl(&self, url: &str, lastmod: Option<i64>) -> Result<bool> {
        let doc = {
            let storage = self.storage.lock().unwrap();
            storage.get_document(url)?
        };

        let doc = match doc {
            Some(doc) => doc,
            None => return Ok(true),
        };

        if let Some(lastmod) = lastmod {
            if lastmod > doc.crawl_date {
                tracing::info!("Document newer per sitemap lastmod: {}", url);
                return Ok(true);
            }
        }

        let now = Utc::now().timestamp();
        Ok(now - doc.crawl_date > self.recheck_interval as i64)
    }

    /// Records a fetched body for a URL
    ///
    /// An identical content hash only advances `last_check_date`; a new
    /// or differing hash upserts the full document with both timestamps
    /// reset to now.
    pub fn record(&self, url: &str, html_content: &str, source_name: &str) -> Result<ChangeOutcome> {
        let hash = content_hash(html_content);
        let now = Utc::now().timestamp();

        let mut storage = self.storage.lock().unwrap();

        if let Some(existing) = storage.get_document(url)? {
            if existing.content_hash == hash {
                tracing::info!("Document unchanged: {}", url);
                storage.touch_document(url, now)?;
                return Ok(ChangeOutcome::Unchanged);
            }
            tracing::info!("Document changed, updating: {}", url);
        }

        storage.upsert_document(&DocumentRecord {
            url: url.to_string(),
            html_content: html_content.to_string(),
            source_name: source_name.to_string(),
            crawl_date: now,
            last_check_date: now,
            content_hash: hash,
        })?;

        tracing::info!("Document saved: {}", url);
        Ok(ChangeOutcome::Changed)
    }
}
