//! Frontier module: the durable work queue of pending URLs
//!
//! The frontier is an in-memory FIFO backed by the `queue` table.
//! `persist` takes a full snapshot (clear-then-insert, not a diff) and
//! `restore` reloads it, so an interrupted run picks up exactly where
//! the last checkpoint left it.

use crate::storage::{SqliteStorage, Storage};
use crate::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A URL awaiting a crawl decision
///
/// Entries are not deduplicated at push time; the same URL may be queued
/// more than once (for the same or different sources) and only collapses
/// against the storage-layer unique index when persisted. The visited
/// set makes in-run duplicates a cheap no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized URL
    pub url: String,

    /// Name of the source this entry was discovered for
    pub source_name: String,

    /// `<lastmod>` from the sitemap, epoch seconds, when present
    pub lastmod: Option<i64>,
}

/// The frontier queue
pub struct Frontier {
    storage: Arc<Mutex<SqliteStorage>>,
    entries: VecDeque<FrontierEntry>,
}

impl Frontier {
    /// Creates an empty frontier over the given storage
    pub fn new(storage: Arc<Mutex<SqliteStorage>>) -> Self {
        Self {
            storage,
            entries: VecDeque::new(),
        }
    }

    /// Appends an entry to the back of the queue
    pub fn push(&mut self, entry: FrontierEntry) {
        self.entries.push_back(entry);
    }

    /// Removes and returns the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.entries.pop_front()
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checkpoints the queue: full replace of the persisted snapshot
    /// with the current in-memory sequence
    pub fn persist(&self) -> Result<()> {
        let entries: Vec<FrontierEntry> = self.entries.iter().cloned().collect();
        let mut storage = self.storage.lock().unwrap();
        storage.replace_queue(&entries)?;
        tracing::debug!("Frontier checkpoint saved ({} entries)", entries.len());
        Ok(())
    }

    /// Loads the persisted queue, replacing in-memory state
    ///
    /// Returns true when a non-empty snapshot was restored; false means
    /// the caller must bootstrap from the configured sources.
    pub fn restore(&mut self) -> Result<bool> {
        let loaded = {
            let storage = self.storage.lock().unwrap();
            storage.load_queue()?
        };

        if loaded.is_empty() {
            return Ok(false);
        }

        tracing::info!("Frontier restored ({} entries)", loaded.len());
        self.entries = loaded.into();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frontier() -> Frontier {
        let storage = Arc::new(Mutex::new(SqliteStorage::new_in_memory().unwrap()));
        Frontier::new(storage)
    }

    fn entry(url: &str) -> FrontierEntry {
        FrontierEntry {
            url: url.to_string(),
            source_name: "blog".to_string(),
            lastmod: None,
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = test_frontier();
        frontier.push(entry("https://example.com/1"));
        frontier.push(entry("https://example.com/2"));

        assert_eq!(frontier.pop().unwrap().url, "https://example.com/1");
        assert_eq!(frontier.pop().unwrap().url, "https://example.com/2");
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_push_does_not_dedupe() {
        let mut frontier = test_frontier();
        frontier.push(entry("https://example.com/same"));
        frontier.push(entry("https://example.com/same"));

        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_persist_restore_roundtrip() {
        let storage = Arc::new(Mutex::new(SqliteStorage::new_in_memory().unwrap()));

        let mut frontier = Frontier::new(Arc::clone(&storage));
        frontier.push(entry("https://example.com/first"));
        frontier.push(FrontierEntry {
            url: "https://example.com/second".to_string(),
            source_name: "news".to_string(),
            lastmod: Some(1_672_531_200),
        });
        frontier.persist().unwrap();

        let mut fresh = Frontier::new(storage);
        assert!(fresh.restore().unwrap());
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh.pop().unwrap().url, "https://example.com/first");

        let second = fresh.pop().unwrap();
        assert_eq!(second.url, "https://example.com/second");
        assert_eq!(second.source_name, "news");
        assert_eq!(second.lastmod, Some(1_672_531_200));
    }

    #[test]
    fn test_restore_empty_returns_false() {
        let mut frontier = test_frontier();
        assert!(!frontier.restore().unwrap());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_persist_after_pops_shrinks_snapshot() {
        let storage = Arc::new(Mutex::new(SqliteStorage::new_in_memory().unwrap()));

        let mut frontier = Frontier::new(Arc::clone(&storage));
        frontier.push(entry("https://example.com/1"));
        frontier.push(entry("https://example.com/2"));
        frontier.persist().unwrap();

        frontier.pop();
        frontier.persist().unwrap();

        let mut fresh = Frontier::new(storage);
        assert!(fresh.restore().unwrap());
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh.pop().unwrap().url, "https://example.com/2");
    }
}
