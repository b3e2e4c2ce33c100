//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler:
//! - SQLite initialization and schema management
//! - Document persistence with content-hash change tracking fields
//! - Queue snapshots for frontier checkpointing and resumption

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

/// A crawled document as stored in the `documents` collection
///
/// `url` is the normalized form and the single natural key: two URLs
/// that normalize identically always map to one row.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub url: String,
    pub html_content: String,
    pub source_name: String,
    /// Epoch seconds of the last fetch that changed content
    pub crawl_date: i64,
    /// Epoch seconds of the last fetch, changed or not
    pub last_check_date: i64,
    /// Hex digest of `html_content`
    pub content_hash: String,
}
