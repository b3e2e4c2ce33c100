//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::frontier::FrontierEntry;
use crate::storage::DocumentRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Defines the two durable collections the crawler relies on: the
/// `documents` store (one row per normalized URL) and the `queue`
/// snapshot the frontier is checkpointed into.
pub trait Storage {
    // ===== Documents =====

    /// Looks up a document by its normalized URL
    fn get_document(&self, url: &str) -> StorageResult<Option<DocumentRecord>>;

    /// Inserts or fully replaces a document, keyed on its URL
    fn upsert_document(&mut self, doc: &DocumentRecord) -> StorageResult<()>;

    /// Advances only `last_check_date` for an unchanged document
    fn touch_document(&mut self, url: &str, last_check_date: i64) -> StorageResult<()>;

    /// Total number of stored documents
    fn count_documents(&self) -> StorageResult<u64>;

    /// Document counts grouped by source name, descending
    fn count_documents_by_source(&self) -> StorageResult<Vec<(String, u64)>>;

    // ===== Queue =====

    /// Replaces the entire persisted queue with the given entries,
    /// preserving their order. Duplicate URLs collapse here: the queue
    /// has a unique index on `url` and later duplicates are ignored.
    fn replace_queue(&mut self, entries: &[FrontierEntry]) -> StorageResult<()>;

    /// Loads the persisted queue in its stored order
    fn load_queue(&self) -> StorageResult<Vec<FrontierEntry>>;

    /// Number of persisted queue entries
    fn count_queue(&self) -> StorageResult<u64>;
}
