//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::frontier::FrontierEntry;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::DocumentRecord;
use crate::DredgeError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at the given path
    pub fn new(path: &Path) -> Result<Self, DredgeError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, DredgeError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Documents =====

    fn get_document(&self, url: &str) -> StorageResult<Option<DocumentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, html_content, source_name, crawl_date, last_check_date, content_hash
             FROM documents WHERE url = ?1",
        )?;

        let doc = stmt
            .query_row(params![url], |row| {
                Ok(DocumentRecord {
                    url: row.get(0)?,
                    html_content: row.get(1)?,
                    source_name: row.get(2)?,
                    crawl_date: row.get(3)?,
                    last_check_date: row.get(4)?,
                    content_hash: row.get(5)?,
                })
            })
            .optional()?;

        Ok(doc)
    }

    fn upsert_document(&mut self, doc: &DocumentRecord) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO documents (url, html_content, source_name, crawl_date, last_check_date, content_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(url) DO UPDATE SET
                 html_content = excluded.html_content,
                 source_name = excluded.source_name,
                 crawl_date = excluded.crawl_date,
                 last_check_date = excluded.last_check_date,
                 content_hash = excluded.content_hash",
            params![
                doc.url,
                doc.html_content,
                doc.source_name,
                doc.crawl_date,
                doc.last_check_date,
                doc.content_hash,
            ],
        )?;
        Ok(())
    }

    fn touch_document(&mut self, url: &str, last_check_date: i64) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE documents SET last_check_date = ?1 WHERE url = ?2",
            params![last_check_date, url],
        )?;
        Ok(())
    }

    fn count_documents(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_documents_by_source(&self) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_name, COUNT(*) as count FROM documents
             GROUP BY source_name ORDER BY count DESC",
        )?;

        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    // ===== Queue =====

    fn replace_queue(&mut self, entries: &[FrontierEntry]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM queue", [])?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO queue (url, source_name, lastmod) VALUES (?1, ?2, ?3)",
            )?;
            for entry in entries {
                stmt.execute(params![entry.url, entry.source_name, entry.lastmod])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn load_queue(&self) -> StorageResult<Vec<FrontierEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, source_name, lastmod FROM queue ORDER BY position ASC")?;

        let entries = stmt
            .query_map([], |row| {
                Ok(FrontierEntry {
                    url: row.get(0)?,
                    source_name: row.get(1)?,
                    lastmod: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn count_queue(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM queue", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
