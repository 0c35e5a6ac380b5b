//! SQLite caching layer for fetched reference tables.

use crate::error::{DataError, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// SQLite cache holding raw reference table payloads.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Create a new SQLite cache.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS reference_tables (
                key TEXT PRIMARY KEY,
                url TEXT NOT NULL,
                payload TEXT NOT NULL,
                fetched_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Get a cached reference payload by key.
    pub fn get_reference(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row(
                "SELECT payload FROM reference_tables WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(result)
    }

    /// Store a reference payload, replacing any previous copy.
    pub fn put_reference(&self, key: &str, url: &str, payload: &str) -> Result<()> {
        let fetched_at = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT OR REPLACE INTO reference_tables (key, url, payload, fetched_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, url, payload, fetched_at],
        )?;

        Ok(())
    }

    /// When a reference payload was last fetched, as an RFC 3339 string.
    pub fn fetched_at(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row(
                "SELECT fetched_at FROM reference_tables WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(result)
    }

    /// Clear all cached data.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM reference_tables", [])?;
        Ok(())
    }

    /// Get cache statistics.
    pub fn get_stats(&self) -> Result<CacheStats> {
        let reference_tables: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM reference_tables", [], |row| {
                    row.get(0)
                })?;

        let last_fetched: Option<String> = self
            .conn
            .query_row(
                "SELECT MAX(fetched_at) FROM reference_tables",
                [],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        Ok(CacheStats {
            reference_tables: reference_tables as usize,
            last_fetched,
        })
    }

    /// Close the cache, releasing the underlying connection.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| DataError::Database(err))
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of reference tables cached
    pub reference_tables: usize,
    /// Most recent fetch time (RFC 3339), if anything is cached
    pub last_fetched: Option<String>,
}
