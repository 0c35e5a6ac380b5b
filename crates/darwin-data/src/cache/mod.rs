//! Caching layer for remote reference data.

pub mod sqlite;

pub use sqlite::{CacheStats, SqliteCache};
