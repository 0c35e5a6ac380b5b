//! Reference cache location and maintenance.
//!
//! The SQLite cache holds the fetched SIC reference tables so repeat panel
//! builds work offline. It lives in the platform cache directory.

use darwin_data::cache::SqliteCache;
use darwin_data::error::DataError;
use std::path::PathBuf;

/// Get the default cache directory path.
///
/// Uses platform-specific cache directories:
/// - Linux: `~/.cache/darwin/`
/// - macOS: `~/Library/Caches/darwin/`
/// - Windows: `%LOCALAPPDATA%\darwin\cache\`
pub(crate) fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("darwin")
}

/// Get the default cache database path.
pub(crate) fn default_cache_path() -> PathBuf {
    default_cache_dir().join("darwin.db")
}

/// Print cache location and contents.
pub(crate) fn print_cache_info() -> Result<(), DataError> {
    let path = default_cache_path();
    println!("Cache: {}", path.display());

    if !path.exists() {
        println!("  (empty, nothing cached yet)");
        return Ok(());
    }

    let cache = SqliteCache::new(&path)?;
    let stats = cache.get_stats()?;
    println!("  Reference tables: {}", stats.reference_tables);
    match stats.last_fetched {
        Some(fetched) => println!("  Last fetched:     {}", fetched),
        None => println!("  Last fetched:     never"),
    }
    cache.close()?;

    Ok(())
}

/// Remove all cached payloads.
pub(crate) fn clear_cache() -> Result<(), DataError> {
    let path = default_cache_path();
    if !path.exists() {
        println!("Cache is already empty.");
        return Ok(());
    }

    let cache = SqliteCache::new(&path)?;
    cache.clear_all()?;
    cache.close()?;
    println!("Cache cleared.");

    Ok(())
}
