//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Snapshot directory does not exist
    #[error("Snapshot directory not found: {0}")]
    SnapshotDirNotFound(String),

    /// A required input table file is missing
    #[error("Missing {dataset} snapshot: expected {path}")]
    MissingInput {
        /// Logical dataset that could not be loaded
        dataset: String,
        /// File path that was checked
        path: String,
    },

    /// A required column is absent from an input table
    #[error("Missing column '{column}' in {dataset} snapshot")]
    MissingColumn {
        /// Column that was expected
        column: String,
        /// Dataset the column was expected in
        dataset: String,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
