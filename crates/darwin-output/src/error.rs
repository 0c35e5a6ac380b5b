//! Error types for panel output.

use thiserror::Error;

/// Errors from exporting, coverage reporting, or summarizing a panel.
#[derive(Debug, Error)]
pub enum OutputError {
    /// CSV serialization failed.
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A file could not be created or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A dataframe operation failed.
    #[error("dataframe operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// The requested export format is not recognized.
    #[error("unknown export format '{0}', expected 'csv' or 'parquet'")]
    InvalidFormat(String),

    /// A required column is missing from an input table.
    #[error("column '{column}' missing from {table} table")]
    MissingColumn {
        /// The missing column name.
        column: String,
        /// The table it was expected in.
        table: String,
    },
}

/// Result alias for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
