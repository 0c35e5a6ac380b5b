//! Panel file export.

use crate::error::{OutputError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values.
    Csv,

    /// Apache Parquet.
    Parquet,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            other => Err(OutputError::InvalidFormat(other.to_string())),
        }
    }
}

/// Write a finished panel to `path` in the given format.
///
/// Dates serialize as ISO-8601 in CSV output. The dataframe is taken mutably
/// because the writers rechunk it in place.
pub fn write_panel(panel: &mut DataFrame, path: &Path, format: ExportFormat) -> Result<()> {
    let file = File::create(path)?;
    match format {
        ExportFormat::Csv => {
            CsvWriter::new(file)
                .include_header(true)
                .finish(panel)?;
        }
        ExportFormat::Parquet => {
            ParquetWriter::new(file).finish(panel)?;
        }
    }
    log::info!(
        "wrote {} panel rows to {}",
        panel.height(),
        path.display()
    );
    Ok(())
}
