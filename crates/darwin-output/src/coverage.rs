//! Coverage reporting: rated issuers without financial statements.
//!
//! The panel silently drops issuers whose ratings never meet a statement
//! row. The coverage report makes that loss visible so snapshot gaps can be
//! chased upstream rather than discovered in model residuals.

use crate::error::{OutputError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

const GVKEY: &str = "gvkey";
const ENTITY_NAME: &str = "entity_pname";

/// Default file name for the coverage report.
pub const COVERAGE_FILE_NAME: &str = "missing_financials_gvkeys.csv";

/// A rated issuer with no statement rows in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRecord {
    /// Issuer identifier.
    pub gvkey: String,

    /// Rated entity display name.
    pub entity_pname: String,
}

/// Find rated issuers absent from the statements table.
///
/// `events` must carry `gvkey` and `entity_pname`; `statements` must carry
/// `gvkey`. One record per (`gvkey`, `entity_pname`) pair is returned,
/// sorted by `gvkey`.
pub fn missing_statements(events: &DataFrame, statements: &DataFrame) -> Result<Vec<CoverageRecord>> {
    check_columns(events, "rating events", &[GVKEY, ENTITY_NAME])?;
    check_columns(statements, "statements", &[GVKEY])?;

    let missing = events
        .clone()
        .lazy()
        .select([col(GVKEY), col(ENTITY_NAME)])
        .join(
            statements.clone().lazy().select([col(GVKEY)]),
            [col(GVKEY)],
            [col(GVKEY)],
            JoinArgs::new(JoinType::Anti),
        )
        .collect()?;

    let deduped = missing.unique_stable(
        Some(&[GVKEY.to_string(), ENTITY_NAME.to_string()]),
        UniqueKeepStrategy::First,
        None,
    )?;
    let sorted = deduped.sort([GVKEY], SortMultipleOptions::default())?;

    let gvkeys = sorted.column(GVKEY)?.str()?;
    let names = sorted.column(ENTITY_NAME)?.str()?;
    let records = gvkeys
        .iter()
        .zip(names.iter())
        .map(|(gvkey, name)| CoverageRecord {
            gvkey: gvkey.unwrap_or_default().to_string(),
            entity_pname: name.unwrap_or_default().to_string(),
        })
        .collect();

    Ok(records)
}

/// Write coverage records to a CSV file at `path`.
pub fn write_coverage_report(records: &[CoverageRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    log::info!(
        "wrote coverage report with {} issuers to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

fn check_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    for column in required {
        if df.column(column).is_err() {
            return Err(OutputError::MissingColumn {
                column: (*column).to_string(),
                table: table.to_string(),
            });
        }
    }
    Ok(())
}
