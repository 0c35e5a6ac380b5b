//! Column names and shared helpers for panel tables.

use crate::error::{PanelError, Result};
use crate::rating::RatingSymbol;
use chrono::NaiveDate;
use polars::prelude::*;

/// Issuer identifier column.
pub const GVKEY: &str = "gvkey";

/// Provider company identifier column.
pub const COMPANY_ID: &str = "companyid";

/// Rated entity display name column.
pub const ENTITY_NAME: &str = "entity_pname";

/// Rating event date column; begin of validity on interval rows.
pub const RATING_DATE: &str = "ratingdate";

/// Rating grade symbol column.
pub const RATING_SYMBOL: &str = "ratingsymbol";

/// Rating action description column.
pub const RATING_ACTION: &str = "ratingactionword";

/// Unsolicited-rating flag column.
pub const UNSOLICITED: &str = "unsol";

/// End of rating validity column (exclusive in the event stream, compared
/// inclusively in the as-of join).
pub const RATING_END_DATE: &str = "ratingenddate";

/// Statement date column.
pub const DATA_DATE: &str = "datadate";

/// Fiscal year column.
pub const FISCAL_YEAR: &str = "fyear";

/// Issuer sector column.
pub const SECTOR: &str = "sector";

/// First default date column.
pub const DEFAULT_DATE: &str = "dflt_date";

/// Days from statement date to first default column.
pub const DAYS_TO_DEFAULT: &str = "days2dflt";

/// Binary default label column.
pub const DEFAULT_FLAG: &str = "dflt_flag";

/// Rating columns attached to every statement row, in published order.
pub const RATING_COLUMNS: [&str; 6] = [
    ENTITY_NAME,
    RATING_DATE,
    RATING_SYMBOL,
    RATING_ACTION,
    UNSOLICITED,
    RATING_END_DATE,
];

/// Sentinel end date for open intervals and never-defaulting issuers.
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Literal expression for a calendar date.
pub fn date_lit(date: NaiveDate) -> Expr {
    let days = (date - NaiveDate::default()).num_days() as i32;
    lit(days).cast(DataType::Date)
}

/// Series holding the default-class grade symbols, for membership tests.
pub fn default_class_series() -> Series {
    let symbols: Vec<&str> = RatingSymbol::default_class()
        .iter()
        .map(|s| s.as_str())
        .collect();
    Series::new("default_class".into(), symbols)
}

/// Verify that a table contains every required column.
pub fn check_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    for column in required {
        if df.column(column).is_err() {
            return Err(PanelError::MissingColumn {
                column: (*column).to_string(),
                table: table.to_string(),
            });
        }
    }
    Ok(())
}
