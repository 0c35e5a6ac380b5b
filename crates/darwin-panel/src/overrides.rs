//! Fiscal-year default overrides.
//!
//! Interval joins can miss a same-year default when the event lands after a
//! lagged statement date. The resolver keeps the earliest default-class event
//! per (issuer, fiscal year); applying it stamps that event's symbol and date
//! onto the year's statement row.

use crate::error::Result;
use crate::schema::{self, FISCAL_YEAR, GVKEY, RATING_DATE, RATING_SYMBOL};
use polars::prelude::*;

/// Override symbol column on resolved records.
pub const OVERRIDE_SYMBOL: &str = "override_symbol";

/// Override event date column on resolved records.
pub const OVERRIDE_DATE: &str = "override_date";

/// Resolves and applies per-fiscal-year default overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverrideResolver;

impl OverrideResolver {
    /// Create a resolver.
    pub const fn new() -> Self {
        Self
    }

    /// Derive override records from the full rating event stream.
    ///
    /// Keeps, per (`gvkey`, fiscal year of the event), the earliest
    /// default-class event. Returns one record per pair with columns
    /// `gvkey`, `fyear`, `override_symbol`, `override_date`.
    pub fn resolve(&self, events: &DataFrame) -> Result<DataFrame> {
        schema::check_columns(events, "rating events", &[GVKEY, RATING_DATE, RATING_SYMBOL])?;

        let defaults = events
            .clone()
            .lazy()
            .filter(col(RATING_DATE).is_not_null())
            .filter(col(RATING_SYMBOL).is_in(lit(schema::default_class_series())))
            .select([
                col(GVKEY),
                col(RATING_DATE).dt().year().alias(FISCAL_YEAR),
                col(RATING_SYMBOL).alias(OVERRIDE_SYMBOL),
                col(RATING_DATE).alias(OVERRIDE_DATE),
            ])
            .collect()?;

        let sorted = defaults.sort(
            [GVKEY, FISCAL_YEAR, OVERRIDE_DATE],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;
        let records = sorted.unique_stable(
            Some(&[GVKEY.to_string(), FISCAL_YEAR.to_string()]),
            UniqueKeepStrategy::First,
            None,
        )?;

        Ok(records)
    }

    /// Apply override records to the joined panel.
    ///
    /// For every panel row whose (`gvkey`, `fyear`) has an override record,
    /// replaces `ratingsymbol` and `ratingdate` with the override's values.
    /// `ratingenddate` keeps the joined interval's value, and the default-date
    /// computation never sees overrides; the asymmetry is deliberate.
    pub fn apply(&self, panel: &DataFrame, overrides: &DataFrame) -> Result<DataFrame> {
        schema::check_columns(panel, "panel", &[GVKEY, FISCAL_YEAR, RATING_SYMBOL, RATING_DATE])?;
        schema::check_columns(
            overrides,
            "override records",
            &[GVKEY, FISCAL_YEAR, OVERRIDE_SYMBOL, OVERRIDE_DATE],
        )?;

        let overridden = panel
            .clone()
            .lazy()
            .join(
                overrides.clone().lazy(),
                [col(GVKEY), col(FISCAL_YEAR)],
                [col(GVKEY), col(FISCAL_YEAR)],
                JoinArgs::new(JoinType::Left),
            )
            .with_columns([
                when(col(OVERRIDE_SYMBOL).is_not_null())
                    .then(col(OVERRIDE_SYMBOL))
                    .otherwise(col(RATING_SYMBOL))
                    .alias(RATING_SYMBOL),
                when(col(OVERRIDE_DATE).is_not_null())
                    .then(col(OVERRIDE_DATE))
                    .otherwise(col(RATING_DATE))
                    .alias(RATING_DATE),
            ])
            .collect()?;

        Ok(overridden.drop_many([OVERRIDE_SYMBOL, OVERRIDE_DATE]))
    }
}
