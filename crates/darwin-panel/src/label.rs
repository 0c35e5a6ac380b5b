//! Default-horizon labeling.
//!
//! Distances each statement from its issuer's first default and flags the
//! rows falling inside the acceptance window. Issuers that never default get
//! the far-future sentinel as their default date, so `days2dflt` is always
//! populated and downstream distance filters behave uniformly.

use crate::error::Result;
use crate::schema::{
    self, DATA_DATE, DAYS_TO_DEFAULT, DEFAULT_DATE, DEFAULT_FLAG, GVKEY, RATING_DATE,
    RATING_SYMBOL,
};
use chrono::NaiveDate;
use polars::prelude::*;

/// Acceptance window for the default flag, in days before the default.
///
/// The standard window flags statements dated 3 to roughly 15 months before
/// the issuer's default. Nearer defaults are treated as already visible in
/// the statement period; farther ones as not attributable to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorizonConfig {
    /// Smallest `days2dflt` that is flagged.
    pub min_days: i64,
    /// Largest `days2dflt` that is flagged.
    pub max_days: i64,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            min_days: 90,
            max_days: 455,
        }
    }
}

/// Labels panel rows with default distance and flag.
#[derive(Debug, Clone, Copy)]
pub struct HorizonLabeler {
    config: HorizonConfig,
    sentinel: NaiveDate,
}

impl HorizonLabeler {
    /// Create a labeler with the given acceptance window.
    pub fn new(config: HorizonConfig) -> Self {
        Self {
            config,
            sentinel: schema::sentinel_date(),
        }
    }

    /// Create a labeler with a custom sentinel default date.
    pub const fn with_sentinel(config: HorizonConfig, sentinel: NaiveDate) -> Self {
        Self { config, sentinel }
    }

    /// Derive each issuer's first default date from the full event stream.
    ///
    /// Scans every rating event, not only those that joined a statement, so
    /// a default observed between statement dates still anchors the label.
    /// Returns one row per defaulting issuer with `gvkey` and `dflt_date`.
    pub fn first_defaults(&self, events: &DataFrame) -> Result<DataFrame> {
        schema::check_columns(events, "rating events", &[GVKEY, RATING_DATE, RATING_SYMBOL])?;

        let defaults = events
            .clone()
            .lazy()
            .filter(col(RATING_DATE).is_not_null())
            .filter(col(RATING_SYMBOL).is_in(lit(schema::default_class_series())))
            .select([col(GVKEY), col(RATING_DATE).alias(DEFAULT_DATE)])
            .collect()?;

        let sorted = defaults.sort(
            [GVKEY, DEFAULT_DATE],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;
        let first = sorted.unique_stable(
            Some(&[GVKEY.to_string()]),
            UniqueKeepStrategy::First,
            None,
        )?;

        Ok(first)
    }

    /// Attach `dflt_date`, `days2dflt`, and `dflt_flag` to the panel.
    ///
    /// `days2dflt` may be negative when the statement postdates the default;
    /// such rows are flagged 0, never as fresh defaults.
    pub fn label(&self, panel: &DataFrame, events: &DataFrame) -> Result<DataFrame> {
        schema::check_columns(panel, "panel", &[GVKEY, DATA_DATE])?;
        let defaults = self.first_defaults(events)?;

        let in_window = col(DAYS_TO_DEFAULT)
            .is_not_null()
            .and(col(DAYS_TO_DEFAULT).gt_eq(lit(self.config.min_days)))
            .and(col(DAYS_TO_DEFAULT).lt_eq(lit(self.config.max_days)));

        let labeled = panel
            .clone()
            .lazy()
            .join(
                defaults.lazy(),
                [col(GVKEY)],
                [col(GVKEY)],
                JoinArgs::new(JoinType::Left),
            )
            .with_column(
                when(col(DEFAULT_DATE).is_null())
                    .then(schema::date_lit(self.sentinel))
                    .otherwise(col(DEFAULT_DATE))
                    .alias(DEFAULT_DATE),
            )
            .with_column(
                (col(DEFAULT_DATE) - col(DATA_DATE))
                    .dt()
                    .total_days()
                    .alias(DAYS_TO_DEFAULT),
            )
            .with_column(
                when(in_window)
                    .then(lit(1i32))
                    .otherwise(lit(0i32))
                    .alias(DEFAULT_FLAG),
            )
            .collect()?;

        Ok(labeled)
    }
}

impl Default for HorizonLabeler {
    fn default() -> Self {
        Self::new(HorizonConfig::default())
    }
}
