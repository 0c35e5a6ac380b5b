//! As-of containment join between statements and rating intervals.

use crate::error::Result;
use crate::schema::{self, DATA_DATE, GVKEY, RATING_DATE, RATING_END_DATE};
use chrono::NaiveDate;
use polars::prelude::*;

/// Joins statement observations to the rating interval covering each
/// statement date.
///
/// The join is an inner join on issuer, so statements for issuers with no
/// rating history (and intervals for issuers with no statements) drop out.
/// A statement row survives only when some interval of its issuer satisfies
/// `ratingdate <= datadate <= ratingenddate`, with end dates past the
/// sentinel clamped to it for the comparison.
#[derive(Debug, Clone, Copy)]
pub struct AsOfJoiner {
    sentinel: NaiveDate,
}

impl AsOfJoiner {
    /// Create a joiner using the standard far-future sentinel.
    pub fn new() -> Self {
        Self {
            sentinel: schema::sentinel_date(),
        }
    }

    /// Create a joiner with a custom sentinel end date.
    pub const fn with_sentinel(sentinel: NaiveDate) -> Self {
        Self { sentinel }
    }

    /// Join statements to their covering rating intervals.
    ///
    /// Statements without a covering interval are dropped. When more than one
    /// interval covers a statement date the most recently begun interval
    /// wins; contiguous intervals share a boundary date, so a statement dated
    /// exactly on one resolves to the newer rating.
    pub fn join(&self, statements: &DataFrame, intervals: &DataFrame) -> Result<DataFrame> {
        schema::check_columns(statements, "statements", &[GVKEY, DATA_DATE])?;
        schema::check_columns(
            intervals,
            "rating intervals",
            &[GVKEY, RATING_DATE, RATING_END_DATE],
        )?;

        let clamped_end = when(col(RATING_END_DATE).gt(schema::date_lit(self.sentinel)))
            .then(schema::date_lit(self.sentinel))
            .otherwise(col(RATING_END_DATE));

        let joined = statements
            .clone()
            .lazy()
            .join(
                intervals.clone().lazy(),
                [col(GVKEY)],
                [col(GVKEY)],
                JoinArgs::new(JoinType::Inner),
            )
            .filter(
                col(RATING_DATE)
                    .lt_eq(col(DATA_DATE))
                    .and(col(DATA_DATE).lt_eq(clamped_end)),
            )
            .collect()?;

        let sorted = joined.sort(
            [GVKEY, DATA_DATE, RATING_DATE],
            SortMultipleOptions::default()
                .with_order_descending_multi([false, false, true])
                .with_maintain_order(true),
        )?;
        let resolved = sorted.unique_stable(
            Some(&[GVKEY.to_string(), DATA_DATE.to_string()]),
            UniqueKeepStrategy::First,
            None,
        )?;

        let overlapping = sorted.height() - resolved.height();
        if overlapping > 0 {
            log::warn!(
                "{} statement dates covered by overlapping rating intervals; kept the most recent",
                overlapping
            );
        }

        Ok(resolved)
    }
}

impl Default for AsOfJoiner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RATING_SYMBOL;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn intervals(rows: &[(&str, &str, &str, &str)]) -> DataFrame {
        let gvkeys: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let begins: Vec<NaiveDate> = rows.iter().map(|r| d(r.1)).collect();
        let symbols: Vec<&str> = rows.iter().map(|r| r.2).collect();
        let ends: Vec<NaiveDate> = rows.iter().map(|r| d(r.3)).collect();
        DataFrame::new(vec![
            Series::new(GVKEY.into(), gvkeys).into(),
            DateChunked::from_naive_date(RATING_DATE.into(), begins)
                .into_series()
                .into(),
            Series::new(RATING_SYMBOL.into(), symbols).into(),
            DateChunked::from_naive_date(RATING_END_DATE.into(), ends)
                .into_series()
                .into(),
        ])
        .unwrap()
    }

    fn statements(rows: &[(&str, &str)]) -> DataFrame {
        let gvkeys: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| d(r.1)).collect();
        DataFrame::new(vec![
            Series::new(GVKEY.into(), gvkeys).into(),
            DateChunked::from_naive_date(DATA_DATE.into(), dates)
                .into_series()
                .into(),
        ])
        .unwrap()
    }

    fn symbols(df: &DataFrame) -> Vec<Option<String>> {
        df.column(RATING_SYMBOL)
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .map(|s| s.map(str::to_string))
            .collect()
    }

    fn history() -> DataFrame {
        intervals(&[
            ("G1", "2010-03-01", "BBB", "2012-06-15"),
            ("G1", "2012-06-15", "D", "2100-12-31"),
        ])
    }

    #[test]
    fn test_statement_picks_covering_interval() {
        let stmts = statements(&[("G1", "2011-01-01"), ("G1", "2012-02-01")]);
        let out = AsOfJoiner::new().join(&stmts, &history()).unwrap();

        assert_eq!(out.height(), 2);
        assert_eq!(
            symbols(&out),
            vec![Some("BBB".to_string()), Some("BBB".to_string())]
        );
    }

    #[test]
    fn test_begin_boundary_is_inclusive() {
        let stmts = statements(&[("G1", "2010-03-01")]);
        let out = AsOfJoiner::new().join(&stmts, &history()).unwrap();
        assert_eq!(symbols(&out), vec![Some("BBB".to_string())]);
    }

    #[test]
    fn test_shared_boundary_resolves_to_newer_rating() {
        // 2012-06-15 lies in both intervals (inclusive bounds); the interval
        // that began most recently wins.
        let stmts = statements(&[("G1", "2012-06-15")]);
        let out = AsOfJoiner::new().join(&stmts, &history()).unwrap();

        assert_eq!(out.height(), 1);
        assert_eq!(symbols(&out), vec![Some("D".to_string())]);
    }

    #[test]
    fn test_uncovered_statement_dropped() {
        let stmts = statements(&[("G1", "2009-12-31"), ("G1", "2011-01-01")]);
        let out = AsOfJoiner::new().join(&stmts, &history()).unwrap();

        assert_eq!(out.height(), 1);
        let dates: Vec<Option<NaiveDate>> = out
            .column(DATA_DATE)
            .unwrap()
            .date()
            .unwrap()
            .as_date_iter()
            .collect();
        assert_eq!(dates, vec![Some(d("2011-01-01"))]);
    }

    #[test]
    fn test_issuers_restricted_to_intersection() {
        let stmts = statements(&[("G1", "2011-01-01"), ("G2", "2011-01-01")]);
        let out = AsOfJoiner::new().join(&stmts, &history()).unwrap();

        assert_eq!(out.height(), 1);
        let issuers: Vec<Option<&str>> = out
            .column(GVKEY)
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(issuers, vec![Some("G1")]);
    }

    #[test]
    fn test_end_dates_past_sentinel_are_clamped() {
        let ivs = intervals(&[("G1", "2010-03-01", "BBB", "2150-01-01")]);
        let stmts = statements(&[("G1", "2100-12-31"), ("G1", "2101-06-01")]);
        let out = AsOfJoiner::new().join(&stmts, &ivs).unwrap();

        // The sentinel itself is covered; anything past it is not.
        assert_eq!(out.height(), 1);
        let dates: Vec<Option<NaiveDate>> = out
            .column(DATA_DATE)
            .unwrap()
            .date()
            .unwrap()
            .as_date_iter()
            .collect();
        assert_eq!(dates, vec![Some(d("2100-12-31"))]);
    }
}
