//! Validity interval construction from rating events.

use crate::error::Result;
use crate::schema::{self, GVKEY, RATING_DATE, RATING_END_DATE};
use chrono::NaiveDate;
use polars::prelude::*;

/// Builds `[ratingdate, ratingenddate)` validity intervals per issuer.
///
/// Events are scanned per issuer in descending date order: each event's end
/// date is the date of the chronologically following event, and the most
/// recent event gets an open-ended interval closed by the sentinel date.
#[derive(Debug, Clone)]
pub struct IntervalBuilder {
    sentinel: NaiveDate,
}

impl IntervalBuilder {
    /// Create a builder with the standard sentinel end date (2100-12-31).
    pub fn new() -> Self {
        Self {
            sentinel: schema::sentinel_date(),
        }
    }

    /// Create a builder with a custom sentinel end date.
    pub const fn with_sentinel(sentinel: NaiveDate) -> Self {
        Self { sentinel }
    }

    /// Derive one validity interval per event.
    ///
    /// Expects events already linked to issuers and deduplicated on
    /// (`gvkey`, `ratingdate`); see [`crate::events::link_events`]. An issuer
    /// with a single event gets one open-ended interval; an issuer with no
    /// events simply contributes no rows. Output rows keep every event column
    /// and gain `ratingenddate`, sorted by issuer and descending event date.
    pub fn build(&self, events: &DataFrame) -> Result<DataFrame> {
        schema::check_columns(events, "rating events", &[GVKEY, RATING_DATE])?;

        let sorted = events.sort(
            [GVKEY, RATING_DATE],
            SortMultipleOptions::default().with_order_descending_multi([false, true]),
        )?;

        let ends = {
            let gvkeys = sorted.column(GVKEY)?.str()?;
            let dates = sorted.column(RATING_DATE)?.date()?;

            let mut ends: Vec<Option<NaiveDate>> = Vec::with_capacity(sorted.height());
            let mut prev_issuer: Option<&str> = None;
            let mut prev_date: Option<NaiveDate> = None;

            for (issuer, date) in gvkeys.iter().zip(dates.as_date_iter()) {
                let end = match (issuer, date) {
                    // Chronologically following event for the same issuer.
                    (Some(issuer), Some(_)) if prev_issuer == Some(issuer) => prev_date,
                    // Most recent event for this issuer: open-ended interval.
                    (Some(_), Some(_)) => Some(self.sentinel),
                    // No usable date; the row cannot form an interval.
                    _ => None,
                };
                ends.push(end);
                prev_issuer = issuer;
                prev_date = date;
            }
            ends
        };

        let end_column: Column =
            DateChunked::from_naive_date_options(RATING_END_DATE.into(), ends)
                .into_series()
                .into();

        let mut intervals = sorted;
        intervals.with_column(end_column)?;
        Ok(intervals)
    }
}

impl Default for IntervalBuilder {
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

    fn events(rows: &[(&str, &str, &str)]) -> DataFrame {
        let gvkeys: Vec<&str> = rows.iter().map(|(g, _, _)| *g).collect();
        let dates: Vec<NaiveDate> = rows.iter().map(|(_, date, _)| d(date)).collect();
        let symbols: Vec<&str> = rows.iter().map(|(_, _, s)| *s).collect();
        DataFrame::new(vec![
            Series::new(GVKEY.into(), gvkeys).into(),
            DateChunked::from_naive_date(RATING_DATE.into(), dates)
                .into_series()
                .into(),
            Series::new(RATING_SYMBOL.into(), symbols).into(),
        ])
        .unwrap()
    }

    fn end_dates(df: &DataFrame) -> Vec<Option<NaiveDate>> {
        df.column(RATING_END_DATE)
            .unwrap()
            .date()
            .unwrap()
            .as_date_iter()
            .collect()
    }

    #[test]
    fn test_consecutive_events_chain() {
        let events = events(&[
            ("G1", "2010-03-01", "BBB"),
            ("G1", "2012-06-15", "D"),
        ]);
        let intervals = IntervalBuilder::new().build(&events).unwrap();

        // Sorted issuer ascending, event date descending.
        assert_eq!(intervals.height(), 2);
        assert_eq!(
            end_dates(&intervals),
            vec![Some(schema::sentinel_date()), Some(d("2012-06-15"))]
        );
    }

    #[test]
    fn test_single_event_is_open_ended() {
        let events = events(&[("G1", "2011-05-20", "A")]);
        let intervals = IntervalBuilder::new().build(&events).unwrap();

        assert_eq!(intervals.height(), 1);
        assert_eq!(end_dates(&intervals), vec![Some(schema::sentinel_date())]);
    }

    #[test]
    fn test_issuer_boundary_resets_scan() {
        let events = events(&[
            ("G1", "2010-03-01", "BBB"),
            ("G1", "2012-06-15", "D"),
            ("G2", "2011-05-20", "A"),
        ]);
        let intervals = IntervalBuilder::new().build(&events).unwrap();

        let gvkeys: Vec<Option<&str>> = intervals
            .column(GVKEY)
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .collect();
        assert_eq!(gvkeys, vec![Some("G1"), Some("G1"), Some("G2")]);
        assert_eq!(
            end_dates(&intervals),
            vec![
                Some(schema::sentinel_date()),
                Some(d("2012-06-15")),
                Some(schema::sentinel_date()),
            ]
        );
    }

    #[test]
    fn test_intervals_cover_without_gaps() {
        let events = events(&[
            ("G1", "2008-01-10", "A"),
            ("G1", "2009-07-01", "BBB"),
            ("G1", "2012-06-15", "BB"),
            ("G1", "2015-02-28", "D"),
        ]);
        let intervals = IntervalBuilder::new()
            .build(&events)
            .unwrap()
            .sort([RATING_DATE], SortMultipleOptions::default())
            .unwrap();

        let begins: Vec<Option<NaiveDate>> = intervals
            .column(RATING_DATE)
            .unwrap()
            .date()
            .unwrap()
            .as_date_iter()
            .collect();
        let ends = end_dates(&intervals);

        // Each interval ends exactly where the next begins.
        for i in 0..intervals.height() - 1 {
            assert_eq!(ends[i], begins[i + 1]);
        }
        assert_eq!(ends[intervals.height() - 1], Some(schema::sentinel_date()));
    }

    #[test]
    fn test_custom_sentinel() {
        let builder = IntervalBuilder::with_sentinel(d("2050-01-01"));
        let intervals = builder
            .build(&events(&[("G1", "2011-05-20", "A")]))
            .unwrap();
        assert_eq!(end_dates(&intervals), vec![Some(d("2050-01-01"))]);
    }

    #[test]
    fn test_empty_events_produce_no_intervals() {
        let empty = events(&[]);
        let intervals = IntervalBuilder::new().build(&empty).unwrap();
        assert_eq!(intervals.height(), 0);
        assert!(intervals.column(RATING_END_DATE).is_ok());
    }
}
