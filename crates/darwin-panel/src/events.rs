//! Rating event preparation: issuer linking and deduplication.

use crate::error::Result;
use crate::schema::{self, COMPANY_ID, GVKEY, RATING_DATE, RATING_SYMBOL};
use polars::prelude::*;

/// Link rating events to issuers through the identity crosswalk.
///
/// Events are keyed by `companyid`; the crosswalk maps each `companyid` to
/// its `gvkey`. Events with an unparseable date are dropped here since they
/// can never satisfy the as-of containment test, and duplicate events on
/// (`gvkey`, `ratingdate`) are collapsed to the first occurrence after a
/// stable sort.
pub fn link_events(identity: &DataFrame, events: &DataFrame) -> Result<DataFrame> {
    schema::check_columns(identity, "issuer identity", &[GVKEY, COMPANY_ID])?;
    schema::check_columns(events, "rating events", &[COMPANY_ID, RATING_DATE, RATING_SYMBOL])?;

    let linked = identity
        .clone()
        .lazy()
        .select([col(GVKEY), col(COMPANY_ID)])
        .join(
            events.clone().lazy(),
            [col(COMPANY_ID)],
            [col(COMPANY_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .filter(col(RATING_DATE).is_not_null())
        .collect()?;

    let sorted = linked.sort(
        [GVKEY, COMPANY_ID, RATING_DATE],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;
    let deduped = sorted.unique_stable(
        Some(&[GVKEY.to_string(), RATING_DATE.to_string()]),
        UniqueKeepStrategy::First,
        None,
    )?;

    let collapsed = sorted.height() - deduped.height();
    if collapsed > 0 {
        log::debug!("collapsed {collapsed} rating events sharing (gvkey, ratingdate)");
    }

    Ok(deduped)
}
