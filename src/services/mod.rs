pub mod dashboard;
pub mod discounts;
pub mod ledger;
pub mod pricing;
pub mod resolver;
pub mod schedule;

use chrono::{NaiveDateTime, Timelike, Utc};

/// Current UTC time truncated to whole seconds.
pub(crate) fn timestamp_now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}
