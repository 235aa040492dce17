//! Day-level date matching.

use chrono::Duration;

use crate::types::{DayRange, NormalizedDate};

/// UTC instants bounding the whole calendar day of `date`.
///
/// The calendar digits are copied straight into UTC wall-clock values, not
/// converted from local time. A stored instant written as any offset's
/// midnight of the same calendar date falls inside the range as long as it
/// was normalized to UTC midnight on write.
pub fn day_range_utc(date: &NormalizedDate) -> DayRange {
  let start = date.to_utc_midnight();
  let end = start + Duration::days(1) - Duration::milliseconds(1);
  DayRange { start, end }
}

/// True iff both dates are present and name the same year, month and day.
pub fn same_calendar_day(a: Option<&NormalizedDate>, b: Option<&NormalizedDate>) -> bool {
  match (a, b) {
    (Some(a), Some(b)) => a.year() == b.year() && a.month() == b.month() && a.day() == b.day(),
    _ => false,
  }
}
