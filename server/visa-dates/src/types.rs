//! Core date types: normalized calendar dates, raw inputs, and UTC day ranges.

use chrono::{
  DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// NormalizedDate
// ---------------------------------------------------------------------------

/// A calendar date with no time-of-day component.
///
/// Months are 1-based (`month()` returns 1..=12). `month0()` gives the
/// 0-based index when a caller needs it. Two values are equal iff year,
/// month and day all match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedDate(NaiveDate);

impl NormalizedDate {
  /// Build from calendar components. `None` when the components do not name
  /// a real day (month 13, Feb 30, ...).
  pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
    NaiveDate::from_ymd_opt(year, month, day).map(Self)
  }

  /// Build from calendar components, carrying overflow into later months
  /// and years: month 0 is December of the previous year, `Feb 30` is early
  /// March, month 20 lands in August of the following year. `None` only when
  /// the result leaves chrono's supported range.
  pub fn from_ymd_rolling(year: i32, month: u32, day: u32) -> Option<Self> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let start = match month {
      0 => start.checked_sub_months(Months::new(1))?,
      m => start.checked_add_months(Months::new(m - 1))?,
    };
    let date = match day {
      0 => start.checked_sub_days(Days::new(1))?,
      d => start.checked_add_days(Days::new(u64::from(d) - 1))?,
    };
    Some(Self(date))
  }

  pub fn year(&self) -> i32 {
    self.0.year()
  }

  pub fn month(&self) -> u32 {
    self.0.month()
  }

  pub fn month0(&self) -> u32 {
    self.0.month0()
  }

  pub fn day(&self) -> u32 {
    self.0.day()
  }

  pub fn as_naive(&self) -> NaiveDate {
    self.0
  }

  /// The calendar digits copied into a UTC instant at 00:00:00.000.
  ///
  /// This is the value written to storage, so a later day-range lookup on
  /// the same calendar date always contains it.
  pub fn to_utc_midnight(&self) -> DateTime<Utc> {
    Utc.from_utc_datetime(&self.0.and_time(chrono::NaiveTime::default()))
  }

  /// Calendar date of a stored instant, read in UTC.
  pub fn from_utc(instant: &DateTime<Utc>) -> Self {
    Self(instant.date_naive())
  }

  /// Display form used in API responses, e.g. `13 May 2003`.
  pub fn display(&self) -> String {
    self.0.format("%d %b %Y").to_string()
  }
}

impl From<NaiveDate> for NormalizedDate {
  fn from(d: NaiveDate) -> Self {
    Self(d)
  }
}

impl fmt::Display for NormalizedDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format("%Y-%m-%d"))
  }
}

// ---------------------------------------------------------------------------
// RawDateInput
// ---------------------------------------------------------------------------

/// Anything the parser accepts: free text, or an already-typed date value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawDateInput<'a> {
  Text(&'a str),
  Date(NaiveDate),
  /// Wall-clock date-time with no offset; taken literally.
  NaiveDateTime(NaiveDateTime),
  /// Offset-bearing instant; converted to the parser's local offset.
  DateTime(DateTime<FixedOffset>),
}

impl<'a> From<&'a str> for RawDateInput<'a> {
  fn from(s: &'a str) -> Self {
    Self::Text(s)
  }
}

impl<'a> From<&'a String> for RawDateInput<'a> {
  fn from(s: &'a String) -> Self {
    Self::Text(s.as_str())
  }
}

impl From<NaiveDate> for RawDateInput<'_> {
  fn from(d: NaiveDate) -> Self {
    Self::Date(d)
  }
}

impl From<NormalizedDate> for RawDateInput<'_> {
  fn from(d: NormalizedDate) -> Self {
    Self::Date(d.as_naive())
  }
}

impl From<NaiveDateTime> for RawDateInput<'_> {
  fn from(dt: NaiveDateTime) -> Self {
    Self::NaiveDateTime(dt)
  }
}

impl From<DateTime<FixedOffset>> for RawDateInput<'_> {
  fn from(dt: DateTime<FixedOffset>) -> Self {
    Self::DateTime(dt)
  }
}

impl From<DateTime<Utc>> for RawDateInput<'_> {
  fn from(dt: DateTime<Utc>) -> Self {
    Self::DateTime(dt.fixed_offset())
  }
}

// ---------------------------------------------------------------------------
// DayRange
// ---------------------------------------------------------------------------

/// Inclusive pair of UTC instants spanning 00:00:00.000 to 23:59:59.999 of
/// one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRange {
  pub start: DateTime<Utc>,
  pub end: DateTime<Utc>,
}

impl DayRange {
  /// Inclusive on both ends, matching a `BETWEEN` filter.
  pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
    *instant >= self.start && *instant <= self.end
  }
}
