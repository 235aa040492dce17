//! Flexible date parsing.
//!
//! Patterns are tried in a fixed priority order and the first match wins:
//! 1. `M/D/Y` (1-2 digit month and day, 2 or 4 digit year)
//! 2. `D <MonthName> Y` (month matched by its first three letters)
//! 3. ISO `YYYY-MM-DD`
//! 4. a fallback table of general date/date-time forms
//!
//! Patterns 1 and 2 expand two-digit years around [`TWO_DIGIT_YEAR_PIVOT`]
//! and apply the year-typo correction (see [`DateParser::correct_year_typo`]).
//! Patterns 1 to 3 carry out-of-range months and days forward the way a
//! calendar does (`2/30/2003` is 2 March), so they never reject a match.
//! A month name whose prefix is not recognized rejects the input outright;
//! it does not fall through to the later patterns.

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::UnparseableDate;
use crate::types::{NormalizedDate, RawDateInput};

/// Two-digit years at or above this value land in the 1900s, below it in the 2000s.
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 70;

/// Years more than this far past the reference year are treated as typos.
pub const FUTURE_YEAR_TOLERANCE: i32 = 2;

/// Month abbreviations indexed by 0-based month. "sept" resolves through its
/// "sep" prefix.
const MONTH_ABBREVIATIONS: [&str; 12] = [
  "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

static SLASH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4})$").expect("valid slash date regex")
});
static MONTH_NAME_DATE_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^([0-9]{1,2})\s+([A-Za-z]+)\s+([0-9]{2,4})$").expect("valid month name regex")
});
static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid iso date regex")
});

/// Offset-bearing forms beyond RFC 3339 / RFC 2822. The first is what a
/// browser's `Date.prototype.toString()` emits once the zone name is cut.
const FALLBACK_OFFSET_FORMATS: &[&str] = &[
  "%a %B %d %Y %H:%M:%S GMT%z",
  "%B %d %Y %H:%M:%S GMT%z",
];

/// Offset-less date-time forms; the wall-clock date is taken literally.
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
  "%a %B %d %Y %H:%M:%S",
  "%B %d %Y %H:%M:%S",
  "%B %d %Y %H:%M",
  "%B %d, %Y %H:%M:%S",
  "%B %d, %Y %H:%M",
  "%d %B %Y %H:%M:%S",
  "%d %B %Y %H:%M",
];

// `%B` also accepts the three-letter abbreviation when parsing.
const FALLBACK_DATE_FORMATS: &[&str] = &[
  "%Y-%m-%d", // un-padded, e.g. 2003-5-13
  "%Y/%m/%d",
  "%Y.%m.%d",
  "%m-%d-%Y",
  "%d-%B-%Y",
  "%B %d, %Y",
  "%B %d %Y",
  "%a %B %d %Y",
];

/// Zone that offset-bearing instants are read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocalZone {
  Fixed(FixedOffset),
  /// The host's zone, resolved per instant so DST transitions are honored.
  Host,
}

/// Parser with an explicit reference year and local zone.
///
/// `DateParser::now()` takes the year from the wall clock and follows the
/// host zone; tests and batch jobs pin both with `DateParser::new` so
/// results do not drift across years or machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
  reference_year: i32,
  zone: LocalZone,
}

impl DateParser {
  /// Pinned reference year and fixed local offset.
  pub fn new(reference_year: i32, local_offset: FixedOffset) -> Self {
    Self {
      reference_year,
      zone: LocalZone::Fixed(local_offset),
    }
  }

  /// Pinned reference year, host zone.
  pub fn in_host_zone(reference_year: i32) -> Self {
    Self {
      reference_year,
      zone: LocalZone::Host,
    }
  }

  pub fn now() -> Self {
    Self::in_host_zone(Local::now().year())
  }

  pub fn reference_year(&self) -> i32 {
    self.reference_year
  }

  /// The fixed offset this parser was pinned to; `None` when it follows the
  /// host zone.
  pub fn local_offset(&self) -> Option<FixedOffset> {
    match self.zone {
      LocalZone::Fixed(offset) => Some(offset),
      LocalZone::Host => None,
    }
  }

  /// Normalize `input` to a calendar date. `None` when nothing matches;
  /// never panics on malformed input.
  pub fn parse<'a>(&self, input: impl Into<RawDateInput<'a>>) -> Option<NormalizedDate> {
    match input.into() {
      RawDateInput::Text(s) => self.parse_text(s),
      RawDateInput::Date(d) => Some(d.into()),
      RawDateInput::NaiveDateTime(dt) => Some(dt.date().into()),
      RawDateInput::DateTime(dt) => Some(self.local_date(&dt)),
    }
  }

  /// Same as [`DateParser::parse`], for callers that propagate with `?`.
  pub fn try_parse<'a>(
    &self,
    input: impl Into<RawDateInput<'a>>,
  ) -> Result<NormalizedDate, UnparseableDate> {
    let raw = input.into();
    self.parse(raw).ok_or_else(|| UnparseableDate::from_input(&raw))
  }

  /// Rewrite an implausible future year as `2000 + (year % 100)`.
  ///
  /// Targets the recurring `2525` -> `2025` entry mistake. Applied once, to
  /// slash and month-name dates only.
  pub fn correct_year_typo(&self, year: i32) -> i32 {
    if year > self.reference_year + FUTURE_YEAR_TOLERANCE {
      2000 + year % 100
    } else {
      year
    }
  }

  fn parse_text(&self, s: &str) -> Option<NormalizedDate> {
    let s = s.trim();
    if s.is_empty() {
      return None;
    }

    if let Some(caps) = SLASH_DATE_RE.captures(s) {
      let month: u32 = caps[1].parse().ok()?;
      let day: u32 = caps[2].parse().ok()?;
      let year = self.correct_year_typo(expand_two_digit_year(caps[3].parse().ok()?));
      return NormalizedDate::from_ymd_rolling(year, month, day);
    }

    if let Some(caps) = MONTH_NAME_DATE_RE.captures(s) {
      let day: u32 = caps[1].parse().ok()?;
      let month = month_from_name(&caps[2])?;
      let year = self.correct_year_typo(expand_two_digit_year(caps[3].parse().ok()?));
      return NormalizedDate::from_ymd_rolling(year, month, day);
    }

    if let Some(caps) = ISO_DATE_RE.captures(s) {
      let year: i32 = caps[1].parse().ok()?;
      let month: u32 = caps[2].parse().ok()?;
      let day: u32 = caps[3].parse().ok()?;
      return NormalizedDate::from_ymd_rolling(year, month, day);
    }

    self.parse_fallback(s)
  }

  fn parse_fallback(&self, s: &str) -> Option<NormalizedDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
      return Some(self.local_date(&dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
      return Some(self.local_date(&dt));
    }
    let stripped = strip_zone_name(s);
    for fmt in FALLBACK_OFFSET_FORMATS {
      if let Ok(dt) = DateTime::parse_from_str(stripped, fmt) {
        return Some(self.local_date(&dt));
      }
    }
    for fmt in FALLBACK_DATETIME_FORMATS {
      if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
        return widen_short_year(dt.date()).map(NormalizedDate::from);
      }
    }
    for fmt in FALLBACK_DATE_FORMATS {
      if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
        return widen_short_year(d).map(NormalizedDate::from);
      }
    }
    None
  }

  fn local_date(&self, dt: &DateTime<FixedOffset>) -> NormalizedDate {
    match self.zone {
      LocalZone::Fixed(offset) => dt.with_timezone(&offset).date_naive().into(),
      LocalZone::Host => dt.with_timezone(&Local).date_naive().into(),
    }
  }
}

impl Default for DateParser {
  fn default() -> Self {
    Self::now()
  }
}

/// Parse with the wall-clock reference year and the host's local offset.
pub fn parse<'a>(input: impl Into<RawDateInput<'a>>) -> Option<NormalizedDate> {
  DateParser::now().parse(input)
}

/// `70..=99` -> 1900s, `0..=69` -> 2000s; anything else is kept as written.
fn expand_two_digit_year(year: i32) -> i32 {
  if year >= 100 {
    year
  } else if year >= TWO_DIGIT_YEAR_PIVOT {
    1900 + year
  } else {
    2000 + year
  }
}

/// `%Y` reads `03` as year 3; a fallback date written with a two-digit year
/// gets the same pivot as the slash and month-name patterns.
fn widen_short_year(d: NaiveDate) -> Option<NaiveDate> {
  if (0..100).contains(&d.year()) {
    d.with_year(expand_two_digit_year(d.year()))
  } else {
    Some(d)
  }
}

/// Drop a trailing zone name such as ` (AEST)` or
/// ` (Australian Eastern Standard Time)`.
fn strip_zone_name(s: &str) -> &str {
  match s.rfind(" (") {
    Some(idx) if s.ends_with(')') => s[..idx].trim_end(),
    _ => s,
  }
}

/// 1-based month from any-length month text, matched on its first three letters.
fn month_from_name(name: &str) -> Option<u32> {
  let prefix = name.get(..3)?.to_ascii_lowercase();
  MONTH_ABBREVIATIONS
    .iter()
    .position(|abbr| *abbr == prefix)
    .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parser() -> DateParser {
    DateParser::new(2025, FixedOffset::east_opt(0).unwrap())
  }

  fn ymd(d: Option<NormalizedDate>) -> Option<(i32, u32, u32)> {
    d.map(|d| (d.year(), d.month0(), d.day()))
  }

  #[test]
  fn two_digit_year_pivot() {
    assert_eq!(expand_two_digit_year(0), 2000);
    assert_eq!(expand_two_digit_year(69), 2069);
    assert_eq!(expand_two_digit_year(70), 1970);
    assert_eq!(expand_two_digit_year(99), 1999);
    assert_eq!(expand_two_digit_year(2003), 2003);
  }

  #[test]
  fn month_names_match_on_prefix() {
    assert_eq!(month_from_name("May"), Some(5));
    assert_eq!(month_from_name("SEPT"), Some(9));
    assert_eq!(month_from_name("september"), Some(9));
    assert_eq!(month_from_name("Decembre"), Some(12));
    assert_eq!(month_from_name("Ma"), None);
    assert_eq!(month_from_name("Xyz"), None);
  }

  #[test]
  fn year_typo_only_fires_past_tolerance() {
    let p = parser();
    assert_eq!(p.correct_year_typo(2027), 2027);
    assert_eq!(p.correct_year_typo(2030), 2030);
    assert_eq!(p.correct_year_typo(2525), 2025);
    assert_eq!(p.correct_year_typo(3099), 2099);
    assert_eq!(p.correct_year_typo(1999), 1999);
  }

  #[test]
  fn slash_dates() {
    let p = parser();
    assert_eq!(ymd(p.parse("5/13/2003")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("05/13/03")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("5/13/75")), Some((1975, 4, 13)));
    assert_eq!(ymd(p.parse("10/20/2525")), Some((2025, 9, 20)));
  }

  #[test]
  fn slash_dates_roll_over_out_of_range_components() {
    let p = parser();
    assert_eq!(ymd(p.parse("2/30/2003")), Some((2003, 2, 2)));
    assert_eq!(ymd(p.parse("20/10/2003")), Some((2004, 7, 10)));
    assert_eq!(ymd(p.parse("0/10/2003")), Some((2002, 11, 10)));
    assert_eq!(ymd(p.parse("3/0/2003")), Some((2003, 1, 28)));
  }

  #[test]
  fn day_first_slash_typo_still_yields_a_date() {
    let p = DateParser::new(2026, FixedOffset::east_opt(0).unwrap());
    assert_eq!(ymd(p.parse("20/10/2525")), Some((2026, 7, 10)));
  }

  #[test]
  fn three_digit_years_are_kept_literally() {
    assert_eq!(ymd(parser().parse("1/2/203")), Some((203, 0, 2)));
  }

  #[test]
  fn month_name_dates() {
    let p = parser();
    assert_eq!(ymd(p.parse("13 May 2003")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("1 Sept 23")), Some((2023, 8, 1)));
    assert_eq!(ymd(p.parse("1   january   99")), Some((1999, 0, 1)));
    assert_eq!(ymd(p.parse("13 May 2525")), Some((2025, 4, 13)));
    assert_eq!(ymd(p.parse("31 Feb 2003")), Some((2003, 2, 3)));
  }

  #[test]
  fn unknown_month_name_does_not_fall_through() {
    let p = parser();
    assert_eq!(p.parse("1 Xyz 2023"), None);
    assert_eq!(p.parse("1 Ma 2023"), None);
  }

  #[test]
  fn iso_dates_skip_the_typo_heuristic() {
    let p = parser();
    assert_eq!(ymd(p.parse("2003-05-13")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("2525-05-13")), Some((2525, 4, 13)));
    assert_eq!(ymd(p.parse("2003-02-29")), Some((2003, 2, 1)));
    assert_eq!(ymd(p.parse("2004-02-29")), Some((2004, 1, 29)));
  }

  #[test]
  fn input_is_trimmed() {
    assert_eq!(ymd(parser().parse("  2003-05-13\n")), Some((2003, 4, 13)));
  }

  #[test]
  fn empty_input_is_none() {
    let p = parser();
    assert_eq!(p.parse(""), None);
    assert_eq!(p.parse("   "), None);
  }

  #[test]
  fn fallback_forms() {
    let p = parser();
    assert_eq!(ymd(p.parse("May 13, 2003")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("Tue May 13 2003")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("2003/05/13")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("2003-5-13")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("2003-05-13T18:45:00")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("May 13, 2525")), Some((2525, 4, 13)));
    assert_eq!(p.parse("not a date"), None);
  }

  #[test]
  fn fallback_named_month_two_digit_years_use_the_pivot() {
    let p = parser();
    assert_eq!(ymd(p.parse("May 13, 03")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("May 13 75")), Some((1975, 4, 13)));
    assert_eq!(ymd(p.parse("13-May-03")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("05-13-03")), Some((2003, 4, 13)));
  }

  #[test]
  fn browser_date_to_string_form() {
    let raw = "Tue May 13 2003 00:00:00 GMT+1000 (AEST)";
    assert_eq!(ymd(parser().parse(raw)), Some((2003, 4, 12)));

    let sydney = DateParser::new(2025, FixedOffset::east_opt(10 * 3600).unwrap());
    assert_eq!(ymd(sydney.parse(raw)), Some((2003, 4, 13)));
    assert_eq!(
      ymd(sydney.parse("Tue May 13 2003 00:00:00 GMT+1000 (Australian Eastern Standard Time)")),
      Some((2003, 4, 13))
    );
    assert_eq!(ymd(sydney.parse("Tue May 13 2003 00:00:00 GMT+1000")), Some((2003, 4, 13)));
  }

  #[test]
  fn day_month_abbreviation_with_dashes() {
    assert_eq!(ymd(parser().parse("13-May-2003")), Some((2003, 4, 13)));
  }

  #[test]
  fn month_name_dates_with_time_of_day() {
    let p = parser();
    assert_eq!(ymd(p.parse("13 May 2003 10:00")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("May 13 2003 10:00:00")), Some((2003, 4, 13)));
    assert_eq!(ymd(p.parse("May 13, 2003 23:15")), Some((2003, 4, 13)));
  }

  #[test]
  fn dotted_iso_date() {
    assert_eq!(ymd(parser().parse("2003.05.13")), Some((2003, 4, 13)));
  }

  #[test]
  fn strip_zone_name_only_cuts_a_trailing_parenthetical() {
    assert_eq!(strip_zone_name("x GMT+1000 (AEST)"), "x GMT+1000");
    assert_eq!(strip_zone_name("x (AEST) y"), "x (AEST) y");
    assert_eq!(strip_zone_name("2003-05-13"), "2003-05-13");
  }

  #[test]
  fn offset_timestamps_are_read_in_local_offset() {
    let utc = parser();
    assert_eq!(ymd(utc.parse("2003-05-13T23:30:00-05:00")), Some((2003, 4, 14)));

    let eastern = DateParser::new(2025, FixedOffset::west_opt(5 * 3600).unwrap());
    assert_eq!(ymd(eastern.parse("2003-05-13T23:30:00-05:00")), Some((2003, 4, 13)));
    assert_eq!(ymd(eastern.parse("2003-05-14T02:00:00Z")), Some((2003, 4, 13)));
  }

  #[test]
  fn host_zone_is_resolved_per_instant() {
    let p = DateParser::in_host_zone(2025);
    assert_eq!(p.local_offset(), None);
    for raw in ["2003-05-13T23:30:00-05:00", "2003-01-13T23:30:00-05:00"] {
      let expected = DateTime::parse_from_rfc3339(raw)
        .unwrap()
        .with_timezone(&Local)
        .date_naive();
      assert_eq!(p.parse(raw).map(|d| d.as_naive()), Some(expected), "{raw}");
    }
    assert_eq!(parser().local_offset(), FixedOffset::east_opt(0));
  }

  #[test]
  fn try_parse_reports_the_input() {
    let err = parser().try_parse(" 1 Xyz 2023 ").unwrap_err();
    assert_eq!(err.input, "1 Xyz 2023");
  }
}
