//! Integration tests for the date core.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use visa_dates::{day_range_utc, parse, same_calendar_day, DateParser, NormalizedDate};

fn pinned() -> DateParser {
  DateParser::new(2025, FixedOffset::east_opt(0).unwrap())
}

#[test]
fn slash_date_with_four_digit_year_is_literal() {
  let d = parse("5/13/2003").unwrap();
  assert_eq!((d.year(), d.month0(), d.day()), (2003, 4, 13));
}

#[test]
fn two_digit_years_expand_around_the_pivot() {
  assert_eq!(parse("5/13/03").unwrap().year(), 2003);
  assert_eq!(parse("5/13/75").unwrap().year(), 1975);
  assert_eq!(parse("5/13/69").unwrap().year(), 2069);
  assert_eq!(parse("5/13/70").unwrap().year(), 1970);
}

#[test]
fn far_future_years_are_treated_as_typos() {
  let p = pinned();
  assert_eq!(p.parse("10/20/2525").unwrap().year(), 2025);
  assert_eq!(p.parse("13 May 2525").unwrap().year(), 2025);
  // Within tolerance of the reference year: untouched.
  assert_eq!(p.parse("1/1/2027").unwrap().year(), 2027);
}

#[test]
fn reference_year_controls_the_typo_window() {
  let old = DateParser::new(2000, FixedOffset::east_opt(0).unwrap());
  assert_eq!(old.parse("1/1/2010").unwrap().year(), 2010);
  assert_eq!(old.parse("1/1/2110").unwrap().year(), 2010);
  assert_eq!(pinned().parse("1/1/2110").unwrap().year(), 2010);
}

#[test]
fn month_name_forms() {
  let d = parse("13 May 2003").unwrap();
  assert_eq!((d.year(), d.month0(), d.day()), (2003, 4, 13));

  let d = pinned().parse("1 Sept 23").unwrap();
  assert_eq!((d.year(), d.month0(), d.day()), (2023, 8, 1));

  assert_eq!(parse("1 Xyz 2023"), None);
}

#[test]
fn out_of_range_components_roll_over_like_a_calendar() {
  let p = DateParser::new(2026, FixedOffset::east_opt(0).unwrap());
  assert_eq!(p.parse("20/10/2525"), NormalizedDate::from_ymd(2026, 8, 10));
  assert_eq!(p.parse("2/30/2003"), NormalizedDate::from_ymd(2003, 3, 2));
  assert_eq!(p.parse("31 Feb 2003"), NormalizedDate::from_ymd(2003, 3, 3));
  assert_eq!(p.parse("2003-02-29"), NormalizedDate::from_ymd(2003, 3, 1));
}

#[test]
fn fallback_forms_sent_by_browsers_and_people() {
  let p = pinned();
  let may_13 = NormalizedDate::from_ymd(2003, 5, 13);
  assert_eq!(p.parse("May 13, 03"), may_13);
  assert_eq!(p.parse("13-May-2003"), may_13);
  assert_eq!(p.parse("13 May 2003 10:00"), may_13);
  assert_eq!(p.parse("May 13 2003 10:00:00"), may_13);
  assert_eq!(p.parse("2003.05.13"), may_13);
  assert_eq!(
    p.parse("Tue May 13 2003 00:00:00 GMT+1000 (AEST)"),
    NormalizedDate::from_ymd(2003, 5, 12)
  );
}

#[test]
fn iso_form() {
  let d = parse("2003-05-13").unwrap();
  assert_eq!((d.year(), d.month0(), d.day()), (2003, 4, 13));
}

#[test]
fn empty_inputs_are_none() {
  assert_eq!(parse(""), None);
  assert_eq!(parse("  \t "), None);
  let missing: Option<&str> = None;
  assert_eq!(missing.and_then(|s| parse(s)), None);
}

#[test]
fn reparsing_a_normalized_date_is_stable() {
  let p = pinned();
  for raw in ["5/13/2003", "13 May 2003", "2003-05-13", "May 13, 2003"] {
    let once = p.parse(raw).unwrap();
    assert_eq!(p.parse(once), Some(once), "round trip of {raw}");
    assert_eq!(p.parse(once.to_string().as_str()), Some(once));
  }
}

#[test]
fn typed_date_values_are_truncated() {
  let p = pinned();
  let naive = NaiveDate::from_ymd_opt(2003, 5, 13)
    .unwrap()
    .and_hms_opt(18, 30, 0)
    .unwrap();
  assert_eq!(p.parse(naive), NormalizedDate::from_ymd(2003, 5, 13));

  let instant: DateTime<Utc> = "2003-05-13T23:59:59Z".parse().unwrap();
  assert_eq!(p.parse(instant), NormalizedDate::from_ymd(2003, 5, 13));

  let plus_ten = DateParser::new(2025, FixedOffset::east_opt(10 * 3600).unwrap());
  assert_eq!(plus_ten.parse(instant), NormalizedDate::from_ymd(2003, 5, 14));
}

#[test]
fn different_formats_land_on_the_same_day() {
  let p = pinned();
  assert!(same_calendar_day(
    p.parse("2003-05-13").as_ref(),
    p.parse("13 May 2003").as_ref()
  ));
  assert!(same_calendar_day(
    p.parse("5/13/03").as_ref(),
    p.parse("13 may 03").as_ref()
  ));
  assert!(!same_calendar_day(
    p.parse("2003-05-13").as_ref(),
    p.parse("5/14/2003").as_ref()
  ));
}

#[test]
fn same_calendar_day_never_fails_on_missing_input() {
  let d = parse("2003-05-13");
  assert!(!same_calendar_day(None, d.as_ref()));
  assert!(!same_calendar_day(parse("garbage").as_ref(), d.as_ref()));
}

#[test]
fn day_range_of_parsed_date() {
  let range = day_range_utc(&parse("2003-05-13").unwrap());
  assert_eq!(range.start.to_rfc3339(), "2003-05-13T00:00:00+00:00");
  assert_eq!(range.end.to_rfc3339(), "2003-05-13T23:59:59.999+00:00");
}

#[test]
fn day_range_matches_stored_instants_of_the_same_day() {
  let range = day_range_utc(&parse("13 May 2003").unwrap());
  for stored in [
    "2003-05-13T00:00:00Z",
    "2003-05-13T12:00:00Z",
    "2003-05-13T23:59:59.999Z",
  ] {
    let instant: DateTime<Utc> = stored.parse().unwrap();
    assert!(range.contains(&instant), "{stored} should match");
  }
  let next_day: DateTime<Utc> = "2003-05-14T00:00:00Z".parse().unwrap();
  assert!(!range.contains(&next_day));
}

#[test]
fn day_range_serializes_as_rfc3339_pair() {
  let range = day_range_utc(&parse("2003-05-13").unwrap());
  let json = serde_json::to_value(range).unwrap();
  assert_eq!(json["start"], "2003-05-13T00:00:00Z");
  assert_eq!(json["end"], "2003-05-13T23:59:59.999Z");
}
