//! Normalize the date fields of an inbound payload before storage.

use visa_dates::{DateParser, NormalizedDate};

use crate::error::ApiError;
use crate::types::VisaPayload;

/// The five date-valued fields, by wire name.
pub const DATE_FIELDS: [&str; 5] = [
  "dateOfBirth",
  "visaGrantDate",
  "visaExpiryDate",
  "mustNotArriveAfter",
  "enterBeforeDate",
];

/// Parsed date fields of one payload. `None` = absent or blank on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadDates {
  pub date_of_birth: Option<NormalizedDate>,
  pub visa_grant_date: Option<NormalizedDate>,
  pub visa_expiry_date: Option<NormalizedDate>,
  pub must_not_arrive_after: Option<NormalizedDate>,
  pub enter_before_date: Option<NormalizedDate>,
}

/// Parse every present date field; the first unparseable one fails the
/// whole payload with `InvalidDate` naming that field.
pub fn normalize_dates(payload: &VisaPayload, parser: &DateParser) -> Result<PayloadDates, ApiError> {
  let [dob, grant, expiry, arrive, enter] = DATE_FIELDS;
  Ok(PayloadDates {
    date_of_birth: normalize_field(dob, payload.date_of_birth.as_deref(), parser)?,
    visa_grant_date: normalize_field(grant, payload.visa_grant_date.as_deref(), parser)?,
    visa_expiry_date: normalize_field(expiry, payload.visa_expiry_date.as_deref(), parser)?,
    must_not_arrive_after: normalize_field(arrive, payload.must_not_arrive_after.as_deref(), parser)?,
    enter_before_date: normalize_field(enter, payload.enter_before_date.as_deref(), parser)?,
  })
}

fn normalize_field(
  field: &'static str,
  raw: Option<&str>,
  parser: &DateParser,
) -> Result<Option<NormalizedDate>, ApiError> {
  match raw.map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => parser
      .parse(s)
      .map(Some)
      .ok_or(ApiError::InvalidDate { field }),
  }
}
