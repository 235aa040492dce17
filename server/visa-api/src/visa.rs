//! The visa record and the rules for building/patching it from a payload.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use visa_dates::NormalizedDate;

use crate::dates::PayloadDates;
use crate::error::ApiError;
use crate::types::VisaPayload;

pub const DEFAULT_VISA_APPLICANT: &str = "Primary";
pub const DEFAULT_VISA_STATUS: &str = "In Effect";
pub const DEFAULT_VISA_TYPE: &str = "Visitor";

/// A stored visa record. Dates are calendar dates; the store persists them
/// as the UTC midnight of that date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visa {
  pub id: Uuid,
  pub user_id: Uuid,
  pub family_name: String,
  pub given_name: String,
  pub visa_description: String,
  pub date_of_birth: NormalizedDate,
  pub document_number: String,
  pub passport_number: Option<String>,
  pub visa_grant_number: String,
  pub visa_class: String,
  pub visa_applicant: String,
  pub visa_grant_date: NormalizedDate,
  pub visa_expiry_date: NormalizedDate,
  pub must_not_arrive_after: Option<NormalizedDate>,
  pub enter_before_date: Option<NormalizedDate>,
  pub location: Option<String>,
  pub visa_status: String,
  pub period_of_stay: Option<String>,
  pub visa_type: String,
  pub passport_country: Option<String>,
  pub application_id: Option<String>,
  pub transaction_ref: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Visa {
  /// Build a new record owned by `owner`.
  ///
  /// Fails with `Required fields missing` when any required text or date
  /// field is absent or blank.
  pub fn create(
    owner: Uuid,
    payload: VisaPayload,
    dates: PayloadDates,
    now: DateTime<Utc>,
  ) -> Result<Self, ApiError> {
    let (
      Some(family_name),
      Some(given_name),
      Some(visa_description),
      Some(document_number),
      Some(visa_grant_number),
      Some(visa_class),
      Some(date_of_birth),
      Some(visa_grant_date),
      Some(visa_expiry_date),
    ) = (
      non_blank(payload.family_name),
      non_blank(payload.given_name),
      non_blank(payload.visa_description),
      non_blank(payload.document_number),
      non_blank(payload.visa_grant_number),
      non_blank(payload.visa_class),
      dates.date_of_birth,
      dates.visa_grant_date,
      dates.visa_expiry_date,
    )
    else {
      return Err(ApiError::bad_request("Required fields missing"));
    };

    Ok(Self {
      id: Uuid::new_v4(),
      user_id: owner,
      family_name,
      given_name,
      visa_description,
      date_of_birth,
      document_number,
      passport_number: non_blank(payload.passport_number),
      visa_grant_number,
      visa_class,
      visa_applicant: non_blank(payload.visa_applicant)
        .unwrap_or_else(|| DEFAULT_VISA_APPLICANT.into()),
      visa_grant_date,
      visa_expiry_date,
      must_not_arrive_after: dates.must_not_arrive_after,
      enter_before_date: dates.enter_before_date,
      location: non_blank(payload.location),
      visa_status: non_blank(payload.visa_status).unwrap_or_else(|| DEFAULT_VISA_STATUS.into()),
      period_of_stay: non_blank(payload.period_of_stay),
      visa_type: non_blank(payload.visa_type).unwrap_or_else(|| DEFAULT_VISA_TYPE.into()),
      passport_country: non_blank(payload.passport_country),
      application_id: non_blank(payload.application_id),
      transaction_ref: non_blank(payload.transaction_ref),
      created_at: now,
      updated_at: now,
    })
  }

  /// Apply a partial update. Absent fields are left alone; a blank optional
  /// text field clears it; a blank required text field is rejected.
  pub fn apply(
    &mut self,
    payload: VisaPayload,
    dates: PayloadDates,
    now: DateTime<Utc>,
  ) -> Result<(), ApiError> {
    set_required(&mut self.family_name, payload.family_name, "familyName")?;
    set_required(&mut self.given_name, payload.given_name, "givenName")?;
    set_required(&mut self.visa_description, payload.visa_description, "visaDescription")?;
    set_required(&mut self.document_number, payload.document_number, "documentNumber")?;
    set_required(&mut self.visa_grant_number, payload.visa_grant_number, "visaGrantNumber")?;
    set_required(&mut self.visa_class, payload.visa_class, "visaClass")?;
    set_required(&mut self.visa_applicant, payload.visa_applicant, "visaApplicant")?;
    set_required(&mut self.visa_status, payload.visa_status, "visaStatus")?;
    set_required(&mut self.visa_type, payload.visa_type, "visaType")?;

    set_optional(&mut self.passport_number, payload.passport_number);
    set_optional(&mut self.location, payload.location);
    set_optional(&mut self.period_of_stay, payload.period_of_stay);
    set_optional(&mut self.passport_country, payload.passport_country);
    set_optional(&mut self.application_id, payload.application_id);
    set_optional(&mut self.transaction_ref, payload.transaction_ref);

    if let Some(d) = dates.date_of_birth {
      self.date_of_birth = d;
    }
    if let Some(d) = dates.visa_grant_date {
      self.visa_grant_date = d;
    }
    if let Some(d) = dates.visa_expiry_date {
      self.visa_expiry_date = d;
    }
    if dates.must_not_arrive_after.is_some() {
      self.must_not_arrive_after = dates.must_not_arrive_after;
    }
    if dates.enter_before_date.is_some() {
      self.enter_before_date = dates.enter_before_date;
    }

    self.updated_at = now;
    Ok(())
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

fn set_required(
  slot: &mut String,
  value: Option<String>,
  field: &'static str,
) -> Result<(), ApiError> {
  match value {
    None => Ok(()),
    Some(v) => match non_blank(Some(v)) {
      Some(v) => {
        *slot = v;
        Ok(())
      }
      None => Err(ApiError::bad_request(format!("{field} must not be empty"))),
    },
  }
}

fn set_optional(slot: &mut Option<String>, value: Option<String>) {
  if let Some(v) = value {
    *slot = non_blank(Some(v));
  }
}
