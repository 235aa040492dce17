//! Request/response types for the visa API (JSON contracts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use visa_dates::NormalizedDate;

use crate::visa::Visa;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the caller sends)
// ---------------------------------------------------------------------------

/// Body of `POST /api/visas` and `PATCH /api/visas/:id`.
///
/// Every field is optional on the wire: create checks the required set
/// itself, patch applies only what is present. Date fields are raw strings
/// in any format the date parser accepts. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaPayload {
  pub family_name: Option<String>,
  #[serde(alias = "givenNames")]
  pub given_name: Option<String>,
  pub visa_description: Option<String>,
  pub date_of_birth: Option<String>,
  pub document_number: Option<String>,
  pub passport_number: Option<String>,
  pub visa_grant_number: Option<String>,
  pub visa_class: Option<String>,
  pub visa_applicant: Option<String>,
  pub visa_grant_date: Option<String>,
  pub visa_expiry_date: Option<String>,
  pub must_not_arrive_after: Option<String>,
  pub enter_before_date: Option<String>,
  pub location: Option<String>,
  pub visa_status: Option<String>,
  pub period_of_stay: Option<String>,
  pub visa_type: Option<String>,
  pub passport_country: Option<String>,
  pub application_id: Option<String>,
  pub transaction_ref: Option<String>,
}

/// Body of `POST /api/visas/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
  pub visa_grant_number: Option<String>,
  pub date_of_birth: Option<String>,
  pub passport_number: Option<String>,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

/// A visa record as returned to clients; dates rendered `DD Mon YYYY`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaView {
  pub id: Uuid,
  pub user: Uuid,
  pub family_name: String,
  pub given_name: String,
  pub visa_description: String,
  pub date_of_birth: String,
  pub document_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub passport_number: Option<String>,
  pub visa_grant_number: String,
  pub visa_class: String,
  pub visa_applicant: String,
  pub visa_grant_date: String,
  pub visa_expiry_date: String,
  pub must_not_arrive_after: Option<String>,
  pub enter_before_date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  pub visa_status: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub period_of_stay: Option<String>,
  pub visa_type: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub passport_country: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub application_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub transaction_ref: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<&Visa> for VisaView {
  fn from(v: &Visa) -> Self {
    Self {
      id: v.id,
      user: v.user_id,
      family_name: v.family_name.clone(),
      given_name: v.given_name.clone(),
      visa_description: v.visa_description.clone(),
      date_of_birth: v.date_of_birth.display(),
      document_number: v.document_number.clone(),
      passport_number: v.passport_number.clone(),
      visa_grant_number: v.visa_grant_number.clone(),
      visa_class: v.visa_class.clone(),
      visa_applicant: v.visa_applicant.clone(),
      visa_grant_date: v.visa_grant_date.display(),
      visa_expiry_date: v.visa_expiry_date.display(),
      must_not_arrive_after: v.must_not_arrive_after.as_ref().map(NormalizedDate::display),
      enter_before_date: v.enter_before_date.as_ref().map(NormalizedDate::display),
      location: v.location.clone(),
      visa_status: v.visa_status.clone(),
      period_of_stay: v.period_of_stay.clone(),
      visa_type: v.visa_type.clone(),
      passport_country: v.passport_country.clone(),
      application_id: v.application_id.clone(),
      transaction_ref: v.transaction_ref.clone(),
      created_at: v.created_at,
      updated_at: v.updated_at,
    }
  }
}

/// `{ "msg": ... }` body used for confirmations and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
  pub msg: String,
}

impl MessageBody {
  pub fn new(msg: impl Into<String>) -> Self {
    Self { msg: msg.into() }
  }
}
