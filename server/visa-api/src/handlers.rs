//! HTTP handlers for the visa API.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use visa_dates::DateParser;

use crate::auth::Owner;
use crate::dates::normalize_dates;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::SearchCriteria;
use crate::types::{MessageBody, SearchRequest, VisaPayload, VisaView};
use crate::visa::Visa;

const VISA_NOT_FOUND: &str = "Visa not found";
const NO_MATCHING_VISA: &str = "No matching visa found";

pub async fn root() -> &'static str {
  "API running..."
}

pub async fn health() -> &'static str {
  "ok"
}

pub async fn list_visas(
  State(state): State<Arc<AppState>>,
  Owner(owner): Owner,
) -> Result<Json<Vec<VisaView>>, ApiError> {
  let visas = state.store.list(owner).await?;
  Ok(Json(visas.iter().map(VisaView::from).collect()))
}

pub async fn get_visa(
  State(state): State<Arc<AppState>>,
  Owner(owner): Owner,
  Path(id): Path<Uuid>,
) -> Result<Json<VisaView>, ApiError> {
  let visa = state
    .store
    .get(owner, id)
    .await?
    .ok_or(ApiError::NotFound(VISA_NOT_FOUND))?;
  Ok(Json(VisaView::from(&visa)))
}

pub async fn create_visa(
  State(state): State<Arc<AppState>>,
  Owner(owner): Owner,
  Json(payload): Json<VisaPayload>,
) -> Result<Json<VisaView>, ApiError> {
  let dates = normalize_dates(&payload, &DateParser::now())?;
  let visa = Visa::create(owner, payload, dates, Utc::now())?;
  state.store.insert(&visa).await?;
  info!(visa_id = %visa.id, "visa created");
  Ok(Json(VisaView::from(&visa)))
}

pub async fn update_visa(
  State(state): State<Arc<AppState>>,
  Owner(owner): Owner,
  Path(id): Path<Uuid>,
  Json(payload): Json<VisaPayload>,
) -> Result<Json<VisaView>, ApiError> {
  let dates = normalize_dates(&payload, &DateParser::now())?;
  let mut visa = state
    .store
    .get(owner, id)
    .await?
    .ok_or(ApiError::NotFound(VISA_NOT_FOUND))?;
  visa.apply(payload, dates, Utc::now())?;
  if !state.store.update(&visa).await? {
    return Err(ApiError::NotFound(VISA_NOT_FOUND));
  }
  info!(visa_id = %visa.id, "visa updated");
  Ok(Json(VisaView::from(&visa)))
}

pub async fn delete_visa(
  State(state): State<Arc<AppState>>,
  Owner(owner): Owner,
  Path(id): Path<Uuid>,
) -> Result<Json<MessageBody>, ApiError> {
  if !state.store.delete(owner, id).await? {
    return Err(ApiError::NotFound(VISA_NOT_FOUND));
  }
  info!(visa_id = %id, "visa deleted");
  Ok(Json(MessageBody::new("Visa deleted successfully")))
}

/// Credential lookup by grant number, date of birth and passport number.
///
/// Any miss yields the same 404 so callers cannot tell which field was wrong.
pub async fn search_visas(
  State(state): State<Arc<AppState>>,
  Json(req): Json<SearchRequest>,
) -> Result<Json<VisaView>, ApiError> {
  let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
  let (Some(grant), Some(dob), Some(passport)) = (
    present(req.visa_grant_number),
    present(req.date_of_birth),
    present(req.passport_number),
  ) else {
    return Err(ApiError::bad_request(
      "All three fields are required: visaGrantNumber, dateOfBirth, passportNumber",
    ));
  };

  let dob = DateParser::now().parse(&dob).ok_or_else(|| {
    ApiError::bad_request(
      "Invalid dateOfBirth format. Accepts m/d/yyyy, dd MMM yyyy, yyyy-mm-dd, etc.",
    )
  })?;

  let criteria = SearchCriteria::new(&grant, &passport, &dob);
  match state.store.find_one(&criteria).await? {
    Some(visa) => Ok(Json(VisaView::from(&visa))),
    None => {
      debug!("visa search: no match");
      Err(ApiError::NotFound(NO_MATCHING_VISA))
    }
  }
}
