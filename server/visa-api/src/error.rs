//! Structured error types for the API, rendered as `{ "msg": ... }` JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::store::StoreError;
use crate::types::MessageBody;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("Invalid date format for field: {field}")]
  InvalidDate { field: &'static str },

  #[error("missing or invalid x-user-id header")]
  Unauthorized,

  #[error("{0}")]
  NotFound(&'static str),

  #[error(transparent)]
  Store(#[from] StoreError),
}

impl ApiError {
  pub fn bad_request(msg: impl Into<String>) -> Self {
    Self::BadRequest(msg.into())
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest(_) | Self::InvalidDate { .. } => StatusCode::BAD_REQUEST,
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Store(StoreError::Conflict) => StatusCode::CONFLICT,
      Self::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let msg = match &self {
      Self::Store(StoreError::Database(e)) => {
        tracing::error!(error = %e, "store error");
        "Server error".to_string()
      }
      other => other.to_string(),
    };
    (status, Json(MessageBody::new(msg))).into_response()
  }
}
