//! Caller identity.
//!
//! Credentials are checked by an upstream authenticator, which forwards the
//! caller's user id in the `x-user-id` header. Record routes scope every
//! read and write to that id.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Owner of the records a request may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for Owner
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let raw = parts
      .headers
      .get(USER_ID_HEADER)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized)?;
    Uuid::parse_str(raw.trim())
      .map(Owner)
      .map_err(|_| ApiError::Unauthorized)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::Request;

  async fn extract(header: Option<&str>) -> Result<Owner, ApiError> {
    let mut builder = Request::builder().uri("/api/visas");
    if let Some(value) = header {
      builder = builder.header(USER_ID_HEADER, value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();
    Owner::from_request_parts(&mut parts, &()).await
  }

  #[tokio::test]
  async fn reads_uuid_header() {
    let id = Uuid::new_v4();
    let owner = extract(Some(&id.to_string())).await.unwrap();
    assert_eq!(owner, Owner(id));
  }

  #[tokio::test]
  async fn missing_header_is_unauthorized() {
    assert!(matches!(extract(None).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn malformed_header_is_unauthorized() {
    assert!(matches!(
      extract(Some("not-a-uuid")).await,
      Err(ApiError::Unauthorized)
    ));
  }
}
