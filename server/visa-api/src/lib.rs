//! Visa Records API
//!
//! HTTP service for per-user visa records. Caller-supplied dates go through
//! the visa-dates parser on every write; credential search matches date of
//! birth by UTC day range. Bind to 127.0.0.1 by default (internal only).

pub mod auth;
pub mod config;
pub mod dates;
pub mod error;
pub mod handlers;
pub mod state;
pub mod store;
pub mod types;
pub mod visa;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use state::AppState;
pub use store::{MemoryVisaStore, PgVisaStore, VisaStore};

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Routes only, no middleware.
pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/", get(handlers::root))
    .route("/health", get(handlers::health))
    .route(
      "/api/visas",
      get(handlers::list_visas).post(handlers::create_visa),
    )
    .route("/api/visas/search", post(handlers::search_visas))
    .route(
      "/api/visas/:id",
      get(handlers::get_visa)
        .patch(handlers::update_visa)
        .delete(handlers::delete_visa),
    )
    .with_state(state)
}

/// Credentialed CORS for the single configured browser origin.
pub fn cors_layer(config: &Config) -> Result<CorsLayer, ConfigError> {
  let origin: HeaderValue = config
    .cors_origin
    .parse()
    .map_err(|_| ConfigError::Invalid {
      key: "CORS_ORIGIN",
      value: config.cors_origin.clone(),
    })?;
  Ok(
    CorsLayer::new()
      .allow_origin(origin)
      .allow_credentials(true)
      .allow_methods([
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
      ])
      .allow_headers([
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        HeaderName::from_static(auth::USER_ID_HEADER),
      ]),
  )
}

/// Full application: routes plus CORS and request tracing.
pub fn app(state: Arc<AppState>, config: &Config) -> Result<Router, ConfigError> {
  Ok(
    router(state)
      .layer(cors_layer(config)?)
      .layer(TraceLayer::new_for_http()),
  )
}
