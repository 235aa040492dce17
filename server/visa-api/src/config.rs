//! Service configuration with sane defaults, overridable from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("invalid {key}: {value:?}")]
  Invalid { key: &'static str, value: String },
}

/// Runtime settings for the API binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// PostgreSQL connection string. `None` selects the in-memory store.
  pub database_url: Option<String>,
  /// Bind address. Loopback by default (internal only).
  pub host: IpAddr,
  pub port: u16,
  /// Single browser origin allowed to call the API with credentials.
  pub cors_origin: String,
  /// `tracing_subscriber::EnvFilter` directive.
  pub log_filter: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: None,
      host: IpAddr::V4(Ipv4Addr::LOCALHOST),
      port: 5000,
      cors_origin: "http://localhost:3000".into(),
      log_filter: "info,tower_http=info".into(),
    }
  }
}

impl Config {
  /// Read `DATABASE_URL`, `HOST`, `PORT`, `CORS_ORIGIN` and `RUST_LOG`.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build from any key lookup; unset or blank keys keep their default.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = Self::default();

    config.database_url = get("DATABASE_URL");
    if let Some(host) = get("HOST") {
      config.host = host.trim().parse().map_err(|_| ConfigError::Invalid {
        key: "HOST",
        value: host.clone(),
      })?;
    }
    if let Some(port) = get("PORT") {
      config.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
        key: "PORT",
        value: port.clone(),
      })?;
    }
    if let Some(origin) = get("CORS_ORIGIN") {
      config.cors_origin = origin;
    }
    if let Some(filter) = get("RUST_LOG") {
      config.log_filter = filter;
    }
    Ok(config)
  }

  pub fn socket_addr(&self) -> SocketAddr {
    SocketAddr::new(self.host, self.port)
  }
}
