//! Binary entrypoint for the visa records API.

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use visa_api::{AppState, Config, MemoryVisaStore, PgVisaStore, VisaStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenvy::dotenv().ok();
  let config = Config::from_env()?;

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::new(&config.log_filter))
    .init();

  let store: Arc<dyn VisaStore> = match &config.database_url {
    Some(url) => Arc::new(PgVisaStore::connect(url).await?),
    None => {
      warn!("DATABASE_URL not set; records are kept in memory only");
      Arc::new(MemoryVisaStore::new())
    }
  };
  let state = Arc::new(AppState::new(store));
  let app = visa_api::app(state, &config)?;

  let addr = config.socket_addr();
  info!(%addr, "visa-api listening");

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
