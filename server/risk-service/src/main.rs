//! Binary entrypoint for the risk service.

use std::net::SocketAddr;
use std::sync::Arc;

use risk_engine::Config;
use risk_service::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenv::dotenv().ok();
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let port: u16 = std::env::var("PORT")
    .unwrap_or_else(|_| "5005".into())
    .parse()
    .map_err(|e| format!("PORT must be a valid u16: {}", e))?;

  let config = Config::from_env()?;
  let state = Arc::new(AppState::new(config)?);
  let app = risk_service::router(state);

  let addr = SocketAddr::from(([127, 0, 0, 1], port));
  tracing::info!("risk-service listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
