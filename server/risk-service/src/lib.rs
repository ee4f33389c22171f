//! Rolling Update Risk Estimator: HTTP service
//!
//! Exposes the risk engine over HTTP. One process owns one in-memory history
//! ledger; every run locks it from snapshot to record.
//! Bind to 127.0.0.1 by default (internal only).

mod error;
mod handlers;
mod state;
mod types;

use axum::{
  routing::{get, post},
  Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use error::ApiError;
pub use state::AppState;
pub use types::{
  CicdHookRequest, CicdHookResponse, HealthResponse, HistoricalRunResponse, SummaryResponse,
};

/// All routes, with permissive CORS, bound to shared state.
pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(handlers::health))
    .route("/simulate", post(handlers::simulate))
    .route("/simulate/historical", post(handlers::simulate_historical))
    .route("/services", get(handlers::services))
    .route("/summary", get(handlers::summary))
    .route(
      "/history",
      get(handlers::history).delete(handlers::clear_history),
    )
    .route("/graph", get(handlers::graph))
    .route("/graph.dot", get(handlers::graph_dot))
    .route("/barchart", get(handlers::barchart))
    .route("/export", post(handlers::export_csv))
    .route("/cicd-hook", post(handlers::cicd_hook))
    .layer(CorsLayer::permissive())
    .with_state(state)
}
