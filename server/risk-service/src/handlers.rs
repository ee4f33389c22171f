//! HTTP handlers for the risk service.
//!
//! Anything that touches the ledger lock, runs a simulation or writes a file
//! goes through `blocking`, off the async workers.

use axum::{
  extract::{
    rejection::{JsonRejection, QueryRejection},
    Query, State,
  },
  http::{header, StatusCode},
  response::IntoResponse,
  Json,
};
use chrono::Utc;
use std::sync::Arc;

use risk_engine::export::{self, ExportReport};
use risk_engine::viz::{self, BarChart, GraphView};
use risk_engine::{HistoricalRecord, RunResult};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::*;

async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
  F: FnOnce(&AppState) -> T + Send + 'static,
  T: Send + 'static,
{
  let state = Arc::clone(state);
  Ok(tokio::task::spawn_blocking(move || f(&state)).await?)
}

pub async fn health() -> Json<HealthResponse> {
  Json(HealthResponse {
    status: "ok".into(),
    timestamp_utc: Utc::now(),
  })
}

pub async fn simulate(
  State(state): State<Arc<AppState>>,
  params: Result<Query<SimulateParams>, QueryRejection>,
) -> Result<Json<RunResult>, ApiError> {
  let Query(params) = params?;
  let result = blocking(&state, move |s| s.simulate(params.seed)).await?;
  Ok(Json(result))
}

pub async fn simulate_historical(
  State(state): State<Arc<AppState>>,
  params: Result<Query<SimulateParams>, QueryRejection>,
) -> Result<Json<HistoricalRunResponse>, ApiError> {
  let Query(params) = params?;
  let response = blocking(&state, move |s| {
    let mut ledger = s.ledger();
    let result = s.engine.execute(&mut ledger, params.seed);
    HistoricalRunResponse {
      result,
      history: ledger.snapshot(),
    }
  })
  .await?;
  Ok(Json(response))
}

pub async fn services(State(state): State<Arc<AppState>>) -> Result<Json<RunResult>, ApiError> {
  let latest = blocking(&state, |s| s.ledger().latest().ok().cloned()).await?;
  latest
    .map(Json)
    .ok_or_else(|| ApiError::not_found("No simulation results available yet."))
}

pub async fn summary(
  State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryResponse>, ApiError> {
  let summary = blocking(&state, |s| {
    s.ledger()
      .latest()
      .ok()
      .map(|latest| SummaryResponse::from(&latest.summary))
  })
  .await?;
  summary
    .map(Json)
    .ok_or_else(|| ApiError::not_found("Simulation not run yet."))
}

pub async fn history(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistoricalRecord>>, ApiError> {
  Ok(Json(blocking(&state, |s| s.ledger().snapshot()).await?))
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
  blocking(&state, |s| s.ledger().clear()).await?;
  tracing::info!("history cleared");
  Ok(StatusCode::NO_CONTENT)
}

pub async fn graph(State(state): State<Arc<AppState>>) -> Result<Json<GraphView>, ApiError> {
  let latest = blocking(&state, |s| s.latest_or_simulate()).await?;
  Ok(Json(viz::graph_view(&latest)?))
}

pub async fn graph_dot(
  State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
  let latest = blocking(&state, |s| s.latest_or_simulate()).await?;
  let dot = viz::graph_view(&latest)?.to_dot();
  Ok(([(header::CONTENT_TYPE, "text/vnd.graphviz")], dot))
}

pub async fn barchart(State(state): State<Arc<AppState>>) -> Result<Json<BarChart>, ApiError> {
  let latest = blocking(&state, |s| s.latest_or_simulate()).await?;
  Ok(Json(viz::risk_barchart(&latest)?))
}

pub async fn export_csv(
  State(state): State<Arc<AppState>>,
) -> Result<Json<ExportReport>, ApiError> {
  let report = blocking(&state, |s| {
    let latest = s.latest_or_simulate();
    export::export_to_dir(&latest, &s.engine.config().export_dir)
  })
  .await??;
  Ok(Json(report))
}

pub async fn cicd_hook(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<CicdHookRequest>, JsonRejection>,
) -> Result<Json<CicdHookResponse>, ApiError> {
  let Json(payload) = payload?;
  let result = blocking(&state, |s| s.simulate(None)).await?;
  let lookup = result.lookup_or_riskiest(&payload.service_name).ok_or_else(|| {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "simulation produced no services")
  })?;
  let metrics = lookup.metrics;

  if lookup.substituted {
    tracing::warn!(
      pipeline_id = %payload.pipeline_id,
      requested = %payload.service_name,
      assessed = %metrics.service_name,
      "unknown service in hook; using highest-risk service"
    );
  }
  tracing::info!(
    pipeline_id = %payload.pipeline_id,
    requested_by = payload.requested_by.as_deref().unwrap_or("-"),
    service = %metrics.service_name,
    risk_score = metrics.risk_score,
    decision = %metrics.decision,
    "cicd hook assessed"
  );

  Ok(Json(CicdHookResponse {
    message: format!(
      "Risk Estimator Hook Triggered → Calculated Risk Score = {:.0}. {}.",
      metrics.risk_score, metrics.decision
    ),
    risk_score: metrics.risk_score,
    decision: metrics.decision,
    assessed_service: metrics.service_name.clone(),
    substituted: lookup.substituted,
  }))
}
