//! Request/response types for the risk service.

use chrono::{DateTime, Utc};
use risk_engine::{Decision, HistoricalRecord, RunResult, RunSummary};
use serde::{Deserialize, Serialize};

/// `?seed=` on the simulate routes.
#[derive(Debug, Default, Deserialize)]
pub struct SimulateParams {
  #[serde(default)]
  pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
  pub status: String,
  pub timestamp_utc: DateTime<Utc>,
}

/// A run plus the ledger contents after it was recorded.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoricalRunResponse {
  #[serde(flatten)]
  pub result: RunResult,
  pub history: Vec<HistoricalRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
  pub average_risk: f64,
  pub highest_risk_service: String,
  pub highest_risk_score: f64,
  pub blocked_count: usize,
}

impl From<&RunSummary> for SummaryResponse {
  fn from(summary: &RunSummary) -> Self {
    Self {
      average_risk: summary.average_risk,
      highest_risk_service: summary.highest_risk_service.clone(),
      highest_risk_score: summary.highest_risk_score,
      blocked_count: summary.blocked_count,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct CicdHookRequest {
  pub pipeline_id: String,
  pub service_name: String,
  #[serde(default)]
  pub requested_by: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CicdHookResponse {
  pub message: String,
  pub risk_score: f64,
  pub decision: Decision,
  /// Service the score belongs to; differs from the request on a lookup miss.
  pub assessed_service: String,
  pub substituted: bool,
}
