//! Core types for the risk engine (JSON contracts + per-run records).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Deployment outcome for one service, driven only by its risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
  #[serde(rename = "Auto Approve")]
  AutoApprove,
  #[serde(rename = "Manual Review")]
  ManualReview,
  #[serde(rename = "Block Deployment")]
  BlockDeployment,
}

impl Decision {
  pub fn label(self) -> &'static str {
    match self {
      Self::AutoApprove => "Auto Approve",
      Self::ManualReview => "Manual Review",
      Self::BlockDeployment => "Block Deployment",
    }
  }
}

impl fmt::Display for Decision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

// ---------------------------------------------------------------------------
// Per-run records
// ---------------------------------------------------------------------------

/// Directed edge: `source` is depended on by `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
  pub source: String,
  pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMetrics {
  pub service_name: String,
  pub dependency_impact_score: f64,
  pub rollback_rate: f64,
  pub change_frequency: f64,
  pub error_spike_history: f64,
  pub latency_instability: f64,
  pub risk_score: f64,
  pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
  pub average_risk: f64,
  pub highest_risk_service: String,
  pub highest_risk_score: f64,
  pub blocked_services: Vec<String>,
  pub blocked_count: usize,
  pub timestamp_utc: DateTime<Utc>,
}

/// Everything one simulation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
  pub summary: RunSummary,
  pub services: Vec<ServiceMetrics>,
  pub edges: Vec<DependencyEdge>,
}

/// What the ledger retains per run (edges are dropped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
  pub summary: RunSummary,
  pub services: Vec<ServiceMetrics>,
}

impl From<&RunResult> for HistoricalRecord {
  fn from(result: &RunResult) -> Self {
    Self {
      summary: result.summary.clone(),
      services: result.services.clone(),
    }
  }
}

/// Result of looking a service up by name in a run.
#[derive(Debug, Clone, Copy)]
pub struct ServiceLookup<'a> {
  pub metrics: &'a ServiceMetrics,
  /// True when the requested name was missing and the riskiest service was used.
  pub substituted: bool,
}

impl RunResult {
  /// First service with the maximum risk score, in presentation order.
  pub fn riskiest(&self) -> Option<&ServiceMetrics> {
    self.services.iter().fold(None, |best, svc| match best {
      Some(b) if b.risk_score >= svc.risk_score => Some(b),
      _ => Some(svc),
    })
  }

  /// Find `name`, or fall back to the riskiest service.
  pub fn lookup_or_riskiest(&self, name: &str) -> Option<ServiceLookup<'_>> {
    if let Some(metrics) = self.services.iter().find(|m| m.service_name == name) {
      return Some(ServiceLookup {
        metrics,
        substituted: false,
      });
    }
    self.riskiest().map(|metrics| ServiceLookup {
      metrics,
      substituted: true,
    })
  }
}

// ---------------------------------------------------------------------------
// Batch binary contract
// ---------------------------------------------------------------------------

/// Stdin request for the batch binary. Unknown fields are silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunRequest {
  #[serde(default)]
  pub seed: Option<u64>,
}

/// Structured error output for the binaries and HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}
