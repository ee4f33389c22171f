//! Structured error types for the risk engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("config: {field}: {reason}")]
  Config { field: String, reason: String },

  #[error("no simulation results available yet")]
  NoData,

  #[error("cannot render a run without service metrics")]
  EmptyRun,

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv: {0}")]
  Csv(#[from] csv::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn config(field: &str, reason: impl Into<String>) -> Self {
    Self::Config {
      field: field.to_string(),
      reason: reason.into(),
    }
  }
}
