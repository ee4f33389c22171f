//! Tabular projection of a run and the CSV file export.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EngineError;
use crate::types::RunResult;

/// One exported row per service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
  pub service_name: String,
  pub dependency_impact_score: f64,
  pub rollback_rate: f64,
  pub change_frequency: f64,
  pub error_spike_history: f64,
  pub latency_instability: f64,
  pub risk_score: f64,
  pub decision: &'static str,
  pub timestamp_utc: String,
}

/// Metadata about a written export file.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
  pub export_path: String,
  pub record_count: usize,
  pub generated_at_utc: DateTime<Utc>,
}

pub fn rows(result: &RunResult) -> Vec<ExportRow> {
  let timestamp = result.summary.timestamp_utc.to_rfc3339();
  result
    .services
    .iter()
    .map(|m| ExportRow {
      service_name: m.service_name.clone(),
      dependency_impact_score: m.dependency_impact_score,
      rollback_rate: m.rollback_rate,
      change_frequency: m.change_frequency,
      error_spike_history: m.error_spike_history,
      latency_instability: m.latency_instability,
      risk_score: m.risk_score,
      decision: m.decision.label(),
      timestamp_utc: timestamp.clone(),
    })
    .collect()
}

/// Write header + rows as CSV; returns the number of data rows.
pub fn write_csv<W: io::Write>(result: &RunResult, writer: W) -> Result<usize, EngineError> {
  let mut out = csv::Writer::from_writer(writer);
  let rows = rows(result);
  for row in &rows {
    out.serialize(row)?;
  }
  out.flush()?;
  Ok(rows.len())
}

/// File name for a run: `risk_estimator_<YYYYMMDDTHHMMSSZ>.csv`.
pub fn file_name(result: &RunResult) -> String {
  format!(
    "risk_estimator_{}.csv",
    result.summary.timestamp_utc.format("%Y%m%dT%H%M%SZ")
  )
}

/// Write the run into `dir` (created if missing).
pub fn export_to_dir(result: &RunResult, dir: &Path) -> Result<ExportReport, EngineError> {
  fs::create_dir_all(dir)?;
  let path = dir.join(file_name(result));
  let file = fs::File::create(&path)?;
  let record_count = write_csv(result, file)?;
  let export_path = fs::canonicalize(&path)?;

  tracing::info!(path = %export_path.display(), record_count, "exported run to csv");
  Ok(ExportReport {
    export_path: export_path.display().to_string(),
    record_count,
    generated_at_utc: Utc::now(),
  })
}
