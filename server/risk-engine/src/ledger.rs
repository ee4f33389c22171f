//! Bounded FIFO history of past runs, plus the latest full result.
//!
//! The ledger is the only mutable state shared between runs. Callers that
//! serve concurrent requests must hold one lock across snapshot -> run ->
//! record so the capacity trim never races.

use std::collections::VecDeque;

use crate::config::{validate_history_limit, Config};
use crate::error::EngineError;
use crate::types::{HistoricalRecord, RunResult};

#[derive(Debug, Clone)]
pub struct HistoryLedger {
  capacity: usize,
  records: VecDeque<HistoricalRecord>,
  latest: Option<RunResult>,
}

impl HistoryLedger {
  pub fn new(capacity: usize) -> Result<Self, EngineError> {
    validate_history_limit(capacity)?;
    Ok(Self {
      capacity,
      records: VecDeque::with_capacity(capacity + 1),
      latest: None,
    })
  }

  pub fn from_config(config: &Config) -> Result<Self, EngineError> {
    Self::new(config.history_limit)
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Point-in-time copy, oldest first.
  pub fn snapshot(&self) -> Vec<HistoricalRecord> {
    self.records.iter().cloned().collect()
  }

  /// Append one record, evicting the oldest entries beyond capacity.
  pub fn record(&mut self, entry: HistoricalRecord) {
    self.records.push_back(entry);
    while self.records.len() > self.capacity {
      self.records.pop_front();
      tracing::debug!(capacity = self.capacity, "evicted oldest history record");
    }
  }

  /// Record a finished run and keep it as the latest full result.
  pub fn record_run(&mut self, result: RunResult) {
    self.record(HistoricalRecord::from(&result));
    self.latest = Some(result);
  }

  /// Latest full result, or `NoData` before the first run.
  pub fn latest(&self) -> Result<&RunResult, EngineError> {
    self.latest.as_ref().ok_or(EngineError::NoData)
  }

  pub fn clear(&mut self) {
    self.records.clear();
    self.latest = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::RunSummary;
  use chrono::Utc;

  fn entry(tag: f64) -> HistoricalRecord {
    HistoricalRecord {
      summary: RunSummary {
        average_risk: tag,
        highest_risk_service: "auth-service".into(),
        highest_risk_score: tag,
        blocked_services: vec![],
        blocked_count: 0,
        timestamp_utc: Utc::now(),
      },
      services: vec![],
    }
  }

  fn run(tag: f64) -> RunResult {
    let record = entry(tag);
    RunResult {
      summary: record.summary,
      services: record.services,
      edges: vec![],
    }
  }

  fn tags(ledger: &HistoryLedger) -> Vec<f64> {
    ledger
      .snapshot()
      .iter()
      .map(|r| r.summary.average_risk)
      .collect()
  }

  #[test]
  fn capacity_outside_bounds_is_rejected() {
    assert!(HistoryLedger::new(0).is_err());
    assert!(HistoryLedger::new(21).is_err());
    assert!(HistoryLedger::new(1).is_ok());
    assert!(HistoryLedger::new(20).is_ok());
  }

  #[test]
  fn overflow_evicts_oldest_first() {
    let mut ledger = HistoryLedger::new(3).unwrap();
    for i in 0..4 {
      ledger.record(entry(i as f64));
    }
    assert_eq!(ledger.len(), 3);
    assert_eq!(tags(&ledger), vec![1.0, 2.0, 3.0]);

    ledger.record(entry(4.0));
    assert_eq!(tags(&ledger), vec![2.0, 3.0, 4.0]);
  }

  #[test]
  fn snapshot_is_detached_from_ledger() {
    let mut ledger = HistoryLedger::new(2).unwrap();
    ledger.record(entry(1.0));
    let mut snap = ledger.snapshot();
    snap.clear();
    assert_eq!(ledger.len(), 1);

    let before = ledger.snapshot();
    ledger.record(entry(2.0));
    assert_eq!(before.len(), 1);
  }

  #[test]
  fn latest_is_not_available_before_first_run() {
    let ledger = HistoryLedger::new(5).unwrap();
    assert!(matches!(ledger.latest(), Err(EngineError::NoData)));
  }

  #[test]
  fn latest_outlives_history_cap() {
    let mut ledger = HistoryLedger::new(1).unwrap();
    ledger.record_run(run(1.0));
    ledger.record_run(run(2.0));
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.latest().unwrap().summary.average_risk, 2.0);
  }

  #[test]
  fn clear_forgets_everything() {
    let mut ledger = HistoryLedger::new(5).unwrap();
    ledger.record_run(run(1.0));
    ledger.clear();
    assert!(ledger.is_empty());
    assert!(ledger.latest().is_err());
    assert_eq!(ledger.capacity(), 5);
  }
}
