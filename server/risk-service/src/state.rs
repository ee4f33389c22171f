//! Shared service state: the engine plus the one mutable history ledger.

use std::sync::{Mutex, MutexGuard, PoisonError};

use risk_engine::{Config, Engine, EngineError, HistoryLedger, RunResult};

pub struct AppState {
  pub engine: Engine,
  ledger: Mutex<HistoryLedger>,
}

impl AppState {
  pub fn new(config: Config) -> Result<Self, EngineError> {
    let ledger = HistoryLedger::from_config(&config)?;
    let engine = Engine::new(config)?;
    Ok(Self {
      engine,
      ledger: Mutex::new(ledger),
    })
  }

  /// Lock the ledger, recovering from poisoning (`record` has no panic
  /// point between append and trim).
  pub fn ledger(&self) -> MutexGuard<'_, HistoryLedger> {
    self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Run and record under one lock so concurrent runs serialize.
  pub fn simulate(&self, seed: Option<u64>) -> RunResult {
    let mut ledger = self.ledger();
    self.engine.execute(&mut ledger, seed)
  }

  /// Latest result, running a fresh simulation when none exists yet.
  pub fn latest_or_simulate(&self) -> RunResult {
    let mut ledger = self.ledger();
    if let Ok(latest) = ledger.latest() {
      return latest.clone();
    }
    self.engine.execute(&mut ledger, None)
  }
}
