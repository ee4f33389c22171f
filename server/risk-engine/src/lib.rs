//! Rolling Update Risk Estimator: simulation and scoring engine.
//!
//! Builds a randomized dependency graph over a fixed service set, scores
//! each service's structural impact, synthesizes rollback/change/error/latency
//! signals, and folds them into a 0-100 risk score and deployment decision.
//! A bounded history ledger feeds the previous run's blocked set back in.
//!
//! No DB, no network; pure computation + in-memory state. Seeded runs are
//! deterministic.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod feedback;
pub mod graph;
pub mod impact;
pub mod ledger;
pub mod score;
pub mod signals;
pub mod summary;
pub mod types;
pub mod viz;

pub use config::Config;
pub use engine::Engine;
pub use error::EngineError;
pub use ledger::HistoryLedger;
pub use types::{
  Decision, DependencyEdge, HistoricalRecord, RunRequest, RunResult, RunSummary, ServiceMetrics,
};
