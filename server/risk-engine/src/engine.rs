//! Core engine: one simulation run from graph to summary.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::error::EngineError;
use crate::feedback;
use crate::graph::{self, DependencyGraph};
use crate::impact;
use crate::ledger::HistoryLedger;
use crate::score;
use crate::signals::{self, RawSignals};
use crate::summary;
use crate::types::*;

/// The risk simulation engine. Stateless across runs; history comes in as a snapshot.
#[derive(Debug, Clone)]
pub struct Engine {
  config: Config,
}

impl Engine {
  pub fn new(config: Config) -> Result<Self, EngineError> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn with_defaults() -> Self {
    Self {
      config: Config::default(),
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Run one simulation against a history snapshot.
  ///
  /// `seed = None` draws from OS entropy. The same seed and snapshot always
  /// produce the same metrics and edges; only the summary timestamp differs.
  pub fn run(&self, history: &[HistoricalRecord], seed: Option<u64>) -> RunResult {
    let mut rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    let graph = graph::generate(&self.config, &mut rng);
    let blocked = feedback::blocked_services(history);
    let result = self.assess(&graph, &blocked, |_| RawSignals::draw(&mut rng));

    tracing::info!(
      seed = ?seed,
      services = result.services.len(),
      edges = result.edges.len(),
      average_risk = result.summary.average_risk,
      blocked = result.summary.blocked_count,
      "simulation complete"
    );
    result
  }

  /// Score a prebuilt graph. `draw` supplies the raw signals per service,
  /// called once per node in configured order.
  pub fn assess<F>(&self, graph: &DependencyGraph, blocked: &BTreeSet<String>, mut draw: F) -> RunResult
  where
    F: FnMut(&str) -> RawSignals,
  {
    let impact = impact::dependency_impact(graph);

    let mut services: Vec<ServiceMetrics> = graph
      .nodes()
      .iter()
      .zip(impact)
      .map(|(name, dependency_impact)| {
        let raw = draw(name);
        let signals = signals::synthesize(dependency_impact, raw, blocked.contains(name));
        score::assess(name, signals)
      })
      .collect();
    services.sort_by(|a, b| a.service_name.cmp(&b.service_name));

    let summary = summary::summarize(&services);
    RunResult {
      summary,
      services,
      edges: graph.edges(),
    }
  }

  /// Snapshot the ledger, run, and commit the result back to it.
  pub fn execute(&self, ledger: &mut HistoryLedger, seed: Option<u64>) -> RunResult {
    let snapshot = ledger.snapshot();
    let result = self.run(&snapshot, seed);
    ledger.record_run(result.clone());
    result
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_rejects_invalid_config() {
    let err = Engine::new(Config {
      history_limit: 0,
      ..Config::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("history_limit"));
  }

  #[test]
  fn services_come_back_sorted_by_name() {
    let engine = Engine::with_defaults();
    let result = engine.run(&[], Some(11));
    let names: Vec<&str> = result.services.iter().map(|s| s.service_name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
  }

  #[test]
  fn draw_is_called_once_per_service_in_config_order() {
    let engine = Engine::with_defaults();
    let graph = graph::generate(engine.config(), &mut StdRng::seed_from_u64(3));
    let mut seen = Vec::new();
    engine.assess(&graph, &BTreeSet::new(), |name| {
      seen.push(name.to_string());
      RawSignals::fixed(10.0)
    });
    assert_eq!(seen, engine.config().service_names);
  }

  #[test]
  fn blocked_set_dampens_only_named_services() {
    let engine = Engine::with_defaults();
    let graph = graph::generate(engine.config(), &mut StdRng::seed_from_u64(3));
    let blocked: BTreeSet<String> = ["orders-service".to_string()].into_iter().collect();
    let result = engine.assess(&graph, &blocked, |_| RawSignals::fixed(80.0));

    for svc in &result.services {
      if svc.service_name == "orders-service" {
        assert_eq!(svc.rollback_rate, 68.0);
      } else {
        assert_eq!(svc.rollback_rate, 80.0);
      }
    }
  }

  #[test]
  fn execute_commits_to_ledger() {
    let engine = Engine::with_defaults();
    let mut ledger = HistoryLedger::new(2).unwrap();
    let first = engine.execute(&mut ledger, Some(1));
    engine.execute(&mut ledger, Some(2));
    let third = engine.execute(&mut ledger, Some(3));

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.latest().unwrap(), &third);
    let snapshot = ledger.snapshot();
    assert_eq!(snapshot[1], HistoricalRecord::from(&third));
    assert!(!snapshot.contains(&HistoricalRecord::from(&first)));
  }
}
