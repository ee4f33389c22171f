//! Run-level aggregates over one run's service metrics.

use chrono::{DateTime, Utc};

use crate::signals::round2;
use crate::types::{Decision, RunSummary, ServiceMetrics};

/// Summarize a run stamped with the current UTC instant.
///
/// # Panics
///
/// Panics on an empty slice; a validated configuration always yields at
/// least one service.
pub fn summarize(services: &[ServiceMetrics]) -> RunSummary {
  summarize_at(services, Utc::now())
}

pub fn summarize_at(services: &[ServiceMetrics], timestamp_utc: DateTime<Utc>) -> RunSummary {
  assert!(!services.is_empty(), "summarize called with zero services");

  let total: f64 = services.iter().map(|s| s.risk_score).sum();
  let average_risk = round2(total / services.len() as f64);

  // First maximum wins on ties.
  let mut highest = &services[0];
  for svc in &services[1..] {
    if svc.risk_score > highest.risk_score {
      highest = svc;
    }
  }

  let blocked_services: Vec<String> = services
    .iter()
    .filter(|s| s.decision == Decision::BlockDeployment)
    .map(|s| s.service_name.clone())
    .collect();

  RunSummary {
    average_risk,
    highest_risk_service: highest.service_name.clone(),
    highest_risk_score: highest.risk_score,
    blocked_count: blocked_services.len(),
    blocked_services,
    timestamp_utc,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::score::classify;
  use chrono::TimeZone;

  fn metric(name: &str, risk: f64) -> ServiceMetrics {
    ServiceMetrics {
      service_name: name.into(),
      dependency_impact_score: 0.0,
      rollback_rate: 0.0,
      change_frequency: 0.0,
      error_spike_history: 0.0,
      latency_instability: 0.0,
      risk_score: risk,
      decision: classify(risk),
    }
  }

  #[test]
  fn aggregates_average_max_and_blocked() {
    let ts = Utc.with_ymd_and_hms(2025, 11, 7, 1, 45, 0).unwrap();
    let services = vec![
      metric("auth-service", 45.3),
      metric("billing-service", 71.0),
      metric("orders-service", 82.3),
      metric("search-service", 12.2),
    ];
    let summary = summarize_at(&services, ts);

    assert_eq!(summary.average_risk, 52.7);
    assert_eq!(summary.highest_risk_service, "orders-service");
    assert_eq!(summary.highest_risk_score, 82.3);
    assert_eq!(summary.blocked_services, vec!["billing-service", "orders-service"]);
    assert_eq!(summary.blocked_count, 2);
    assert_eq!(summary.timestamp_utc, ts);
  }

  #[test]
  fn ties_keep_the_first_service() {
    let services = vec![metric("a", 60.0), metric("b", 60.0), metric("c", 10.0)];
    let summary = summarize(&services);
    assert_eq!(summary.highest_risk_service, "a");
    assert_eq!(summary.blocked_count, 0);
  }

  #[test]
  #[should_panic(expected = "zero services")]
  fn empty_run_is_a_programming_error() {
    summarize(&[]);
  }
}
