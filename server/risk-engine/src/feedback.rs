//! History feedback: which services the previous run blocked.

use std::collections::BTreeSet;

use crate::types::{Decision, HistoricalRecord};

/// Names blocked in the most recent record; older records are ignored.
pub fn blocked_services(history: &[HistoricalRecord]) -> BTreeSet<String> {
  let Some(latest) = history.last() else {
    return BTreeSet::new();
  };
  latest
    .services
    .iter()
    .filter(|m| m.decision == Decision::BlockDeployment)
    .map(|m| m.service_name.clone())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{RunSummary, ServiceMetrics};
  use chrono::Utc;

  fn record(decisions: &[(&str, Decision)]) -> HistoricalRecord {
    HistoricalRecord {
      summary: RunSummary {
        average_risk: 50.0,
        highest_risk_service: decisions[0].0.into(),
        highest_risk_score: 50.0,
        blocked_services: vec![],
        blocked_count: 0,
        timestamp_utc: Utc::now(),
      },
      services: decisions
        .iter()
        .map(|(name, decision)| ServiceMetrics {
          service_name: name.to_string(),
          dependency_impact_score: 0.0,
          rollback_rate: 0.0,
          change_frequency: 0.0,
          error_spike_history: 0.0,
          latency_instability: 0.0,
          risk_score: 0.0,
          decision: *decision,
        })
        .collect(),
    }
  }

  #[test]
  fn empty_history_blocks_nothing() {
    assert!(blocked_services(&[]).is_empty());
  }

  #[test]
  fn only_latest_record_counts() {
    let older = record(&[("auth-service", Decision::BlockDeployment)]);
    let latest = record(&[
      ("auth-service", Decision::ManualReview),
      ("orders-service", Decision::BlockDeployment),
      ("email-service", Decision::AutoApprove),
    ]);
    let blocked = blocked_services(&[older, latest]);
    assert_eq!(blocked.len(), 1);
    assert!(blocked.contains("orders-service"));
  }
}
