//! Weighted risk score (0–100) and the deployment decision it maps to.

use crate::signals::{round2, Signals};
use crate::types::{Decision, ServiceMetrics};

pub const DEPENDENCY_IMPACT_WEIGHT: f64 = 0.4;
pub const ROLLBACK_WEIGHT: f64 = 0.2;
pub const CHANGE_FREQUENCY_WEIGHT: f64 = 0.15;
pub const ERROR_SPIKE_WEIGHT: f64 = 0.15;
pub const LATENCY_WEIGHT: f64 = 0.1;

/// Scores below this auto-approve.
pub const MANUAL_REVIEW_THRESHOLD: f64 = 40.0;
/// Scores at or above this block the deployment.
pub const BLOCK_THRESHOLD: f64 = 70.0;

/// Weighted sum of the five signals, clamped to 0–100, 2 decimals.
pub fn compute_risk_score(signals: &Signals) -> f64 {
  let raw = DEPENDENCY_IMPACT_WEIGHT * signals.dependency_impact_score
    + ROLLBACK_WEIGHT * signals.rollback_rate
    + CHANGE_FREQUENCY_WEIGHT * signals.change_frequency
    + ERROR_SPIKE_WEIGHT * signals.error_spike_history
    + LATENCY_WEIGHT * signals.latency_instability;
  round2(raw.clamp(0.0, 100.0))
}

pub fn classify(risk_score: f64) -> Decision {
  if risk_score < MANUAL_REVIEW_THRESHOLD {
    Decision::AutoApprove
  } else if risk_score < BLOCK_THRESHOLD {
    Decision::ManualReview
  } else {
    Decision::BlockDeployment
  }
}

/// Final, immutable metrics record for one service.
pub fn assess(service_name: &str, signals: Signals) -> ServiceMetrics {
  let risk_score = compute_risk_score(&signals);
  ServiceMetrics {
    service_name: service_name.to_string(),
    dependency_impact_score: signals.dependency_impact_score,
    rollback_rate: signals.rollback_rate,
    change_frequency: signals.change_frequency,
    error_spike_history: signals.error_spike_history,
    latency_instability: signals.latency_instability,
    risk_score,
    decision: classify(risk_score),
  }
}
