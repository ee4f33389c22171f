//! Synthetic per-service signals: rollback rate, change frequency, error
//! spikes, latency instability, plus the dependency impact from the graph.

use rand::Rng;

/// Rollback multiplier for services blocked in the previous run.
pub const BLOCKED_ROLLBACK_DAMPENING: f64 = 0.85;

/// Map a fraction of 1.0 onto 0-100; values outside [0, 1] saturate.
pub fn to_percentage(value: f64) -> f64 {
  if value < 0.0 {
    0.0
  } else if value > 1.0 {
    100.0
  } else {
    value * 100.0
  }
}

/// Round half away from zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// The four random draws for one service, each uniform over [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSignals {
  pub rollback_rate: f64,
  pub change_frequency: f64,
  pub error_spike_history: f64,
  pub latency_instability: f64,
}

impl RawSignals {
  /// Consume exactly four draws, in field order.
  pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
    let rollback_rate = rng.gen_range(0.0..=100.0);
    let change_frequency = rng.gen_range(0.0..=100.0);
    let error_spike_history = rng.gen_range(0.0..=100.0);
    let latency_instability = rng.gen_range(0.0..=100.0);
    Self {
      rollback_rate,
      change_frequency,
      error_spike_history,
      latency_instability,
    }
  }

  /// Same value for every draw.
  pub fn fixed(value: f64) -> Self {
    Self {
      rollback_rate: value,
      change_frequency: value,
      error_spike_history: value,
      latency_instability: value,
    }
  }
}

/// The five normalized inputs to the risk formula, 0-100, 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
  pub dependency_impact_score: f64,
  pub rollback_rate: f64,
  pub change_frequency: f64,
  pub error_spike_history: f64,
  pub latency_instability: f64,
}

/// Fold the graph impact and feedback into one service's raw draws.
pub fn synthesize(dependency_impact: f64, raw: RawSignals, previously_blocked: bool) -> Signals {
  let mut rollback = raw.rollback_rate;
  if previously_blocked {
    rollback *= BLOCKED_ROLLBACK_DAMPENING;
  }

  Signals {
    dependency_impact_score: round2(dependency_impact),
    rollback_rate: round2(to_percentage(rollback / 100.0)),
    change_frequency: round2(raw.change_frequency),
    error_spike_history: round2(raw.error_spike_history),
    latency_instability: round2(raw.latency_instability),
  }
}
