//! Engine configuration: service set, candidate table, history capacity.
//!
//! Built once at startup (defaults or environment) and handed to the engine
//! and the ledger by value. Nothing reads the environment after load.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::error::EngineError;

/// Smallest and largest accepted history capacity.
pub const MIN_HISTORY_LIMIT: usize = 1;
pub const MAX_HISTORY_LIMIT: usize = 20;

pub const ENV_HISTORY_LIMIT: &str = "RISK_HISTORY_LIMIT";
pub const ENV_SERVICE_NAMES: &str = "RISK_SERVICE_NAMES";
pub const ENV_DEPENDENCY_CANDIDATES: &str = "RISK_DEPENDENCY_CANDIDATES";
pub const ENV_EXPORT_DIR: &str = "RISK_EXPORT_DIR";

const DEFAULT_SERVICE_NAMES: [&str; 10] = [
  "auth-service",
  "payment-service",
  "inventory-service",
  "email-service",
  "orders-service",
  "analytics-service",
  "search-service",
  "notification-service",
  "reporting-service",
  "billing-service",
];

/// Static candidate table: service -> services that may point an edge at it.
const DEFAULT_DEPENDENCY_CANDIDATES: [(&str, &[&str]); 10] = [
  (
    "auth-service",
    &["orders-service", "payment-service", "notification-service"],
  ),
  ("payment-service", &["billing-service", "orders-service"]),
  ("inventory-service", &["orders-service", "analytics-service"]),
  ("email-service", &["notification-service"]),
  (
    "orders-service",
    &["inventory-service", "payment-service", "analytics-service"],
  ),
  ("analytics-service", &["reporting-service", "search-service"]),
  ("search-service", &["analytics-service"]),
  ("notification-service", &["email-service"]),
  ("reporting-service", &["analytics-service", "billing-service"]),
  ("billing-service", &["payment-service", "reporting-service"]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  /// Ordered service set; order drives graph construction and random draws.
  pub service_names: Vec<String>,
  /// Candidate upstreams per service.
  pub dependency_candidates: BTreeMap<String, Vec<String>>,
  /// Rolling history capacity, 1..=20.
  pub history_limit: usize,
  /// Where CSV exports land.
  pub export_dir: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      service_names: DEFAULT_SERVICE_NAMES.iter().map(|s| s.to_string()).collect(),
      dependency_candidates: DEFAULT_DEPENDENCY_CANDIDATES
        .iter()
        .map(|(service, deps)| {
          (
            service.to_string(),
            deps.iter().map(|d| d.to_string()).collect(),
          )
        })
        .collect(),
      history_limit: 5,
      export_dir: PathBuf::from("exports"),
    }
  }
}

impl Config {
  /// Load from process environment, falling back to defaults per field.
  pub fn from_env() -> Result<Self, EngineError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Load using an arbitrary key lookup (environment, test map, ...).
  pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut config = Self::default();

    if let Some(raw) = lookup(ENV_HISTORY_LIMIT) {
      config.history_limit = raw.trim().parse().map_err(|_| {
        EngineError::config(ENV_HISTORY_LIMIT, format!("not an integer: {:?}", raw))
      })?;
    }
    if let Some(raw) = lookup(ENV_SERVICE_NAMES) {
      config.service_names = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    }
    if let Some(raw) = lookup(ENV_DEPENDENCY_CANDIDATES) {
      config.dependency_candidates = serde_json::from_str(&raw).map_err(|e| {
        EngineError::config(ENV_DEPENDENCY_CANDIDATES, format!("invalid JSON map: {}", e))
      })?;
    }
    if let Some(raw) = lookup(ENV_EXPORT_DIR) {
      config.export_dir = PathBuf::from(raw);
    }

    config.validate()?;
    tracing::debug!(
      services = config.service_names.len(),
      history_limit = config.history_limit,
      "configuration loaded"
    );
    Ok(config)
  }

  /// Reject values the engine cannot run with.
  pub fn validate(&self) -> Result<(), EngineError> {
    validate_history_limit(self.history_limit)?;

    if self.service_names.is_empty() {
      return Err(EngineError::config(
        "service_names",
        "must name at least one service",
      ));
    }
    let mut seen = HashSet::new();
    for name in &self.service_names {
      if name.trim().is_empty() {
        return Err(EngineError::config("service_names", "names must not be blank"));
      }
      if !seen.insert(name.as_str()) {
        return Err(EngineError::config(
          "service_names",
          format!("duplicate service {:?}", name),
        ));
      }
    }
    Ok(())
  }
}

pub fn validate_history_limit(limit: usize) -> Result<(), EngineError> {
  if limit < MIN_HISTORY_LIMIT {
    return Err(EngineError::config(
      "history_limit",
      format!("must be at least {}", MIN_HISTORY_LIMIT),
    ));
  }
  if limit > MAX_HISTORY_LIMIT {
    return Err(EngineError::config(
      "history_limit",
      format!("must not exceed {}", MAX_HISTORY_LIMIT),
    ));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |key: &str| map.get(key).cloned()
  }

  #[test]
  fn defaults_are_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.service_names.len(), 10);
    assert_eq!(config.history_limit, 5);
    assert_eq!(
      config.dependency_candidates["email-service"],
      vec!["notification-service".to_string()]
    );
  }

  #[test]
  fn history_limit_bounds_are_enforced() {
    assert!(validate_history_limit(1).is_ok());
    assert!(validate_history_limit(20).is_ok());

    let err = validate_history_limit(0).unwrap_err();
    assert!(err.to_string().contains("at least 1"));
    let err = validate_history_limit(21).unwrap_err();
    assert!(err.to_string().contains("must not exceed 20"));
  }

  #[test]
  fn lookup_overrides_defaults() {
    let config = Config::from_lookup(lookup_from(&[
      (ENV_HISTORY_LIMIT, "12"),
      (ENV_SERVICE_NAMES, "auth-service, orders-service ,"),
      (ENV_EXPORT_DIR, "/tmp/risk"),
    ]))
    .unwrap();

    assert_eq!(config.history_limit, 12);
    assert_eq!(config.service_names, vec!["auth-service", "orders-service"]);
    assert_eq!(config.export_dir, PathBuf::from("/tmp/risk"));
    // Candidate table is untouched.
    assert_eq!(config.dependency_candidates.len(), 10);
  }

  #[test]
  fn out_of_range_limit_is_rejected_at_load() {
    let err = Config::from_lookup(lookup_from(&[(ENV_HISTORY_LIMIT, "21")])).unwrap_err();
    assert!(matches!(err, EngineError::Config { .. }));

    let err = Config::from_lookup(lookup_from(&[(ENV_HISTORY_LIMIT, "0")])).unwrap_err();
    assert!(err.to_string().contains("history_limit"));

    let err = Config::from_lookup(lookup_from(&[(ENV_HISTORY_LIMIT, "five")])).unwrap_err();
    assert!(err.to_string().contains(ENV_HISTORY_LIMIT));
  }

  #[test]
  fn candidate_table_parses_from_json() {
    let config = Config::from_lookup(lookup_from(&[
      (ENV_SERVICE_NAMES, "a,b"),
      (ENV_DEPENDENCY_CANDIDATES, r#"{"a": ["b"], "b": []}"#),
    ]))
    .unwrap();
    assert_eq!(config.dependency_candidates["a"], vec!["b".to_string()]);

    let err = Config::from_lookup(lookup_from(&[(ENV_DEPENDENCY_CANDIDATES, "[1,2]")]))
      .unwrap_err();
    assert!(err.to_string().contains(ENV_DEPENDENCY_CANDIDATES));
  }

  #[test]
  fn duplicate_and_empty_service_sets_are_rejected() {
    let err = Config::from_lookup(lookup_from(&[(ENV_SERVICE_NAMES, "a,b,a")])).unwrap_err();
    assert!(err.to_string().contains("duplicate"));

    let err = Config::from_lookup(lookup_from(&[(ENV_SERVICE_NAMES, " , ")])).unwrap_err();
    assert!(err.to_string().contains("at least one service"));
  }
}
