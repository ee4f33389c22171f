//! Binary entrypoint: read an optional `{"seed": n}` from stdin, run one
//! simulation, write the result JSON to stdout.

use risk_engine::{Config, Engine, HistoryLedger, RunRequest};
use std::io::{self, Read, Write};

fn main() {
  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "risk-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let request: RunRequest = if raw.trim().is_empty() {
    RunRequest::default()
  } else {
    serde_json::from_str(&raw)?
  };

  let config = Config::from_env()?;
  let mut ledger = HistoryLedger::from_config(&config)?;
  let engine = Engine::new(config)?;

  let out = engine.execute(&mut ledger, request.seed);
  let json = serde_json::to_vec(&out)?;
  io::stdout().write_all(&json)?;
  Ok(())
}
