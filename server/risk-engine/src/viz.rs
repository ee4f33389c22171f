//! Render-ready projections of a run: colour-mapped dependency graph (as
//! Graphviz DOT) and a risk bar chart series. No rasterisation happens here.

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::EngineError;
use crate::types::{DependencyEdge, RunResult};

/// Green -> yellow -> red ramp endpoints (low risk to high risk).
const RAMP_LOW: (u8, u8, u8) = (0x1a, 0x98, 0x50);
const RAMP_MID: (u8, u8, u8) = (0xff, 0xff, 0xbf);
const RAMP_HIGH: (u8, u8, u8) = (0xd7, 0x30, 0x27);

/// Min-max scale to [0, 1]; a flat series maps to 0.5 everywhere.
pub fn colour_gradient(values: &[f64]) -> Vec<f64> {
  let Some(first) = values.first() else {
    return Vec::new();
  };
  let (min, max) = values
    .iter()
    .fold((*first, *first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
  if max == min {
    return vec![0.5; values.len()];
  }
  values.iter().map(|v| (v - min) / (max - min)).collect()
}

/// Hex colour for a gradient position.
pub fn ramp_colour(position: f64) -> String {
  let t = position.clamp(0.0, 1.0);
  let (from, to, local) = if t < 0.5 {
    (RAMP_LOW, RAMP_MID, t * 2.0)
  } else {
    (RAMP_MID, RAMP_HIGH, (t - 0.5) * 2.0)
  };
  let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * local).round() as u8;
  format!(
    "#{:02x}{:02x}{:02x}",
    mix(from.0, to.0),
    mix(from.1, to.1),
    mix(from.2, to.2)
  )
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
  pub service_name: String,
  pub risk_score: f64,
  pub gradient: f64,
  pub colour: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
  pub nodes: Vec<NodeView>,
  pub edges: Vec<DependencyEdge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bar {
  pub service_name: String,
  pub risk_score: f64,
  pub gradient: f64,
  pub colour: String,
}

/// Bars sorted by risk, highest first.
#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
  pub title: &'static str,
  pub bars: Vec<Bar>,
}

pub fn graph_view(result: &RunResult) -> Result<GraphView, EngineError> {
  if result.services.is_empty() {
    return Err(EngineError::EmptyRun);
  }
  let risks: Vec<f64> = result.services.iter().map(|s| s.risk_score).collect();
  let nodes = result
    .services
    .iter()
    .zip(colour_gradient(&risks))
    .map(|(svc, gradient)| NodeView {
      service_name: svc.service_name.clone(),
      risk_score: svc.risk_score,
      gradient,
      colour: ramp_colour(gradient),
    })
    .collect();
  Ok(GraphView {
    nodes,
    edges: result.edges.clone(),
  })
}

impl GraphView {
  /// Graphviz DOT document; nodes labelled with their risk score.
  pub fn to_dot(&self) -> String {
    let mut dot = String::new();
    let _ = writeln!(dot, "digraph dependency_risk {{");
    let _ = writeln!(dot, "  label=\"Microservice Dependency Risk Map\";");
    let _ = writeln!(dot, "  node [shape=ellipse, style=filled, fontsize=9];");
    let _ = writeln!(dot, "  edge [color=\"#cccccc\", arrowhead=normal];");
    for node in &self.nodes {
      let _ = writeln!(
        dot,
        "  \"{id}\" [label=\"{id}\\n{:.1}\", fillcolor=\"{}\"];",
        node.risk_score,
        node.colour,
        id = escape_dot_id(&node.service_name),
      );
    }
    for edge in &self.edges {
      let _ = writeln!(
        dot,
        "  \"{}\" -> \"{}\";",
        escape_dot_id(&edge.source),
        escape_dot_id(&edge.target)
      );
    }
    dot.push_str("}\n");
    dot
  }
}

/// Escape a name for use inside a DOT double-quoted string.
pub fn escape_dot_id(name: &str) -> String {
  let mut out = String::with_capacity(name.len());
  for c in name.chars() {
    if c == '"' || c == '\\' {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

pub fn risk_barchart(result: &RunResult) -> Result<BarChart, EngineError> {
  if result.services.is_empty() {
    return Err(EngineError::EmptyRun);
  }
  let mut services: Vec<_> = result.services.iter().collect();
  services.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));

  let risks: Vec<f64> = services.iter().map(|s| s.risk_score).collect();
  let bars = services
    .iter()
    .zip(colour_gradient(&risks))
    .map(|(svc, gradient)| Bar {
      service_name: svc.service_name.clone(),
      risk_score: svc.risk_score,
      gradient,
      colour: ramp_colour(gradient),
    })
    .collect();
  Ok(BarChart {
    title: "Service Risk Comparison",
    bars,
  })
}
