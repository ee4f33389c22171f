//! Dependency impact: how structurally central each service is.
//!
//! impact = 0.6 * betweenness + 0.4 * (in_degree / max_in_degree), as a percentage.

use std::collections::VecDeque;

use crate::graph::DependencyGraph;
use crate::signals::to_percentage;

const BETWEENNESS_WEIGHT: f64 = 0.6;
const IN_DEGREE_WEIGHT: f64 = 0.4;

/// Normalized directed betweenness centrality per node (Brandes, unweighted).
///
/// Values are scaled by 1/((n-1)(n-2)) so they land in [0, 1].
pub fn betweenness(graph: &DependencyGraph) -> Vec<f64> {
  let n = graph.node_count();
  let mut centrality = vec![0.0; n];

  for source in 0..n {
    let mut order = Vec::with_capacity(n);
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    sigma[source] = 1.0;
    dist[source] = Some(0);

    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
      order.push(v);
      let next = dist[v].map_or(0, |d| d + 1);
      for &w in graph.successors(v) {
        if dist[w].is_none() {
          dist[w] = Some(next);
          queue.push_back(w);
        }
        if dist[w] == Some(next) {
          sigma[w] += sigma[v];
          preds[w].push(v);
        }
      }
    }

    // Accumulate dependencies in reverse BFS order.
    let mut delta = vec![0.0_f64; n];
    while let Some(w) = order.pop() {
      for &v in &preds[w] {
        delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
      }
      if w != source {
        centrality[w] += delta[w];
      }
    }
  }

  if n > 2 {
    let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
    for value in &mut centrality {
      *value *= scale;
    }
  }
  centrality
}

/// In-degree over the maximum in-degree; all zeros for an edgeless graph.
pub fn normalized_in_degree(graph: &DependencyGraph) -> Vec<f64> {
  let n = graph.node_count();
  let max_in = (0..n).map(|i| graph.in_degree(i)).max().unwrap_or(0);
  (0..n)
    .map(|i| {
      if max_in == 0 {
        0.0
      } else {
        graph.in_degree(i) as f64 / max_in as f64
      }
    })
    .collect()
}

/// Dependency impact score per node, in node order, on the 0-100 scale.
pub fn dependency_impact(graph: &DependencyGraph) -> Vec<f64> {
  betweenness(graph)
    .into_iter()
    .zip(normalized_in_degree(graph))
    .map(|(b, d)| to_percentage(BETWEENNESS_WEIGHT * b + IN_DEGREE_WEIGHT * d))
    .collect()
}
