//! Vertex scoring: closeness, harmonic, betweenness and alpha centrality
//!
//! Per-source work runs in parallel with rayon.

use super::common::{GraphView, NodeId};
use super::error::{illegal, AlgoResult};
use super::pathfinding::dense_distances;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Options shared by the distance based scores
#[derive(Debug, Clone)]
pub struct CentralityConfig {
    /// Measure distances towards the vertex instead of away from it
    pub incoming: bool,
    pub normalize: bool,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            incoming: false,
            normalize: true,
        }
    }
}

fn scores_by_node(view: &GraphView, scores: Vec<f64>) -> HashMap<NodeId, f64> {
    scores
        .into_iter()
        .enumerate()
        .map(|(i, s)| (view.node(i), s))
        .collect()
}

fn all_distances(view: &GraphView, incoming: bool) -> AlgoResult<Vec<Vec<f64>>> {
    view.require_non_negative_weights("centrality")?;
    (0..view.node_count)
        .into_par_iter()
        .map(|i| dense_distances(view, i, incoming))
        .collect()
}

/// Closeness centrality: inverse of the summed distance to every other vertex.
///
/// A vertex that cannot reach all others scores 0.
pub fn closeness(view: &GraphView, config: CentralityConfig) -> AlgoResult<HashMap<NodeId, f64>> {
    let n = view.node_count;
    let rows = all_distances(view, config.incoming)?;
    let scores = rows
        .iter()
        .map(|dist| {
            if dist.iter().any(|d| d.is_infinite()) {
                return 0.0;
            }
            let sum: f64 = dist.iter().sum();
            if sum == 0.0 {
                return 0.0;
            }
            if config.normalize {
                (n - 1) as f64 / sum
            } else {
                1.0 / sum
            }
        })
        .collect();
    Ok(scores_by_node(view, scores))
}

/// Harmonic centrality: sum of inverse distances, unreachable vertices contributing 0
pub fn harmonic(view: &GraphView, config: CentralityConfig) -> AlgoResult<HashMap<NodeId, f64>> {
    let n = view.node_count;
    let rows = all_distances(view, config.incoming)?;
    let scores = rows
        .iter()
        .enumerate()
        .map(|(i, dist)| {
            let sum: f64 = dist
                .iter()
                .enumerate()
                .filter(|&(j, d)| j != i && d.is_finite() && *d > 0.0)
                .map(|(_, d)| 1.0 / d)
                .sum();
            if config.normalize && n > 1 {
                sum / (n - 1) as f64
            } else {
                sum
            }
        })
        .collect();
    Ok(scores_by_node(view, scores))
}

#[derive(Copy, Clone, PartialEq)]
struct Pending {
    dist: f64,
    node: usize,
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.total_cmp(&self.dist).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Brandes dependency accumulation from a single source
fn dependencies(view: &GraphView, s: usize) -> Vec<f64> {
    let n = view.node_count;
    let mut order = Vec::with_capacity(n);
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0; n];
    let mut dist = vec![f64::INFINITY; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    sigma[s] = 1.0;
    dist[s] = 0.0;
    heap.push(Pending { dist: 0.0, node: s });

    while let Some(Pending { dist: d, node: u }) = heap.pop() {
        if settled[u] || d > dist[u] {
            continue;
        }
        settled[u] = true;
        order.push(u);
        for (v, pos) in view.out_neighbors(u) {
            if v == u {
                continue;
            }
            let candidate = d + view.weight(pos);
            if candidate < dist[v] {
                dist[v] = candidate;
                sigma[v] = sigma[u];
                preds[v].clear();
                preds[v].push(u);
                heap.push(Pending { dist: candidate, node: v });
            } else if candidate == dist[v] && !settled[v] {
                sigma[v] += sigma[u];
                preds[v].push(u);
            }
        }
    }

    let mut delta = vec![0.0; n];
    for &w in order.iter().rev() {
        for &v in &preds[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
    }
    delta[s] = 0.0;
    delta
}

/// Betweenness centrality (Brandes)
pub fn betweenness(view: &GraphView, normalize: bool) -> AlgoResult<HashMap<NodeId, f64>> {
    view.require_non_negative_weights("betweenness centrality")?;
    let n = view.node_count;
    let mut scores = (0..n)
        .into_par_iter()
        .map(|s| dependencies(view, s))
        .reduce(
            || vec![0.0; n],
            |mut acc, row| {
                for (a, r) in acc.iter_mut().zip(row) {
                    *a += r;
                }
                acc
            },
        );

    if !view.directed {
        // every pair was counted from both ends
        for s in &mut scores {
            *s /= 2.0;
        }
    }
    if normalize && n > 2 {
        let mut scale = ((n - 1) * (n - 2)) as f64;
        if !view.directed {
            scale /= 2.0;
        }
        for s in &mut scores {
            *s /= scale;
        }
    }
    Ok(scores_by_node(view, scores))
}

/// Alpha centrality configuration
#[derive(Debug, Clone)]
pub struct AlphaCentralityConfig {
    pub damping_factor: f64,
    pub exogenous_factor: f64,
    pub iterations: usize,
    pub tolerance: f64,
}

impl Default for AlphaCentralityConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.01,
            exogenous_factor: 1.0,
            iterations: 100,
            tolerance: 0.0001,
        }
    }
}

/// Alpha centrality: fixed point of `x = alpha * A^T x + e`
pub fn alpha_centrality(view: &GraphView, config: AlphaCentralityConfig) -> AlgoResult<HashMap<NodeId, f64>> {
    if config.iterations == 0 {
        return Err(illegal("alpha centrality needs at least one iteration"));
    }
    let n = view.node_count;
    let mut scores = vec![config.exogenous_factor; n];
    let mut next = vec![0.0; n];
    for _ in 0..config.iterations {
        let mut diff = 0.0;
        for v in 0..n {
            let sum: f64 = view
                .in_neighbors(v)
                .map(|(u, pos)| view.weight(pos) * scores[u])
                .sum();
            next[v] = config.exogenous_factor + config.damping_factor * sum;
            diff += (next[v] - scores[v]).abs();
        }
        std::mem::swap(&mut scores, &mut next);
        if diff < config.tolerance {
            break;
        }
    }
    Ok(scores_by_node(view, scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::unweighted;

    fn path() -> GraphView {
        unweighted(4, &[(0, 1), (1, 2), (2, 3)], false)
    }

    #[test]
    fn test_closeness_on_path() {
        let scores = closeness(&path(), CentralityConfig::default()).unwrap();
        // inner vertex: distances 1 + 1 + 2
        assert!((scores[&1] - 3.0 / 4.0).abs() < 1e-9);
        assert!((scores[&0] - 3.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_closeness_disconnected_is_zero() {
        let view = unweighted(3, &[(0, 1)], false);
        let scores = closeness(&view, CentralityConfig::default()).unwrap();
        assert_eq!(scores[&2], 0.0);
    }

    #[test]
    fn test_harmonic_on_path() {
        let config = CentralityConfig {
            normalize: false,
            ..Default::default()
        };
        let scores = harmonic(&path(), config).unwrap();
        assert!((scores[&0] - (1.0 + 0.5 + 1.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_betweenness_on_path() {
        let scores = betweenness(&path(), false).unwrap();
        assert_eq!(scores[&0], 0.0);
        assert_eq!(scores[&1], 2.0);
        assert_eq!(scores[&2], 2.0);
    }

    #[test]
    fn test_betweenness_star_normalized() {
        let view = unweighted(4, &[(0, 1), (0, 2), (0, 3)], false);
        let scores = betweenness(&view, true).unwrap();
        assert!((scores[&0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_alpha_centrality() {
        let view = unweighted(3, &[(0, 1), (1, 2)], true);
        let config = AlphaCentralityConfig {
            damping_factor: 0.5,
            ..Default::default()
        };
        let scores = alpha_centrality(&view, config).unwrap();
        assert!((scores[&0] - 1.0).abs() < 1e-9);
        assert!((scores[&1] - 1.5).abs() < 1e-9);
        assert!((scores[&2] - 1.75).abs() < 1e-9);
    }
}
