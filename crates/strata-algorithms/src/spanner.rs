//! Graph spanners
//!
//! The greedy multiplicative spanner of Althöfer et al.: scan edges by increasing
//! weight and keep an edge only when the spanner built so far has no path between its
//! endpoints within `2k - 1` times its weight.

use super::common::{EdgeId, GraphView};
use super::error::{illegal, AlgoResult};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpannerResult {
    pub weight: f64,
    pub edges: Vec<EdgeId>,
}

#[derive(Copy, Clone, PartialEq)]
struct Entry {
    cost: f64,
    node: usize,
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Is `target` reachable from `source` over `adjacency` with total cost at most `bound`
fn within(adjacency: &[Vec<(usize, f64)>], source: usize, target: usize, bound: f64) -> bool {
    let mut dist = vec![f64::INFINITY; adjacency.len()];
    let mut heap = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(Entry { cost: 0.0, node: source });
    while let Some(Entry { cost, node }) = heap.pop() {
        if node == target {
            return true;
        }
        if cost > dist[node] {
            continue;
        }
        for &(next, w) in &adjacency[node] {
            let next_cost = cost + w;
            if next_cost <= bound && next_cost < dist[next] {
                dist[next] = next_cost;
                heap.push(Entry { cost: next_cost, node: next });
            }
        }
    }
    false
}

/// Greedy `(2k - 1)`-spanner of an undirected graph with non-negative weights
pub fn greedy_multiplicative(view: &GraphView, k: usize) -> AlgoResult<SpannerResult> {
    view.require_undirected("greedy multiplicative spanner")?;
    view.require_non_negative_weights("greedy multiplicative spanner")?;
    if k == 0 {
        return Err(illegal("spanner stretch parameter k must be at least 1"));
    }
    let stretch = (2 * k - 1) as f64;
    let mut positions: Vec<usize> = (0..view.edge_count())
        .filter(|&p| !view.edge(p).is_self_loop())
        .collect();
    positions.sort_by(|&a, &b| view.weight(a).total_cmp(&view.weight(b)).then(a.cmp(&b)));

    let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); view.node_count];
    let mut chosen = Vec::new();
    for pos in positions {
        let e = view.edge(pos);
        let w = view.weight(pos);
        if within(&adjacency, e.source, e.target, stretch * w) {
            continue;
        }
        adjacency[e.source].push((e.target, w));
        adjacency[e.target].push((e.source, w));
        chosen.push(pos);
    }
    debug!(k, edges = chosen.len(), "greedy spanner finished");
    Ok(SpannerResult {
        weight: chosen.iter().map(|&p| view.weight(p)).sum(),
        edges: chosen.into_iter().map(|p| view.edge(p).id).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{unweighted, view};
    use crate::error::AlgoError;

    #[test]
    fn test_stretch_one_keeps_shortest_paths() {
        // the 0-2 shortcut is longer than the detour through 1, so k = 1 drops it
        let g = view(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 3.0)], false);
        let s = greedy_multiplicative(&g, 1).unwrap();
        assert_eq!(s.edges, vec![0, 1]);
        assert_eq!(s.weight, 2.0);
        // but an equal-length shortcut stays out too
        let tie = view(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 2.0)], false);
        assert_eq!(greedy_multiplicative(&tie, 1).unwrap().edges.len(), 2);
    }

    #[test]
    fn test_complete_graph_becomes_a_star_for_k_two() {
        let mut edges = Vec::new();
        for i in 0..5 {
            for j in (i + 1)..5 {
                edges.push((i, j));
            }
        }
        let g = unweighted(5, &edges, false);
        let s = greedy_multiplicative(&g, 2).unwrap();
        // every later edge is closed by a path of length at most 3 through vertex 0
        assert_eq!(s.edges, vec![0, 1, 2, 3]);
        // k = 1 keeps the whole graph
        assert_eq!(greedy_multiplicative(&g, 1).unwrap().edges.len(), 10);
    }

    #[test]
    fn test_invalid_input() {
        let g = view(2, &[(0, 1, 1.0)], false);
        assert!(matches!(greedy_multiplicative(&g, 0), Err(AlgoError::IllegalArgument(_))));
        let directed = view(2, &[(0, 1, 1.0)], true);
        assert!(greedy_multiplicative(&directed, 2).is_err());
        let negative = view(2, &[(0, 1, -1.0)], false);
        assert!(greedy_multiplicative(&negative, 2).is_err());
    }
}
