//! Minimum Spanning Tree algorithms
//!
//! Kruskal, Prim and Boruvka. All three are defined on undirected graphs only and
//! return a minimum spanning forest when the graph is disconnected.

use super::common::{EdgeId, GraphView};
use super::community::UnionFind;
use super::error::AlgoResult;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MSTResult {
    /// Sum over all components
    pub total_weight: f64,
    pub edges: Vec<EdgeId>,
}

impl MSTResult {
    fn from_positions(view: &GraphView, positions: Vec<usize>) -> Self {
        let total_weight = positions.iter().map(|&p| view.weight(p)).sum();
        MSTResult {
            total_weight,
            edges: positions.into_iter().map(|p| view.edge(p).id).collect(),
        }
    }
}

#[derive(Copy, Clone, PartialEq)]
struct EdgeState {
    weight: f64,
    pos: usize,
    target: usize,
}

impl Eq for EdgeState {}

impl Ord for EdgeState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for EdgeState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Edge positions sorted by (weight, position)
pub(crate) fn kruskal_positions(view: &GraphView) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..view.edge_count()).collect();
    positions.sort_by(|&a, &b| view.weight(a).total_cmp(&view.weight(b)).then(a.cmp(&b)));
    positions
}

/// Kruskal's Algorithm for Minimum Spanning Forest
pub fn kruskal(view: &GraphView) -> AlgoResult<MSTResult> {
    view.require_undirected("Kruskal")?;
    let mut uf = UnionFind::new(view.node_count);
    let mut chosen = Vec::new();
    for pos in kruskal_positions(view) {
        let e = view.edge(pos);
        if uf.union(e.source, e.target) {
            chosen.push(pos);
        }
    }
    debug!(edges = chosen.len(), "kruskal finished");
    Ok(MSTResult::from_positions(view, chosen))
}

/// Prim's Algorithm for Minimum Spanning Forest
///
/// Grows a tree from the first unvisited vertex (in snapshot order) of every component.
pub fn prim(view: &GraphView) -> AlgoResult<MSTResult> {
    view.require_undirected("Prim")?;
    let n = view.node_count;
    let mut visited = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut chosen = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        add_edges(view, root, &mut heap, &visited);

        while let Some(EdgeState { pos, target, .. }) = heap.pop() {
            if visited[target] {
                continue;
            }
            visited[target] = true;
            chosen.push(pos);
            add_edges(view, target, &mut heap, &visited);
        }
    }

    Ok(MSTResult::from_positions(view, chosen))
}

fn add_edges(view: &GraphView, u: usize, heap: &mut BinaryHeap<EdgeState>, visited: &[bool]) {
    for (v, pos) in view.out_neighbors(u) {
        if !visited[v] {
            heap.push(EdgeState {
                weight: view.weight(pos),
                pos,
                target: v,
            });
        }
    }
}

/// Boruvka's Algorithm for Minimum Spanning Forest
///
/// Ties are broken by edge position, which keeps every round cycle free.
pub fn boruvka(view: &GraphView) -> AlgoResult<MSTResult> {
    view.require_undirected("Boruvka")?;
    let n = view.node_count;
    let mut uf = UnionFind::new(n);
    let mut chosen = Vec::new();
    let lighter = |a: usize, b: usize| {
        view.weight(a)
            .total_cmp(&view.weight(b))
            .then(a.cmp(&b))
            == Ordering::Less
    };

    loop {
        let mut cheapest: Vec<Option<usize>> = vec![None; n];
        for (pos, e) in view.edges.iter().enumerate() {
            let a = uf.find(e.source);
            let b = uf.find(e.target);
            if a == b {
                continue;
            }
            for root in [a, b] {
                match cheapest[root] {
                    Some(curr) if !lighter(pos, curr) => {}
                    _ => cheapest[root] = Some(pos),
                }
            }
        }

        let mut merged = false;
        for pos in cheapest.into_iter().flatten() {
            let e = view.edge(pos);
            if uf.union(e.source, e.target) {
                chosen.push(pos);
                merged = true;
            }
        }
        if !merged {
            break;
        }
    }

    Ok(MSTResult::from_positions(view, chosen))
}
