//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.
//! A [`GraphView`] is a snapshot: once built it never observes later mutations of the
//! graph it was projected from, so every result derived from it is immutable too.

use crate::error::{AlgoError, AlgoResult};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Node Identifier type (u64)
pub type NodeId = u64;

/// Edge Identifier type (u64)
pub type EdgeId = u64;

/// A single edge of the snapshot, stored once regardless of directedness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub id: EdgeId,
    /// Dense index of the source vertex
    pub source: usize,
    /// Dense index of the target vertex
    pub target: usize,
    pub weight: f64,
}

impl EdgeRecord {
    /// The endpoint of this edge that is not `idx`.
    pub fn opposite(&self, idx: usize) -> usize {
        if self.source == idx {
            self.target
        } else {
            self.source
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Undirected edges appear in the adjacency of both endpoints (a self-loop appears once),
/// and the incoming structure mirrors the outgoing one.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,
    /// Positions into `edges`, aligned with `out_targets`
    pub out_edges: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,
    /// Positions into `edges`, aligned with `in_sources`
    pub in_edges: Vec<usize>,

    /// Every edge exactly once, in the iteration order of the source graph
    pub edges: Vec<EdgeRecord>,
    /// Mapping from EdgeId to position in `edges`
    pub edge_to_index: HashMap<EdgeId, usize>,

    pub directed: bool,
    pub weighted: bool,
}

impl GraphView {
    /// Build a snapshot from a vertex list and an edge list of `(id, source, target, weight)`.
    ///
    /// Vertex order is preserved as the dense index order. Unweighted graphs have every
    /// weight forced to 1.0.
    pub fn build(
        nodes: Vec<NodeId>,
        edge_list: Vec<(EdgeId, NodeId, NodeId, f64)>,
        directed: bool,
        weighted: bool,
    ) -> AlgoResult<Self> {
        let node_count = nodes.len();
        let mut node_to_index = HashMap::with_capacity(node_count);
        for (idx, &node) in nodes.iter().enumerate() {
            if node_to_index.insert(node, idx).is_some() {
                return Err(AlgoError::IllegalArgument(format!(
                    "duplicate vertex {} in snapshot",
                    node
                )));
            }
        }

        let mut edges = Vec::with_capacity(edge_list.len());
        let mut edge_to_index = HashMap::with_capacity(edge_list.len());
        for (id, source, target, weight) in edge_list {
            let s = *node_to_index
                .get(&source)
                .ok_or(AlgoError::NoSuchVertex(source))?;
            let t = *node_to_index
                .get(&target)
                .ok_or(AlgoError::NoSuchVertex(target))?;
            edge_to_index.insert(id, edges.len());
            edges.push(EdgeRecord {
                id,
                source: s,
                target: t,
                weight: if weighted { weight } else { 1.0 },
            });
        }

        // Temp adjacency, flattened below
        let mut outgoing: Vec<Vec<(usize, usize)>> = vec![Vec::new(); node_count];
        let mut incoming: Vec<Vec<(usize, usize)>> = vec![Vec::new(); node_count];
        for (pos, e) in edges.iter().enumerate() {
            outgoing[e.source].push((e.target, pos));
            incoming[e.target].push((e.source, pos));
            if !directed && !e.is_self_loop() {
                outgoing[e.target].push((e.source, pos));
                incoming[e.source].push((e.target, pos));
            }
        }

        let (out_offsets, out_targets, out_edges) = flatten(outgoing);
        let (in_offsets, in_sources, in_edges) = flatten(incoming);

        Ok(GraphView {
            node_count,
            index_to_node: nodes,
            node_to_index,
            out_offsets,
            out_targets,
            out_edges,
            in_offsets,
            in_sources,
            in_edges,
            edges,
            edge_to_index,
            directed,
            weighted,
        })
    }

    /// Dense index of a node, or `NoSuchVertex`
    pub fn index_of(&self, node: NodeId) -> AlgoResult<usize> {
        self.node_to_index
            .get(&node)
            .copied()
            .ok_or(AlgoError::NoSuchVertex(node))
    }

    /// NodeId of a dense index
    pub fn node(&self, idx: usize) -> NodeId {
        self.index_to_node[idx]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, pos: usize) -> &EdgeRecord {
        &self.edges[pos]
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Degree where an undirected self-loop counts twice
    pub fn degree(&self, idx: usize) -> usize {
        if self.directed {
            self.out_degree(idx) + self.in_degree(idx)
        } else {
            let loops = self
                .out_edge_positions(idx)
                .iter()
                .filter(|&&p| self.edges[p].is_self_loop())
                .count();
            self.out_degree(idx) + loops
        }
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Edge positions aligned with [`successors`](Self::successors)
    pub fn out_edge_positions(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_edges[start..end]
    }

    /// Edge positions aligned with [`predecessors`](Self::predecessors)
    pub fn in_edge_positions(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_edges[start..end]
    }

    /// `(neighbor, edge position)` pairs following edge direction
    pub fn out_neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.successors(idx)
            .iter()
            .copied()
            .zip(self.out_edge_positions(idx).iter().copied())
    }

    /// `(neighbor, edge position)` pairs against edge direction
    pub fn in_neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.predecessors(idx)
            .iter()
            .copied()
            .zip(self.in_edge_positions(idx).iter().copied())
    }

    /// `(neighbor, edge position)` pairs ignoring direction
    pub fn incident(&self, idx: usize) -> Box<dyn Iterator<Item = (usize, usize)> + '_> {
        if self.directed {
            Box::new(self.out_neighbors(idx).chain(
                self.in_neighbors(idx)
                    .filter(move |&(_, p)| !self.edges[p].is_self_loop()),
            ))
        } else {
            Box::new(self.out_neighbors(idx))
        }
    }

    /// Weight of the edge at `pos`
    pub fn weight(&self, pos: usize) -> f64 {
        self.edges[pos].weight
    }

    /// Get weights for outgoing edges of a node
    pub fn weights(&self, idx: usize) -> Vec<f64> {
        self.out_edge_positions(idx)
            .iter()
            .map(|&p| self.edges[p].weight)
            .collect()
    }

    pub fn has_negative_weight(&self) -> bool {
        self.edges.iter().any(|e| e.weight < 0.0)
    }

    pub fn require_undirected(&self, algorithm: &str) -> AlgoResult<()> {
        if self.directed {
            return Err(AlgoError::IllegalArgument(format!(
                "{} requires an undirected graph",
                algorithm
            )));
        }
        Ok(())
    }

    pub fn require_directed(&self, algorithm: &str) -> AlgoResult<()> {
        if !self.directed {
            return Err(AlgoError::IllegalArgument(format!(
                "{} requires a directed graph",
                algorithm
            )));
        }
        Ok(())
    }

    pub fn require_weighted(&self, algorithm: &str) -> AlgoResult<()> {
        if !self.weighted {
            return Err(AlgoError::IllegalArgument(format!(
                "{} requires a weighted graph",
                algorithm
            )));
        }
        Ok(())
    }

    pub fn require_non_negative_weights(&self, algorithm: &str) -> AlgoResult<()> {
        if let Some(e) = self.edges.iter().find(|e| e.weight < 0.0) {
            return Err(AlgoError::IllegalArgument(format!(
                "{} requires non-negative edge weights, edge {} has weight {}",
                algorithm, e.id, e.weight
            )));
        }
        Ok(())
    }

    pub fn require_no_self_loops(&self, algorithm: &str) -> AlgoResult<()> {
        if let Some(e) = self.edges.iter().find(|e| e.is_self_loop()) {
            return Err(AlgoError::IllegalArgument(format!(
                "{} requires a graph without self-loops, edge {} is a self-loop",
                algorithm, e.id
            )));
        }
        Ok(())
    }

    /// Cheapest edge position between `u` and `v`, following direction when directed
    pub fn min_edge_between(&self, u: usize, v: usize) -> Option<usize> {
        self.out_neighbors(u)
            .filter(|&(t, _)| t == v)
            .map(|(_, p)| p)
            .min_by(|&a, &b| self.weight(a).total_cmp(&self.weight(b)))
    }
}

fn flatten(adjacency: Vec<Vec<(usize, usize)>>) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
    let mut offsets = Vec::with_capacity(adjacency.len() + 1);
    let mut targets = Vec::new();
    let mut edges = Vec::new();
    offsets.push(0);
    for row in adjacency {
        for (t, p) in row {
            targets.push(t);
            edges.push(p);
        }
        offsets.push(targets.len());
    }
    (offsets, targets, edges)
}

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    /// Visited vertices, `source` first and `target` last
    pub path: Vec<NodeId>,
    /// Traversed edges, one fewer than `path`
    pub edges: Vec<EdgeId>,
    pub cost: f64,
}

impl PathResult {
    /// Reconstruct a path from a predecessor table indexed by dense vertex index.
    pub(crate) fn from_predecessors(
        view: &GraphView,
        source_idx: usize,
        target_idx: usize,
        pred: &[Option<usize>],
        cost: f64,
    ) -> Self {
        let mut vertices = vec![view.node(target_idx)];
        let mut edges = Vec::new();
        let mut curr = target_idx;
        while curr != source_idx {
            let Some(pos) = pred[curr] else { break };
            let e = view.edge(pos);
            edges.push(e.id);
            curr = e.opposite(curr);
            vertices.push(view.node(curr));
        }
        vertices.reverse();
        edges.reverse();
        PathResult {
            source: view.node(source_idx),
            target: view.node(target_idx),
            path: vertices,
            edges,
            cost,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Wall-clock budget for long-running algorithms
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    /// A budget of `None` never expires
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn check(&self) -> AlgoResult<()> {
        match self.budget {
            Some(budget) if self.started.elapsed() > budget => Err(AlgoError::Timeout(budget)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a view over vertices `0..n` with edge ids assigned in list order.
    pub fn view(n: u64, edges: &[(u64, u64, f64)], directed: bool) -> GraphView {
        let list = edges
            .iter()
            .enumerate()
            .map(|(i, &(s, t, w))| (i as u64, s, t, w))
            .collect();
        GraphView::build((0..n).collect(), list, directed, true).unwrap()
    }

    pub fn unweighted(n: u64, edges: &[(u64, u64)], directed: bool) -> GraphView {
        let list = edges
            .iter()
            .enumerate()
            .map(|(i, &(s, t))| (i as u64, s, t, 1.0))
            .collect();
        GraphView::build((0..n).collect(), list, directed, false).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_undirected_adjacency_is_mirrored() {
        let v = view(3, &[(0, 1, 2.0), (1, 2, 3.0), (2, 2, 1.0)], false);
        assert_eq!(v.successors(1), &[0, 2]);
        assert_eq!(v.predecessors(1), &[0, 2]);
        // self-loop is listed once but counts twice in the degree
        assert_eq!(v.out_degree(2), 2);
        assert_eq!(v.degree(2), 3);
    }

    #[test]
    fn test_directed_csr() {
        let v = view(3, &[(0, 1, 1.0), (0, 2, 5.0), (2, 1, 1.0)], true);
        assert_eq!(v.successors(0), &[1, 2]);
        assert_eq!(v.predecessors(1), &[0, 2]);
        assert_eq!(v.weights(0), vec![1.0, 5.0]);
        assert_eq!(v.degree(1), 2);
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let err = GraphView::build(vec![1, 2], vec![(0, 1, 3, 1.0)], true, true).unwrap_err();
        assert_eq!(err, AlgoError::NoSuchVertex(3));
    }

    #[test]
    fn test_unweighted_forces_unit_weight() {
        let v = GraphView::build(vec![1, 2], vec![(7, 1, 2, 9.0)], true, false).unwrap();
        assert_eq!(v.weight(0), 1.0);
        assert_eq!(v.edge_to_index[&7], 0);
    }
}
