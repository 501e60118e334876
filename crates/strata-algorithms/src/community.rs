//! Connectivity and clustering algorithms
//!
//! Weak components (union-find), strong components (Kosaraju), label propagation
//! and k-spanning-tree clustering all produce a [`Clustering`].

use super::common::{GraphView, NodeId};
use super::error::{illegal, AlgoResult};
use super::mst::kruskal_positions;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

/// Partition of the vertex set into disjoint clusters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clustering {
    /// Clusters ordered by their first vertex in snapshot order; members in snapshot order
    pub clusters: Vec<Vec<NodeId>>,
    /// Map of NodeId -> cluster index
    pub assignment: HashMap<NodeId, usize>,
}

impl Clustering {
    /// Group vertices by an arbitrary per-index label
    pub(crate) fn from_labels(view: &GraphView, labels: &[usize]) -> Self {
        let mut renumber: HashMap<usize, usize> = HashMap::new();
        let mut clusters: Vec<Vec<NodeId>> = Vec::new();
        let mut assignment = HashMap::with_capacity(view.node_count);
        for (idx, &label) in labels.iter().enumerate() {
            let next = renumber.len();
            let cluster = *renumber.entry(label).or_insert(next);
            if cluster == clusters.len() {
                clusters.push(Vec::new());
            }
            clusters[cluster].push(view.node(idx));
            assignment.insert(view.node(idx), cluster);
        }
        Clustering { clusters, assignment }
    }

    pub fn number_of_clusters(&self) -> usize {
        self.clusters.len()
    }

    pub fn cluster(&self, i: usize) -> Option<&[NodeId]> {
        self.clusters.get(i).map(Vec::as_slice)
    }
}

/// Union-Find data structure
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
    sets: usize,
}

impl UnionFind {
    pub(crate) fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
            sets: size,
        }
    }

    pub(crate) fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut curr = i;
        while self.parent[curr] != root {
            let next = self.parent[curr];
            self.parent[curr] = root;
            curr = next;
        }
        root
    }

    /// Merge the sets of `i` and `j`; false if they were already joined
    pub(crate) fn union(&mut self, i: usize, j: usize) -> bool {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i == root_j {
            return false;
        }
        if self.rank[root_i] < self.rank[root_j] {
            self.parent[root_i] = root_j;
        } else if self.rank[root_i] > self.rank[root_j] {
            self.parent[root_j] = root_i;
        } else {
            self.parent[root_j] = root_i;
            self.rank[root_i] += 1;
        }
        self.sets -= 1;
        true
    }

    pub(crate) fn sets(&self) -> usize {
        self.sets
    }

    pub(crate) fn labels(&mut self) -> Vec<usize> {
        (0..self.parent.len()).map(|i| self.find(i)).collect()
    }
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph.
/// Ignores edge direction.
pub fn weakly_connected_components(view: &GraphView) -> Clustering {
    let mut uf = UnionFind::new(view.node_count);
    for e in &view.edges {
        uf.union(e.source, e.target);
    }
    Clustering::from_labels(view, &uf.labels())
}

/// True for the empty graph and for graphs with a single weak component
pub fn is_weakly_connected(view: &GraphView) -> bool {
    weakly_connected_components(view).number_of_clusters() <= 1
}

/// Strongly Connected Components (Kosaraju)
///
/// On an undirected snapshot this coincides with the weak components.
pub fn strongly_connected_components(view: &GraphView) -> Clustering {
    let n = view.node_count;

    // First pass: finishing order of an iterative DFS over outgoing edges
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        let mut stack = vec![(root, 0usize)];
        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let succ = view.successors(node);
            if top.1 < succ.len() {
                let next = succ[top.1];
                top.1 += 1;
                if !visited[next] {
                    visited[next] = true;
                    stack.push((next, 0));
                }
            } else {
                order.push(node);
                stack.pop();
            }
        }
    }

    // Second pass: reverse finishing order over incoming edges
    let mut labels = vec![usize::MAX; n];
    let mut component = 0;
    for &root in order.iter().rev() {
        if labels[root] != usize::MAX {
            continue;
        }
        labels[root] = component;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for &prev in view.predecessors(node) {
                if labels[prev] == usize::MAX {
                    labels[prev] = component;
                    stack.push(prev);
                }
            }
        }
        component += 1;
    }

    Clustering::from_labels(view, &labels)
}

pub fn is_strongly_connected(view: &GraphView) -> bool {
    strongly_connected_components(view).number_of_clusters() <= 1
}

/// Label propagation configuration
#[derive(Debug, Clone)]
pub struct LabelPropagationConfig {
    /// Upper bound on sweeps, 0 for no bound
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for LabelPropagationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 0,
            seed: 17,
        }
    }
}

/// Label propagation community detection
///
/// Each sweep visits vertices in a seeded random order and adopts the most frequent
/// label among neighbours (direction ignored). A vertex keeps its label when that label
/// is among the most frequent; other ties are broken randomly.
pub fn label_propagation(view: &GraphView, config: LabelPropagationConfig) -> Clustering {
    let n = view.node_count;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut labels: Vec<usize> = (0..n).collect();
    let mut order: Vec<usize> = (0..n).collect();
    let mut iterations = 0;

    loop {
        if config.max_iterations > 0 && iterations >= config.max_iterations {
            break;
        }
        iterations += 1;
        order.shuffle(&mut rng);

        let mut changed = false;
        for &v in &order {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            for (u, _) in view.incident(v) {
                if u != v {
                    *counts.entry(labels[u]).or_insert(0) += 1;
                }
            }
            let Some(&best) = counts.values().max() else {
                continue;
            };
            if counts.get(&labels[v]) == Some(&best) {
                continue;
            }
            let mut candidates: Vec<usize> = counts
                .iter()
                .filter(|(_, &c)| c == best)
                .map(|(&l, _)| l)
                .collect();
            candidates.sort_unstable();
            if let Some(&label) = candidates.choose(&mut rng) {
                labels[v] = label;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    Clustering::from_labels(view, &labels)
}

/// Clustering by removing the k-1 heaviest edges of a minimum spanning forest
///
/// Equivalent to running Kruskal until `k` components remain. A graph that already
/// has more than `k` components yields all of them.
pub fn k_spanning_tree_clustering(view: &GraphView, k: usize) -> AlgoResult<Clustering> {
    view.require_undirected("k-spanning-tree clustering")?;
    if k == 0 || k > view.node_count {
        return Err(illegal(format!(
            "k must be between 1 and the vertex count {}, got {}",
            view.node_count, k
        )));
    }
    let mut uf = UnionFind::new(view.node_count);
    for pos in kruskal_positions(view) {
        if uf.sets() <= k {
            break;
        }
        let e = view.edge(pos);
        uf.union(e.source, e.target);
    }
    Ok(Clustering::from_labels(view, &uf.labels()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{unweighted, view};

    #[test]
    fn test_wcc() {
        // Edges: 0->1, 2->3->4, 5 (isolated)
        let view = unweighted(6, &[(0, 1), (2, 3), (3, 4)], true);
        let result = weakly_connected_components(&view);

        assert_eq!(result.number_of_clusters(), 3);
        assert_eq!(result.clusters[0], vec![0, 1]);
        assert_eq!(result.clusters[1], vec![2, 3, 4]);
        assert_eq!(result.assignment[&5], 2);
        assert!(!is_weakly_connected(&view));
    }

    #[test]
    fn test_scc() {
        // 0 <-> 1 -> 2 <-> 3, 4 alone
        let view = unweighted(5, &[(0, 1), (1, 0), (1, 2), (2, 3), (3, 2)], true);
        let result = strongly_connected_components(&view);
        assert_eq!(result.number_of_clusters(), 3);
        assert_eq!(result.assignment[&0], result.assignment[&1]);
        assert_eq!(result.assignment[&2], result.assignment[&3]);
        assert_ne!(result.assignment[&1], result.assignment[&2]);
        assert!(!is_strongly_connected(&view));
    }

    #[test]
    fn test_label_propagation_two_cliques() {
        let mut edges = Vec::new();
        for base in [0u64, 4] {
            for i in 0..4 {
                for j in (i + 1)..4 {
                    edges.push((base + i, base + j));
                }
            }
        }
        let view = unweighted(8, &edges, false);
        let result = label_propagation(&view, LabelPropagationConfig::default());
        assert_eq!(result.number_of_clusters(), 2);
        assert_eq!(result.clusters[0], vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_k_spanning_tree() {
        // path 0-1-2-3 with one heavy middle edge
        let view = view(4, &[(0, 1, 1.0), (1, 2, 10.0), (2, 3, 1.0)], false);
        let result = k_spanning_tree_clustering(&view, 2).unwrap();
        assert_eq!(result.clusters, vec![vec![0, 1], vec![2, 3]]);
        assert!(k_spanning_tree_clustering(&view, 5).is_err());
    }
}
