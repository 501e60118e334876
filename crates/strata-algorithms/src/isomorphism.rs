//! Graph isomorphism and induced subgraph isomorphism (VF2 state space search)
//!
//! Mappings are produced lazily: [`Vf2Mappings`] resumes the search on every `next`.

use super::common::{EdgeId, GraphView, NodeId};
use super::error::{illegal, AlgoResult};
use std::collections::HashMap;
use std::sync::Arc;

/// A vertex and edge correspondence between two graphs
#[derive(Debug, Clone, PartialEq)]
pub struct GraphMapping {
    vertices_forward: HashMap<NodeId, NodeId>,
    vertices_backward: HashMap<NodeId, NodeId>,
    edges_forward: HashMap<EdgeId, EdgeId>,
    edges_backward: HashMap<EdgeId, EdgeId>,
}

impl GraphMapping {
    /// Image of `vertex` of the first graph (`forward`) or preimage of a vertex of the second
    pub fn vertex_correspondence(&self, vertex: NodeId, forward: bool) -> Option<NodeId> {
        let map = if forward { &self.vertices_forward } else { &self.vertices_backward };
        map.get(&vertex).copied()
    }

    pub fn edge_correspondence(&self, edge: EdgeId, forward: bool) -> Option<EdgeId> {
        let map = if forward { &self.edges_forward } else { &self.edges_backward };
        map.get(&edge).copied()
    }

    /// Vertex pairs of the forward direction, sorted by first graph vertex
    pub fn vertex_pairs(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs: Vec<_> = self.vertices_forward.iter().map(|(&a, &b)| (a, b)).collect();
        pairs.sort_unstable();
        pairs
    }
}

/// Edge multiplicity between ordered pairs of dense indices; undirected pairs stored both ways
fn adjacency(view: &GraphView) -> HashMap<(usize, usize), Vec<usize>> {
    let mut adj: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (pos, e) in view.edges.iter().enumerate() {
        adj.entry((e.source, e.target)).or_default().push(pos);
        if !view.directed && !e.is_self_loop() {
            adj.entry((e.target, e.source)).or_default().push(pos);
        }
    }
    adj
}

/// Lazy enumeration of mappings from a pattern graph into a target graph
pub struct Vf2Mappings {
    pattern: Arc<GraphView>,
    target: Arc<GraphView>,
    pattern_adj: HashMap<(usize, usize), Vec<usize>>,
    target_adj: HashMap<(usize, usize), Vec<usize>>,
    /// Whole-graph isomorphism, otherwise induced subgraph
    exact: bool,
    /// The caller's first graph is the target (subgraph mode)
    swapped: bool,
    core_pattern: Vec<Option<usize>>,
    core_target: Vec<Option<usize>>,
    cursor: Vec<usize>,
    depth: usize,
    done: bool,
}

impl Vf2Mappings {
    fn new(pattern: Arc<GraphView>, target: Arc<GraphView>, exact: bool, swapped: bool) -> Self {
        let n1 = pattern.node_count;
        let n2 = target.node_count;
        let impossible = if exact {
            n1 != n2 || pattern.edge_count() != target.edge_count()
        } else {
            n1 > n2
        };
        Vf2Mappings {
            pattern_adj: adjacency(&pattern),
            target_adj: adjacency(&target),
            pattern,
            target,
            exact,
            swapped,
            core_pattern: vec![None; n1],
            core_target: vec![None; n2],
            cursor: vec![0; n1 + 1],
            depth: 0,
            done: impossible,
        }
    }

    fn count(adj: &HashMap<(usize, usize), Vec<usize>>, a: usize, b: usize) -> usize {
        adj.get(&(a, b)).map_or(0, Vec::len)
    }

    fn compatible(&self, a: usize, b: usize) -> bool {
        if self.exact {
            a == b
        } else {
            a <= b
        }
    }

    /// Unmapped neighbours split into (adjacent to the mapped core, untouched)
    fn frontier(view: &GraphView, core: &[Option<usize>], v: usize) -> (usize, usize) {
        let mut terminal = 0;
        let mut fresh = 0;
        for (u, _) in view.incident(v) {
            if u == v || core[u].is_some() {
                continue;
            }
            if view.incident(u).any(|(w, _)| core[w].is_some()) {
                terminal += 1;
            } else {
                fresh += 1;
            }
        }
        (terminal, fresh)
    }

    fn feasible(&self, u: usize, c: usize) -> bool {
        let (p, t) = (&self.pattern, &self.target);
        if Self::count(&self.pattern_adj, u, u) != Self::count(&self.target_adj, c, c) {
            return false;
        }
        if !self.compatible(p.out_degree(u), t.out_degree(c)) || !self.compatible(p.in_degree(u), t.in_degree(c)) {
            return false;
        }
        for (u2, mapped) in self.core_pattern.iter().enumerate() {
            let Some(c2) = *mapped else { continue };
            if Self::count(&self.pattern_adj, u, u2) != Self::count(&self.target_adj, c, c2)
                || Self::count(&self.pattern_adj, u2, u) != Self::count(&self.target_adj, c2, c)
            {
                return false;
            }
        }
        let (pt, pf) = Self::frontier(p, &self.core_pattern, u);
        let (tt, tf) = Self::frontier(t, &self.core_target, c);
        self.compatible(pt, tt) && self.compatible(pf, tf)
    }

    fn backtrack(&mut self) {
        if self.depth == 0 {
            self.done = true;
            return;
        }
        self.depth -= 1;
        if let Some(c) = self.core_pattern[self.depth].take() {
            self.core_target[c] = None;
        }
    }

    fn build(&self) -> GraphMapping {
        let (p, t) = (&self.pattern, &self.target);
        let mut vertices = HashMap::with_capacity(p.node_count);
        for (u, c) in self.core_pattern.iter().enumerate() {
            if let Some(c) = c {
                vertices.insert(p.node(u), t.node(*c));
            }
        }
        let mut edges = HashMap::with_capacity(p.edge_count());
        let mut taken: HashMap<(usize, usize), usize> = HashMap::new();
        for e in &p.edges {
            let (Some(a), Some(b)) = (self.core_pattern[e.source], self.core_pattern[e.target]) else {
                continue;
            };
            let slot = taken.entry((a, b)).or_insert(0);
            if let Some(&pos) = self.target_adj.get(&(a, b)).and_then(|list| list.get(*slot)) {
                edges.insert(e.id, t.edge(pos).id);
                *slot += 1;
            }
        }
        let invert = |m: &HashMap<u64, u64>| m.iter().map(|(&k, &v)| (v, k)).collect::<HashMap<_, _>>();
        let (vf, vb) = (invert(&vertices), vertices);
        let (ef, eb) = (invert(&edges), edges);
        if self.swapped {
            GraphMapping {
                vertices_forward: vf,
                vertices_backward: vb,
                edges_forward: ef,
                edges_backward: eb,
            }
        } else {
            GraphMapping {
                vertices_forward: vb,
                vertices_backward: vf,
                edges_forward: eb,
                edges_backward: ef,
            }
        }
    }
}

impl Iterator for Vf2Mappings {
    type Item = GraphMapping;

    fn next(&mut self) -> Option<GraphMapping> {
        let n1 = self.pattern.node_count;
        let n2 = self.target.node_count;
        while !self.done {
            let d = self.depth;
            if d == n1 {
                let mapping = self.build();
                self.backtrack();
                return Some(mapping);
            }
            let mut placed = false;
            while self.cursor[d] < n2 {
                let c = self.cursor[d];
                self.cursor[d] += 1;
                if self.core_target[c].is_none() && self.feasible(d, c) {
                    self.core_pattern[d] = Some(c);
                    self.core_target[c] = Some(d);
                    self.depth += 1;
                    self.cursor[self.depth] = 0;
                    placed = true;
                    break;
                }
            }
            if !placed {
                self.backtrack();
            }
        }
        None
    }
}

fn same_kind(g1: &GraphView, g2: &GraphView) -> AlgoResult<()> {
    if g1.directed != g2.directed {
        return Err(illegal("graphs must both be directed or both be undirected"));
    }
    Ok(())
}

/// All isomorphisms from `g1` onto `g2`
pub fn vf2_isomorphism(g1: Arc<GraphView>, g2: Arc<GraphView>) -> AlgoResult<Vf2Mappings> {
    same_kind(&g1, &g2)?;
    Ok(Vf2Mappings::new(g1, g2, true, false))
}

/// All isomorphisms between `g2` and induced subgraphs of `g1`. Forward correspondences
/// map `g1` to `g2` and are partial.
pub fn vf2_subgraph_isomorphism(g1: Arc<GraphView>, g2: Arc<GraphView>) -> AlgoResult<Vf2Mappings> {
    same_kind(&g1, &g2)?;
    Ok(Vf2Mappings::new(g2, g1, false, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(ids: [u64; 4]) -> Arc<GraphView> {
        let edges = (0..4)
            .map(|i| (i as u64, ids[i], ids[(i + 1) % 4], 1.0))
            .collect();
        Arc::new(GraphView::build(ids.to_vec(), edges, false, false).unwrap())
    }

    #[test]
    fn test_square_automorphisms() {
        let mut it = vf2_isomorphism(square([0, 1, 2, 3]), square([5, 6, 7, 8])).unwrap();
        let first = it.next().unwrap();
        assert_eq!(first.vertex_pairs(), vec![(0, 5), (1, 6), (2, 7), (3, 8)]);
        assert_eq!(first.vertex_correspondence(6, false), Some(1));
        for e in 0..4 {
            assert_eq!(first.edge_correspondence(e, true), Some(e));
        }
        let second = it.next().unwrap();
        assert_eq!(second.vertex_pairs(), vec![(0, 5), (1, 8), (2, 7), (3, 6)]);
        assert_eq!(second.edge_correspondence(0, true), Some(3));
        assert_eq!(it.count(), 6);
    }

    #[test]
    fn test_non_isomorphic() {
        let path = Arc::new(
            GraphView::build(vec![0, 1, 2, 3], vec![(0, 0, 1, 1.0), (1, 1, 2, 1.0), (2, 2, 3, 1.0), (3, 1, 3, 1.0)], false, false)
                .unwrap(),
        );
        let mut it = vf2_isomorphism(square([0, 1, 2, 3]), path).unwrap();
        assert!(it.next().is_none());
    }

    #[test]
    fn test_induced_subgraph() {
        // a triangle with a pendant contains an induced path of length two but no induced square
        let host = Arc::new(
            GraphView::build(vec![0, 1, 2, 3], vec![(0, 0, 1, 1.0), (1, 1, 2, 1.0), (2, 2, 0, 1.0), (3, 2, 3, 1.0)], false, false)
                .unwrap(),
        );
        let path = Arc::new(GraphView::build(vec![7, 8, 9], vec![(0, 7, 8, 1.0), (1, 8, 9, 1.0)], false, false).unwrap());
        let mappings: Vec<GraphMapping> = vf2_subgraph_isomorphism(host.clone(), path).unwrap().collect();
        // middle vertex 8 must land on 2, the ends on {0 or 1} and 3
        assert_eq!(mappings.len(), 4);
        for m in &mappings {
            assert_eq!(m.vertex_correspondence(8, false), Some(2));
            assert_eq!(m.vertex_correspondence(2, true), Some(8));
        }
        assert_eq!(vf2_subgraph_isomorphism(host, square([5, 6, 7, 8])).unwrap().count(), 0);
    }

    #[test]
    fn test_direction_mismatch() {
        let directed = Arc::new(GraphView::build(vec![0], vec![], true, false).unwrap());
        let undirected = Arc::new(GraphView::build(vec![0], vec![], false, false).unwrap());
        assert!(vf2_isomorphism(directed, undirected).is_err());
    }
}
