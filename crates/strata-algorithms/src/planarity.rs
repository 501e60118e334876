//! Left-right planarity test with embedding construction
//!
//! Edge direction is ignored. Parallel edges and self-loops never affect planarity;
//! in the embedding, parallel edges sit next to each other and self-loops are listed
//! once after the other edges of their vertex.

use super::common::{EdgeId, GraphView, NodeId};
use std::collections::HashMap;
use tracing::debug;

/// Cyclic clockwise order of edges around every vertex
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarEmbedding {
    around: HashMap<NodeId, Vec<EdgeId>>,
}

impl PlanarEmbedding {
    pub fn edges_around(&self, vertex: NodeId) -> Option<&[EdgeId]> {
        self.around.get(&vertex).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanarityResult {
    pub is_planar: bool,
    /// Present exactly when the graph is planar
    pub embedding: Option<PlanarEmbedding>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Interval {
    low: Option<usize>,
    high: Option<usize>,
}

impl Interval {
    fn is_empty(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ConflictPair {
    left: Interval,
    right: Interval,
}

impl ConflictPair {
    fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}

/// Rotation system under construction: `links[v][w] = (clockwise, counterclockwise)` neighbours
struct Rotation {
    first: Vec<Option<usize>>,
    links: Vec<HashMap<usize, (usize, usize)>>,
}

impl Rotation {
    fn new(n: usize) -> Self {
        Rotation {
            first: vec![None; n],
            links: vec![HashMap::new(); n],
        }
    }

    fn add_cw(&mut self, v: usize, w: usize, reference: Option<usize>) {
        match reference.and_then(|r| self.links[v].get(&r).map(|&(cw, _)| (r, cw))) {
            None => {
                self.links[v].insert(w, (w, w));
                self.first[v] = Some(w);
            }
            Some((r, cw_ref)) => {
                self.links[v].insert(w, (cw_ref, r));
                if let Some(link) = self.links[v].get_mut(&r) {
                    link.0 = w;
                }
                if let Some(link) = self.links[v].get_mut(&cw_ref) {
                    link.1 = w;
                }
            }
        }
    }

    fn add_ccw(&mut self, v: usize, w: usize, reference: Option<usize>) {
        let Some((_, ccw_ref)) = reference.and_then(|r| self.links[v].get(&r).copied()) else {
            self.add_cw(v, w, None);
            return;
        };
        self.add_cw(v, w, Some(ccw_ref));
        if self.first[v] == reference {
            self.first[v] = Some(w);
        }
    }

    fn add_first(&mut self, v: usize, w: usize) {
        let reference = self.first[v];
        self.add_ccw(v, w, reference);
    }

    fn clockwise(&self, v: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let Some(start) = self.first[v] else { return order };
        let mut curr = start;
        loop {
            order.push(curr);
            match self.links[v].get(&curr) {
                Some(&(next, _)) if next != start && order.len() <= self.links[v].len() => curr = next,
                _ => break,
            }
        }
        order
    }
}

/// Working state of the left-right algorithm over the simple underlying graph.
/// Oriented edges are numbered in creation order; `tail`/`head` give their endpoints.
struct LrState {
    adj: Vec<Vec<usize>>,
    height: Vec<usize>,
    parent_edge: Vec<Option<usize>>,
    roots: Vec<usize>,
    tail: Vec<usize>,
    head: Vec<usize>,
    oriented: HashMap<(usize, usize), usize>,
    out: Vec<Vec<usize>>,
    ordered: Vec<Vec<usize>>,
    lowpt: Vec<usize>,
    lowpt2: Vec<usize>,
    nesting: Vec<i64>,
    refs: Vec<Option<usize>>,
    side: Vec<i64>,
    lowpt_edge: Vec<usize>,
    stack_bottom: Vec<usize>,
    stack: Vec<ConflictPair>,
}

const UNVISITED: usize = usize::MAX;

impl LrState {
    fn new(adj: Vec<Vec<usize>>) -> Self {
        let n = adj.len();
        LrState {
            adj,
            height: vec![UNVISITED; n],
            parent_edge: vec![None; n],
            roots: Vec::new(),
            tail: Vec::new(),
            head: Vec::new(),
            oriented: HashMap::new(),
            out: vec![Vec::new(); n],
            ordered: vec![Vec::new(); n],
            lowpt: Vec::new(),
            lowpt2: Vec::new(),
            nesting: Vec::new(),
            refs: Vec::new(),
            side: Vec::new(),
            lowpt_edge: Vec::new(),
            stack_bottom: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn orient(&mut self, v: usize, w: usize) -> usize {
        let e = self.tail.len();
        self.tail.push(v);
        self.head.push(w);
        self.oriented.insert((v, w), e);
        self.out[v].push(e);
        self.lowpt.push(self.height[v]);
        self.lowpt2.push(self.height[v]);
        self.nesting.push(0);
        self.refs.push(None);
        self.side.push(1);
        self.lowpt_edge.push(e);
        self.stack_bottom.push(0);
        e
    }

    /// Nesting depth of `vw` and its contribution to the lowpoints of the parent edge of `v`
    fn finish_orientation(&mut self, v: usize, vw: usize) {
        self.nesting[vw] = 2 * self.lowpt[vw] as i64;
        if self.lowpt2[vw] < self.height[v] {
            // chordal
            self.nesting[vw] += 1;
        }
        if let Some(e) = self.parent_edge[v] {
            if self.lowpt[vw] < self.lowpt[e] {
                self.lowpt2[e] = self.lowpt[e].min(self.lowpt2[vw]);
                self.lowpt[e] = self.lowpt[vw];
            } else if self.lowpt[vw] > self.lowpt[e] {
                self.lowpt2[e] = self.lowpt2[e].min(self.lowpt[vw]);
            } else {
                self.lowpt2[e] = self.lowpt2[e].min(self.lowpt2[vw]);
            }
        }
    }

    /// DFS orienting every edge away from the root, computing heights and lowpoints
    fn orientation(&mut self, root: usize) {
        let n = self.adj.len();
        let mut cursor = vec![0usize; n];
        let mut resume: Vec<Option<usize>> = vec![None; n];
        let mut dfs = vec![root];
        while let Some(v) = dfs.pop() {
            if let Some(vw) = resume[v].take() {
                self.finish_orientation(v, vw);
                cursor[v] += 1;
            }
            while cursor[v] < self.adj[v].len() {
                let w = self.adj[v][cursor[v]];
                if self.oriented.contains_key(&(v, w)) || self.oriented.contains_key(&(w, v)) {
                    cursor[v] += 1;
                    continue;
                }
                let vw = self.orient(v, w);
                if self.height[w] == UNVISITED {
                    // tree edge
                    self.parent_edge[w] = Some(vw);
                    self.height[w] = self.height[v] + 1;
                    resume[v] = Some(vw);
                    dfs.push(v);
                    dfs.push(w);
                    break;
                }
                // back edge
                self.lowpt[vw] = self.height[w];
                self.finish_orientation(v, vw);
                cursor[v] += 1;
            }
        }
    }

    fn conflicting(&self, interval: &Interval, b: usize) -> bool {
        !interval.is_empty() && interval.high.is_some_and(|h| self.lowpt[h] > self.lowpt[b])
    }

    fn lowest(&self, pair: &ConflictPair) -> usize {
        match (pair.left.low, pair.right.low) {
            (Some(l), Some(r)) => self.lowpt[l].min(self.lowpt[r]),
            (Some(l), None) => self.lowpt[l],
            (None, Some(r)) => self.lowpt[r],
            (None, None) => UNVISITED,
        }
    }

    fn add_constraints(&mut self, ei: usize, e: usize) -> bool {
        let mut p = ConflictPair::default();
        // merge return edges of ei into the right interval
        while let Some(mut q) = self.stack.pop() {
            if !q.left.is_empty() {
                q.swap();
            }
            if !q.left.is_empty() {
                return false;
            }
            if let Some(q_low) = q.right.low {
                if self.lowpt[q_low] > self.lowpt[e] {
                    if p.right.is_empty() {
                        p.right = q.right;
                    } else if let Some(p_low) = p.right.low {
                        self.refs[p_low] = q.right.high;
                    }
                    p.right.low = q.right.low;
                } else {
                    self.refs[q_low] = Some(self.lowpt_edge[e]);
                }
            }
            if self.stack.len() == self.stack_bottom[ei] {
                break;
            }
        }

        // merge conflicting return edges of earlier siblings into the left interval
        while let Some(top) = self.stack.last() {
            if !(self.conflicting(&top.left, ei) || self.conflicting(&top.right, ei)) {
                break;
            }
            let Some(mut q) = self.stack.pop() else { break };
            if self.conflicting(&q.right, ei) {
                q.swap();
            }
            if self.conflicting(&q.right, ei) {
                return false;
            }
            if let Some(p_low) = p.right.low {
                self.refs[p_low] = q.right.high;
            }
            if q.right.low.is_some() {
                p.right.low = q.right.low;
            }
            if p.left.is_empty() {
                p.left = q.left;
            } else if let Some(p_low) = p.left.low {
                self.refs[p_low] = q.left.high;
            }
            p.left.low = q.left.low;
        }

        if !(p.left.is_empty() && p.right.is_empty()) {
            self.stack.push(p);
        }
        true
    }

    fn remove_back_edges(&mut self, e: usize) {
        let u = self.tail[e];
        // drop whole conflict pairs whose lowest return edge ends at u
        while let Some(top) = self.stack.last() {
            if self.lowest(top) != self.height[u] {
                break;
            }
            if let Some(p) = self.stack.pop() {
                if let Some(low) = p.left.low {
                    self.side[low] = -1;
                }
            }
        }

        if let Some(mut p) = self.stack.pop() {
            while let Some(high) = p.left.high {
                if self.head[high] != u {
                    break;
                }
                p.left.high = self.refs[high];
            }
            if p.left.high.is_none() {
                if let Some(low) = p.left.low.take() {
                    self.refs[low] = p.right.low;
                    self.side[low] = -1;
                }
            }
            while let Some(high) = p.right.high {
                if self.head[high] != u {
                    break;
                }
                p.right.high = self.refs[high];
            }
            if p.right.high.is_none() {
                if let Some(low) = p.right.low.take() {
                    self.refs[low] = p.left.low;
                    self.side[low] = -1;
                }
            }
            self.stack.push(p);
        }

        // the side of e is the side of a highest return edge
        if self.lowpt[e] < self.height[u] {
            if let Some(top) = self.stack.last() {
                let (hl, hr) = (top.left.high, top.right.high);
                self.refs[e] = match (hl, hr) {
                    (Some(l), None) => Some(l),
                    (Some(l), Some(r)) if self.lowpt[l] > self.lowpt[r] => Some(l),
                    _ => hr,
                };
            }
        }
    }

    fn testing(&mut self, root: usize) -> bool {
        let n = self.adj.len();
        let mut cursor = vec![0usize; n];
        let mut descended = vec![false; self.tail.len()];
        let mut dfs = vec![root];
        while let Some(v) = dfs.pop() {
            let parent = self.parent_edge[v];
            let mut paused = false;
            while cursor[v] < self.ordered[v].len() {
                let ei = self.ordered[v][cursor[v]];
                let w = self.head[ei];
                if !descended[ei] {
                    self.stack_bottom[ei] = self.stack.len();
                    if self.parent_edge[w] == Some(ei) {
                        descended[ei] = true;
                        dfs.push(v);
                        dfs.push(w);
                        paused = true;
                        break;
                    }
                    self.lowpt_edge[ei] = ei;
                    self.stack.push(ConflictPair {
                        left: Interval::default(),
                        right: Interval {
                            low: Some(ei),
                            high: Some(ei),
                        },
                    });
                }
                if self.lowpt[ei] < self.height[v] {
                    if let Some(e) = parent {
                        if ei == self.ordered[v][0] {
                            self.lowpt_edge[e] = self.lowpt_edge[ei];
                        } else if !self.add_constraints(ei, e) {
                            return false;
                        }
                    }
                }
                cursor[v] += 1;
            }
            if !paused {
                if let Some(e) = parent {
                    self.remove_back_edges(e);
                }
            }
        }
        true
    }

    /// Resolve the side of `e` along its reference chain
    fn sign(&mut self, e: usize) -> i64 {
        let mut chain = vec![e];
        while let Some(next) = chain.last().and_then(|&c| self.refs[c]) {
            chain.push(next);
        }
        for i in (0..chain.len() - 1).rev() {
            let (c, next) = (chain[i], chain[i + 1]);
            self.side[c] *= self.side[next];
            self.refs[c] = None;
        }
        self.side[e]
    }

    fn sort_by_nesting(&mut self) {
        for v in 0..self.adj.len() {
            let mut edges = self.out[v].clone();
            edges.sort_by_key(|&e| self.nesting[e]);
            self.ordered[v] = edges;
        }
    }

    fn embed(&mut self) -> Rotation {
        let n = self.adj.len();
        for e in 0..self.tail.len() {
            self.nesting[e] *= self.sign(e);
        }
        self.sort_by_nesting();

        let mut rotation = Rotation::new(n);
        for v in 0..n {
            let mut previous = None;
            for &e in &self.ordered[v] {
                let w = self.head[e];
                rotation.add_cw(v, w, previous);
                previous = Some(w);
            }
        }

        let mut left_ref = vec![0usize; n];
        let mut right_ref = vec![0usize; n];
        let mut cursor = vec![0usize; n];
        for &root in &self.roots {
            let mut dfs = vec![root];
            while let Some(v) = dfs.pop() {
                while cursor[v] < self.ordered[v].len() {
                    let ei = self.ordered[v][cursor[v]];
                    cursor[v] += 1;
                    let w = self.head[ei];
                    if self.parent_edge[w] == Some(ei) {
                        rotation.add_first(w, v);
                        left_ref[v] = w;
                        right_ref[v] = w;
                        dfs.push(v);
                        dfs.push(w);
                        break;
                    }
                    if self.side[ei] == 1 {
                        rotation.add_cw(w, v, Some(right_ref[w]));
                    } else {
                        rotation.add_ccw(w, v, Some(left_ref[w]));
                        left_ref[w] = v;
                    }
                }
            }
        }
        rotation
    }

    /// Run the test; on success return the rotation system of an embedding
    fn run(mut self) -> Option<Rotation> {
        let n = self.adj.len();
        let m: usize = self.adj.iter().map(Vec::len).sum::<usize>() / 2;
        if n > 2 && m > 3 * n - 6 {
            return None;
        }
        for v in 0..n {
            if self.height[v] == UNVISITED {
                self.height[v] = 0;
                self.roots.push(v);
                self.orientation(v);
            }
        }
        self.sort_by_nesting();
        let roots = self.roots.clone();
        for root in roots {
            if !self.testing(root) {
                return None;
            }
        }
        Some(self.embed())
    }
}

/// Left-right planarity test; on success includes a planar embedding
pub fn left_right_planarity(view: &GraphView) -> PlanarityResult {
    let n = view.node_count;
    // simple underlying graph, neighbours in first-seen order
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut between: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    let mut loops: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (pos, e) in view.edges.iter().enumerate() {
        if e.is_self_loop() {
            loops[e.source].push(pos);
            continue;
        }
        let key = (e.source.min(e.target), e.source.max(e.target));
        let parallel = between.entry(key).or_default();
        if parallel.is_empty() {
            adj[e.source].push(e.target);
            adj[e.target].push(e.source);
        }
        parallel.push(pos);
    }

    let Some(rotation) = LrState::new(adj).run() else {
        debug!(vertices = n, "graph is not planar");
        return PlanarityResult {
            is_planar: false,
            embedding: None,
        };
    };

    let mut around = HashMap::with_capacity(n);
    for v in 0..n {
        let mut edges = Vec::new();
        for w in rotation.clockwise(v) {
            if let Some(parallel) = between.get(&(v.min(w), v.max(w))) {
                edges.extend(parallel.iter().map(|&p| view.edge(p).id));
            }
        }
        edges.extend(loops[v].iter().map(|&p| view.edge(p).id));
        around.insert(view.node(v), edges);
    }
    PlanarityResult {
        is_planar: true,
        embedding: Some(PlanarEmbedding { around }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::unweighted;
    use std::collections::HashSet;

    fn complete(n: u64) -> GraphView {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j));
            }
        }
        unweighted(n, &edges, false)
    }

    /// Count faces of the rotation system by tracing half-edge orbits
    fn faces(view: &GraphView, embedding: &PlanarEmbedding) -> usize {
        let neighbor = |v: u64, e: u64| {
            let rec = view.edge(view.edge_to_index[&e]);
            view.node(rec.opposite(view.node_to_index[&v]))
        };
        let mut seen = HashSet::new();
        let mut count = 0;
        for v in 0..view.node_count as u64 {
            for &e in embedding.edges_around(v).unwrap() {
                if seen.contains(&(v, e)) {
                    continue;
                }
                count += 1;
                let (mut u, mut edge) = (v, e);
                while seen.insert((u, edge)) {
                    let w = neighbor(u, edge);
                    let rot = embedding.edges_around(w).unwrap();
                    let at = rot.iter().position(|&x| x == edge).unwrap();
                    edge = rot[(at + 1) % rot.len()];
                    u = w;
                }
            }
        }
        count
    }

    #[test]
    fn test_small_complete_graphs() {
        for n in 1..=4 {
            let g = complete(n);
            let result = left_right_planarity(&g);
            assert!(result.is_planar, "K{} is planar", n);
        }
        assert!(!left_right_planarity(&complete(5)).is_planar);
    }

    #[test]
    fn test_k33_not_planar() {
        let mut edges = Vec::new();
        for a in 0..3 {
            for b in 3..6 {
                edges.push((a, b));
            }
        }
        let result = left_right_planarity(&unweighted(6, &edges, false));
        assert!(!result.is_planar);
        assert!(result.embedding.is_none());
    }

    #[test]
    fn test_petersen_not_planar() {
        let edges = [
            (0, 1), (1, 2), (2, 3), (3, 4), (4, 0),
            (0, 5), (1, 6), (2, 7), (3, 8), (4, 9),
            (5, 7), (7, 9), (9, 6), (6, 8), (8, 5),
        ];
        assert!(!left_right_planarity(&unweighted(10, &edges, false)).is_planar);
    }

    #[test]
    fn test_embedding_satisfies_euler_formula() {
        // cube graph: V = 8, E = 12, so a planar embedding has 6 faces
        let edges = [
            (0, 1), (1, 2), (2, 3), (3, 0),
            (4, 5), (5, 6), (6, 7), (7, 4),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        let g = unweighted(8, &edges, false);
        let result = left_right_planarity(&g);
        let embedding = result.embedding.unwrap();
        for v in 0..8 {
            assert_eq!(embedding.edges_around(v).unwrap().len(), 3);
        }
        assert_eq!(faces(&g, &embedding), 6);

        let k4 = complete(4);
        let embedding = left_right_planarity(&k4).embedding.unwrap();
        assert_eq!(faces(&k4, &embedding), 4);
    }

    #[test]
    fn test_loops_and_parallel_edges_ignored() {
        let g = unweighted(3, &[(0, 1), (1, 0), (1, 2), (2, 2)], true);
        let result = left_right_planarity(&g);
        assert!(result.is_planar);
        let embedding = result.embedding.unwrap();
        assert_eq!(embedding.edges_around(1).unwrap().len(), 3);
        assert_eq!(embedding.edges_around(2).unwrap(), &[2, 3]);
    }
}
