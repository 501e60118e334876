//! Vertex traversal orders
//!
//! Breadth and depth first, lexicographic BFS, topological, degeneracy, maximum
//! cardinality and closest-first orders are computed eagerly. Random walks are lazy
//! because an unbounded walk never ends.

use super::common::{GraphView, NodeId};
use super::error::{illegal, AlgoResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::Arc;

fn roots(view: &GraphView, start: Option<NodeId>) -> AlgoResult<Vec<usize>> {
    match start {
        Some(v) => Ok(vec![view.index_of(v)?]),
        None => Ok((0..view.node_count).collect()),
    }
}

/// Breadth-first order from `start`, or from every vertex in turn when `None`
pub fn bfs_order(view: &GraphView, start: Option<NodeId>) -> AlgoResult<Vec<NodeId>> {
    let mut visited = vec![false; view.node_count];
    let mut order = Vec::with_capacity(view.node_count);
    for root in roots(view, start)? {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(u) = queue.pop_front() {
            order.push(view.node(u));
            for &v in view.successors(u) {
                if !visited[v] {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
    }
    Ok(order)
}

/// Depth-first preorder from `start`, or from every vertex in turn when `None`
pub fn dfs_order(view: &GraphView, start: Option<NodeId>) -> AlgoResult<Vec<NodeId>> {
    let mut visited = vec![false; view.node_count];
    let mut order = Vec::with_capacity(view.node_count);
    for root in roots(view, start)? {
        if visited[root] {
            continue;
        }
        let mut stack = vec![root];
        while let Some(u) = stack.pop() {
            if visited[u] {
                continue;
            }
            visited[u] = true;
            order.push(view.node(u));
            // reversed so the first neighbour is explored first
            for &v in view.successors(u).iter().rev() {
                if !visited[v] {
                    stack.push(v);
                }
            }
        }
    }
    Ok(order)
}

/// Lexicographic breadth-first order of an undirected graph
pub fn lex_bfs_order(view: &GraphView) -> AlgoResult<Vec<NodeId>> {
    view.require_undirected("lexicographic BFS")?;
    let n = view.node_count;
    let mut labels: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut done = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for step in 0..n {
        let next = (0..n)
            .filter(|&v| !done[v])
            .max_by(|&a, &b| labels[a].cmp(&labels[b]).then(b.cmp(&a)));
        let Some(v) = next else { break };
        done[v] = true;
        order.push(view.node(v));
        for &u in view.successors(v) {
            if !done[u] && labels[u].last() != Some(&(n - step)) {
                labels[u].push(n - step);
            }
        }
    }
    Ok(order)
}

/// Kahn's algorithm; ready vertices are released in snapshot order
pub fn topological_order(view: &GraphView) -> AlgoResult<Vec<NodeId>> {
    view.require_directed("topological order")?;
    let n = view.node_count;
    let mut indegree: Vec<usize> = (0..n).map(|v| view.in_degree(v)).collect();
    let mut ready: BinaryHeap<std::cmp::Reverse<usize>> =
        (0..n).filter(|&v| indegree[v] == 0).map(std::cmp::Reverse).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(std::cmp::Reverse(u)) = ready.pop() {
        order.push(view.node(u));
        for &v in view.successors(u) {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                ready.push(std::cmp::Reverse(v));
            }
        }
    }
    if order.len() < n {
        return Err(illegal("graph is not a directed acyclic graph"));
    }
    Ok(order)
}

/// Smallest-last removal order, as dense indices
pub(crate) fn degeneracy_order_indices(view: &GraphView) -> Vec<usize> {
    let n = view.node_count;
    let mut degree: Vec<usize> = (0..n)
        .map(|v| view.incident(v).filter(|&(u, _)| u != v).count())
        .collect();
    let mut removed = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for _ in 0..n {
        let next = (0..n).filter(|&v| !removed[v]).min_by_key(|&v| (degree[v], v));
        let Some(v) = next else { break };
        removed[v] = true;
        order.push(v);
        for (u, _) in view.incident(v) {
            if u != v && !removed[u] {
                degree[u] -= 1;
            }
        }
    }
    order
}

/// Degeneracy order: repeatedly remove a vertex of minimum remaining degree
pub fn degeneracy_order(view: &GraphView) -> Vec<NodeId> {
    degeneracy_order_indices(view)
        .into_iter()
        .map(|i| view.node(i))
        .collect()
}

/// Maximum cardinality search: next is the vertex with the most visited neighbours
pub fn max_cardinality_order(view: &GraphView) -> Vec<NodeId> {
    let n = view.node_count;
    let mut weight = vec![0usize; n];
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for _ in 0..n {
        let next = (0..n)
            .filter(|&v| !visited[v])
            .max_by(|&a, &b| weight[a].cmp(&weight[b]).then(b.cmp(&a)));
        let Some(v) = next else { break };
        visited[v] = true;
        order.push(view.node(v));
        for (u, _) in view.incident(v) {
            if !visited[u] {
                weight[u] += 1;
            }
        }
    }
    order
}

#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    dist: f64,
    node: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.total_cmp(&self.dist).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Vertices in order of increasing distance from `source`, up to `radius` when given
pub fn closest_first_order(view: &GraphView, source: NodeId, radius: Option<f64>) -> AlgoResult<Vec<NodeId>> {
    view.require_non_negative_weights("closest-first traversal")?;
    if radius.is_some_and(|r| r < 0.0) {
        return Err(illegal("radius must be non-negative"));
    }
    let s = view.index_of(source)?;
    let limit = radius.unwrap_or(f64::INFINITY);
    let mut dist = vec![f64::INFINITY; view.node_count];
    let mut settled = vec![false; view.node_count];
    let mut heap = BinaryHeap::from([Frontier { dist: 0.0, node: s }]);
    let mut order = Vec::new();
    dist[s] = 0.0;
    while let Some(Frontier { dist: d, node: u }) = heap.pop() {
        if settled[u] {
            continue;
        }
        settled[u] = true;
        order.push(view.node(u));
        for (v, pos) in view.out_neighbors(u) {
            let candidate = d + view.weight(pos);
            if candidate <= limit && candidate < dist[v] {
                dist[v] = candidate;
                heap.push(Frontier { dist: candidate, node: v });
            }
        }
    }
    Ok(order)
}

/// Random walk configuration
#[derive(Debug, Clone)]
pub struct RandomWalkConfig {
    /// Pick outgoing edges proportionally to their weight
    pub weighted: bool,
    /// Number of hops after the start vertex, `None` for an unbounded walk
    pub max_steps: Option<u64>,
    pub seed: u64,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            weighted: false,
            max_steps: None,
            seed: 17,
        }
    }
}

/// Lazy random walk. Ends early at a vertex without outgoing edges.
pub struct RandomWalk {
    view: Arc<GraphView>,
    current: Option<usize>,
    started: bool,
    remaining: Option<u64>,
    weighted: bool,
    rng: StdRng,
}

impl RandomWalk {
    pub fn new(view: Arc<GraphView>, start: NodeId, config: RandomWalkConfig) -> AlgoResult<Self> {
        let start = view.index_of(start)?;
        if config.weighted {
            view.require_non_negative_weights("weighted random walk")?;
        }
        Ok(RandomWalk {
            view,
            current: Some(start),
            started: false,
            remaining: config.max_steps,
            weighted: config.weighted,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn step(&mut self, u: usize) -> Option<usize> {
        let succ = self.view.successors(u);
        if succ.is_empty() {
            return None;
        }
        if !self.weighted {
            return Some(succ[self.rng.gen_range(0..succ.len())]);
        }
        let weights = self.view.weights(u);
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }
        let mut pick = self.rng.gen_range(0.0..total);
        for (i, w) in weights.iter().enumerate() {
            if pick < *w {
                return Some(succ[i]);
            }
            pick -= w;
        }
        succ.last().copied()
    }
}

impl Iterator for RandomWalk {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let u = self.current?;
        if !self.started {
            self.started = true;
            return Some(self.view.node(u));
        }
        if self.remaining == Some(0) {
            self.current = None;
            return None;
        }
        if let Some(r) = self.remaining.as_mut() {
            *r -= 1;
        }
        self.current = self.step(u);
        self.current.map(|v| self.view.node(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{unweighted, view};

    fn tree() -> GraphView {
        // 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 4
        unweighted(5, &[(0, 1), (0, 2), (1, 3), (2, 4)], true)
    }

    #[test]
    fn test_bfs_and_dfs() {
        assert_eq!(bfs_order(&tree(), Some(0)).unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(dfs_order(&tree(), Some(0)).unwrap(), vec![0, 1, 3, 2, 4]);
        assert_eq!(bfs_order(&tree(), Some(2)).unwrap(), vec![2, 4]);
        assert_eq!(dfs_order(&tree(), None).unwrap().len(), 5);
    }

    #[test]
    fn test_topological() {
        let order = topological_order(&tree()).unwrap();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        let cyclic = unweighted(2, &[(0, 1), (1, 0)], true);
        assert!(topological_order(&cyclic).is_err());
    }

    #[test]
    fn test_degeneracy_and_mcs() {
        // triangle 0-1-2 with a pendant 3 on 2
        let g = unweighted(4, &[(0, 1), (1, 2), (2, 0), (2, 3)], false);
        assert_eq!(degeneracy_order(&g), vec![3, 0, 1, 2]);
        assert_eq!(max_cardinality_order(&g), vec![0, 1, 2, 3]);
        assert_eq!(lex_bfs_order(&g).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_closest_first_with_radius() {
        let g = view(4, &[(0, 1, 5.0), (0, 2, 1.0), (2, 3, 1.0)], false);
        assert_eq!(closest_first_order(&g, 0, None).unwrap(), vec![0, 2, 3, 1]);
        assert_eq!(closest_first_order(&g, 0, Some(2.0)).unwrap(), vec![0, 2, 3]);
    }

    #[test]
    fn test_random_walk_bounded() {
        let g = Arc::new(unweighted(3, &[(0, 1), (1, 2), (2, 0)], true));
        let config = RandomWalkConfig {
            max_steps: Some(4),
            ..Default::default()
        };
        let walk: Vec<NodeId> = RandomWalk::new(g, 0, config).unwrap().collect();
        assert_eq!(walk, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_random_walk_stops_at_sink() {
        let g = Arc::new(tree());
        let walk: Vec<NodeId> = RandomWalk::new(g, 1, RandomWalkConfig::default()).unwrap().collect();
        assert_eq!(walk, vec![1, 3]);
    }
}
