//! Pathfinding algorithms
//!
//! Single pair: BFS, Dijkstra, bidirectional Dijkstra, A* (caller heuristic or ALT landmarks),
//! Yen's k loopless shortest paths. Single source: BFS, Dijkstra, Bellman-Ford.
//! All pairs: Floyd-Warshall and Johnson.

use super::common::{EdgeId, GraphView, NodeId, PathResult};
use super::error::{illegal, AlgoError, AlgoResult};
use ndarray::Array2;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

/// Shortest path tree rooted at a single source vertex
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    pub source: NodeId,
    /// Distance to every vertex of the snapshot, `f64::INFINITY` when unreachable
    distances: HashMap<NodeId, f64>,
    /// Last hop on the shortest path: (previous vertex, edge)
    predecessors: HashMap<NodeId, (NodeId, EdgeId)>,
}

impl ShortestPathTree {
    fn from_dense(view: &GraphView, source_idx: usize, dist: &[f64], pred: &[Option<usize>]) -> Self {
        let mut distances = HashMap::with_capacity(view.node_count);
        let mut predecessors = HashMap::new();
        for idx in 0..view.node_count {
            distances.insert(view.node(idx), dist[idx]);
            if let Some(pos) = pred[idx] {
                let e = view.edge(pos);
                predecessors.insert(view.node(idx), (view.node(e.opposite(idx)), e.id));
            }
        }
        ShortestPathTree {
            source: view.node(source_idx),
            distances,
            predecessors,
        }
    }

    /// Distance from the source, `f64::INFINITY` when unreachable
    pub fn distance(&self, target: NodeId) -> AlgoResult<f64> {
        self.distances
            .get(&target)
            .copied()
            .ok_or(AlgoError::NoSuchVertex(target))
    }

    /// Path from the source to `target`, `None` when unreachable
    pub fn path_to(&self, target: NodeId) -> AlgoResult<Option<PathResult>> {
        let cost = self.distance(target)?;
        if cost.is_infinite() {
            return Ok(None);
        }
        let mut path = vec![target];
        let mut edges = Vec::new();
        let mut curr = target;
        while curr != self.source {
            let Some(&(prev, edge)) = self.predecessors.get(&curr) else {
                break;
            };
            edges.push(edge);
            path.push(prev);
            curr = prev;
        }
        path.reverse();
        edges.reverse();
        Ok(Some(PathResult {
            source: self.source,
            target,
            path,
            edges,
            cost,
        }))
    }

    /// Vertices with a finite distance
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .distances
            .iter()
            .filter(|(_, d)| d.is_finite())
            .map(|(&n, _)| n)
            .collect();
        nodes.sort_unstable();
        nodes
    }
}

/// Distance matrix plus predecessor matrix over the snapshot's dense indices
#[derive(Debug, Clone)]
pub struct AllPairsResult {
    nodes: Vec<NodeId>,
    node_to_index: HashMap<NodeId, usize>,
    dist: Array2<f64>,
    /// pred[[i, j]] = last hop (previous vertex index, edge) on the i -> j shortest path
    pred: Array2<Option<(usize, EdgeId)>>,
}

impl AllPairsResult {
    fn index(&self, node: NodeId) -> AlgoResult<usize> {
        self.node_to_index
            .get(&node)
            .copied()
            .ok_or(AlgoError::NoSuchVertex(node))
    }

    pub fn distance(&self, source: NodeId, target: NodeId) -> AlgoResult<f64> {
        Ok(self.dist[[self.index(source)?, self.index(target)?]])
    }

    pub fn path(&self, source: NodeId, target: NodeId) -> AlgoResult<Option<PathResult>> {
        let s = self.index(source)?;
        let t = self.index(target)?;
        let cost = self.dist[[s, t]];
        if cost.is_infinite() {
            return Ok(None);
        }
        let mut path = vec![target];
        let mut edges = Vec::new();
        let mut curr = t;
        while curr != s {
            let Some((prev, edge)) = self.pred[[s, curr]] else {
                break;
            };
            edges.push(edge);
            path.push(self.nodes[prev]);
            curr = prev;
        }
        path.reverse();
        edges.reverse();
        Ok(Some(PathResult {
            source,
            target,
            path,
            edges,
            cost,
        }))
    }

    /// The row of `source` as a standalone tree
    pub fn single_source(&self, source: NodeId) -> AlgoResult<ShortestPathTree> {
        let s = self.index(source)?;
        let mut distances = HashMap::with_capacity(self.nodes.len());
        let mut predecessors = HashMap::new();
        for (j, &node) in self.nodes.iter().enumerate() {
            distances.insert(node, self.dist[[s, j]]);
            if j != s {
                if let Some((prev, edge)) = self.pred[[s, j]] {
                    predecessors.insert(node, (self.nodes[prev], edge));
                }
            }
        }
        Ok(ShortestPathTree {
            source,
            distances,
            predecessors,
        })
    }
}

/// Caller-supplied A* lower bound estimate. Must be admissible; nothing verifies it.
pub trait Heuristic {
    fn estimate(&self, vertex: NodeId, target: NodeId) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(NodeId, NodeId) -> f64,
{
    fn estimate(&self, vertex: NodeId, target: NodeId) -> f64 {
        self(vertex, target)
    }
}

/// State for Dijkstra priority queue
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node_idx: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node_idx.cmp(&self.node_idx))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

fn neighbors(
    view: &GraphView,
    idx: usize,
    direction: Direction,
) -> Box<dyn Iterator<Item = (usize, usize)> + '_> {
    match direction {
        Direction::Forward => Box::new(view.out_neighbors(idx)),
        Direction::Backward => Box::new(view.in_neighbors(idx)),
    }
}

/// Dense Dijkstra. Stops early once `target` is settled. Returns (dist, predecessor edge).
fn dijkstra_core(
    view: &GraphView,
    source_idx: usize,
    target_idx: Option<usize>,
    direction: Direction,
    weight: &dyn Fn(usize) -> f64,
    allow: &dyn Fn(usize, usize) -> bool,
) -> AlgoResult<(Vec<f64>, Vec<Option<usize>>)> {
    let n = view.node_count;
    let mut dist = vec![f64::INFINITY; n];
    let mut pred = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[source_idx] = 0.0;
    heap.push(State { cost: 0.0, node_idx: source_idx });

    while let Some(State { cost, node_idx }) = heap.pop() {
        if settled[node_idx] {
            continue;
        }
        settled[node_idx] = true;
        if Some(node_idx) == target_idx {
            break;
        }

        for (next_idx, pos) in neighbors(view, node_idx, direction) {
            if !allow(pos, next_idx) {
                continue;
            }
            let w = weight(pos);
            if w < 0.0 {
                return Err(illegal(format!(
                    "negative edge weights not allowed, edge {} has weight {}",
                    view.edge(pos).id,
                    w
                )));
            }
            let next_cost = cost + w;
            if next_cost < dist[next_idx] {
                dist[next_idx] = next_cost;
                pred[next_idx] = Some(pos);
                heap.push(State { cost: next_cost, node_idx: next_idx });
            }
        }
    }

    Ok((dist, pred))
}

fn any_edge(_: usize, _: usize) -> bool {
    true
}

/// Dense Dijkstra distances from `source_idx` (hop counts on unweighted snapshots).
/// `reverse` follows edges backwards, giving distances *to* the vertex.
pub(crate) fn dense_distances(view: &GraphView, source_idx: usize, reverse: bool) -> AlgoResult<Vec<f64>> {
    let direction = if reverse { Direction::Backward } else { Direction::Forward };
    let (dist, _) = dijkstra_core(view, source_idx, None, direction, &|pos| view.weight(pos), &any_edge)?;
    Ok(dist)
}

/// Dense Dijkstra distances and predecessor edge positions from `source_idx`
pub(crate) fn dense_tree(view: &GraphView, source_idx: usize) -> AlgoResult<(Vec<f64>, Vec<Option<usize>>)> {
    dijkstra_core(view, source_idx, None, Direction::Forward, &|pos| view.weight(pos), &any_edge)
}

/// Breadth-First Search (Unweighted Shortest Path)
pub fn bfs(view: &GraphView, source: NodeId, target: NodeId) -> AlgoResult<Option<PathResult>> {
    let source_idx = view.index_of(source)?;
    let target_idx = view.index_of(target)?;
    let (dist, pred) = bfs_core(view, source_idx, Some(target_idx));
    if dist[target_idx].is_infinite() {
        return Ok(None);
    }
    Ok(Some(PathResult::from_predecessors(
        view,
        source_idx,
        target_idx,
        &pred,
        dist[target_idx],
    )))
}

fn bfs_core(view: &GraphView, source_idx: usize, target_idx: Option<usize>) -> (Vec<f64>, Vec<Option<usize>>) {
    let mut dist = vec![f64::INFINITY; view.node_count];
    let mut pred = vec![None; view.node_count];
    let mut queue = VecDeque::new();

    dist[source_idx] = 0.0;
    queue.push_back(source_idx);

    while let Some(current_idx) = queue.pop_front() {
        if Some(current_idx) == target_idx {
            break;
        }
        for (next_idx, pos) in view.out_neighbors(current_idx) {
            if dist[next_idx].is_infinite() {
                dist[next_idx] = dist[current_idx] + 1.0;
                pred[next_idx] = Some(pos);
                queue.push_back(next_idx);
            }
        }
    }
    (dist, pred)
}

/// Hop-count shortest path tree from `source`
pub fn bfs_single_source(view: &GraphView, source: NodeId) -> AlgoResult<ShortestPathTree> {
    let source_idx = view.index_of(source)?;
    let (dist, pred) = bfs_core(view, source_idx, None);
    Ok(ShortestPathTree::from_dense(view, source_idx, &dist, &pred))
}

/// Dijkstra's Algorithm (Weighted Shortest Path)
///
/// Fails with `IllegalArgument` as soon as a negative edge is explored.
/// An unreachable target yields `Ok(None)`.
pub fn dijkstra(view: &GraphView, source: NodeId, target: NodeId) -> AlgoResult<Option<PathResult>> {
    let source_idx = view.index_of(source)?;
    let target_idx = view.index_of(target)?;
    let (dist, pred) = dijkstra_core(
        view,
        source_idx,
        Some(target_idx),
        Direction::Forward,
        &|pos| view.weight(pos),
        &any_edge,
    )?;
    if dist[target_idx].is_infinite() {
        return Ok(None);
    }
    Ok(Some(PathResult::from_predecessors(
        view,
        source_idx,
        target_idx,
        &pred,
        dist[target_idx],
    )))
}

/// Full Dijkstra shortest path tree from `source`
pub fn dijkstra_single_source(view: &GraphView, source: NodeId) -> AlgoResult<ShortestPathTree> {
    let source_idx = view.index_of(source)?;
    let (dist, pred) = dijkstra_core(
        view,
        source_idx,
        None,
        Direction::Forward,
        &|pos| view.weight(pos),
        &any_edge,
    )?;
    Ok(ShortestPathTree::from_dense(view, source_idx, &dist, &pred))
}

/// Dijkstra run simultaneously from both endpoints
pub fn bidirectional_dijkstra(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
) -> AlgoResult<Option<PathResult>> {
    let s = view.index_of(source)?;
    let t = view.index_of(target)?;
    if s == t {
        return Ok(Some(PathResult {
            source,
            target,
            path: vec![source],
            edges: Vec::new(),
            cost: 0.0,
        }));
    }

    let n = view.node_count;
    let mut dist = [vec![f64::INFINITY; n], vec![f64::INFINITY; n]];
    let mut pred: [Vec<Option<usize>>; 2] = [vec![None; n], vec![None; n]];
    let mut settled = [vec![false; n], vec![false; n]];
    let mut heaps = [BinaryHeap::new(), BinaryHeap::new()];
    let directions = [Direction::Forward, Direction::Backward];

    dist[0][s] = 0.0;
    dist[1][t] = 0.0;
    heaps[0].push(State { cost: 0.0, node_idx: s });
    heaps[1].push(State { cost: 0.0, node_idx: t });

    let mut best = f64::INFINITY;
    let mut meeting = None;

    loop {
        let top = |h: &BinaryHeap<State>| h.peek().map(|st| st.cost).unwrap_or(f64::INFINITY);
        let (f_top, b_top) = (top(&heaps[0]), top(&heaps[1]));
        if f_top.is_infinite() && b_top.is_infinite() {
            break;
        }
        if f_top + b_top >= best {
            break;
        }
        let side = if f_top <= b_top { 0 } else { 1 };
        let other = 1 - side;
        let Some(State { cost, node_idx }) = heaps[side].pop() else {
            break;
        };
        if settled[side][node_idx] {
            continue;
        }
        settled[side][node_idx] = true;

        for (next_idx, pos) in neighbors(view, node_idx, directions[side]) {
            let w = view.weight(pos);
            if w < 0.0 {
                return Err(illegal(format!(
                    "negative edge weights not allowed, edge {} has weight {}",
                    view.edge(pos).id,
                    w
                )));
            }
            let next_cost = cost + w;
            if next_cost < dist[side][next_idx] {
                dist[side][next_idx] = next_cost;
                pred[side][next_idx] = Some(pos);
                heaps[side].push(State { cost: next_cost, node_idx: next_idx });
            }
            let through = dist[side][next_idx] + dist[other][next_idx];
            if through < best {
                best = through;
                meeting = Some(next_idx);
            }
        }
    }

    let Some(meet) = meeting else {
        return Ok(None);
    };

    let forward = PathResult::from_predecessors(view, s, meet, &pred[0], dist[0][meet]);
    let mut path = forward.path;
    let mut edges = forward.edges;
    let mut curr = meet;
    while curr != t {
        let Some(pos) = pred[1][curr] else { break };
        let e = view.edge(pos);
        edges.push(e.id);
        curr = e.opposite(curr);
        path.push(view.node(curr));
    }

    Ok(Some(PathResult {
        source,
        target,
        path,
        edges,
        cost: best,
    }))
}

/// Dense Bellman-Ford relaxation from initial distances. Returns (dist, predecessor edge).
fn bellman_ford_core(view: &GraphView, mut dist: Vec<f64>) -> AlgoResult<(Vec<f64>, Vec<Option<usize>>)> {
    let n = view.node_count;
    let mut pred = vec![None; n];

    for _ in 0..n {
        let mut changed = false;
        for u in 0..n {
            if dist[u].is_infinite() {
                continue;
            }
            for (v, pos) in view.out_neighbors(u) {
                let candidate = dist[u] + view.weight(pos);
                if candidate < dist[v] {
                    dist[v] = candidate;
                    pred[v] = Some(pos);
                    changed = true;
                }
            }
        }
        if !changed {
            return Ok((dist, pred));
        }
    }

    // An n-th round that still relaxes proves a negative cycle
    for u in 0..n {
        if dist[u].is_infinite() {
            continue;
        }
        for (v, pos) in view.out_neighbors(u) {
            if dist[u] + view.weight(pos) < dist[v] {
                return Err(AlgoError::NegativeCycle(view.node(v)));
            }
        }
    }
    Ok((dist, pred))
}

/// Bellman-Ford single source shortest paths; tolerates negative weights.
///
/// Fails with `NegativeCycle` if a negative cycle is reachable from `source`.
pub fn bellman_ford(view: &GraphView, source: NodeId) -> AlgoResult<ShortestPathTree> {
    let source_idx = view.index_of(source)?;
    let mut dist = vec![f64::INFINITY; view.node_count];
    dist[source_idx] = 0.0;
    let (dist, pred) = bellman_ford_core(view, dist)?;
    Ok(ShortestPathTree::from_dense(view, source_idx, &dist, &pred))
}

#[derive(Copy, Clone, PartialEq)]
struct AStarState {
    estimate: f64,
    cost: f64,
    node_idx: usize,
}

impl Eq for AStarState {}

impl Ord for AStarState {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| self.cost.total_cmp(&other.cost))
    }
}

impl PartialOrd for AStarState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search guided by a caller heuristic.
pub fn astar(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    heuristic: &dyn Heuristic,
) -> AlgoResult<Option<PathResult>> {
    let source_idx = view.index_of(source)?;
    let target_idx = view.index_of(target)?;
    let n = view.node_count;

    let mut g = vec![f64::INFINITY; n];
    let mut pred = vec![None; n];
    let mut heap = BinaryHeap::new();

    g[source_idx] = 0.0;
    heap.push(AStarState {
        estimate: heuristic.estimate(source, target),
        cost: 0.0,
        node_idx: source_idx,
    });

    while let Some(AStarState { cost, node_idx, .. }) = heap.pop() {
        if node_idx == target_idx {
            return Ok(Some(PathResult::from_predecessors(
                view, source_idx, target_idx, &pred, cost,
            )));
        }
        if cost > g[node_idx] {
            continue;
        }
        for (next_idx, pos) in view.out_neighbors(node_idx) {
            let w = view.weight(pos);
            if w < 0.0 {
                return Err(illegal(format!(
                    "negative edge weights not allowed, edge {} has weight {}",
                    view.edge(pos).id,
                    w
                )));
            }
            let next_cost = cost + w;
            if next_cost < g[next_idx] {
                g[next_idx] = next_cost;
                pred[next_idx] = Some(pos);
                heap.push(AStarState {
                    estimate: next_cost + heuristic.estimate(view.node(next_idx), target),
                    cost: next_cost,
                    node_idx: next_idx,
                });
            }
        }
    }

    Ok(None)
}

/// ALT heuristic: landmark distances combined through the triangle inequality.
pub struct AltHeuristic {
    node_to_index: HashMap<NodeId, usize>,
    from_landmark: Vec<Vec<f64>>,
    to_landmark: Vec<Vec<f64>>,
}

impl AltHeuristic {
    pub fn new(view: &GraphView, landmarks: &[NodeId]) -> AlgoResult<Self> {
        if landmarks.is_empty() {
            return Err(illegal("ALT heuristic requires at least one landmark"));
        }
        view.require_non_negative_weights("ALT heuristic")?;
        let mut from_landmark = Vec::with_capacity(landmarks.len());
        let mut to_landmark = Vec::with_capacity(landmarks.len());
        for &l in landmarks {
            let idx = view.index_of(l)?;
            let weight = |pos: usize| view.weight(pos);
            let (forward, _) = dijkstra_core(view, idx, None, Direction::Forward, &weight, &any_edge)?;
            let (backward, _) = dijkstra_core(view, idx, None, Direction::Backward, &weight, &any_edge)?;
            from_landmark.push(forward);
            to_landmark.push(backward);
        }
        Ok(AltHeuristic {
            node_to_index: view.node_to_index.clone(),
            from_landmark,
            to_landmark,
        })
    }
}

impl Heuristic for AltHeuristic {
    fn estimate(&self, vertex: NodeId, target: NodeId) -> f64 {
        let (Some(&v), Some(&t)) = (self.node_to_index.get(&vertex), self.node_to_index.get(&target)) else {
            return 0.0;
        };
        let mut best: f64 = 0.0;
        for (from, to) in self.from_landmark.iter().zip(&self.to_landmark) {
            // d(l,t) - d(l,v) and d(v,l) - d(t,l) are both lower bounds of d(v,t)
            if from[t].is_finite() && from[v].is_finite() {
                best = best.max(from[t] - from[v]);
            }
            if to[v].is_finite() && to[t].is_finite() {
                best = best.max(to[v] - to[t]);
            }
        }
        best
    }
}

/// A* with the ALT landmark heuristic
pub fn astar_alt(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    landmarks: &[NodeId],
) -> AlgoResult<Option<PathResult>> {
    let heuristic = AltHeuristic::new(view, landmarks)?;
    astar(view, source, target, &heuristic)
}

/// Floyd-Warshall all pairs shortest paths
pub fn floyd_warshall(view: &GraphView) -> AlgoResult<AllPairsResult> {
    let n = view.node_count;
    let mut dist = Array2::from_elem((n, n), f64::INFINITY);
    let mut pred: Array2<Option<(usize, EdgeId)>> = Array2::from_elem((n, n), None);

    for i in 0..n {
        dist[[i, i]] = 0.0;
    }
    for u in 0..n {
        for (v, pos) in view.out_neighbors(u) {
            let w = view.weight(pos);
            if u == v {
                if w < 0.0 {
                    return Err(AlgoError::NegativeCycle(view.node(u)));
                }
                continue;
            }
            if w < dist[[u, v]] {
                dist[[u, v]] = w;
                pred[[u, v]] = Some((u, view.edge(pos).id));
            }
        }
    }

    for k in 0..n {
        for i in 0..n {
            let dik = dist[[i, k]];
            if dik.is_infinite() {
                continue;
            }
            for j in 0..n {
                let candidate = dik + dist[[k, j]];
                if candidate < dist[[i, j]] {
                    dist[[i, j]] = candidate;
                    pred[[i, j]] = pred[[k, j]];
                }
            }
        }
    }

    for i in 0..n {
        if dist[[i, i]] < 0.0 {
            return Err(AlgoError::NegativeCycle(view.node(i)));
        }
    }

    Ok(AllPairsResult {
        nodes: view.index_to_node.clone(),
        node_to_index: view.node_to_index.clone(),
        dist,
        pred,
    })
}

/// Johnson all pairs shortest paths: Bellman-Ford reweighting, then one Dijkstra per source.
pub fn johnson(view: &GraphView) -> AlgoResult<AllPairsResult> {
    let n = view.node_count;
    // Equivalent to a virtual source joined to every vertex by a zero edge
    let (h, _) = bellman_ford_core(view, vec![0.0; n])?;

    let rows: Vec<AlgoResult<(Vec<f64>, Vec<Option<usize>>)>> = (0..n)
        .into_par_iter()
        .map(|s| {
            // Undirected graphs only get here without negative edges, where h is all zeros
            let reweighted = |pos: usize| {
                let e = view.edge(pos);
                (e.weight + h[e.source] - h[e.target]).max(0.0)
            };
            dijkstra_core(view, s, None, Direction::Forward, &reweighted, &any_edge)
        })
        .collect();

    let mut dist = Array2::from_elem((n, n), f64::INFINITY);
    let mut pred: Array2<Option<(usize, EdgeId)>> = Array2::from_elem((n, n), None);
    for (s, row) in rows.into_iter().enumerate() {
        let (d, p) = row?;
        for t in 0..n {
            if d[t].is_finite() {
                dist[[s, t]] = d[t] - h[s] + h[t];
            }
            if let Some(pos) = p[t] {
                let e = view.edge(pos);
                pred[[s, t]] = Some((e.opposite(t), e.id));
            }
        }
    }

    Ok(AllPairsResult {
        nodes: view.index_to_node.clone(),
        node_to_index: view.node_to_index.clone(),
        dist,
        pred,
    })
}

/// Yen's algorithm: up to `k` loopless paths from `source` to `target` in order of cost.
pub fn yen_k_shortest_paths(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    k: usize,
) -> AlgoResult<Vec<PathResult>> {
    if k == 0 {
        return Err(illegal("k must be positive"));
    }
    let s = view.index_of(source)?;
    let t = view.index_of(target)?;
    view.require_non_negative_weights("Yen k shortest paths")?;

    let weight = |pos: usize| view.weight(pos);
    let (dist, pred) = dijkstra_core(view, s, Some(t), Direction::Forward, &weight, &any_edge)?;
    if dist[t].is_infinite() {
        return Ok(Vec::new());
    }
    let mut accepted = vec![PathResult::from_predecessors(view, s, t, &pred, dist[t])];
    let mut candidates: Vec<PathResult> = Vec::new();

    while accepted.len() < k {
        let Some(previous) = accepted.last().cloned() else {
            break;
        };
        for i in 0..previous.edges.len() {
            let spur = view.index_of(previous.path[i])?;
            let root_vertices = &previous.path[..=i];
            let root_edges = &previous.edges[..i];

            let mut blocked_edges = HashSet::new();
            for p in &accepted {
                if p.path.len() > i + 1 && p.path[..=i] == *root_vertices && p.edges[..i] == *root_edges {
                    if let Some(&pos) = view.edge_to_index.get(&p.edges[i]) {
                        blocked_edges.insert(pos);
                    }
                }
            }
            let mut blocked_vertices = vec![false; view.node_count];
            for &v in &root_vertices[..i] {
                blocked_vertices[view.index_of(v)?] = true;
            }

            let allow = |pos: usize, next: usize| !blocked_edges.contains(&pos) && !blocked_vertices[next];
            let (spur_dist, spur_pred) = dijkstra_core(view, spur, Some(t), Direction::Forward, &weight, &allow)?;
            if spur_dist[t].is_infinite() {
                continue;
            }
            let spur_path = PathResult::from_predecessors(view, spur, t, &spur_pred, spur_dist[t]);

            let root_cost: f64 = root_edges
                .iter()
                .filter_map(|id| view.edge_to_index.get(id))
                .map(|&pos| view.weight(pos))
                .sum();
            let mut path = root_vertices[..i].to_vec();
            path.extend(spur_path.path);
            let mut edges = root_edges.to_vec();
            edges.extend(spur_path.edges);
            let candidate = PathResult {
                source,
                target,
                path,
                edges,
                cost: root_cost + spur_path.cost,
            };
            let known = accepted.iter().chain(candidates.iter()).any(|p| p.edges == candidate.edges);
            if !known {
                candidates.push(candidate);
            }
        }

        let Some(best) = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.cost
                    .total_cmp(&b.cost)
                    .then_with(|| a.edges.len().cmp(&b.edges.len()))
            })
            .map(|(i, _)| i)
        else {
            break;
        };
        accepted.push(candidates.swap_remove(best));
    }

    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{unweighted, view};

    #[test]
    fn test_bfs() {
        // 1->2->3
        let view = unweighted(3, &[(0, 1), (1, 2)], true);
        let result = bfs(&view, 0, 2).unwrap().unwrap();
        assert_eq!(result.path, vec![0, 1, 2]);
        assert_eq!(result.edges, vec![0, 1]);
        assert_eq!(result.cost, 2.0);
        assert!(bfs(&view, 2, 0).unwrap().is_none());
    }

    #[test]
    fn test_dijkstra() {
        // 0->1 (10.0), 1->2 (5.0), 0->2 (50.0)
        let view = view(3, &[(0, 1, 10.0), (0, 2, 50.0), (1, 2, 5.0)], true);
        let result = dijkstra(&view, 0, 2).unwrap().unwrap();
        assert_eq!(result.path, vec![0, 1, 2]);
        assert_eq!(result.cost, 15.0);
    }

    #[test]
    fn test_dijkstra_unreachable_is_not_an_error() {
        let view = view(3, &[(0, 1, 1.0)], true);
        assert!(dijkstra(&view, 0, 2).unwrap().is_none());
    }

    #[test]
    fn test_dijkstra_rejects_explored_negative_edge() {
        let view = view(3, &[(0, 1, 1.0), (1, 2, -1.0)], true);
        assert!(matches!(dijkstra(&view, 0, 2), Err(AlgoError::IllegalArgument(_))));
    }

    #[test]
    fn test_dijkstra_missing_vertex() {
        let view = view(2, &[(0, 1, 1.0)], true);
        assert_eq!(dijkstra(&view, 0, 9), Err(AlgoError::NoSuchVertex(9)));
    }

    #[test]
    fn test_four_cycle_scenario() {
        let view = view(4, &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 1.0), (0, 3, 4.0)], false);
        let result = dijkstra(&view, 0, 3).unwrap().unwrap();
        assert_eq!(result.cost, 4.0);
    }

    #[test]
    fn test_bellman_ford_negative_edges() {
        let view = view(4, &[(0, 1, 4.0), (0, 2, 1.0), (2, 1, -2.0), (1, 3, 1.0)], true);
        let tree = bellman_ford(&view, 0).unwrap();
        assert_eq!(tree.distance(1).unwrap(), -1.0);
        assert_eq!(tree.distance(3).unwrap(), 0.0);
        let path = tree.path_to(3).unwrap().unwrap();
        assert_eq!(path.path, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_bellman_ford_negative_cycle() {
        let view = view(3, &[(0, 1, 1.0), (1, 2, -2.0), (2, 1, 1.0)], true);
        assert!(matches!(bellman_ford(&view, 0), Err(AlgoError::NegativeCycle(_))));
    }

    #[test]
    fn test_bellman_ford_unreachable_negative_cycle_is_ignored() {
        let view = view(4, &[(0, 1, 1.0), (2, 3, -2.0), (3, 2, 1.0)], true);
        let tree = bellman_ford(&view, 0).unwrap();
        assert!(tree.distance(2).unwrap().is_infinite());
    }

    #[test]
    fn test_bidirectional_matches_dijkstra() {
        let edges = [
            (0, 1, 7.0),
            (0, 2, 9.0),
            (0, 5, 14.0),
            (1, 2, 10.0),
            (1, 3, 15.0),
            (2, 3, 11.0),
            (2, 5, 2.0),
            (3, 4, 6.0),
            (4, 5, 9.0),
        ];
        let view = view(6, &edges, false);
        let a = dijkstra(&view, 0, 4).unwrap().unwrap();
        let b = bidirectional_dijkstra(&view, 0, 4).unwrap().unwrap();
        assert_eq!(a.cost, 20.0);
        assert_eq!(b.cost, 20.0);
        assert_eq!(b.path.first(), Some(&0));
        assert_eq!(b.path.last(), Some(&4));
    }

    #[test]
    fn test_astar_with_zero_heuristic() {
        let view = view(4, &[(0, 1, 1.0), (1, 3, 1.0), (0, 2, 1.0), (2, 3, 5.0)], true);
        let zero = |_: NodeId, _: NodeId| 0.0;
        let result = astar(&view, 0, 3, &zero).unwrap().unwrap();
        assert_eq!(result.path, vec![0, 1, 3]);
        assert_eq!(result.cost, 2.0);
    }

    #[test]
    fn test_astar_alt() {
        let view = view(5, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (0, 4, 10.0)], false);
        let result = astar_alt(&view, 0, 4, &[2]).unwrap().unwrap();
        assert_eq!(result.cost, 4.0);
    }

    #[test]
    fn test_floyd_warshall_and_johnson_agree() {
        let view = view(4, &[(0, 1, 3.0), (1, 2, -2.0), (0, 2, 2.0), (2, 3, 1.0), (3, 0, 4.0)], true);
        let fw = floyd_warshall(&view).unwrap();
        let jo = johnson(&view).unwrap();
        for s in 0..4 {
            for t in 0..4 {
                assert_eq!(fw.distance(s, t).unwrap(), jo.distance(s, t).unwrap());
            }
        }
        let path = fw.path(0, 3).unwrap().unwrap();
        assert_eq!(path.path, vec![0, 1, 2, 3]);
        assert_eq!(path.cost, 2.0);
        let tree = jo.single_source(0).unwrap();
        assert_eq!(tree.path_to(3).unwrap().unwrap().cost, 2.0);
    }

    #[test]
    fn test_floyd_warshall_negative_cycle() {
        let view = view(2, &[(0, 1, 1.0), (1, 0, -3.0)], true);
        assert!(matches!(floyd_warshall(&view), Err(AlgoError::NegativeCycle(_))));
    }

    #[test]
    fn test_yen() {
        // two disjoint routes and one cross route
        let edges = [(0, 1, 1.0), (1, 3, 1.0), (0, 2, 2.0), (2, 3, 2.0), (1, 2, 1.0)];
        let view = view(4, &edges, true);
        let paths = yen_k_shortest_paths(&view, 0, 3, 5).unwrap();
        let costs: Vec<f64> = paths.iter().map(|p| p.cost).collect();
        assert_eq!(costs, vec![2.0, 4.0, 4.0]);
        assert_eq!(paths[0].path, vec![0, 1, 3]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_edges() -> impl Strategy<Value = Vec<(u64, u64, f64)>> {
            prop::collection::vec((0u64..8, 0u64..8, 0u32..20), 0..30)
                .prop_map(|raw| raw.into_iter().map(|(s, t, w)| (s, t, w as f64)).collect())
        }

        proptest! {
            #[test]
            fn prop_single_source_algorithms_agree(edges in arb_edges(), directed in any::<bool>()) {
                let view = view(8, &edges, directed);
                let dijkstra = dijkstra_single_source(&view, 0).unwrap();
                let bellman = bellman_ford(&view, 0).unwrap();
                for t in 0..8 {
                    prop_assert_eq!(dijkstra.distance(t).unwrap(), bellman.distance(t).unwrap());
                }
            }
        }
    }
}
