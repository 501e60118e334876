//! Travelling salesman heuristics and exact solver
//!
//! Tours are computed on complete undirected graphs, except Palmer's Hamiltonian cycle
//! which only needs Ore's condition. Each is returned as a closed [`PathResult`] whose
//! first and last vertex coincide.

use super::blossom::max_weight_matching;
use super::common::{GraphView, PathResult};
use super::community::UnionFind;
use super::cycles::hierholzer;
use super::error::{illegal, AlgoResult};
use super::topology::is_complete;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Largest vertex count accepted by the exact dynamic program
pub const HELD_KARP_MAX_VERTICES: usize = 20;

/// Dense weights and edge positions of a complete graph
struct TourMatrix<'a> {
    view: &'a GraphView,
    n: usize,
    weight: Array2<f64>,
    edge: Array2<usize>,
}

impl<'a> TourMatrix<'a> {
    fn new(view: &'a GraphView, algorithm: &str) -> AlgoResult<Self> {
        view.require_undirected(algorithm)?;
        let n = view.node_count;
        if n == 0 {
            return Err(illegal(format!("{} needs at least one vertex", algorithm)));
        }
        if !is_complete(view) {
            return Err(illegal(format!("{} requires a complete graph", algorithm)));
        }
        let mut weight = Array2::zeros((n, n));
        let mut edge = Array2::zeros((n, n));
        for (pos, e) in view.edges.iter().enumerate() {
            weight[[e.source, e.target]] = e.weight;
            weight[[e.target, e.source]] = e.weight;
            edge[[e.source, e.target]] = pos;
            edge[[e.target, e.source]] = pos;
        }
        Ok(TourMatrix { view, n, weight, edge })
    }

    fn w(&self, a: usize, b: usize) -> f64 {
        self.weight[[a, b]]
    }

    fn cost(&self, order: &[usize]) -> f64 {
        (0..order.len())
            .map(|i| self.w(order[i], order[(i + 1) % order.len()]))
            .sum()
    }

    fn close(&self, order: &[usize]) -> PathResult {
        let first = self.view.node(order[0]);
        let mut path: Vec<_> = order.iter().map(|&i| self.view.node(i)).collect();
        path.push(first);
        let edges = if order.len() > 1 {
            (0..order.len())
                .map(|i| {
                    let pos = self.edge[[order[i], order[(i + 1) % order.len()]]];
                    self.view.edge(pos).id
                })
                .collect()
        } else {
            Vec::new()
        };
        PathResult {
            source: first,
            target: first,
            path,
            edges,
            cost: if order.len() > 1 { self.cost(order) } else { 0.0 },
        }
    }

    /// Recover a closed path's vertex order (without the repeated endpoint)
    fn order_of(&self, tour: &PathResult) -> AlgoResult<Vec<usize>> {
        let mut order = Vec::with_capacity(self.n);
        let vertices = tour.path.len().saturating_sub(1);
        for &v in tour.path.iter().take(vertices.max(1)) {
            order.push(self.view.index_of(v)?);
        }
        let mut seen = vec![false; self.n];
        for &i in &order {
            if std::mem::replace(&mut seen[i], true) {
                return Err(illegal("tour visits a vertex twice"));
            }
        }
        if order.len() != self.n {
            return Err(illegal("tour must visit every vertex exactly once"));
        }
        Ok(order)
    }

    /// Dense Prim rooted at the first vertex; `(parent, child)` pairs in the order
    /// vertices join the tree
    fn spanning_tree(&self) -> Vec<(usize, usize)> {
        let n = self.n;
        let mut in_tree = vec![false; n];
        let mut best = vec![f64::INFINITY; n];
        let mut parent = vec![usize::MAX; n];
        let mut tree = Vec::with_capacity(n.saturating_sub(1));
        best[0] = 0.0;
        for _ in 0..n {
            let next = (0..n)
                .filter(|&v| !in_tree[v])
                .min_by(|&a, &b| best[a].total_cmp(&best[b]).then(a.cmp(&b)));
            let Some(u) = next else { break };
            in_tree[u] = true;
            if parent[u] != usize::MAX {
                tree.push((parent[u], u));
            }
            for v in 0..n {
                if !in_tree[v] && self.w(u, v) < best[v] {
                    best[v] = self.w(u, v);
                    parent[v] = u;
                }
            }
        }
        tree
    }

    fn two_opt(&self, order: &mut [usize], min_improvement: f64) {
        let n = order.len();
        if n < 4 {
            return;
        }
        loop {
            let mut best = (-min_improvement.max(0.0), 0, 0);
            for i in 1..n - 1 {
                for j in i + 1..n {
                    let (a, b) = (order[i - 1], order[i]);
                    let (c, d) = (order[j], order[(j + 1) % n]);
                    let delta = self.w(a, c) + self.w(b, d) - self.w(a, b) - self.w(c, d);
                    if delta < best.0 - 1e-12 {
                        best = (delta, i, j);
                    }
                }
            }
            if best.1 == 0 {
                break;
            }
            order[best.1..=best.2].reverse();
        }
    }
}

/// A uniformly random tour
pub fn tsp_random(view: &GraphView, seed: u64) -> AlgoResult<PathResult> {
    let m = TourMatrix::new(view, "random tour")?;
    let mut order: Vec<usize> = (0..m.n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    Ok(m.close(&order))
}

/// Nearest neighbour heuristic from a seeded random start
pub fn tsp_nearest_neighbor(view: &GraphView, seed: u64) -> AlgoResult<PathResult> {
    let m = TourMatrix::new(view, "nearest neighbour tour")?;
    let start = StdRng::seed_from_u64(seed).gen_range(0..m.n);
    let mut visited = vec![false; m.n];
    let mut order = vec![start];
    visited[start] = true;
    while order.len() < m.n {
        let last = order[order.len() - 1];
        let next = (0..m.n)
            .filter(|&v| !visited[v])
            .min_by(|&a, &b| m.w(last, a).total_cmp(&m.w(last, b)).then(a.cmp(&b)));
        let Some(next) = next else { break };
        visited[next] = true;
        order.push(next);
    }
    Ok(m.close(&order))
}

/// Greedy edge heuristic: cheapest edges first, keeping degrees at most two and no
/// premature cycle
pub fn tsp_greedy(view: &GraphView) -> AlgoResult<PathResult> {
    let m = TourMatrix::new(view, "greedy tour")?;
    let n = m.n;
    if n < 3 {
        let order: Vec<usize> = (0..n).collect();
        return Ok(m.close(&order));
    }
    let mut positions: Vec<usize> = (0..view.edge_count()).collect();
    positions.sort_by(|&a, &b| view.weight(a).total_cmp(&view.weight(b)).then(a.cmp(&b)));

    let mut degree = vec![0usize; n];
    let mut links: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut uf = UnionFind::new(n);
    let mut added = 0;
    for pos in positions {
        if added == n - 1 {
            break;
        }
        let e = view.edge(pos);
        if degree[e.source] < 2 && degree[e.target] < 2 && uf.union(e.source, e.target) {
            degree[e.source] += 1;
            degree[e.target] += 1;
            links[e.source].push(e.target);
            links[e.target].push(e.source);
            added += 1;
        }
    }

    // Walk the Hamiltonian path from one of its ends
    let start = (0..n).find(|&v| degree[v] < 2).unwrap_or(0);
    let mut order = vec![start];
    let mut prev = usize::MAX;
    let mut curr = start;
    while order.len() < n {
        let Some(&next) = links[curr].iter().find(|&&v| v != prev) else {
            break;
        };
        order.push(next);
        prev = curr;
        curr = next;
    }
    Ok(m.close(&order))
}

/// Nearest insertion heuristic starting from the first vertex
pub fn tsp_nearest_insertion(view: &GraphView) -> AlgoResult<PathResult> {
    let m = TourMatrix::new(view, "nearest insertion tour")?;
    let n = m.n;
    let mut in_tour = vec![false; n];
    let mut order = vec![0];
    in_tour[0] = true;
    // distance from each outside vertex to the tour
    let mut closest: Vec<f64> = (0..n).map(|v| m.w(0, v)).collect();

    while order.len() < n {
        let next = (0..n)
            .filter(|&v| !in_tour[v])
            .min_by(|&a, &b| closest[a].total_cmp(&closest[b]).then(a.cmp(&b)));
        let Some(v) = next else { break };
        let mut best_slot = order.len();
        let mut best_increase = f64::INFINITY;
        if order.len() > 1 {
            for i in 0..order.len() {
                let (a, b) = (order[i], order[(i + 1) % order.len()]);
                let increase = m.w(a, v) + m.w(v, b) - m.w(a, b);
                if increase < best_increase {
                    best_increase = increase;
                    best_slot = i + 1;
                }
            }
        }
        order.insert(best_slot, v);
        in_tour[v] = true;
        for u in 0..n {
            if !in_tour[u] {
                closest[u] = closest[u].min(m.w(v, u));
            }
        }
    }
    Ok(m.close(&order))
}

/// Preorder walk of a minimum spanning tree; at most twice optimal on metric instances
pub fn metric_tsp_two_approx(view: &GraphView) -> AlgoResult<PathResult> {
    let m = TourMatrix::new(view, "metric two-approximation tour")?;
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); m.n];
    for (parent, child) in m.spanning_tree() {
        children[parent].push(child);
    }

    let mut order = Vec::with_capacity(m.n);
    let mut stack = vec![0];
    while let Some(u) = stack.pop() {
        order.push(u);
        stack.extend(children[u].iter().rev());
    }
    Ok(m.close(&order))
}

/// Christofides: a minimum spanning tree plus a minimum weight perfect matching on
/// its odd vertices, walked as an Euler circuit and shortcut at repeated vertices.
/// At most 3/2 times optimal on metric instances.
pub fn metric_tsp_christofides(view: &GraphView) -> AlgoResult<PathResult> {
    let m = TourMatrix::new(view, "Christofides")?;
    let n = m.n;
    if n < 3 {
        let order: Vec<usize> = (0..n).collect();
        return Ok(m.close(&order));
    }
    let mut multigraph = m.spanning_tree();
    let mut degree = vec![0usize; n];
    for &(u, v) in &multigraph {
        degree[u] += 1;
        degree[v] += 1;
    }
    let odd: Vec<usize> = (0..n).filter(|&v| degree[v] % 2 == 1).collect();
    let mut pairs = Vec::new();
    for a in 0..odd.len() {
        for b in (a + 1)..odd.len() {
            pairs.push((a, b, m.w(odd[a], odd[b])));
        }
    }
    // minimum weight perfect matching as a maximum weight one over flipped weights
    let heaviest = pairs.iter().map(|p| p.2).fold(f64::NEG_INFINITY, f64::max);
    let flipped: Vec<(usize, usize, f64)> = pairs.iter().map(|&(a, b, w)| (a, b, heaviest - w + 1.0)).collect();
    for k in max_weight_matching(odd.len(), &flipped, true) {
        let (a, b, _) = pairs[k];
        multigraph.push((odd[a], odd[b]));
    }

    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (i, &(u, v)) in multigraph.iter().enumerate() {
        adjacency[u].push((v, i));
        adjacency[v].push((u, i));
    }
    let mut seen = vec![false; n];
    let order: Vec<usize> = hierholzer(&adjacency, multigraph.len(), 0)
        .into_iter()
        .map(|(v, _)| v)
        .filter(|&v| !std::mem::replace(&mut seen[v], true))
        .collect();
    debug!(odd = odd.len(), "christofides finished");
    Ok(m.close(&order))
}

/// Palmer's algorithm for a Hamiltonian cycle in a graph meeting Ore's condition
/// (`deg(u) + deg(v) >= n` for every non-adjacent pair). Starts from the vertex
/// order and repairs one gap at a time by reversing a segment.
pub fn hamiltonian_palmer(view: &GraphView) -> AlgoResult<PathResult> {
    view.require_undirected("Palmer")?;
    let n = view.node_count;
    if n < 3 {
        return Err(illegal("Palmer needs at least 3 vertices"));
    }
    let mut adjacent = Array2::from_elem((n, n), false);
    for e in view.edges.iter().filter(|e| !e.is_self_loop()) {
        adjacent[[e.source, e.target]] = true;
        adjacent[[e.target, e.source]] = true;
    }
    let degree: Vec<usize> = (0..n).map(|u| (0..n).filter(|&v| adjacent[[u, v]]).count()).collect();
    for u in 0..n {
        for v in (u + 1)..n {
            if !adjacent[[u, v]] && degree[u] + degree[v] < n {
                return Err(illegal(format!(
                    "graph does not satisfy Ore's condition at vertices {} and {}",
                    view.node(u),
                    view.node(v)
                )));
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    while let Some(gap) = (0..n).find(|&i| !adjacent[[order[i], order[(i + 1) % n]]]) {
        // rotate the gap to the front, then find a crossing pair to reverse between
        order.rotate_left(gap);
        let Some(j) = (2..n - 1).find(|&j| adjacent[[order[0], order[j]]] && adjacent[[order[1], order[j + 1]]]) else {
            return Err(illegal("Palmer could not close a gap"));
        };
        order[1..=j].reverse();
    }
    let start = order.iter().position(|&v| v == 0).unwrap_or(0);
    order.rotate_left(start);

    let mut path: Vec<_> = order.iter().map(|&v| view.node(v)).collect();
    path.push(view.node(order[0]));
    let mut edges = Vec::with_capacity(n);
    let mut cost = 0.0;
    for i in 0..n {
        let (u, v) = (order[i], order[(i + 1) % n]);
        let pos = view
            .min_edge_between(u, v)
            .ok_or_else(|| illegal("tour step without an edge"))?;
        edges.push(view.edge(pos).id);
        cost += view.weight(pos);
    }
    Ok(PathResult {
        source: view.node(order[0]),
        target: view.node(order[0]),
        path,
        edges,
        cost,
    })
}

/// Exact optimum by the Held-Karp dynamic program over vertex subsets
pub fn tsp_held_karp(view: &GraphView) -> AlgoResult<PathResult> {
    let m = TourMatrix::new(view, "Held-Karp")?;
    let n = m.n;
    if n > HELD_KARP_MAX_VERTICES {
        return Err(illegal(format!(
            "Held-Karp supports at most {} vertices, got {}",
            HELD_KARP_MAX_VERTICES, n
        )));
    }
    if n < 3 {
        let order: Vec<usize> = (0..n).collect();
        return Ok(m.close(&order));
    }

    // cost[mask][v]: cheapest path from vertex 0 through `mask` (over vertices 1..n) ending in v
    let states = 1usize << (n - 1);
    let mut cost = vec![vec![f64::INFINITY; n]; states];
    let mut back = vec![vec![usize::MAX; n]; states];
    for v in 1..n {
        cost[1 << (v - 1)][v] = m.w(0, v);
    }
    for mask in 1..states {
        for v in 1..n {
            let bit = 1 << (v - 1);
            if mask & bit == 0 || cost[mask][v].is_infinite() {
                continue;
            }
            for u in 1..n {
                let ubit = 1 << (u - 1);
                if mask & ubit != 0 {
                    continue;
                }
                let candidate = cost[mask][v] + m.w(v, u);
                if candidate < cost[mask | ubit][u] {
                    cost[mask | ubit][u] = candidate;
                    back[mask | ubit][u] = v;
                }
            }
        }
    }

    let full = states - 1;
    let last = (1..n)
        .min_by(|&a, &b| {
            (cost[full][a] + m.w(a, 0))
                .total_cmp(&(cost[full][b] + m.w(b, 0)))
                .then(a.cmp(&b))
        })
        .unwrap_or(1);

    let mut order = Vec::with_capacity(n);
    let mut mask = full;
    let mut v = last;
    while v != usize::MAX && v != 0 {
        order.push(v);
        let prev = back[mask][v];
        mask &= !(1 << (v - 1));
        v = prev;
    }
    order.push(0);
    order.reverse();
    Ok(m.close(&order))
}

/// 2-opt configuration
#[derive(Debug, Clone)]
pub struct TwoOptConfig {
    /// Number of random initial tours to improve
    pub passes: usize,
    /// Smallest cost decrease accepted as an improvement
    pub min_cost_improvement: f64,
    pub seed: u64,
}

impl Default for TwoOptConfig {
    fn default() -> Self {
        Self {
            passes: 1,
            min_cost_improvement: 0.0001,
            seed: 17,
        }
    }
}

/// Best 2-opt local optimum over several random starting tours
pub fn tsp_two_opt(view: &GraphView, config: TwoOptConfig) -> AlgoResult<PathResult> {
    if config.passes == 0 {
        return Err(illegal("2-opt needs at least one pass"));
    }
    let m = TourMatrix::new(view, "2-opt")?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<(f64, Vec<usize>)> = None;
    for _ in 0..config.passes {
        let mut order: Vec<usize> = (0..m.n).collect();
        order.shuffle(&mut rng);
        m.two_opt(&mut order, config.min_cost_improvement);
        let cost = m.cost(&order);
        if best.as_ref().map_or(true, |(c, _)| cost < *c) {
            best = Some((cost, order));
        }
    }
    let Some((cost, order)) = best else {
        return Err(illegal("2-opt produced no tour"));
    };
    debug!(cost, passes = config.passes, "2-opt finished");
    Ok(m.close(&order))
}

/// Improve an existing closed tour with 2-opt moves, keeping its start vertex
pub fn tsp_two_opt_improve(view: &GraphView, tour: &PathResult, min_cost_improvement: f64) -> AlgoResult<PathResult> {
    let m = TourMatrix::new(view, "2-opt")?;
    let mut order = m.order_of(tour)?;
    m.two_opt(&mut order, min_cost_improvement);
    Ok(m.close(&order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::view;

    /// Corners of a unit square: sides cost 1, diagonals cost 2; the optimum is 4
    fn square() -> GraphView {
        view(
            4,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0), (0, 2, 2.0), (1, 3, 2.0)],
            false,
        )
    }

    fn complete(n: u64) -> GraphView {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j, ((i * 7 + j * 3) % 10) as f64 + 1.0));
            }
        }
        view(n, &edges, false)
    }

    fn assert_tour(g: &GraphView, tour: &PathResult) {
        assert_eq!(tour.path.first(), tour.path.last());
        assert_eq!(tour.edges.len(), g.node_count);
        let mut inner = tour.path[..tour.path.len() - 1].to_vec();
        inner.sort_unstable();
        assert_eq!(inner, (0..g.node_count as u64).collect::<Vec<_>>());
    }

    #[test]
    fn test_square_optimum() {
        let g = square();
        let exact = tsp_held_karp(&g).unwrap();
        assert_eq!(exact.cost, 4.0);
        assert_eq!(exact.source, 0);
        assert_tour(&g, &exact);
        assert_eq!(tsp_greedy(&g).unwrap().cost, 4.0);
        assert_eq!(tsp_nearest_insertion(&g).unwrap().cost, 4.0);
        assert_eq!(metric_tsp_two_approx(&g).unwrap().cost, 4.0);
        assert_eq!(metric_tsp_christofides(&g).unwrap().cost, 4.0);
        assert_eq!(tsp_two_opt(&g, TwoOptConfig::default()).unwrap().cost, 4.0);
    }

    #[test]
    fn test_heuristics_produce_tours() {
        let g = complete(8);
        let optimum = tsp_held_karp(&g).unwrap();
        for tour in [
            tsp_random(&g, 17),
            tsp_nearest_neighbor(&g, 17),
            tsp_greedy(&g),
            tsp_nearest_insertion(&g),
            metric_tsp_two_approx(&g),
            metric_tsp_christofides(&g),
            hamiltonian_palmer(&g),
            tsp_two_opt(&g, TwoOptConfig { passes: 4, ..Default::default() }),
        ] {
            let tour = tour.unwrap();
            assert_tour(&g, &tour);
            assert!(tour.cost >= optimum.cost - 1e-9);
        }
    }

    #[test]
    fn test_two_opt_improve_keeps_start() {
        let g = complete(8);
        let start = tsp_random(&g, 3).unwrap();
        let improved = tsp_two_opt_improve(&g, &start, 0.0001).unwrap();
        assert_eq!(improved.source, start.source);
        assert!(improved.cost <= start.cost);
        assert_tour(&g, &improved);
    }

    #[test]
    fn test_palmer_on_incomplete_graph() {
        // a six-cycle with all "long" chords: every vertex has degree 3 = n / 2
        let g = view(
            6,
            &[
                (0, 2, 1.0),
                (2, 4, 1.0),
                (4, 1, 1.0),
                (1, 3, 1.0),
                (3, 5, 1.0),
                (5, 0, 1.0),
                (0, 3, 1.0),
                (1, 4, 1.0),
                (2, 5, 1.0),
            ],
            false,
        );
        let cycle = hamiltonian_palmer(&g).unwrap();
        assert_eq!(cycle.source, 0);
        assert_tour(&g, &cycle);
        assert_eq!(cycle.cost, 6.0);

        let path = view(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)], false);
        assert!(hamiltonian_palmer(&path).is_err());
    }

    #[test]
    fn test_incomplete_rejected() {
        let g = view(3, &[(0, 1, 1.0), (1, 2, 1.0)], false);
        assert!(tsp_greedy(&g).is_err());
    }
}
