//! Graph generators
//!
//! Each generator adds fresh vertices (and edges between them) to a caller graph, so
//! existing content is left alone. Random generators are reproducible per seed.
//! Parameters and graph capabilities are validated before anything is added.

use crate::error::{illegal, GraphResult};
use crate::graph::{Graph, VertexId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

fn add_vertices(graph: &mut dyn Graph, n: usize) -> GraphResult<Vec<VertexId>> {
    (0..n).map(|_| graph.add_vertex()).collect()
}

/// Fresh vertices for a generator that goes on to add edges between them
fn add_vertices_for_edges(graph: &mut dyn Graph, n: usize) -> GraphResult<Vec<VertexId>> {
    graph.accepts_edges()?;
    add_vertices(graph, n)
}

fn require_self_loops(graph: &dyn Graph, what: &str) -> GraphResult<()> {
    if graph.graph_type().allow_self_loops {
        Ok(())
    } else {
        Err(illegal(format!("{} requires a graph that allows self-loops", what)))
    }
}

pub fn empty(graph: &mut dyn Graph, n: usize) -> GraphResult<Vec<VertexId>> {
    add_vertices(graph, n)
}

/// Every pair of distinct vertices is adjacent; both directions when directed
pub fn complete(graph: &mut dyn Graph, n: usize) -> GraphResult<Vec<VertexId>> {
    let vertices = add_vertices_for_edges(graph, n)?;
    let directed = graph.graph_type().directed;
    for (i, &u) in vertices.iter().enumerate() {
        for (j, &v) in vertices.iter().enumerate() {
            if i < j || (directed && i != j) {
                graph.add_edge(u, v, None)?;
            }
        }
    }
    debug!("Generated complete graph on {} vertices", n);
    Ok(vertices)
}

/// Partition `a` first, then partition `b`; edges go from `a` to `b`
pub fn complete_bipartite(graph: &mut dyn Graph, a: usize, b: usize) -> GraphResult<Vec<VertexId>> {
    let vertices = add_vertices_for_edges(graph, a + b)?;
    let (left, right) = vertices.split_at(a);
    for &u in left {
        for &v in right {
            graph.add_edge(u, v, None)?;
        }
    }
    Ok(vertices)
}

/// A cycle through `n` vertices; a single edge when `n == 2`
pub fn ring(graph: &mut dyn Graph, n: usize) -> GraphResult<Vec<VertexId>> {
    let vertices = add_vertices_for_edges(graph, n)?;
    for i in 1..n {
        graph.add_edge(vertices[i - 1], vertices[i], None)?;
    }
    if n > 2 {
        graph.add_edge(vertices[n - 1], vertices[0], None)?;
    }
    Ok(vertices)
}

/// Erdős–Rényi G(n, p): every candidate edge is present with probability `p`
pub fn gnp_random(
    graph: &mut dyn Graph,
    n: usize,
    p: f64,
    create_loops: bool,
    seed: u64,
) -> GraphResult<Vec<VertexId>> {
    if !(0.0..=1.0).contains(&p) {
        return Err(illegal(format!("probability {} is not in [0, 1]", p)));
    }
    if create_loops {
        require_self_loops(graph, "G(n, p) with loops")?;
    }
    let vertices = add_vertices_for_edges(graph, n)?;
    let directed = graph.graph_type().directed;
    let mut rng = StdRng::seed_from_u64(seed);
    for i in 0..n {
        let from = if directed { 0 } else { i };
        for j in from..n {
            if i == j && !create_loops {
                continue;
            }
            if rng.gen::<f64>() < p {
                graph.add_edge(vertices[i], vertices[j], None)?;
            }
        }
    }
    Ok(vertices)
}

/// Erdős–Rényi G(n, m): exactly `m` edges drawn uniformly at random
pub fn gnm_random(
    graph: &mut dyn Graph,
    n: usize,
    m: usize,
    loops: bool,
    multiple_edges: bool,
    seed: u64,
) -> GraphResult<Vec<VertexId>> {
    let graph_type = graph.graph_type();
    if loops {
        require_self_loops(graph, "G(n, m) with loops")?;
    }
    if multiple_edges && !graph_type.allow_multiple_edges {
        return Err(illegal("G(n, m) with multiple edges requires a multigraph"));
    }
    if m > 0 && n == 0 {
        return Err(illegal("cannot place edges on zero vertices"));
    }
    if !multiple_edges {
        let pairs = if graph_type.directed { n * n.saturating_sub(1) } else { n * n.saturating_sub(1) / 2 };
        let max = pairs + if loops { n } else { 0 };
        if m > max {
            return Err(illegal(format!("{} edges exceed the maximum of {} for {} vertices", m, max, n)));
        }
    } else if !loops && n < 2 && m > 0 {
        return Err(illegal("edges without loops need at least two vertices"));
    }

    let vertices = add_vertices_for_edges(graph, n)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut added = 0;
    while added < m {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u == v && !loops {
            continue;
        }
        let key = if graph_type.directed { (u, v) } else { (u.min(v), u.max(v)) };
        if !multiple_edges && !seen.insert(key) {
            continue;
        }
        graph.add_edge(vertices[u], vertices[v], None)?;
        added += 1;
    }
    Ok(vertices)
}

/// Barabási–Albert preferential attachment
///
/// Starts from a complete graph on `m0` vertices and grows to `n` vertices, each new
/// vertex attaching to `m` distinct existing vertices chosen proportionally to degree.
pub fn barabasi_albert(graph: &mut dyn Graph, m0: usize, m: usize, n: usize, seed: u64) -> GraphResult<Vec<VertexId>> {
    if m0 < 1 {
        return Err(illegal("initial clique must have at least one vertex"));
    }
    if m < 1 || m > m0 {
        return Err(illegal(format!("m must be in [1, {}], got {}", m0, m)));
    }
    if n < m0 {
        return Err(illegal(format!("total vertices {} is less than the initial {}", n, m0)));
    }
    let mut vertices = complete(graph, m0)?;
    // One entry per edge endpoint, so sampling is degree proportional
    let mut endpoints: Vec<usize> = Vec::new();
    for i in 0..m0 {
        for j in (i + 1)..m0 {
            endpoints.push(i);
            endpoints.push(j);
        }
    }
    let mut rng = StdRng::seed_from_u64(seed);
    for new_idx in m0..n {
        let v = graph.add_vertex()?;
        vertices.push(v);
        let mut targets: Vec<usize> = Vec::with_capacity(m);
        while targets.len() < m {
            let candidate = match endpoints.choose(&mut rng) {
                Some(&c) => c,
                None => rng.gen_range(0..new_idx),
            };
            if !targets.contains(&candidate) {
                targets.push(candidate);
            }
        }
        for t in targets {
            graph.add_edge(v, vertices[t], None)?;
            endpoints.push(new_idx);
            endpoints.push(t);
        }
    }
    debug!("Generated Barabasi-Albert graph with {} vertices", n);
    Ok(vertices)
}

/// Watts–Strogatz small world
///
/// Builds a ring lattice where each vertex links to its `k / 2` successors, then with
/// probability `p` rewires each lattice edge to a random target, or adds a shortcut
/// instead when `add_instead_of_rewire` is set.
pub fn watts_strogatz(
    graph: &mut dyn Graph,
    n: usize,
    k: usize,
    p: f64,
    add_instead_of_rewire: bool,
    seed: u64,
) -> GraphResult<Vec<VertexId>> {
    if n < 3 {
        return Err(illegal("Watts-Strogatz needs at least 3 vertices"));
    }
    if k % 2 != 0 || k < 2 || k >= n {
        return Err(illegal(format!("k must be even and in [2, {}), got {}", n, k)));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(illegal(format!("probability {} is not in [0, 1]", p)));
    }
    let vertices = add_vertices_for_edges(graph, n)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut present: HashSet<(usize, usize)> = HashSet::new();
    let key = |u: usize, v: usize| (u.min(v), u.max(v));

    let mut lattice = Vec::with_capacity(n * k / 2);
    for i in 0..n {
        for offset in 1..=k / 2 {
            let j = (i + offset) % n;
            lattice.push((i, j));
            present.insert(key(i, j));
        }
    }

    let mut final_edges = Vec::with_capacity(lattice.len());
    for (i, j) in lattice {
        if rng.gen::<f64>() >= p {
            final_edges.push((i, j));
            continue;
        }
        // Pick a target that keeps the graph simple; give up after n attempts
        let mut chosen = None;
        for _ in 0..n {
            let t = rng.gen_range(0..n);
            if t != i && !present.contains(&key(i, t)) {
                chosen = Some(t);
                break;
            }
        }
        match chosen {
            Some(t) => {
                present.insert(key(i, t));
                if add_instead_of_rewire {
                    final_edges.push((i, j));
                } else {
                    present.remove(&key(i, j));
                }
                final_edges.push((i, t));
            }
            None => final_edges.push((i, j)),
        }
    }
    for (u, v) in final_edges {
        graph.add_edge(vertices[u], vertices[v], None)?;
    }
    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphStore, GraphType};

    fn simple(directed: bool) -> GraphStore {
        GraphStore::new(GraphType::new(directed, false, false, false))
    }

    #[test]
    fn test_complete() {
        let mut g = simple(false);
        complete(&mut g, 5).unwrap();
        assert_eq!(g.edge_count(), 10);
        let mut d = simple(true);
        complete(&mut d, 4).unwrap();
        assert_eq!(d.edge_count(), 12);
    }

    #[test]
    fn test_complete_bipartite_and_ring() {
        let mut g = simple(false);
        complete_bipartite(&mut g, 2, 3).unwrap();
        assert_eq!(g.edge_count(), 6);

        let mut r = simple(false);
        ring(&mut r, 6).unwrap();
        assert_eq!(r.edge_count(), 6);
        for v in r.vertices() {
            assert_eq!(r.degree_of(v).unwrap(), 2);
        }
    }

    #[test]
    fn test_generators_extend_existing_graph() {
        let mut g = simple(false);
        g.add_vertex().unwrap();
        let added = ring(&mut g, 3).unwrap();
        assert_eq!(added, vec![VertexId(1), VertexId(2), VertexId(3)]);
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn test_target_refusing_edges_is_left_untouched() {
        use crate::graph::{shared, ViewGraph, ViewKind};
        let base = shared(simple(true));
        let mut view = ViewGraph::new(base.clone(), ViewKind::Undirected);
        assert!(complete(&mut view, 4).is_err());
        assert!(barabasi_albert(&mut view, 2, 1, 6, 3).is_err());
        assert_eq!(base.read().vertex_count(), 0);
        // vertices alone are fine
        assert_eq!(empty(&mut view, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_gnm_exact_edge_count_and_seed() {
        let mut a = simple(false);
        gnm_random(&mut a, 10, 20, false, false, 7).unwrap();
        assert_eq!(a.edge_count(), 20);

        let mut b = simple(false);
        gnm_random(&mut b, 10, 20, false, false, 7).unwrap();
        let ends = |g: &GraphStore| -> Vec<(VertexId, VertexId)> {
            g.edges()
                .into_iter()
                .map(|e| (g.edge_source(e).unwrap(), g.edge_target(e).unwrap()))
                .collect()
        };
        assert_eq!(ends(&a), ends(&b));

        let mut c = simple(false);
        assert!(gnm_random(&mut c, 4, 7, false, false, 1).is_err());
        assert_eq!(c.vertex_count(), 0);
        assert!(gnm_random(&mut c, 4, 2, true, false, 1).is_err());
    }

    #[test]
    fn test_gnp_extremes() {
        let mut g = simple(false);
        gnp_random(&mut g, 6, 1.0, false, 3).unwrap();
        assert_eq!(g.edge_count(), 15);
        let mut h = simple(true);
        gnp_random(&mut h, 6, 0.0, false, 3).unwrap();
        assert_eq!(h.edge_count(), 0);
        assert!(gnp_random(&mut h, 3, 1.5, false, 3).is_err());
    }

    #[test]
    fn test_barabasi_albert() {
        let mut g = simple(false);
        barabasi_albert(&mut g, 3, 2, 20, 11).unwrap();
        assert_eq!(g.vertex_count(), 20);
        assert_eq!(g.edge_count(), 3 + 17 * 2);
        assert!(barabasi_albert(&mut simple(false), 2, 3, 10, 1).is_err());
    }

    #[test]
    fn test_watts_strogatz() {
        let mut g = simple(false);
        watts_strogatz(&mut g, 10, 4, 0.3, false, 5).unwrap();
        assert_eq!(g.edge_count(), 20);

        let mut lattice = simple(false);
        watts_strogatz(&mut lattice, 8, 2, 0.0, false, 5).unwrap();
        for v in lattice.vertices() {
            assert_eq!(lattice.degree_of(v).unwrap(), 2);
        }
        assert!(watts_strogatz(&mut simple(false), 10, 3, 0.1, false, 1).is_err());
    }
}
