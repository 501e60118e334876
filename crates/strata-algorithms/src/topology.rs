//! Graph topology analysis algorithms
//!
//! Triangle counting, distance metrics (diameter, radius, girth) and structural predicates.

use super::common::{GraphView, NodeId};
use super::community::weakly_connected_components;
use super::error::AlgoResult;
use super::pathfinding::dense_distances;
use rayon::prelude::*;
use std::collections::{HashSet, VecDeque};

fn neighbor_set(view: &GraphView, u: usize) -> HashSet<usize> {
    view.incident(u).map(|(v, _)| v).filter(|&v| v != u).collect()
}

/// Triangle Counting
///
/// Returns total number of triangles in the graph.
/// Direction, self-loops and parallel edges are ignored; each triangle is counted once.
pub fn count_triangles(view: &GraphView) -> usize {
    let mut triangle_count = 0;

    // To avoid overcounting, only consider nodes with indices u < v < w.
    let neighbors: Vec<HashSet<usize>> = (0..view.node_count).map(|u| neighbor_set(view, u)).collect();
    for u in 0..view.node_count {
        for &v in &neighbors[u] {
            if v <= u {
                continue;
            }
            for &w in &neighbors[v] {
                if w <= v {
                    continue;
                }
                if neighbors[u].contains(&w) {
                    triangle_count += 1;
                }
            }
        }
    }

    triangle_count
}

/// Eccentricity of every vertex, `f64::INFINITY` when some vertex is unreachable
pub fn eccentricities(view: &GraphView) -> AlgoResult<Vec<(NodeId, f64)>> {
    view.require_non_negative_weights("graph metrics")?;
    let rows: AlgoResult<Vec<f64>> = (0..view.node_count)
        .into_par_iter()
        .map(|i| {
            let dist = dense_distances(view, i, false)?;
            Ok(dist.into_iter().fold(0.0, f64::max))
        })
        .collect();
    Ok(rows?
        .into_iter()
        .enumerate()
        .map(|(i, e)| (view.node(i), e))
        .collect())
}

/// Largest eccentricity; 0 for the empty graph, infinite when disconnected
pub fn diameter(view: &GraphView) -> AlgoResult<f64> {
    Ok(eccentricities(view)?.into_iter().map(|(_, e)| e).fold(0.0, f64::max))
}

/// Smallest eccentricity; 0 for the empty graph
pub fn radius(view: &GraphView) -> AlgoResult<f64> {
    let ecc = eccentricities(view)?;
    if ecc.is_empty() {
        return Ok(0.0);
    }
    Ok(ecc.into_iter().map(|(_, e)| e).fold(f64::INFINITY, f64::min))
}

/// Length of a shortest cycle in edges, `None` when the graph is acyclic
pub fn girth(view: &GraphView) -> Option<usize> {
    if view.edges.iter().any(|e| e.is_self_loop()) {
        return Some(1);
    }
    let n = view.node_count;
    let mut best: Option<usize> = None;
    for root in 0..n {
        let mut dist = vec![usize::MAX; n];
        let mut via = vec![usize::MAX; n];
        let mut queue = VecDeque::new();
        dist[root] = 0;
        queue.push_back(root);
        while let Some(u) = queue.pop_front() {
            // No cycle found from here on can beat the best one
            let shortest_possible = if view.directed { dist[u] + 1 } else { 2 * dist[u] + 1 };
            if best.is_some_and(|b| shortest_possible >= b) {
                break;
            }
            for (w, pos) in view.out_neighbors(u) {
                if view.directed {
                    if w == root {
                        let len = dist[u] + 1;
                        best = Some(best.map_or(len, |b| b.min(len)));
                    } else if dist[w] == usize::MAX {
                        dist[w] = dist[u] + 1;
                        queue.push_back(w);
                    }
                } else if pos != via[u] {
                    if dist[w] == usize::MAX {
                        dist[w] = dist[u] + 1;
                        via[w] = pos;
                        queue.push_back(w);
                    } else {
                        let len = dist[u] + dist[w] + 1;
                        best = Some(best.map_or(len, |b| b.min(len)));
                    }
                }
            }
        }
    }
    best
}

pub fn is_empty(view: &GraphView) -> bool {
    view.edge_count() == 0
}

pub fn has_self_loops(view: &GraphView) -> bool {
    view.edges.iter().any(|e| e.is_self_loop())
}

pub fn has_multiple_edges(view: &GraphView) -> bool {
    let mut seen = HashSet::new();
    view.edges.iter().any(|e| {
        let key = if view.directed || e.source <= e.target {
            (e.source, e.target)
        } else {
            (e.target, e.source)
        };
        !seen.insert(key)
    })
}

pub fn is_simple(view: &GraphView) -> bool {
    !has_self_loops(view) && !has_multiple_edges(view)
}

/// Simple graph with every (ordered, when directed) pair of distinct vertices adjacent
pub fn is_complete(view: &GraphView) -> bool {
    if !is_simple(view) {
        return false;
    }
    let n = view.node_count;
    let pairs = if view.directed { n * n.saturating_sub(1) } else { n * n.saturating_sub(1) / 2 };
    view.edge_count() == pairs
}

pub fn is_triangle_free(view: &GraphView) -> bool {
    count_triangles(view) == 0
}

/// Connected, acyclic undirected graph. The empty graph is not a tree.
pub fn is_tree(view: &GraphView) -> AlgoResult<bool> {
    view.require_undirected("tree test")?;
    if view.node_count == 0 {
        return Ok(false);
    }
    Ok(view.edge_count() == view.node_count - 1
        && weakly_connected_components(view).number_of_clusters() == 1)
}

pub fn is_forest(view: &GraphView) -> AlgoResult<bool> {
    view.require_undirected("forest test")?;
    if view.node_count == 0 {
        return Ok(false);
    }
    let components = weakly_connected_components(view).number_of_clusters();
    Ok(view.edge_count() + components == view.node_count)
}

/// Every vertex has degree three
pub fn is_cubic(view: &GraphView) -> AlgoResult<bool> {
    view.require_undirected("cubic test")?;
    Ok((0..view.node_count).all(|v| view.degree(v) == 3))
}

/// More edges than a maximum degree colouring of a simple graph can accommodate
pub fn is_overfull(view: &GraphView) -> AlgoResult<bool> {
    view.require_undirected("overfull test")?;
    let max_degree = (0..view.node_count).map(|v| view.degree(v)).max().unwrap_or(0);
    Ok(view.edge_count() > max_degree * (view.node_count / 2))
}

/// Two-colouring ignoring direction, `None` when an odd cycle exists
pub fn bipartition(view: &GraphView) -> Option<(Vec<NodeId>, Vec<NodeId>)> {
    let n = view.node_count;
    let mut side: Vec<Option<bool>> = vec![None; n];
    for root in 0..n {
        if side[root].is_some() {
            continue;
        }
        side[root] = Some(false);
        let mut queue = VecDeque::from([root]);
        while let Some(u) = queue.pop_front() {
            let su = side[u].unwrap_or(false);
            for (v, _) in view.incident(u) {
                match side[v] {
                    None => {
                        side[v] = Some(!su);
                        queue.push_back(v);
                    }
                    Some(sv) if sv == su => return None,
                    Some(_) => {}
                }
            }
        }
    }
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (i, s) in side.into_iter().enumerate() {
        if s == Some(true) {
            right.push(view.node(i));
        } else {
            left.push(view.node(i));
        }
    }
    Some((left, right))
}

pub fn is_bipartite(view: &GraphView) -> bool {
    bipartition(view).is_some()
}

/// Has a closed walk using every edge exactly once. Isolated vertices are ignored.
pub fn is_eulerian(view: &GraphView) -> bool {
    let n = view.node_count;
    let balanced = if view.directed {
        (0..n).all(|v| view.in_degree(v) == view.out_degree(v))
    } else {
        (0..n).all(|v| view.degree(v) % 2 == 0)
    };
    if !balanced {
        return false;
    }
    let components = weakly_connected_components(view);
    let touched: HashSet<usize> = view
        .edges
        .iter()
        .map(|e| components.assignment[&view.node(e.source)])
        .collect();
    touched.len() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{unweighted, view};

    fn complete(n: u64) -> GraphView {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j));
            }
        }
        unweighted(n, &edges, false)
    }

    #[test]
    fn test_triangle_counting() {
        // Complete graph K4: 4 triangles.
        assert_eq!(count_triangles(&complete(4)), 4);
        assert!(is_complete(&complete(4)));
        assert!(!is_triangle_free(&complete(4)));
    }

    #[test]
    fn test_metrics_on_path() {
        let path = unweighted(4, &[(0, 1), (1, 2), (2, 3)], false);
        assert_eq!(diameter(&path).unwrap(), 3.0);
        assert_eq!(radius(&path).unwrap(), 2.0);
        assert_eq!(girth(&path), None);
        assert!(is_tree(&path).unwrap());
        assert!(is_forest(&path).unwrap());
        assert!(is_bipartite(&path));
    }

    #[test]
    fn test_weighted_diameter_and_disconnected() {
        let g = view(3, &[(0, 1, 2.5), (1, 2, 1.0)], false);
        assert_eq!(diameter(&g).unwrap(), 3.5);
        let split = unweighted(3, &[(0, 1)], false);
        assert!(diameter(&split).unwrap().is_infinite());
    }

    #[test]
    fn test_girth() {
        let square = unweighted(4, &[(0, 1), (1, 2), (2, 3), (3, 0)], false);
        assert_eq!(girth(&square), Some(4));
        assert_eq!(girth(&complete(4)), Some(3));
        let directed = unweighted(3, &[(0, 1), (1, 2), (2, 0)], true);
        assert_eq!(girth(&directed), Some(3));
        let parallel = unweighted(2, &[(0, 1), (0, 1)], false);
        assert_eq!(girth(&parallel), Some(2));
    }

    #[test]
    fn test_predicates() {
        let parallel = unweighted(2, &[(0, 1), (1, 0)], false);
        assert!(has_multiple_edges(&parallel));
        assert!(!is_simple(&parallel));
        let directed_pair = unweighted(2, &[(0, 1), (1, 0)], true);
        assert!(!has_multiple_edges(&directed_pair));
        assert!(is_complete(&directed_pair));
        assert!(is_cubic(&complete(4)).unwrap());
        assert!(!is_bipartite(&complete(3)));
        assert!(is_eulerian(&complete(5)));
        assert!(!is_eulerian(&complete(4)));
        // K3 has 3 edges but max degree 2 * floor(3 / 2) = 2
        assert!(is_overfull(&complete(3)).unwrap());
        assert!(is_empty(&unweighted(3, &[], false)));
    }
}
