//! Vertex cover algorithms on undirected graphs
//!
//! Vertex weights default to 1 when no weight map is supplied.

use super::common::{GraphView, NodeId};
use super::error::{illegal, AlgoResult};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexCoverResult {
    /// Sum of the chosen vertex weights
    pub weight: f64,
    /// Cover members in snapshot order
    pub vertices: Vec<NodeId>,
}

fn vertex_weights(view: &GraphView, weights: Option<&HashMap<NodeId, f64>>) -> AlgoResult<Vec<f64>> {
    let mut dense = vec![1.0; view.node_count];
    if let Some(map) = weights {
        for (i, w) in dense.iter_mut().enumerate() {
            if let Some(&given) = map.get(&view.node(i)) {
                if given < 0.0 {
                    return Err(illegal(format!(
                        "vertex {} has negative weight {}",
                        view.node(i),
                        given
                    )));
                }
                *w = given;
            }
        }
    }
    Ok(dense)
}

fn result(view: &GraphView, weights: &[f64], chosen: &[bool]) -> VertexCoverResult {
    let mut weight = 0.0;
    let mut vertices = Vec::new();
    for (i, &c) in chosen.iter().enumerate() {
        if c {
            weight += weights[i];
            vertices.push(view.node(i));
        }
    }
    VertexCoverResult { weight, vertices }
}

/// Number of edges at each vertex not yet covered
fn uncovered_degrees(view: &GraphView, chosen: &[bool]) -> Vec<usize> {
    let mut degree = vec![0usize; view.node_count];
    for e in &view.edges {
        if chosen[e.source] || chosen[e.target] {
            continue;
        }
        degree[e.source] += 1;
        if !e.is_self_loop() {
            degree[e.target] += 1;
        }
    }
    degree
}

/// Greedy: repeatedly take the vertex with the lowest weight per uncovered edge
pub fn greedy(view: &GraphView, weights: Option<&HashMap<NodeId, f64>>) -> AlgoResult<VertexCoverResult> {
    view.require_undirected("vertex cover")?;
    let w = vertex_weights(view, weights)?;
    let mut chosen = vec![false; view.node_count];
    loop {
        let degree = uncovered_degrees(view, &chosen);
        let best = (0..view.node_count)
            .filter(|&v| degree[v] > 0)
            .min_by(|&a, &b| {
                (w[a] / degree[a] as f64)
                    .total_cmp(&(w[b] / degree[b] as f64))
                    .then(a.cmp(&b))
            });
        let Some(v) = best else { break };
        chosen[v] = true;
    }
    Ok(result(view, &w, &chosen))
}

/// Edge based 2-approximation: take both ends of every edge still uncovered
pub fn edge_based(view: &GraphView) -> AlgoResult<VertexCoverResult> {
    view.require_undirected("vertex cover")?;
    let w = vec![1.0; view.node_count];
    let mut chosen = vec![false; view.node_count];
    for e in &view.edges {
        if !chosen[e.source] && !chosen[e.target] {
            chosen[e.source] = true;
            chosen[e.target] = true;
        }
    }
    Ok(result(view, &w, &chosen))
}

/// Clarkson's modified greedy 2-approximation for weighted covers
pub fn clarkson(view: &GraphView, weights: Option<&HashMap<NodeId, f64>>) -> AlgoResult<VertexCoverResult> {
    view.require_undirected("vertex cover")?;
    let original = vertex_weights(view, weights)?;
    let mut residual = original.clone();
    let mut chosen = vec![false; view.node_count];
    loop {
        let degree = uncovered_degrees(view, &chosen);
        let best = (0..view.node_count)
            .filter(|&v| degree[v] > 0)
            .min_by(|&a, &b| {
                (residual[a] / degree[a] as f64)
                    .total_cmp(&(residual[b] / degree[b] as f64))
                    .then(a.cmp(&b))
            });
        let Some(v) = best else { break };
        let share = residual[v] / degree[v] as f64;
        for e in &view.edges {
            if chosen[e.source] || chosen[e.target] || e.is_self_loop() {
                continue;
            }
            if e.source == v {
                residual[e.target] -= share;
            } else if e.target == v {
                residual[e.source] -= share;
            }
        }
        chosen[v] = true;
    }
    Ok(result(view, &original, &chosen))
}

/// Exact minimum weight cover by branch and bound. Exponential; meant for small graphs.
pub fn exact(view: &GraphView, weights: Option<&HashMap<NodeId, f64>>) -> AlgoResult<VertexCoverResult> {
    view.require_undirected("vertex cover")?;
    let w = vertex_weights(view, weights)?;
    let edges: Vec<(usize, usize)> = view.edges.iter().map(|e| (e.source, e.target)).collect();

    // Start from the greedy cover as the incumbent
    let incumbent = greedy(view, weights)?;
    let mut best_chosen = vec![false; view.node_count];
    for v in &incumbent.vertices {
        best_chosen[view.index_of(*v)?] = true;
    }
    let mut best_weight = incumbent.weight;
    let mut chosen = vec![false; view.node_count];
    branch(&edges, &w, &mut chosen, 0.0, &mut best_weight, &mut best_chosen);
    Ok(result(view, &w, &best_chosen))
}

fn branch(
    edges: &[(usize, usize)],
    w: &[f64],
    chosen: &mut Vec<bool>,
    weight: f64,
    best_weight: &mut f64,
    best: &mut Vec<bool>,
) {
    if weight >= *best_weight {
        return;
    }
    let Some(&(u, v)) = edges.iter().find(|&&(u, v)| !chosen[u] && !chosen[v]) else {
        *best_weight = weight;
        best.clone_from(chosen);
        return;
    };
    for pick in [u, v] {
        chosen[pick] = true;
        branch(edges, w, chosen, weight + w[pick], best_weight, best);
        chosen[pick] = false;
        if u == v {
            break;
        }
    }
}
