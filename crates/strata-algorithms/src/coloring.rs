//! Vertex coloring heuristics
//!
//! Greedy colorings differ only in the order vertices are visited; each vertex takes the
//! smallest color not used by an already colored neighbour. Edge direction is ignored.

use super::common::{GraphView, NodeId};
use super::error::AlgoResult;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColoringResult {
    pub number_of_colors: usize,
    pub colors: HashMap<NodeId, usize>,
}

impl ColoringResult {
    fn from_dense(view: &GraphView, colors: Vec<usize>) -> Self {
        let number_of_colors = colors.iter().map(|c| c + 1).max().unwrap_or(0);
        ColoringResult {
            number_of_colors,
            colors: colors
                .into_iter()
                .enumerate()
                .map(|(i, c)| (view.node(i), c))
                .collect(),
        }
    }
}

fn smallest_free(view: &GraphView, v: usize, colors: &[Option<usize>]) -> usize {
    let mut used: Vec<bool> = vec![false; view.degree(v) + 1];
    for (u, _) in view.incident(v) {
        if let Some(c) = colors[u] {
            if c < used.len() {
                used[c] = true;
            }
        }
    }
    used.iter().position(|&taken| !taken).unwrap_or(used.len())
}

fn greedy_in_order(view: &GraphView, order: &[usize]) -> AlgoResult<ColoringResult> {
    view.require_no_self_loops("coloring")?;
    let mut colors: Vec<Option<usize>> = vec![None; view.node_count];
    for &v in order {
        colors[v] = Some(smallest_free(view, v, &colors));
    }
    Ok(ColoringResult::from_dense(
        view,
        colors.into_iter().map(|c| c.unwrap_or(0)).collect(),
    ))
}

/// Greedy coloring in snapshot vertex order
pub fn greedy(view: &GraphView) -> AlgoResult<ColoringResult> {
    let order: Vec<usize> = (0..view.node_count).collect();
    greedy_in_order(view, &order)
}

/// Greedy coloring visiting vertices by decreasing degree
pub fn greedy_largest_degree_first(view: &GraphView) -> AlgoResult<ColoringResult> {
    let mut order: Vec<usize> = (0..view.node_count).collect();
    order.sort_by_key(|&v| std::cmp::Reverse(view.degree(v)));
    greedy_in_order(view, &order)
}

/// Greedy coloring in reverse smallest-last (degeneracy) order
pub fn greedy_smallest_degree_last(view: &GraphView) -> AlgoResult<ColoringResult> {
    let mut order = super::traversal::degeneracy_order_indices(view);
    order.reverse();
    greedy_in_order(view, &order)
}

/// Greedy coloring in a seeded random order
pub fn greedy_random(view: &GraphView, seed: u64) -> AlgoResult<ColoringResult> {
    let mut order: Vec<usize> = (0..view.node_count).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    greedy_in_order(view, &order)
}

/// DSatur: always color the vertex with the most distinctly colored neighbours,
/// breaking ties by degree and then by snapshot order.
pub fn dsatur(view: &GraphView) -> AlgoResult<ColoringResult> {
    view.require_no_self_loops("coloring")?;
    let n = view.node_count;
    let mut colors: Vec<Option<usize>> = vec![None; n];
    let mut neighbour_colors: Vec<Vec<usize>> = vec![Vec::new(); n];

    for _ in 0..n {
        let next = (0..n).filter(|&v| colors[v].is_none()).max_by(|&a, &b| {
            neighbour_colors[a]
                .len()
                .cmp(&neighbour_colors[b].len())
                .then(view.degree(a).cmp(&view.degree(b)))
                .then(b.cmp(&a))
        });
        let Some(v) = next else { break };
        let c = smallest_free(view, v, &colors);
        colors[v] = Some(c);
        for (u, _) in view.incident(v) {
            if !neighbour_colors[u].contains(&c) {
                neighbour_colors[u].push(c);
            }
        }
    }

    Ok(ColoringResult::from_dense(
        view,
        colors.into_iter().map(|c| c.unwrap_or(0)).collect(),
    ))
}

/// Color refinement (1-dimensional Weisfeiler-Leman)
///
/// Not a proper coloring: vertices share a color iff refinement cannot tell them apart.
/// Color classes are numbered in order of their smallest member.
pub fn color_refinement(view: &GraphView) -> AlgoResult<ColoringResult> {
    let n = view.node_count;
    let mut colors = vec![0usize; n];
    let mut classes = usize::from(n > 0);

    loop {
        let signatures: Vec<(usize, Vec<usize>)> = (0..n)
            .map(|v| {
                let mut around: Vec<usize> = view.incident(v).map(|(u, _)| colors[u]).collect();
                around.sort_unstable();
                (colors[v], around)
            })
            .collect();

        let mut numbering: BTreeMap<&(usize, Vec<usize>), usize> = BTreeMap::new();
        let mut next = vec![0usize; n];
        for (v, sig) in signatures.iter().enumerate() {
            let fresh = numbering.len();
            next[v] = *numbering.entry(sig).or_insert(fresh);
        }
        let refined = numbering.len();
        colors = next;
        if refined == classes {
            break;
        }
        classes = refined;
    }

    Ok(ColoringResult::from_dense(view, colors))
}
