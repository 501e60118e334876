//! Matching algorithms on undirected graphs
//!
//! Greedy maximal matchings (cardinality and weight), Hopcroft-Karp for maximum
//! cardinality matchings of bipartite graphs, and exact general matchings (maximum
//! cardinality, maximum and minimum weight, perfect) through the blossom algorithm.

use super::blossom::max_weight_matching;
use super::common::{EdgeId, GraphView, NodeId};
use super::error::{illegal, AlgoResult};
use super::topology::bipartition;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchingResult {
    /// Sum of the matched edge weights
    pub weight: f64,
    pub edges: Vec<EdgeId>,
}

impl MatchingResult {
    fn from_positions(view: &GraphView, positions: Vec<usize>) -> Self {
        MatchingResult {
            weight: positions.iter().map(|&p| view.weight(p)).sum(),
            edges: positions.into_iter().map(|p| view.edge(p).id).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn greedy_over(view: &GraphView, positions: impl IntoIterator<Item = usize>) -> MatchingResult {
    let mut matched = vec![false; view.node_count];
    let mut chosen = Vec::new();
    for pos in positions {
        let e = view.edge(pos);
        if e.is_self_loop() || matched[e.source] || matched[e.target] {
            continue;
        }
        matched[e.source] = true;
        matched[e.target] = true;
        chosen.push(pos);
    }
    MatchingResult::from_positions(view, chosen)
}

/// Greedy maximal matching; edges with low endpoint degree are tried first
pub fn greedy_max_cardinality(view: &GraphView) -> AlgoResult<MatchingResult> {
    view.require_undirected("greedy maximum cardinality matching")?;
    let mut positions: Vec<usize> = (0..view.edge_count()).collect();
    positions.sort_by_key(|&p| {
        let e = view.edge(p);
        view.degree(e.source) + view.degree(e.target)
    });
    Ok(greedy_over(view, positions))
}

/// Greedy 1/2-approximate maximum weight matching: heaviest edges first.
/// Edges with non-positive weight never improve a matching and are skipped.
pub fn greedy_max_weight(view: &GraphView) -> AlgoResult<MatchingResult> {
    view.require_undirected("greedy maximum weight matching")?;
    let mut positions: Vec<usize> = (0..view.edge_count())
        .filter(|&p| view.weight(p) > 0.0)
        .collect();
    positions.sort_by(|&a, &b| view.weight(b).total_cmp(&view.weight(a)).then(a.cmp(&b)));
    Ok(greedy_over(view, positions))
}

/// Hopcroft-Karp maximum cardinality matching of a bipartite graph
pub fn bipartite_max_cardinality(view: &GraphView) -> AlgoResult<MatchingResult> {
    view.require_undirected("bipartite matching")?;
    let Some((left, _)) = bipartition(view) else {
        return Err(illegal("graph is not bipartite"));
    };
    let n = view.node_count;
    let mut is_left = vec![false; n];
    for v in &left {
        is_left[view.index_of(*v)?] = true;
    }
    let left: Vec<usize> = (0..n).filter(|&v| is_left[v]).collect();

    // mate[v] = edge position matching v
    let mut mate: Vec<Option<usize>> = vec![None; n];
    const FREE: usize = usize::MAX;

    loop {
        // BFS layering from free left vertices
        let mut layer = vec![FREE; n];
        let mut queue = VecDeque::new();
        for &u in &left {
            if mate[u].is_none() {
                layer[u] = 0;
                queue.push_back(u);
            }
        }
        let mut found = false;
        while let Some(u) = queue.pop_front() {
            for (v, _) in view.out_neighbors(u) {
                match mate[v] {
                    None => found = true,
                    Some(pos) => {
                        let w = view.edge(pos).opposite(v);
                        if layer[w] == FREE {
                            layer[w] = layer[u] + 1;
                            queue.push_back(w);
                        }
                    }
                }
            }
        }
        if !found {
            break;
        }

        let mut augmented = false;
        for &u in &left {
            if mate[u].is_none() && augment(view, u, &mut layer, &mut mate) {
                augmented = true;
            }
        }
        if !augmented {
            break;
        }
    }

    let mut chosen: Vec<usize> = left.iter().filter_map(|&u| mate[u]).collect();
    chosen.sort_unstable();
    Ok(MatchingResult::from_positions(view, chosen))
}

fn augment(view: &GraphView, u: usize, layer: &mut [usize], mate: &mut [Option<usize>]) -> bool {
    for (v, pos) in view.out_neighbors(u) {
        let free_or_deeper = match mate[v] {
            None => true,
            Some(mpos) => {
                let w = view.edge(mpos).opposite(v);
                layer[w] == layer[u] + 1 && augment(view, w, layer, mate)
            }
        };
        if free_or_deeper {
            mate[u] = Some(pos);
            mate[v] = Some(pos);
            return true;
        }
    }
    layer[u] = usize::MAX;
    false
}

/// Run the blossom algorithm over the snapshot with weights from `weight`; self-loops
/// can never be matched and are left out
fn blossom(view: &GraphView, weight: impl Fn(usize) -> f64, max_cardinality: bool) -> Vec<usize> {
    let positions: Vec<usize> = (0..view.edge_count())
        .filter(|&p| !view.edge(p).is_self_loop())
        .collect();
    let edges: Vec<(usize, usize, f64)> = positions
        .iter()
        .map(|&p| {
            let e = view.edge(p);
            (e.source, e.target, weight(p))
        })
        .collect();
    max_weight_matching(view.node_count, &edges, max_cardinality)
        .into_iter()
        .map(|k| positions[k])
        .collect()
}

/// Edmonds' maximum cardinality matching of a general graph
pub fn edmonds_max_cardinality(view: &GraphView) -> AlgoResult<MatchingResult> {
    view.require_undirected("Edmonds maximum cardinality matching")?;
    Ok(MatchingResult::from_positions(view, blossom(view, |_| 1.0, true)))
}

/// Exact maximum weight matching of a general graph
pub fn blossom_max_weight(view: &GraphView) -> AlgoResult<MatchingResult> {
    view.require_undirected("blossom maximum weight matching")?;
    Ok(MatchingResult::from_positions(view, blossom(view, |p| view.weight(p), false)))
}

/// Exact minimum weight matching; only negative edges can lower the weight, so the
/// empty matching is the answer on non-negative graphs
pub fn blossom_min_weight(view: &GraphView) -> AlgoResult<MatchingResult> {
    view.require_undirected("blossom minimum weight matching")?;
    Ok(MatchingResult::from_positions(view, blossom(view, |p| -view.weight(p), false)))
}

/// Every perfect matching has `n / 2` edges, so shifting all weights by a constant
/// keeps the optimum while making them positive
fn perfect(view: &GraphView, algorithm: &str, maximize: bool) -> AlgoResult<MatchingResult> {
    view.require_undirected(algorithm)?;
    if view.node_count % 2 == 1 {
        return Err(illegal(format!("{}: a graph with an odd vertex count has no perfect matching", algorithm)));
    }
    let weights = (0..view.edge_count()).map(|p| view.weight(p));
    let (lo, hi) = weights.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), w| (lo.min(w), hi.max(w)));
    let positions = if maximize {
        blossom(view, |p| view.weight(p) - lo + 1.0, true)
    } else {
        blossom(view, |p| hi - view.weight(p) + 1.0, true)
    };
    if 2 * positions.len() != view.node_count {
        return Err(illegal(format!("{}: graph has no perfect matching", algorithm)));
    }
    Ok(MatchingResult::from_positions(view, positions))
}

/// Maximum weight perfect matching; fails with `IllegalArgument` when none exists
pub fn blossom_perfect_max_weight(view: &GraphView) -> AlgoResult<MatchingResult> {
    perfect(view, "blossom perfect maximum weight matching", true)
}

/// Minimum weight perfect matching; fails with `IllegalArgument` when none exists
pub fn blossom_perfect_min_weight(view: &GraphView) -> AlgoResult<MatchingResult> {
    perfect(view, "blossom perfect minimum weight matching", false)
}

/// Maximum weight matching of a bipartite graph
pub fn bipartite_max_weight(view: &GraphView) -> AlgoResult<MatchingResult> {
    view.require_undirected("bipartite maximum weight matching")?;
    if bipartition(view).is_none() {
        return Err(illegal("graph is not bipartite"));
    }
    blossom_max_weight(view)
}

/// Minimum weight perfect matching between the two given sides of a bipartite graph
pub fn bipartite_perfect_min_weight(
    view: &GraphView,
    left: &[NodeId],
    right: &[NodeId],
) -> AlgoResult<MatchingResult> {
    view.require_undirected("bipartite perfect matching")?;
    if left.len() != right.len() {
        return Err(illegal(format!(
            "sides of {} and {} vertices admit no perfect matching",
            left.len(),
            right.len()
        )));
    }
    // side[v]: Some(true) on the left, Some(false) on the right
    let mut side: Vec<Option<bool>> = vec![None; view.node_count];
    for (vertices, is_left) in [(left, true), (right, false)] {
        for &v in vertices {
            let idx = view.index_of(v)?;
            if side[idx].replace(is_left).is_some() {
                return Err(illegal(format!("vertex {} is listed twice in the partition", v)));
            }
        }
    }
    if let Some(missing) = side.iter().position(Option::is_none) {
        return Err(illegal(format!("vertex {} is in neither side", view.node(missing))));
    }
    if let Some(e) = view.edges.iter().find(|e| side[e.source] == side[e.target]) {
        return Err(illegal(format!("edge {} does not cross the partition", e.id)));
    }
    perfect(view, "bipartite perfect minimum weight matching", false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{unweighted, view};
    use crate::error::AlgoError;

    #[test]
    fn test_greedy_cardinality_on_path() {
        // path 0-1-2-3: endpoints have low degree so the outer edges go first
        let g = unweighted(4, &[(0, 1), (1, 2), (2, 3)], false);
        let m = greedy_max_cardinality(&g).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.weight, 2.0);
    }

    #[test]
    fn test_greedy_weight() {
        let g = view(4, &[(0, 1, 1.0), (1, 2, 5.0), (2, 3, 1.0)], false);
        let m = greedy_max_weight(&g).unwrap();
        assert_eq!(m.edges, vec![1]);
        assert_eq!(m.weight, 5.0);
    }

    #[test]
    fn test_hopcroft_karp() {
        // left 0,1,2 right 3,4,5; a greedy pick of 0-3 first must be repaired
        let g = unweighted(6, &[(0, 3), (0, 4), (1, 3), (2, 4), (2, 5)], false);
        let m = bipartite_max_cardinality(&g).unwrap();
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_edmonds_beats_greedy_on_odd_cycles() {
        // a triangle with a tail on each corner: greedy can stop at 2, the optimum is 3
        let g = unweighted(6, &[(0, 1), (1, 2), (2, 0), (0, 3), (1, 4), (2, 5)], false);
        let m = edmonds_max_cardinality(&g).unwrap();
        assert_eq!(m.len(), 3);
        let mut covered: Vec<u64> = Vec::new();
        for e in &m.edges {
            let r = g.edge(*e as usize);
            covered.push(r.source as u64);
            covered.push(r.target as u64);
        }
        covered.sort_unstable();
        assert_eq!(covered, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_blossom_weights() {
        let g = view(4, &[(0, 1, 2.0), (1, 2, 5.0), (2, 3, 2.0), (3, 3, 9.0)], false);
        assert_eq!(blossom_max_weight(&g).unwrap().edges, vec![1]);
        assert!(blossom_min_weight(&g).unwrap().is_empty());
        let perfect = blossom_perfect_max_weight(&g).unwrap();
        assert_eq!(perfect.edges, vec![0, 2]);
        assert_eq!(perfect.weight, 4.0);

        let negative = view(3, &[(0, 1, -2.0), (1, 2, -3.0)], false);
        assert_eq!(blossom_min_weight(&negative).unwrap().weight, -3.0);
    }

    #[test]
    fn test_perfect_min_weight() {
        // square with cheap sides 0-1, 2-3 and expensive sides 1-2, 3-0
        let g = view(4, &[(0, 1, 1.0), (1, 2, 4.0), (2, 3, 1.0), (3, 0, 4.0), (0, 2, 3.0)], false);
        let m = blossom_perfect_min_weight(&g).unwrap();
        assert_eq!(m.weight, 2.0);
        assert_eq!(m.edges, vec![0, 2]);

        let star = unweighted(4, &[(0, 1), (0, 2), (0, 3)], false);
        assert!(matches!(blossom_perfect_min_weight(&star), Err(AlgoError::IllegalArgument(_))));
    }

    #[test]
    fn test_bipartite_weighted() {
        // left 0,1 right 2,3
        let g = view(4, &[(0, 2, 3.0), (0, 3, 1.0), (1, 2, 1.0), (1, 3, 4.0)], false);
        let max = bipartite_max_weight(&g).unwrap();
        assert_eq!(max.weight, 7.0);
        let min = bipartite_perfect_min_weight(&g, &[0, 1], &[2, 3]).unwrap();
        assert_eq!(min.weight, 2.0);
        assert_eq!(min.edges, vec![1, 2]);
        assert!(bipartite_perfect_min_weight(&g, &[0, 2], &[1, 3]).is_err());
        assert!(bipartite_perfect_min_weight(&g, &[0], &[2, 3]).is_err());
    }

    #[test]
    fn test_not_bipartite() {
        let g = unweighted(3, &[(0, 1), (1, 2), (2, 0)], false);
        assert!(matches!(bipartite_max_cardinality(&g), Err(AlgoError::IllegalArgument(_))));
        assert!(bipartite_max_weight(&g).is_err());
        let directed = unweighted(2, &[(0, 1)], true);
        assert!(greedy_max_cardinality(&directed).is_err());
    }
}
