//! Global minimum cut (Stoer-Wagner)

use super::common::{GraphView, NodeId};
use super::error::{illegal, AlgoResult};
use ndarray::Array2;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalCut {
    pub weight: f64,
    /// One side of the cut, in snapshot order
    pub partition: Vec<NodeId>,
}

/// Stoer-Wagner minimum cut of an undirected graph with non-negative weights
pub fn stoer_wagner(view: &GraphView) -> AlgoResult<GlobalCut> {
    view.require_undirected("Stoer-Wagner")?;
    view.require_non_negative_weights("Stoer-Wagner")?;
    let n = view.node_count;
    if n < 2 {
        return Err(illegal("minimum cut needs at least two vertices"));
    }

    let mut w = Array2::<f64>::zeros((n, n));
    for e in &view.edges {
        if !e.is_self_loop() {
            w[[e.source, e.target]] += e.weight;
            w[[e.target, e.source]] += e.weight;
        }
    }

    // members[i]: original vertices merged into super vertex i
    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    let mut alive: Vec<usize> = (0..n).collect();
    let mut best_weight = f64::INFINITY;
    let mut best_side: Vec<usize> = Vec::new();

    while alive.len() > 1 {
        // Maximum adjacency ordering
        let mut in_a = vec![false; n];
        let mut key = vec![0.0f64; n];
        let mut prev = alive[0];
        let mut last = alive[0];
        for step in 0..alive.len() {
            let next = alive
                .iter()
                .copied()
                .filter(|&v| !in_a[v])
                .max_by(|&a, &b| key[a].total_cmp(&key[b]).then(b.cmp(&a)));
            let Some(next) = next else { break };
            in_a[next] = true;
            if step > 0 {
                prev = last;
            }
            last = next;
            for &v in &alive {
                if !in_a[v] {
                    key[v] += w[[next, v]];
                }
            }
        }

        let cut_of_phase = key[last];
        if cut_of_phase < best_weight {
            best_weight = cut_of_phase;
            best_side = members[last].clone();
        }

        // Merge last into prev
        let moved = std::mem::take(&mut members[last]);
        members[prev].extend(moved);
        for &v in &alive {
            let add = w[[last, v]];
            w[[prev, v]] += add;
            w[[v, prev]] += add;
        }
        w[[prev, prev]] = 0.0;
        alive.retain(|&v| v != last);
    }

    best_side.sort_unstable();
    Ok(GlobalCut {
        weight: best_weight,
        partition: best_side.into_iter().map(|i| view.node(i)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::view;

    #[test]
    fn test_two_triangles_joined_by_light_edge() {
        let g = view(
            6,
            &[
                (0, 1, 3.0),
                (1, 2, 3.0),
                (2, 0, 3.0),
                (3, 4, 3.0),
                (4, 5, 3.0),
                (5, 3, 3.0),
                (2, 3, 1.0),
            ],
            false,
        );
        let cut = stoer_wagner(&g).unwrap();
        assert_eq!(cut.weight, 1.0);
        let mut side = cut.partition.clone();
        if side.contains(&0) {
            assert_eq!(side, vec![0, 1, 2]);
        } else {
            side.sort_unstable();
            assert_eq!(side, vec![3, 4, 5]);
        }
    }

    #[test]
    fn test_rejects_directed_and_tiny() {
        assert!(stoer_wagner(&view(2, &[(0, 1, 1.0)], true)).is_err());
        assert!(stoer_wagner(&view(1, &[], false)).is_err());
    }
}
