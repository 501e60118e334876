//! Maximal clique enumeration (Bron-Kerbosch)
//!
//! Edge direction, self-loops and parallel edges are ignored. Enumeration checks a
//! [`Deadline`] between recursive calls and aborts with `Timeout` once it passes.

use super::common::{Deadline, GraphView, NodeId};
use super::error::AlgoResult;
use super::traversal::degeneracy_order_indices;
use std::collections::BTreeSet;

/// Which refinement of Bron-Kerbosch to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CliqueStrategy {
    Basic,
    #[default]
    Pivot,
    /// Pivoting with the outer level in degeneracy order
    PivotDegeneracy,
}

struct Enumerator<'a> {
    neighbors: Vec<BTreeSet<usize>>,
    pivot: bool,
    deadline: &'a Deadline,
    cliques: Vec<Vec<usize>>,
}

impl Enumerator<'_> {
    fn expand(&mut self, r: &mut Vec<usize>, mut p: BTreeSet<usize>, mut x: BTreeSet<usize>) -> AlgoResult<()> {
        self.deadline.check()?;
        if p.is_empty() {
            if x.is_empty() {
                let mut clique = r.clone();
                clique.sort_unstable();
                self.cliques.push(clique);
            }
            return Ok(());
        }

        let candidates: Vec<usize> = if self.pivot {
            // pivot with the most neighbours in P
            let u = p
                .iter()
                .chain(x.iter())
                .copied()
                .max_by_key(|&u| (self.neighbors[u].intersection(&p).count(), std::cmp::Reverse(u)));
            match u {
                Some(u) => p.difference(&self.neighbors[u]).copied().collect(),
                None => p.iter().copied().collect(),
            }
        } else {
            p.iter().copied().collect()
        };

        for v in candidates {
            let np: BTreeSet<usize> = p.intersection(&self.neighbors[v]).copied().collect();
            let nx: BTreeSet<usize> = x.intersection(&self.neighbors[v]).copied().collect();
            r.push(v);
            self.expand(r, np, nx)?;
            r.pop();
            p.remove(&v);
            x.insert(v);
        }
        Ok(())
    }
}

/// All maximal cliques; each clique lists its vertices in snapshot order
pub fn bron_kerbosch(view: &GraphView, strategy: CliqueStrategy, deadline: &Deadline) -> AlgoResult<Vec<Vec<NodeId>>> {
    let n = view.node_count;
    let neighbors: Vec<BTreeSet<usize>> = (0..n)
        .map(|v| view.incident(v).map(|(u, _)| u).filter(|&u| u != v).collect())
        .collect();
    let mut enumerator = Enumerator {
        neighbors,
        pivot: strategy != CliqueStrategy::Basic,
        deadline,
        cliques: Vec::new(),
    };

    if strategy == CliqueStrategy::PivotDegeneracy {
        let order = degeneracy_order_indices(view);
        let mut position = vec![0usize; n];
        for (i, &v) in order.iter().enumerate() {
            position[v] = i;
        }
        for &v in &order {
            let later: BTreeSet<usize> = enumerator.neighbors[v]
                .iter()
                .copied()
                .filter(|&u| position[u] > position[v])
                .collect();
            let earlier: BTreeSet<usize> = enumerator.neighbors[v]
                .iter()
                .copied()
                .filter(|&u| position[u] < position[v])
                .collect();
            enumerator.expand(&mut vec![v], later, earlier)?;
        }
    } else {
        enumerator.expand(&mut Vec::new(), (0..n).collect(), BTreeSet::new())?;
    }

    let mut cliques = enumerator.cliques;
    cliques.sort();
    Ok(cliques
        .into_iter()
        .map(|c| c.into_iter().map(|i| view.node(i)).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::unweighted;
    use crate::error::AlgoError;
    use std::time::Duration;

    fn sample() -> GraphView {
        // triangle 0-1-2 sharing vertex 2 with edge 2-3, and 4 isolated
        unweighted(5, &[(0, 1), (1, 2), (2, 0), (2, 3)], false)
    }

    #[test]
    fn test_all_strategies_agree() {
        let expected = vec![vec![0, 1, 2], vec![2, 3], vec![4]];
        for strategy in [CliqueStrategy::Basic, CliqueStrategy::Pivot, CliqueStrategy::PivotDegeneracy] {
            let cliques = bron_kerbosch(&sample(), strategy, &Deadline::unlimited()).unwrap();
            assert_eq!(cliques, expected);
        }
    }

    #[test]
    fn test_timeout() {
        let deadline = Deadline::new(Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(2));
        let result = bron_kerbosch(&sample(), CliqueStrategy::Pivot, &deadline);
        assert!(matches!(result, Err(AlgoError::Timeout(_))));
    }
}
