//! Cycle algorithms
//!
//! Eulerian cycles (Hierholzer), the Chinese postman tour, enumeration of simple
//! cycles in directed graphs (Johnson) and fundamental cycle bases from a BFS
//! spanning forest.

use super::blossom::max_weight_matching;
use super::common::{EdgeId, GraphView, NodeId, PathResult};
use super::community::UnionFind;
use super::error::{illegal, AlgoResult};
use super::pathfinding::dense_tree;
use super::topology::is_eulerian;
use std::collections::{HashSet, VecDeque};

/// Closed walk from `start` using every edge of `adjacency` once; rows hold
/// `(neighbor, edge index)` pairs and an undirected edge is listed at both ends.
/// Each step is the vertex reached and the edge used to reach it.
pub(crate) fn hierholzer(
    adjacency: &[Vec<(usize, usize)>],
    edge_count: usize,
    start: usize,
) -> Vec<(usize, Option<usize>)> {
    let mut used = vec![false; edge_count];
    let mut cursor = vec![0usize; adjacency.len()];
    let mut stack: Vec<(usize, Option<usize>)> = vec![(start, None)];
    let mut circuit = Vec::new();

    while let Some(&(u, via)) = stack.last() {
        let row = &adjacency[u];
        let mut advanced = false;
        while cursor[u] < row.len() {
            let (next, edge) = row[cursor[u]];
            cursor[u] += 1;
            if !used[edge] {
                used[edge] = true;
                stack.push((next, Some(edge)));
                advanced = true;
                break;
            }
        }
        if !advanced {
            circuit.push((u, via));
            stack.pop();
        }
    }
    circuit.reverse();
    circuit
}

#[derive(Debug, Clone, PartialEq)]
pub struct EulerianResult {
    pub is_eulerian: bool,
    /// Closed walk over every edge, absent when the graph is not Eulerian
    pub cycle: Option<PathResult>,
}

/// Hierholzer's algorithm
pub fn eulerian_cycle(view: &GraphView) -> EulerianResult {
    if !is_eulerian(view) {
        return EulerianResult {
            is_eulerian: false,
            cycle: None,
        };
    }
    let start = (0..view.node_count).find(|&v| view.out_degree(v) > 0);
    let Some(start) = start else {
        // no edges: a trivial closed walk at the first vertex, if any
        let cycle = (view.node_count > 0).then(|| PathResult {
            source: view.node(0),
            target: view.node(0),
            path: vec![view.node(0)],
            edges: Vec::new(),
            cost: 0.0,
        });
        return EulerianResult {
            is_eulerian: true,
            cycle,
        };
    };

    let adjacency: Vec<Vec<(usize, usize)>> = (0..view.node_count)
        .map(|u| {
            view.out_edge_positions(u)
                .iter()
                .map(|&pos| (view.edge(pos).opposite(u), pos))
                .collect()
        })
        .collect();
    let circuit = hierholzer(&adjacency, view.edge_count(), start);

    let path: Vec<NodeId> = circuit.iter().map(|&(v, _)| view.node(v)).collect();
    let edges: Vec<EdgeId> = circuit
        .iter()
        .filter_map(|&(_, via)| via)
        .map(|p| view.edge(p).id)
        .collect();
    let cost = circuit
        .iter()
        .filter_map(|&(_, via)| via)
        .map(|p| view.weight(p))
        .sum();
    EulerianResult {
        is_eulerian: true,
        cycle: Some(PathResult {
            source: view.node(start),
            target: view.node(start),
            path,
            edges,
            cost,
        }),
    }
}

/// Chinese postman: a closed walk of minimum weight that traverses every edge at
/// least once. Odd vertices are paired by a minimum weight perfect matching over
/// their shortest path distances, and each matched path is walked twice.
pub fn chinese_postman(view: &GraphView) -> AlgoResult<PathResult> {
    view.require_undirected("Chinese postman")?;
    view.require_non_negative_weights("Chinese postman")?;
    let n = view.node_count;
    if n == 0 {
        return Err(illegal("Chinese postman needs at least one vertex"));
    }
    let mut uf = UnionFind::new(n);
    for e in &view.edges {
        uf.union(e.source, e.target);
    }
    let roots: HashSet<usize> = view.edges.iter().map(|e| uf.find(e.source)).collect();
    if roots.len() > 1 {
        return Err(illegal("Chinese postman requires the edges to form one connected component"));
    }

    // (u, v, edge position); duplicated paths reuse the positions of the original edges
    let mut walk: Vec<(usize, usize, usize)> =
        view.edges.iter().enumerate().map(|(pos, e)| (e.source, e.target, pos)).collect();
    let odd: Vec<usize> = (0..n).filter(|&v| view.degree(v) % 2 == 1).collect();
    if !odd.is_empty() {
        let trees = odd
            .iter()
            .map(|&s| dense_tree(view, s))
            .collect::<AlgoResult<Vec<_>>>()?;
        let mut pairs = Vec::new();
        for a in 0..odd.len() {
            for b in (a + 1)..odd.len() {
                pairs.push((a, b, trees[a].0[odd[b]]));
            }
        }
        let longest = pairs.iter().map(|p| p.2).fold(0.0f64, f64::max);
        let shifted: Vec<(usize, usize, f64)> =
            pairs.iter().map(|&(a, b, d)| (a, b, longest - d + 1.0)).collect();
        for k in max_weight_matching(odd.len(), &shifted, true) {
            let (a, b, _) = pairs[k];
            let pred = &trees[a].1;
            let mut v = odd[b];
            while v != odd[a] {
                let Some(pos) = pred[v] else {
                    return Err(illegal("odd vertices are not connected"));
                };
                let e = view.edge(pos);
                walk.push((e.source, e.target, pos));
                v = e.opposite(v);
            }
        }
    }

    let start = (0..n).find(|&v| view.degree(v) > 0).unwrap_or(0);
    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (i, &(u, v, _)) in walk.iter().enumerate() {
        adjacency[u].push((v, i));
        if u != v {
            adjacency[v].push((u, i));
        }
    }
    let circuit = hierholzer(&adjacency, walk.len(), start);
    let steps: Vec<usize> = circuit.iter().filter_map(|&(_, via)| via).map(|i| walk[i].2).collect();
    Ok(PathResult {
        source: view.node(start),
        target: view.node(start),
        path: circuit.iter().map(|&(v, _)| view.node(v)).collect(),
        cost: steps.iter().map(|&p| view.weight(p)).sum(),
        edges: steps.into_iter().map(|p| view.edge(p).id).collect(),
    })
}

/// All simple cycles of a directed graph (Johnson). Each cycle lists its vertices
/// starting from its smallest snapshot index, without repeating the first vertex.
pub fn simple_cycles(view: &GraphView) -> AlgoResult<Vec<Vec<NodeId>>> {
    view.require_directed("simple cycle enumeration")?;
    let n = view.node_count;
    let mut cycles = Vec::new();

    for s in 0..n {
        let mut search = CircuitSearch {
            view,
            start: s,
            blocked: vec![false; n],
            blocked_by: vec![HashSet::new(); n],
            stack: Vec::new(),
            cycles: &mut cycles,
        };
        search.circuit(s);
    }

    Ok(cycles
        .into_iter()
        .map(|c| c.into_iter().map(|i| view.node(i)).collect())
        .collect())
}

struct CircuitSearch<'a> {
    view: &'a GraphView,
    start: usize,
    blocked: Vec<bool>,
    blocked_by: Vec<HashSet<usize>>,
    stack: Vec<usize>,
    cycles: &'a mut Vec<Vec<usize>>,
}

impl CircuitSearch<'_> {
    fn unblock(&mut self, u: usize) {
        let mut pending = vec![u];
        while let Some(w) = pending.pop() {
            if !self.blocked[w] {
                continue;
            }
            self.blocked[w] = false;
            pending.extend(self.blocked_by[w].drain());
        }
    }

    fn circuit(&mut self, v: usize) -> bool {
        let mut found = false;
        self.stack.push(v);
        self.blocked[v] = true;

        let mut seen = HashSet::new();
        for &w in self.view.successors(v) {
            // only the subgraph induced by vertices >= start; parallel edges add nothing
            if w < self.start || !seen.insert(w) {
                continue;
            }
            if w == self.start {
                self.cycles.push(self.stack.clone());
                found = true;
            } else if !self.blocked[w] && self.circuit(w) {
                found = true;
            }
        }

        if found {
            self.unblock(v);
        } else {
            for &w in self.view.successors(v) {
                if w >= self.start {
                    self.blocked_by[w].insert(v);
                }
            }
        }
        self.stack.pop();
        found
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleBasis {
    /// Total weight of all edges over all cycles
    pub weight: f64,
    pub cycles: Vec<Vec<EdgeId>>,
}

/// Fundamental cycle basis of an undirected graph from a BFS spanning forest
pub fn fundamental_cycle_basis(view: &GraphView) -> AlgoResult<CycleBasis> {
    view.require_undirected("fundamental cycle basis")?;
    let n = view.node_count;
    let mut parent_edge: Vec<Option<usize>> = vec![None; n];
    let mut depth = vec![usize::MAX; n];
    let mut tree_edge = vec![false; view.edge_count()];

    for root in 0..n {
        if depth[root] != usize::MAX {
            continue;
        }
        depth[root] = 0;
        let mut queue = VecDeque::from([root]);
        while let Some(u) = queue.pop_front() {
            for (v, pos) in view.out_neighbors(u) {
                if depth[v] == usize::MAX {
                    depth[v] = depth[u] + 1;
                    parent_edge[v] = Some(pos);
                    tree_edge[pos] = true;
                    queue.push_back(v);
                }
            }
        }
    }

    let mut cycles = Vec::new();
    let mut weight = 0.0;
    for (pos, e) in view.edges.iter().enumerate() {
        if tree_edge[pos] {
            continue;
        }
        let mut left = Vec::new();
        let mut right = Vec::new();
        let (mut a, mut b) = (e.source, e.target);
        while a != b {
            if depth[a] >= depth[b] {
                let Some(p) = parent_edge[a] else { break };
                left.push(p);
                a = view.edge(p).opposite(a);
            } else {
                let Some(p) = parent_edge[b] else { break };
                right.push(p);
                b = view.edge(p).opposite(b);
            }
        }
        let mut cycle = vec![pos];
        cycle.extend(left);
        cycle.extend(right.into_iter().rev());
        weight += cycle.iter().map(|&p| view.weight(p)).sum::<f64>();
        cycles.push(cycle.into_iter().map(|p| view.edge(p).id).collect());
    }

    Ok(CycleBasis { weight, cycles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{unweighted, view};

    #[test]
    fn test_eulerian_square() {
        let g = unweighted(4, &[(0, 1), (1, 2), (2, 3), (3, 0)], false);
        let result = eulerian_cycle(&g);
        assert!(result.is_eulerian);
        let cycle = result.cycle.unwrap();
        assert_eq!(cycle.edges.len(), 4);
        assert_eq!(cycle.path.first(), cycle.path.last());
        assert_eq!(cycle.cost, 4.0);
    }

    /// Consecutive path vertices are joined by the listed edges
    fn assert_walk(g: &GraphView, walk: &PathResult) {
        assert_eq!(walk.path.first(), walk.path.last());
        assert_eq!(walk.path.len(), walk.edges.len() + 1);
        for (i, &e) in walk.edges.iter().enumerate() {
            let r = g.edge(e as usize);
            let (a, b) = (walk.path[i] as usize, walk.path[i + 1] as usize);
            assert!((r.source, r.target) == (a, b) || (r.source, r.target) == (b, a));
        }
    }

    #[test]
    fn test_postman_on_eulerian_graph_is_the_circuit() {
        let g = view(4, &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0), (3, 0, 4.0)], false);
        let walk = chinese_postman(&g).unwrap();
        assert_eq!(walk.cost, 10.0);
        assert_eq!(walk.edges.len(), 4);
        assert_walk(&g, &walk);
    }

    #[test]
    fn test_postman_repeats_shortest_odd_paths() {
        let path = view(3, &[(0, 1, 2.0), (1, 2, 3.0)], false);
        let walk = chinese_postman(&path).unwrap();
        assert_eq!(walk.cost, 10.0);
        assert_eq!(walk.edges.len(), 4);
        assert_walk(&path, &walk);

        // square with a heavy diagonal: 0 and 2 are odd and joined through a side pair
        let g = view(
            4,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0), (0, 2, 5.0)],
            false,
        );
        let walk = chinese_postman(&g).unwrap();
        assert_eq!(walk.cost, 11.0);
        assert_eq!(walk.edges.len(), 7);
        assert_walk(&g, &walk);
        let mut distinct = walk.edges.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn test_postman_preconditions() {
        let split = unweighted(4, &[(0, 1), (2, 3)], false);
        assert!(chinese_postman(&split).is_err());
        let directed = unweighted(2, &[(0, 1)], true);
        assert!(chinese_postman(&directed).is_err());
        // isolated vertices are ignored
        let lonely = unweighted(3, &[(0, 1), (1, 0)], false);
        assert_eq!(chinese_postman(&lonely).unwrap().edges.len(), 2);
    }

    #[test]
    fn test_not_eulerian() {
        let g = unweighted(3, &[(0, 1), (1, 2)], false);
        let result = eulerian_cycle(&g);
        assert!(!result.is_eulerian);
        assert!(result.cycle.is_none());
    }

    #[test]
    fn test_directed_eulerian_bowtie() {
        let g = unweighted(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)], true);
        let cycle = eulerian_cycle(&g).cycle.unwrap();
        assert_eq!(cycle.edges.len(), 6);
        let distinct: HashSet<_> = cycle.edges.iter().collect();
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn test_simple_cycles() {
        // 0 -> 1 -> 2 -> 0, 1 -> 0, 2 -> 2
        let g = unweighted(3, &[(0, 1), (1, 2), (2, 0), (1, 0), (2, 2)], true);
        let mut cycles = simple_cycles(&g).unwrap();
        cycles.sort();
        assert_eq!(cycles, vec![vec![0, 1], vec![0, 1, 2], vec![2]]);
    }

    #[test]
    fn test_fundamental_basis() {
        // square with a diagonal has cyclomatic number 2
        let g = view(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0), (0, 2, 2.0)], false);
        let basis = fundamental_cycle_basis(&g).unwrap();
        assert_eq!(basis.cycles.len(), 2);
        assert_eq!(basis.weight, 8.0);
    }
}
