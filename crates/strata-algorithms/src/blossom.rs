//! Maximum weight matching in general graphs
//!
//! Edmonds' blossom algorithm with Galil's O(n^3) primal-dual bookkeeping. Vertices
//! are `0..n` and every edge is a `(u, v, weight)` triple with `u != v`. Edge `k` has
//! two endpoints `2k` (at `u`) and `2k + 1` (at `v`); `p ^ 1` is the far end of `p`.
//!
//! Labels: 0 free, 1 outer (S), 2 inner (T). Blossom ids `n..2n` are non-trivial
//! blossoms, ids below `n` stand for single vertices.

use tracing::debug;

const NONE: usize = usize::MAX;

/// Marks blossoms on the alternating path while looking for a common ancestor
const BREADCRUMB: u8 = 5;

struct Matcher<'a> {
    n: usize,
    edges: &'a [(usize, usize, f64)],
    /// Vertex at endpoint `p`
    endpoint: Vec<usize>,
    /// Remote endpoints of the edges at each vertex
    neighbour_ends: Vec<Vec<usize>>,
    /// Remote endpoint of the matched edge at each vertex
    mate: Vec<usize>,
    label: Vec<u8>,
    /// Endpoint through which a vertex or blossom got its label
    label_end: Vec<usize>,
    /// Top-level blossom containing each vertex
    in_blossom: Vec<usize>,
    parent: Vec<usize>,
    /// Sub-blossoms in cycle order, starting at the base
    children: Vec<Vec<usize>>,
    /// `links[b][i]` joins `children[b][i]` to `children[b][i + 1]`
    links: Vec<Vec<usize>>,
    base: Vec<usize>,
    /// Least-slack edge to a different outer blossom
    best_edge: Vec<usize>,
    /// Least-slack edges from a non-trivial outer blossom to each neighbouring outer blossom
    best_edges: Vec<Option<Vec<usize>>>,
    unused: Vec<usize>,
    dual: Vec<f64>,
    allowed: Vec<bool>,
    queue: Vec<usize>,
}

fn wrap(j: isize, len: usize) -> usize {
    j.rem_euclid(len as isize) as usize
}

impl<'a> Matcher<'a> {
    fn new(n: usize, edges: &'a [(usize, usize, f64)]) -> Self {
        let mut endpoint = Vec::with_capacity(2 * edges.len());
        let mut neighbour_ends = vec![Vec::new(); n];
        for (k, &(u, v, _)) in edges.iter().enumerate() {
            endpoint.push(u);
            endpoint.push(v);
            neighbour_ends[u].push(2 * k + 1);
            neighbour_ends[v].push(2 * k);
        }
        let max_weight = edges.iter().map(|e| e.2).fold(0.0f64, f64::max);
        let mut dual = vec![max_weight; n];
        dual.resize(2 * n, 0.0);
        let mut base: Vec<usize> = (0..n).collect();
        base.resize(2 * n, NONE);
        Matcher {
            n,
            edges,
            endpoint,
            neighbour_ends,
            mate: vec![NONE; n],
            label: vec![0; 2 * n],
            label_end: vec![NONE; 2 * n],
            in_blossom: (0..n).collect(),
            parent: vec![NONE; 2 * n],
            children: vec![Vec::new(); 2 * n],
            links: vec![Vec::new(); 2 * n],
            base,
            best_edge: vec![NONE; 2 * n],
            best_edges: vec![None; 2 * n],
            unused: (n..2 * n).collect(),
            dual,
            allowed: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    fn slack(&self, k: usize) -> f64 {
        let (u, v, w) = self.edges[k];
        self.dual[u] + self.dual[v] - 2.0 * w
    }

    fn leaves(&self, b: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_leaves(b, &mut out);
        out
    }

    fn collect_leaves(&self, b: usize, out: &mut Vec<usize>) {
        if b < self.n {
            out.push(b);
        } else {
            for &c in &self.children[b] {
                self.collect_leaves(c, out);
            }
        }
    }

    fn assign_label(&mut self, w: usize, t: u8, p: usize) {
        let b = self.in_blossom[w];
        self.label[w] = t;
        self.label[b] = t;
        self.label_end[w] = p;
        self.label_end[b] = p;
        self.best_edge[w] = NONE;
        self.best_edge[b] = NONE;
        if t == 1 {
            let leaves = self.leaves(b);
            self.queue.extend(leaves);
        } else if t == 2 {
            // the base of an inner blossom is matched; its mate becomes outer
            let m = self.mate[self.base[b]];
            self.assign_label(self.endpoint[m], 1, m ^ 1);
        }
    }

    /// Walk up from `v` and `w` alternately; the base of the first shared blossom, or
    /// `None` when the two trees are disjoint and an augmenting path exists
    fn scan_blossom(&mut self, v: usize, w: usize) -> Option<usize> {
        let mut path = Vec::new();
        let mut found = None;
        let (mut v, mut w) = (v, w);
        while v != NONE {
            let b = self.in_blossom[v];
            if self.label[b] == BREADCRUMB {
                found = Some(self.base[b]);
                break;
            }
            path.push(b);
            self.label[b] = BREADCRUMB;
            v = match self.label_end[b] {
                NONE => NONE,
                p => {
                    let t = self.in_blossom[self.endpoint[p]];
                    self.endpoint[self.label_end[t]]
                }
            };
            if w != NONE {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = 1;
        }
        found
    }

    /// Contract the odd cycle closed by edge `k` into a new outer blossom
    fn add_blossom(&mut self, base: usize, k: usize) {
        let Some(b) = self.unused.pop() else {
            return;
        };
        let (mut v, mut w, _) = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];
        self.base[b] = base;
        self.parent[b] = NONE;
        self.parent[bb] = b;

        let mut path = Vec::new();
        let mut links = Vec::new();
        while bv != bb {
            self.parent[bv] = b;
            path.push(bv);
            links.push(self.label_end[bv]);
            v = self.endpoint[self.label_end[bv]];
            bv = self.in_blossom[v];
        }
        path.push(bb);
        path.reverse();
        links.reverse();
        links.push(2 * k);
        while bw != bb {
            self.parent[bw] = b;
            path.push(bw);
            links.push(self.label_end[bw] ^ 1);
            w = self.endpoint[self.label_end[bw]];
            bw = self.in_blossom[w];
        }
        self.children[b] = path.clone();
        self.links[b] = links;

        self.label[b] = 1;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0.0;
        for leaf in self.leaves(b) {
            if self.label[self.in_blossom[leaf]] == 2 {
                // former inner vertices become outer and must be scanned
                self.queue.push(leaf);
            }
            self.in_blossom[leaf] = b;
        }

        let mut best_to = vec![NONE; 2 * self.n];
        for sub in path {
            let cached = self.best_edges[sub].take();
            let candidates: Vec<usize> = match cached {
                Some(list) => list,
                None => self
                    .leaves(sub)
                    .into_iter()
                    .flat_map(|leaf| self.neighbour_ends[leaf].iter().map(|p| p / 2))
                    .collect(),
            };
            for k in candidates {
                let (i, j, _) = self.edges[k];
                let j = if self.in_blossom[j] == b { i } else { j };
                let bj = self.in_blossom[j];
                if bj != b
                    && self.label[bj] == 1
                    && (best_to[bj] == NONE || self.slack(k) < self.slack(best_to[bj]))
                {
                    best_to[bj] = k;
                }
            }
            self.best_edge[sub] = NONE;
        }
        let list: Vec<usize> = best_to.into_iter().filter(|&k| k != NONE).collect();
        let mut best = NONE;
        for &k in &list {
            if best == NONE || self.slack(k) < self.slack(best) {
                best = k;
            }
        }
        self.best_edge[b] = best;
        self.best_edges[b] = Some(list);
    }

    fn expand_blossom(&mut self, b: usize, end_stage: bool) {
        for s in self.children[b].clone() {
            self.parent[s] = NONE;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] == 0.0 {
                self.expand_blossom(s, end_stage);
            } else {
                for leaf in self.leaves(s) {
                    self.in_blossom[leaf] = s;
                }
            }
        }

        if !end_stage && self.label[b] == 2 {
            // relabel the even-length path from the entry child to the base
            let children = self.children[b].clone();
            let links = self.links[b].clone();
            let len = children.len();
            let entry = self.in_blossom[self.endpoint[self.label_end[b] ^ 1]];
            let position = children.iter().position(|&c| c == entry).unwrap_or(0);
            let mut j = position as isize;
            let (step, trick): (isize, usize) = if position & 1 == 1 {
                j -= len as isize;
                (1, 0)
            } else {
                (-1, 1)
            };
            let mut p = self.label_end[b];
            while j != 0 {
                self.label[self.endpoint[p ^ 1]] = 0;
                let q = links[wrap(j - trick as isize, len)];
                self.label[self.endpoint[q ^ trick ^ 1]] = 0;
                self.assign_label(self.endpoint[p ^ 1], 2, p);
                self.allowed[q / 2] = true;
                j += step;
                p = links[wrap(j - trick as isize, len)] ^ trick;
                self.allowed[p / 2] = true;
                j += step;
            }
            let bv = children[wrap(j, len)];
            self.label[self.endpoint[p ^ 1]] = 2;
            self.label[bv] = 2;
            self.label_end[self.endpoint[p ^ 1]] = p;
            self.label_end[bv] = p;
            self.best_edge[bv] = NONE;
            j += step;
            while children[wrap(j, len)] != entry {
                let bv = children[wrap(j, len)];
                if self.label[bv] == 1 {
                    j += step;
                    continue;
                }
                if let Some(v) = self.leaves(bv).into_iter().find(|&v| self.label[v] != 0) {
                    self.label[v] = 0;
                    let m = self.mate[self.base[bv]];
                    self.label[self.endpoint[m]] = 0;
                    self.assign_label(v, 2, self.label_end[v]);
                }
                j += step;
            }
        }

        self.label[b] = 0;
        self.label_end[b] = NONE;
        self.children[b].clear();
        self.links[b].clear();
        self.base[b] = NONE;
        self.best_edges[b] = None;
        self.best_edge[b] = NONE;
        self.unused.push(b);
    }

    /// Flip the matching along the path from vertex `v` to the base of blossom `b`,
    /// making `v` the new base
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.parent[t] != b {
            t = self.parent[t];
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }
        let children = self.children[b].clone();
        let links = self.links[b].clone();
        let len = children.len();
        let i = children.iter().position(|&c| c == t).unwrap_or(0);
        let mut j = i as isize;
        let (step, trick): (isize, usize) = if i & 1 == 1 {
            j -= len as isize;
            (1, 0)
        } else {
            (-1, 1)
        };
        while j != 0 {
            j += step;
            let t = children[wrap(j, len)];
            let p = links[wrap(j - trick as isize, len)] ^ trick;
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p]);
            }
            j += step;
            let t = children[wrap(j, len)];
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p ^ 1]);
            }
            self.mate[self.endpoint[p]] = p ^ 1;
            self.mate[self.endpoint[p ^ 1]] = p;
        }
        self.children[b].rotate_left(i);
        self.links[b].rotate_left(i);
        self.base[b] = self.base[self.children[b][0]];
    }

    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (start, end) in [(v, 2 * k + 1), (w, 2 * k)] {
            let (mut s, mut p) = (start, end);
            loop {
                let bs = self.in_blossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;
                if self.label_end[bs] == NONE {
                    // reached a free root
                    break;
                }
                let t = self.endpoint[self.label_end[bs]];
                let bt = self.in_blossom[t];
                s = self.endpoint[self.label_end[bt]];
                let j = self.endpoint[self.label_end[bt] ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.label_end[bt];
                p = self.label_end[bt] ^ 1;
            }
        }
    }

    /// Scan outer vertices until the queue drains or an augmenting path is applied
    fn grow(&mut self) -> bool {
        while let Some(v) = self.queue.pop() {
            for idx in 0..self.neighbour_ends[v].len() {
                let p = self.neighbour_ends[v][idx];
                let k = p / 2;
                let w = self.endpoint[p];
                if self.in_blossom[v] == self.in_blossom[w] {
                    continue;
                }
                let mut kslack = 0.0;
                if !self.allowed[k] {
                    kslack = self.slack(k);
                    if kslack <= 0.0 {
                        self.allowed[k] = true;
                    }
                }
                let bw = self.in_blossom[w];
                if self.allowed[k] {
                    if self.label[bw] == 0 {
                        self.assign_label(w, 2, p ^ 1);
                    } else if self.label[bw] == 1 {
                        match self.scan_blossom(v, w) {
                            Some(base) => self.add_blossom(base, k),
                            None => {
                                self.augment_matching(k);
                                return true;
                            }
                        }
                    } else if self.label[w] == 0 {
                        self.label[w] = 2;
                        self.label_end[w] = p ^ 1;
                    }
                } else if self.label[bw] == 1 {
                    let b = self.in_blossom[v];
                    if self.best_edge[b] == NONE || kslack < self.slack(self.best_edge[b]) {
                        self.best_edge[b] = k;
                    }
                } else if self.label[w] == 0
                    && (self.best_edge[w] == NONE || kslack < self.slack(self.best_edge[w]))
                {
                    self.best_edge[w] = k;
                }
            }
        }
        false
    }

    fn top_level(&self, b: usize) -> bool {
        self.parent[b] == NONE && self.base[b] != NONE
    }

    /// One stage: grow alternating trees, adjusting duals, until an augmentation
    /// happens (`true`) or no further improvement is possible (`false`)
    fn stage(&mut self, max_cardinality: bool) -> bool {
        let n = self.n;
        self.label.fill(0);
        self.best_edge.fill(NONE);
        for b in n..2 * n {
            self.best_edges[b] = None;
        }
        self.allowed.fill(false);
        self.queue.clear();
        for v in 0..n {
            if self.mate[v] == NONE && self.label[self.in_blossom[v]] == 0 {
                self.assign_label(v, 1, NONE);
            }
        }

        loop {
            if self.grow() {
                return true;
            }

            enum Step {
                Stop,
                Tighten(usize),
                Expand(usize),
            }
            let min_vertex_dual = self.dual[..n].iter().copied().fold(f64::INFINITY, f64::min);
            let mut best: Option<(f64, Step)> = (!max_cardinality).then_some((min_vertex_dual, Step::Stop));
            let consider = |delta: f64, step: Step, best: &mut Option<(f64, Step)>| {
                if best.as_ref().map_or(true, |(d, _)| delta < *d) {
                    *best = Some((delta, step));
                }
            };
            for v in 0..n {
                if self.label[self.in_blossom[v]] == 0 && self.best_edge[v] != NONE {
                    consider(self.slack(self.best_edge[v]), Step::Tighten(self.best_edge[v]), &mut best);
                }
            }
            for b in 0..2 * n {
                if self.parent[b] == NONE && self.label[b] == 1 && self.best_edge[b] != NONE {
                    consider(self.slack(self.best_edge[b]) / 2.0, Step::Tighten(self.best_edge[b]), &mut best);
                }
            }
            for b in n..2 * n {
                if self.top_level(b) && self.label[b] == 2 {
                    consider(self.dual[b], Step::Expand(b), &mut best);
                }
            }
            let (delta, step) = best.unwrap_or((min_vertex_dual.max(0.0), Step::Stop));

            for v in 0..n {
                match self.label[self.in_blossom[v]] {
                    1 => self.dual[v] -= delta,
                    2 => self.dual[v] += delta,
                    _ => {}
                }
            }
            for b in n..2 * n {
                if self.top_level(b) {
                    match self.label[b] {
                        1 => self.dual[b] += delta,
                        2 => self.dual[b] -= delta,
                        _ => {}
                    }
                }
            }

            match step {
                Step::Stop => return false,
                Step::Tighten(k) => {
                    self.allowed[k] = true;
                    let (i, j, _) = self.edges[k];
                    let outer = if self.label[self.in_blossom[i]] == 0 { j } else { i };
                    self.queue.push(outer);
                }
                Step::Expand(b) => self.expand_blossom(b, false),
            }
        }
    }

    fn solve(mut self, max_cardinality: bool) -> Vec<usize> {
        let n = self.n;
        let mut stages = 0;
        for _ in 0..n {
            if !self.stage(max_cardinality) {
                break;
            }
            stages += 1;
            // blossoms with zero dual can be dissolved between stages
            for b in n..2 * n {
                if self.top_level(b) && self.label[b] == 1 && self.dual[b] == 0.0 {
                    self.expand_blossom(b, true);
                }
            }
        }
        let mut matched: Vec<usize> = (0..n)
            .filter(|&v| self.mate[v] != NONE && v < self.endpoint[self.mate[v]])
            .map(|v| self.mate[v] / 2)
            .collect();
        matched.sort_unstable();
        debug!(vertices = n, stages, matched = matched.len(), "blossom matching finished");
        matched
    }
}

/// Indices of the edges in a maximum weight matching. With `max_cardinality` the
/// matching has maximum size first and maximum weight among those of that size.
pub(crate) fn max_weight_matching(n: usize, edges: &[(usize, usize, f64)], max_cardinality: bool) -> Vec<usize> {
    if n == 0 || edges.is_empty() {
        return Vec::new();
    }
    Matcher::new(n, edges).solve(max_cardinality)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_of(edges: &[(usize, usize, f64)], matched: &[usize]) -> f64 {
        matched.iter().map(|&k| edges[k].2).sum()
    }

    #[test]
    fn test_single_edge_and_path() {
        assert_eq!(max_weight_matching(2, &[(0, 1, 1.0)], false), vec![0]);
        // the heavy middle edge beats both outer edges together
        let path = [(0, 1, 2.0), (1, 2, 5.0), (2, 3, 2.0)];
        assert_eq!(max_weight_matching(4, &path, false), vec![1]);
        // but maximum cardinality prefers the two outer edges
        assert_eq!(max_weight_matching(4, &path, true), vec![0, 2]);
    }

    #[test]
    fn test_negative_edges_are_left_out() {
        let edges = [(0, 1, 2.0), (1, 2, -1.0), (2, 3, 3.0), (0, 3, -5.0)];
        let matched = max_weight_matching(4, &edges, false);
        assert_eq!(matched, vec![0, 2]);
    }

    #[test]
    fn test_odd_cycle_needs_a_blossom() {
        // triangle 0-1-2 with a pendant edge 2-3; the best matching uses 0-1 and 2-3
        let edges = [(0, 1, 6.0), (1, 2, 10.0), (0, 2, 7.0), (2, 3, 5.0)];
        let matched = max_weight_matching(4, &edges, false);
        assert_eq!(weight_of(&edges, &matched), 11.0);
        assert_eq!(matched, vec![0, 3]);
    }

    #[test]
    fn test_nested_outer_blossom() {
        let edges = [
            (0, 1, 9.0),
            (0, 2, 9.0),
            (1, 2, 10.0),
            (1, 3, 8.0),
            (2, 4, 8.0),
            (3, 4, 10.0),
            (4, 5, 6.0),
        ];
        let matched = max_weight_matching(6, &edges, false);
        assert_eq!(matched, vec![1, 3, 6]);
        assert_eq!(weight_of(&edges, &matched), 23.0);
    }

    #[test]
    fn test_relabels_nested_blossom() {
        let edges = [
            (0, 1, 10.0),
            (0, 6, 10.0),
            (1, 2, 12.0),
            (2, 3, 20.0),
            (2, 4, 20.0),
            (3, 4, 25.0),
            (4, 5, 10.0),
            (5, 6, 10.0),
            (6, 7, 8.0),
        ];
        let matched = max_weight_matching(8, &edges, false);
        assert_eq!(matched, vec![0, 3, 6, 8]);
        assert_eq!(weight_of(&edges, &matched), 48.0);
    }

    #[test]
    fn test_odd_cycle_cardinality() {
        // a five-cycle with a chord-free pendant: size 3 requires leaving the cycle
        let edges = [(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (4, 0, 1.0), (4, 5, 1.0)];
        let matched = max_weight_matching(6, &edges, true);
        assert_eq!(matched.len(), 3);
        let mut covered = vec![false; 6];
        for &k in &matched {
            let (u, v, _) = edges[k];
            assert!(!covered[u] && !covered[v]);
            covered[u] = true;
            covered[v] = true;
        }
    }
}
