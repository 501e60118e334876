//! Network flow algorithms
//!
//! Maximum flow via Edmonds-Karp, Dinic and push-relabel; minimum s-t cut; minimum cost
//! flow via successive shortest paths. Capacities (and costs) come from edge weights.

use super::common::{EdgeId, GraphView, NodeId};
use super::error::{illegal, AlgoError, AlgoResult};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

const EPS: f64 = 1e-9;

/// Result of a maximum flow computation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowResult {
    pub max_flow: f64,
    /// Flow carried by every edge of the snapshot; undirected edges report magnitude
    pub flows: HashMap<EdgeId, f64>,
    /// Source side of a minimum cut, in snapshot order
    pub source_partition: Vec<NodeId>,
    /// Edges crossing from the source side to the sink side
    pub cut_edges: Vec<EdgeId>,
}

/// Minimum s-t cut
#[derive(Debug, Clone, PartialEq)]
pub struct MinCutResult {
    pub capacity: f64,
    pub source_partition: Vec<NodeId>,
    pub cut_edges: Vec<EdgeId>,
}

/// Residual network with paired arcs: arc `a` and `a ^ 1` are each other's reverse.
struct Residual {
    adj: Vec<Vec<usize>>,
    to: Vec<usize>,
    residual: Vec<f64>,
    /// Snapshot edge position for the forward arc of each pair
    edge_of: Vec<Option<usize>>,
    capacity: Vec<f64>,
}

impl Residual {
    fn with_nodes(n: usize) -> Self {
        Residual {
            adj: vec![Vec::new(); n],
            to: Vec::new(),
            residual: Vec::new(),
            edge_of: Vec::new(),
            capacity: Vec::new(),
        }
    }

    /// Add a pair of arcs; returns the forward arc
    fn add_pair(&mut self, u: usize, v: usize, forward: f64, backward: f64, edge: Option<usize>) -> usize {
        let a = self.to.len();
        self.adj[u].push(a);
        self.to.push(v);
        self.residual.push(forward);
        self.capacity.push(forward);
        self.edge_of.push(edge);
        self.adj[v].push(a + 1);
        self.to.push(u);
        self.residual.push(backward);
        self.capacity.push(backward);
        self.edge_of.push(edge);
        a
    }

    fn from_view(view: &GraphView) -> Self {
        let mut net = Residual::with_nodes(view.node_count);
        for (pos, e) in view.edges.iter().enumerate() {
            if e.is_self_loop() {
                continue;
            }
            let back = if view.directed { 0.0 } else { e.weight };
            net.add_pair(e.source, e.target, e.weight, back, Some(pos));
        }
        net
    }

    /// Net flow on a forward arc (negative means it runs against the arc)
    fn flow(&self, arc: usize) -> f64 {
        self.capacity[arc] - self.residual[arc]
    }

    fn push(&mut self, arc: usize, amount: f64) {
        self.residual[arc] -= amount;
        self.residual[arc ^ 1] += amount;
    }

    fn reachable_from(&self, s: usize) -> Vec<bool> {
        let mut seen = vec![false; self.adj.len()];
        let mut queue = VecDeque::new();
        seen[s] = true;
        queue.push_back(s);
        while let Some(u) = queue.pop_front() {
            for &a in &self.adj[u] {
                let v = self.to[a];
                if !seen[v] && self.residual[a] > EPS {
                    seen[v] = true;
                    queue.push_back(v);
                }
            }
        }
        seen
    }
}

fn validate(view: &GraphView, source: NodeId, sink: NodeId, algorithm: &str) -> AlgoResult<(usize, usize)> {
    let s = view.index_of(source)?;
    let t = view.index_of(sink)?;
    if s == t {
        return Err(illegal("source and sink must differ"));
    }
    view.require_weighted(algorithm)?;
    if let Some(e) = view.edges.iter().find(|e| e.weight < 0.0) {
        return Err(illegal(format!(
            "negative capacity {} on edge {}",
            e.weight, e.id
        )));
    }
    Ok((s, t))
}

fn finish(view: &GraphView, net: &Residual, s: usize, value: f64) -> FlowResult {
    let mut flows: HashMap<EdgeId, f64> = view.edges.iter().map(|e| (e.id, 0.0)).collect();
    for a in (0..net.to.len()).step_by(2) {
        if let Some(pos) = net.edge_of[a] {
            let f = net.flow(a);
            flows.insert(view.edge(pos).id, if view.directed { f } else { f.abs() });
        }
    }
    let side = net.reachable_from(s);
    let source_partition = (0..view.node_count)
        .filter(|&i| side[i])
        .map(|i| view.node(i))
        .collect();
    let cut_edges = cut_edges(view, &side);
    FlowResult {
        max_flow: value,
        flows,
        source_partition,
        cut_edges,
    }
}

fn cut_edges(view: &GraphView, side: &[bool]) -> Vec<EdgeId> {
    view.edges
        .iter()
        .filter(|e| {
            if view.directed {
                side[e.source] && !side[e.target]
            } else {
                side[e.source] != side[e.target]
            }
        })
        .map(|e| e.id)
        .collect()
}

/// Edmonds-Karp Algorithm for Max Flow
///
/// Shortest augmenting paths found by BFS over the residual network.
pub fn edmonds_karp(view: &GraphView, source: NodeId, sink: NodeId) -> AlgoResult<FlowResult> {
    let (s_idx, t_idx) = validate(view, source, sink, "Edmonds-Karp")?;
    let n = view.node_count;
    let mut net = Residual::from_view(view);
    let mut total_flow = 0.0;

    loop {
        // Find path using BFS, remembering the arc used to reach each node
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();
        visited[s_idx] = true;
        queue.push_back(s_idx);

        while let Some(u) = queue.pop_front() {
            if u == t_idx {
                break;
            }
            for &a in &net.adj[u] {
                let v = net.to[a];
                if !visited[v] && net.residual[a] > EPS {
                    visited[v] = true;
                    parent[v] = Some(a);
                    queue.push_back(v);
                }
            }
        }

        if !visited[t_idx] {
            break;
        }

        // Calculate path flow
        let mut path_flow = f64::INFINITY;
        let mut curr = t_idx;
        while let Some(a) = parent[curr] {
            path_flow = path_flow.min(net.residual[a]);
            curr = net.to[a ^ 1];
        }

        // Update residual capacities
        curr = t_idx;
        while let Some(a) = parent[curr] {
            net.push(a, path_flow);
            curr = net.to[a ^ 1];
        }

        total_flow += path_flow;
    }

    debug!(max_flow = total_flow, "edmonds-karp finished");
    Ok(finish(view, &net, s_idx, total_flow))
}

/// Dinic's blocking flow algorithm
pub fn dinic(view: &GraphView, source: NodeId, sink: NodeId) -> AlgoResult<FlowResult> {
    let (s_idx, t_idx) = validate(view, source, sink, "Dinic")?;
    let n = view.node_count;
    let mut net = Residual::from_view(view);
    let mut total_flow = 0.0;

    loop {
        let mut level = vec![usize::MAX; n];
        let mut queue = VecDeque::new();
        level[s_idx] = 0;
        queue.push_back(s_idx);
        while let Some(u) = queue.pop_front() {
            for &a in &net.adj[u] {
                let v = net.to[a];
                if level[v] == usize::MAX && net.residual[a] > EPS {
                    level[v] = level[u] + 1;
                    queue.push_back(v);
                }
            }
        }
        if level[t_idx] == usize::MAX {
            break;
        }

        let mut next_arc = vec![0usize; n];
        loop {
            let pushed = blocking_push(&mut net, &level, &mut next_arc, s_idx, t_idx, f64::INFINITY);
            if pushed <= EPS {
                break;
            }
            total_flow += pushed;
        }
    }

    debug!(max_flow = total_flow, "dinic finished");
    Ok(finish(view, &net, s_idx, total_flow))
}

fn blocking_push(
    net: &mut Residual,
    level: &[usize],
    next_arc: &mut [usize],
    u: usize,
    t: usize,
    limit: f64,
) -> f64 {
    if u == t {
        return limit;
    }
    while next_arc[u] < net.adj[u].len() {
        let a = net.adj[u][next_arc[u]];
        let v = net.to[a];
        if net.residual[a] > EPS && level[v] == level[u] + 1 {
            let pushed = blocking_push(net, level, next_arc, v, t, limit.min(net.residual[a]));
            if pushed > EPS {
                net.push(a, pushed);
                return pushed;
            }
        }
        next_arc[u] += 1;
    }
    0.0
}

/// FIFO push-relabel maximum flow
pub fn push_relabel(view: &GraphView, source: NodeId, sink: NodeId) -> AlgoResult<FlowResult> {
    let (s_idx, t_idx) = validate(view, source, sink, "push-relabel")?;
    let n = view.node_count;
    let mut net = Residual::from_view(view);
    let mut height = vec![0usize; n];
    let mut excess = vec![0.0; n];
    let mut current = vec![0usize; n];
    let mut active = VecDeque::new();
    let mut queued = vec![false; n];

    height[s_idx] = n;
    for i in 0..net.adj[s_idx].len() {
        let a = net.adj[s_idx][i];
        let amount = net.residual[a];
        if amount > EPS {
            let v = net.to[a];
            net.push(a, amount);
            excess[v] += amount;
            excess[s_idx] -= amount;
            if v != t_idx && !queued[v] {
                queued[v] = true;
                active.push_back(v);
            }
        }
    }

    while let Some(u) = active.pop_front() {
        queued[u] = false;
        // Discharge
        while excess[u] > EPS {
            if current[u] == net.adj[u].len() {
                let min_height = net.adj[u]
                    .iter()
                    .filter(|&&a| net.residual[a] > EPS)
                    .map(|&a| height[net.to[a]])
                    .min();
                match min_height {
                    Some(h) => height[u] = h + 1,
                    None => break,
                }
                current[u] = 0;
                continue;
            }
            let a = net.adj[u][current[u]];
            let v = net.to[a];
            if net.residual[a] > EPS && height[u] == height[v] + 1 {
                let amount = excess[u].min(net.residual[a]);
                net.push(a, amount);
                excess[u] -= amount;
                excess[v] += amount;
                if v != s_idx && v != t_idx && !queued[v] {
                    queued[v] = true;
                    active.push_back(v);
                }
            } else {
                current[u] += 1;
            }
        }
    }

    let value = excess[t_idx];
    debug!(max_flow = value, "push-relabel finished");
    Ok(finish(view, &net, s_idx, value))
}

/// Minimum s-t cut by max-flow/min-cut duality
pub fn min_st_cut(view: &GraphView, source: NodeId, sink: NodeId) -> AlgoResult<MinCutResult> {
    let flow = push_relabel(view, source, sink)?;
    Ok(MinCutResult {
        capacity: flow.max_flow,
        source_partition: flow.source_partition,
        cut_edges: flow.cut_edges,
    })
}

/// Caller-supplied description of a minimum cost flow problem over a directed graph.
///
/// Positive supply marks a source of flow, negative supply a demand. Arc costs are the
/// edge weights.
pub trait FlowProblem {
    fn supply(&self, vertex: NodeId) -> f64;

    fn lower_bound(&self, _edge: EdgeId) -> f64 {
        0.0
    }

    fn upper_bound(&self, edge: EdgeId) -> f64;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinCostFlowResult {
    pub cost: f64,
    pub flows: HashMap<EdgeId, f64>,
    /// Node potentials certifying optimality
    pub duals: HashMap<NodeId, f64>,
}

/// Minimum cost flow by successive shortest augmenting paths
pub fn min_cost_flow(view: &GraphView, problem: &dyn FlowProblem) -> AlgoResult<MinCostFlowResult> {
    view.require_directed("minimum cost flow")?;
    let n = view.node_count;
    let mut supply: Vec<f64> = (0..n).map(|i| problem.supply(view.node(i))).collect();
    let total: f64 = supply.iter().sum();
    if total.abs() > EPS {
        return Err(illegal(format!("supplies must sum to zero, got {}", total)));
    }

    // Nodes n and n+1 are the super source and super sink
    let (ss, tt) = (n, n + 1);
    let mut net = Residual::with_nodes(n + 2);
    let mut cost: Vec<f64> = Vec::new();
    let mut lower: HashMap<EdgeId, f64> = HashMap::new();
    let mut edge_arcs = Vec::with_capacity(view.edge_count());

    for (pos, e) in view.edges.iter().enumerate() {
        let lo = problem.lower_bound(e.id);
        let hi = problem.upper_bound(e.id);
        if lo < 0.0 || hi < lo {
            return Err(illegal(format!(
                "invalid capacity bounds [{}, {}] on edge {}",
                lo, hi, e.id
            )));
        }
        if lo > 0.0 {
            supply[e.source] -= lo;
            supply[e.target] += lo;
            lower.insert(e.id, lo);
        }
        let a = net.add_pair(e.source, e.target, hi - lo, 0.0, Some(pos));
        cost.push(e.weight);
        cost.push(-e.weight);
        edge_arcs.push((pos, a));
    }

    let mut required = 0.0;
    for (i, &b) in supply.iter().enumerate() {
        if b > EPS {
            net.add_pair(ss, i, b, 0.0, None);
            required += b;
        } else if b < -EPS {
            net.add_pair(i, tt, -b, 0.0, None);
        } else {
            continue;
        }
        cost.push(0.0);
        cost.push(0.0);
    }

    let mut sent = 0.0;
    let dist = loop {
        let (dist, parent) = residual_bellman_ford(&net, &cost, ss)?;
        if dist[tt].is_infinite() || sent >= required - EPS {
            break dist;
        }
        let mut amount = required - sent;
        let mut curr = tt;
        while let Some(a) = parent[curr] {
            amount = amount.min(net.residual[a]);
            curr = net.to[a ^ 1];
        }
        curr = tt;
        while let Some(a) = parent[curr] {
            net.push(a, amount);
            curr = net.to[a ^ 1];
        }
        sent += amount;
    };

    if sent < required - EPS {
        return Err(illegal(format!(
            "infeasible flow problem, only {} of {} units routed",
            sent, required
        )));
    }

    let mut flows = HashMap::with_capacity(view.edge_count());
    let mut total_cost = 0.0;
    for (pos, a) in edge_arcs {
        let e = view.edge(pos);
        let f = net.flow(a) + lower.get(&e.id).copied().unwrap_or(0.0);
        total_cost += f * e.weight;
        flows.insert(e.id, f);
    }
    let duals = (0..n)
        .map(|i| (view.node(i), if dist[i].is_finite() { -dist[i] } else { 0.0 }))
        .collect();

    Ok(MinCostFlowResult {
        cost: total_cost,
        flows,
        duals,
    })
}

fn residual_bellman_ford(net: &Residual, cost: &[f64], s: usize) -> AlgoResult<(Vec<f64>, Vec<Option<usize>>)> {
    let n = net.adj.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut parent = vec![None; n];
    dist[s] = 0.0;
    for round in 0..=n {
        let mut changed = false;
        for u in 0..n {
            if dist[u].is_infinite() {
                continue;
            }
            for &a in &net.adj[u] {
                let v = net.to[a];
                if net.residual[a] > EPS && dist[u] + cost[a] < dist[v] - EPS {
                    if round == n {
                        return Err(AlgoError::NegativeCycle(v as NodeId));
                    }
                    dist[v] = dist[u] + cost[a];
                    parent[v] = Some(a);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    Ok((dist, parent))
}
