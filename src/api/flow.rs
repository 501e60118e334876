//! Flows and cuts
//!
//! Capacities are edge weights. Flow maps are keyed by edge id in graph edge order,
//! partitions are vertex sets.

use super::{id_set, ordered_map, vertex_map};
use crate::algo::timed;
use crate::containers::Element;
use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::Handle;
use strata_algorithms::{cuts, flow, AlgoResult, FlowProblem, FlowResult, GraphView, NodeId};

type MaxFlowAlgorithm = fn(&GraphView, NodeId, NodeId) -> AlgoResult<FlowResult>;

impl Context {
    #[allow(clippy::too_many_arguments)]
    fn maxflow_exec(
        &mut self,
        op: &'static str,
        algorithm: MaxFlowAlgorithm,
        graph: Handle,
        source: u64,
        sink: u64,
        value: &mut f64,
        flows: &mut Handle,
        source_partition: &mut Handle,
    ) -> Status {
        self.run(op, |ctx| {
            let view = ctx.view_of(graph)?;
            let result = timed(op, &view, |v| -> GraphResult<FlowResult> { Ok(algorithm(v, source, sink)?) })?;
            let edge_order = view.edges.iter().map(|e| &e.id);
            let flow_map = ctx.register(ordered_map(edge_order, &result.flows, |f| Element::Double(*f)))?;
            let partition = ctx.register(id_set(result.source_partition))?;
            *value = result.max_flow;
            *flows = flow_map;
            *source_partition = partition;
            Ok(())
        })
    }

    pub fn maxflow_exec_push_relabel(
        &mut self,
        graph: Handle,
        source: u64,
        sink: u64,
        value: &mut f64,
        flows: &mut Handle,
        source_partition: &mut Handle,
    ) -> Status {
        self.maxflow_exec(
            "maxflow_exec_push_relabel",
            flow::push_relabel,
            graph,
            source,
            sink,
            value,
            flows,
            source_partition,
        )
    }

    pub fn maxflow_exec_dinic(
        &mut self,
        graph: Handle,
        source: u64,
        sink: u64,
        value: &mut f64,
        flows: &mut Handle,
        source_partition: &mut Handle,
    ) -> Status {
        self.maxflow_exec("maxflow_exec_dinic", flow::dinic, graph, source, sink, value, flows, source_partition)
    }

    pub fn maxflow_exec_edmonds_karp(
        &mut self,
        graph: Handle,
        source: u64,
        sink: u64,
        value: &mut f64,
        flows: &mut Handle,
        source_partition: &mut Handle,
    ) -> Status {
        self.maxflow_exec(
            "maxflow_exec_edmonds_karp",
            flow::edmonds_karp,
            graph,
            source,
            sink,
            value,
            flows,
            source_partition,
        )
    }

    /// Minimum s-t cut: capacity, source side and the crossing edges
    pub fn cut_exec_min_st(
        &mut self,
        graph: Handle,
        source: u64,
        sink: u64,
        capacity: &mut f64,
        source_partition: &mut Handle,
        cut_edges: &mut Handle,
    ) -> Status {
        self.run("cut_exec_min_st", |ctx| {
            let view = ctx.view_of(graph)?;
            let cut = timed("min s-t cut", &view, |v| Ok(flow::min_st_cut(v, source, sink)?))?;
            let partition = ctx.register(id_set(cut.source_partition))?;
            let edges = ctx.register(id_set(cut.cut_edges))?;
            *capacity = cut.capacity;
            *source_partition = partition;
            *cut_edges = edges;
            Ok(())
        })
    }

    /// Global minimum cut of an undirected graph with non-negative weights
    pub fn cut_exec_stoer_wagner(&mut self, graph: Handle, weight: &mut f64, partition: &mut Handle) -> Status {
        self.run("cut_exec_stoer_wagner", |ctx| {
            let view = ctx.view_of(graph)?;
            let cut = timed("stoer-wagner", &view, |v| Ok(cuts::stoer_wagner(v)?))?;
            let side = ctx.register(id_set(cut.partition))?;
            *weight = cut.weight;
            *partition = side;
            Ok(())
        })
    }

    /// Minimum cost flow over a directed graph; arc costs are edge weights and
    /// supplies and bounds come from `problem`
    pub fn mincostflow_exec_successive_shortest_paths(
        &mut self,
        graph: Handle,
        problem: &dyn FlowProblem,
        cost: &mut f64,
        flows: &mut Handle,
        duals: &mut Handle,
    ) -> Status {
        self.run("mincostflow_exec_successive_shortest_paths", |ctx| {
            let view = ctx.view_of(graph)?;
            let result = timed("min cost flow", &view, |v| Ok(flow::min_cost_flow(v, problem)?))?;
            let edge_order = view.edges.iter().map(|e| &e.id);
            let flow_map = ctx.register(ordered_map(edge_order, &result.flows, |f| Element::Double(*f)))?;
            let dual_map = ctx.register(vertex_map(&view, &result.duals, |d| Element::Double(*d)))?;
            *cost = result.cost;
            *flows = flow_map;
            *duals = dual_map;
            Ok(())
        })
    }
}
