//! Minimum spanning trees and greedy spanners: total weight plus the chosen edges as a set

use super::id_set;
use crate::algo::timed;
use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::Handle;
use strata_algorithms::{mst, spanner, GraphView, MSTResult, SpannerResult};

type MstAlgorithm = fn(&GraphView) -> strata_algorithms::AlgoResult<MSTResult>;

impl Context {
    fn mst_exec(
        &mut self,
        op: &'static str,
        algorithm: MstAlgorithm,
        graph: Handle,
        weight: &mut f64,
        edges: &mut Handle,
    ) -> Status {
        self.run(op, |ctx| {
            let view = ctx.view_of(graph)?;
            let tree: MSTResult = timed(op, &view, |v| -> GraphResult<MSTResult> { Ok(algorithm(v)?) })?;
            let set = ctx.register(id_set(tree.edges))?;
            *weight = tree.total_weight;
            *edges = set;
            Ok(())
        })
    }

    /// Spanning forest on disconnected graphs; fails with `IllegalArgument` when directed
    pub fn mst_exec_kruskal(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.mst_exec("mst_exec_kruskal", mst::kruskal, graph, weight, edges)
    }

    /// Grows the tree from the first vertex in creation order, then from the first
    /// unreached vertex of each further component
    pub fn mst_exec_prim(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.mst_exec("mst_exec_prim", mst::prim, graph, weight, edges)
    }

    pub fn mst_exec_boruvka(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.mst_exec("mst_exec_boruvka", mst::boruvka, graph, weight, edges)
    }

    /// Greedy multiplicative `(2k - 1)`-spanner of an undirected graph
    pub fn spanner_exec_greedy_multiplicative(&mut self, graph: Handle, k: usize, weight: &mut f64, edges: &mut Handle) -> Status {
        let op = "spanner_exec_greedy_multiplicative";
        self.run(op, |ctx| {
            let view = ctx.view_of(graph)?;
            let spanner = timed(op, &view, |v| -> GraphResult<SpannerResult> {
                Ok(spanner::greedy_multiplicative(v, k)?)
            })?;
            let set = ctx.register(id_set(spanner.edges))?;
            *weight = spanner.weight;
            *edges = set;
            Ok(())
        })
    }
}
