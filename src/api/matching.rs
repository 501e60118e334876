//! Matchings, vertex covers and clique enumeration

use super::id_set;
use crate::algo::timed;
use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::{Handle, Object};
use crate::iter::HandleIter;
use std::collections::HashMap;
use strata_algorithms::{clique, cover, matching, AlgoResult, CliqueStrategy, Deadline, GraphView, MatchingResult, NodeId, VertexCoverResult};

type CoverAlgorithm = fn(&GraphView, Option<&HashMap<NodeId, f64>>) -> AlgoResult<VertexCoverResult>;

impl Context {
    fn matching_exec<F>(
        &mut self,
        op: &'static str,
        algorithm: F,
        graph: Handle,
        weight: &mut f64,
        edges: &mut Handle,
    ) -> Status
    where
        F: FnOnce(&GraphView) -> AlgoResult<MatchingResult>,
    {
        self.run(op, |ctx| {
            let view = ctx.view_of(graph)?;
            let matching = timed(op, &view, |v| -> GraphResult<MatchingResult> { Ok(algorithm(v)?) })?;
            let set = ctx.register(id_set(matching.edges))?;
            *weight = matching.weight;
            *edges = set;
            Ok(())
        })
    }

    pub fn matching_exec_greedy_general_max_card(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.matching_exec(
            "matching_exec_greedy_general_max_card",
            matching::greedy_max_cardinality,
            graph,
            weight,
            edges,
        )
    }

    pub fn matching_exec_greedy_general_max_weight(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.matching_exec(
            "matching_exec_greedy_general_max_weight",
            matching::greedy_max_weight,
            graph,
            weight,
            edges,
        )
    }

    /// Hopcroft-Karp; fails with `IllegalArgument` when the graph is not bipartite
    pub fn matching_exec_bipartite_max_card(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.matching_exec(
            "matching_exec_bipartite_max_card",
            matching::bipartite_max_cardinality,
            graph,
            weight,
            edges,
        )
    }

    /// Edmonds' blossom algorithm for general graphs
    pub fn matching_exec_edmonds_general_max_card(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.matching_exec(
            "matching_exec_edmonds_general_max_card",
            matching::edmonds_max_cardinality,
            graph,
            weight,
            edges,
        )
    }

    pub fn matching_exec_blossom_general_max_weight(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.matching_exec(
            "matching_exec_blossom_general_max_weight",
            matching::blossom_max_weight,
            graph,
            weight,
            edges,
        )
    }

    pub fn matching_exec_blossom_general_min_weight(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.matching_exec(
            "matching_exec_blossom_general_min_weight",
            matching::blossom_min_weight,
            graph,
            weight,
            edges,
        )
    }

    /// Fails with `IllegalArgument` when the graph has no perfect matching
    pub fn matching_exec_blossom_general_perfect_max_weight(
        &mut self,
        graph: Handle,
        weight: &mut f64,
        edges: &mut Handle,
    ) -> Status {
        self.matching_exec(
            "matching_exec_blossom_general_perfect_max_weight",
            matching::blossom_perfect_max_weight,
            graph,
            weight,
            edges,
        )
    }

    /// Fails with `IllegalArgument` when the graph has no perfect matching
    pub fn matching_exec_blossom_general_perfect_min_weight(
        &mut self,
        graph: Handle,
        weight: &mut f64,
        edges: &mut Handle,
    ) -> Status {
        self.matching_exec(
            "matching_exec_blossom_general_perfect_min_weight",
            matching::blossom_perfect_min_weight,
            graph,
            weight,
            edges,
        )
    }

    pub fn matching_exec_bipartite_max_weight(&mut self, graph: Handle, weight: &mut f64, edges: &mut Handle) -> Status {
        self.matching_exec(
            "matching_exec_bipartite_max_weight",
            matching::bipartite_max_weight,
            graph,
            weight,
            edges,
        )
    }

    /// `left` and `right` are id containers that must partition the vertices, with
    /// every edge crossing between them
    pub fn matching_exec_bipartite_perfect_min_weight(
        &mut self,
        graph: Handle,
        left: Handle,
        right: Handle,
        weight: &mut f64,
        edges: &mut Handle,
    ) -> Status {
        let op = "matching_exec_bipartite_perfect_min_weight";
        self.run(op, |ctx| {
            let left = ctx.ids_of(left)?;
            let right = ctx.ids_of(right)?;
            let view = ctx.view_of(graph)?;
            let matching = timed(op, &view, |v| -> GraphResult<MatchingResult> {
                Ok(matching::bipartite_perfect_min_weight(v, &left, &right)?)
            })?;
            let set = ctx.register(id_set(matching.edges))?;
            *weight = matching.weight;
            *edges = set;
            Ok(())
        })
    }

    /// `vertex_weights` is an optional id to double map; missing vertices weigh 1.0
    fn vertexcover_exec(
        &mut self,
        op: &'static str,
        algorithm: CoverAlgorithm,
        graph: Handle,
        vertex_weights: Option<Handle>,
        weight: &mut f64,
        vertices: &mut Handle,
    ) -> Status {
        self.run(op, |ctx| {
            let weights = vertex_weights.map(|h| ctx.id_weights_of(h)).transpose()?;
            let view = ctx.view_of(graph)?;
            let cover = timed(op, &view, |v| -> GraphResult<VertexCoverResult> {
                Ok(algorithm(v, weights.as_ref())?)
            })?;
            let set = ctx.register(id_set(cover.vertices))?;
            *weight = cover.weight;
            *vertices = set;
            Ok(())
        })
    }

    pub fn vertexcover_exec_greedy(
        &mut self,
        graph: Handle,
        vertex_weights: Option<Handle>,
        weight: &mut f64,
        vertices: &mut Handle,
    ) -> Status {
        self.vertexcover_exec("vertexcover_exec_greedy", cover::greedy, graph, vertex_weights, weight, vertices)
    }

    /// Maximal-matching 2-approximation; unweighted
    pub fn vertexcover_exec_edgebased(&mut self, graph: Handle, weight: &mut f64, vertices: &mut Handle) -> Status {
        self.vertexcover_exec(
            "vertexcover_exec_edgebased",
            |v, _| cover::edge_based(v),
            graph,
            None,
            weight,
            vertices,
        )
    }

    pub fn vertexcover_exec_clarkson(
        &mut self,
        graph: Handle,
        vertex_weights: Option<Handle>,
        weight: &mut f64,
        vertices: &mut Handle,
    ) -> Status {
        self.vertexcover_exec("vertexcover_exec_clarkson", cover::clarkson, graph, vertex_weights, weight, vertices)
    }

    /// Branch and bound; exponential, meant for small graphs
    pub fn vertexcover_exec_exact(
        &mut self,
        graph: Handle,
        vertex_weights: Option<Handle>,
        weight: &mut f64,
        vertices: &mut Handle,
    ) -> Status {
        self.vertexcover_exec("vertexcover_exec_exact", cover::exact, graph, vertex_weights, weight, vertices)
    }

    /// Iterator of maximal cliques, each a set object
    ///
    /// A `timeout_ms` of 0 uses the configured default; without one the search is
    /// unbounded. On expiry the call fails with `Timeout` and returns nothing.
    pub fn clique_exec_bron_kerbosch(
        &mut self,
        graph: Handle,
        strategy: CliqueStrategy,
        timeout_ms: u64,
        res: &mut Handle,
    ) -> Status {
        self.run("clique_exec_bron_kerbosch", |ctx| {
            let view = ctx.view_of(graph)?;
            let deadline = Deadline::new(ctx.config().timeout(timeout_ms));
            let cliques = timed("bron-kerbosch", &view, |v| Ok(clique::bron_kerbosch(v, strategy, &deadline)?))?;
            let sets: Vec<Object> = cliques.into_iter().map(id_set).collect();
            *res = ctx.register_iter(HandleIter::objects(sets))?;
            Ok(())
        })
    }
}
