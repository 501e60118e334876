//! Vertex scores, each returned as a vertex to double map in vertex order

use super::vertex_map;
use crate::algo::timed;
use crate::containers::Element;
use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::Handle;
use std::collections::HashMap;
use strata_algorithms::{
    centrality, page_rank, AlgoResult, AlphaCentralityConfig, CentralityConfig, GraphView, NodeId, PageRankConfig,
};

impl Context {
    fn scoring_exec<F>(&mut self, op: &'static str, algorithm: F, graph: Handle, res: &mut Handle) -> Status
    where
        F: FnOnce(&GraphView) -> AlgoResult<HashMap<NodeId, f64>>,
    {
        self.run(op, |ctx| {
            let view = ctx.view_of(graph)?;
            let scores = timed(op, &view, |v| -> GraphResult<HashMap<NodeId, f64>> { Ok(algorithm(v)?) })?;
            *res = ctx.register(vertex_map(&view, &scores, |s| Element::Double(*s)))?;
            Ok(())
        })
    }

    pub fn scoring_exec_pagerank(&mut self, graph: Handle, config: PageRankConfig, res: &mut Handle) -> Status {
        self.scoring_exec("scoring_exec_pagerank", |v| page_rank(v, config), graph, res)
    }

    /// Closeness centrality; `incoming` measures distances towards each vertex
    pub fn scoring_exec_closeness_centrality(&mut self, graph: Handle, config: CentralityConfig, res: &mut Handle) -> Status {
        self.scoring_exec(
            "scoring_exec_closeness_centrality",
            |v| centrality::closeness(v, config),
            graph,
            res,
        )
    }

    /// Harmonic centrality, defined on disconnected graphs too
    pub fn scoring_exec_harmonic_centrality(&mut self, graph: Handle, config: CentralityConfig, res: &mut Handle) -> Status {
        self.scoring_exec(
            "scoring_exec_harmonic_centrality",
            |v| centrality::harmonic(v, config),
            graph,
            res,
        )
    }

    /// Brandes betweenness
    pub fn scoring_exec_betweenness_centrality(&mut self, graph: Handle, normalize: bool, res: &mut Handle) -> Status {
        self.scoring_exec(
            "scoring_exec_betweenness_centrality",
            |v| centrality::betweenness(v, normalize),
            graph,
            res,
        )
    }

    pub fn scoring_exec_alpha_centrality(&mut self, graph: Handle, config: AlphaCentralityConfig, res: &mut Handle) -> Status {
        self.scoring_exec(
            "scoring_exec_alpha_centrality",
            |v| centrality::alpha_centrality(v, config),
            graph,
            res,
        )
    }
}
