//! Traversal orders, returned as vertex iterators
//!
//! Orders are computed eagerly over a snapshot, except the random walk which is
//! produced lazily and may be unbounded.

use crate::algo::timed;
use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::Handle;
use crate::iter::HandleIter;
use strata_algorithms::{traversal, AlgoResult, GraphView, NodeId, RandomWalk, RandomWalkConfig};

impl Context {
    fn traverse_exec<F>(&mut self, op: &'static str, order: F, graph: Handle, res: &mut Handle) -> Status
    where
        F: FnOnce(&GraphView) -> AlgoResult<Vec<NodeId>>,
    {
        self.run(op, |ctx| {
            let view = ctx.view_of(graph)?;
            let vertices = timed(op, &view, |v| -> GraphResult<Vec<NodeId>> { Ok(order(v)?) })?;
            *res = ctx.register_iter(HandleIter::ids(vertices))?;
            Ok(())
        })
    }

    /// Breadth first over every component, in vertex order
    pub fn traverse_create_bfs_from_all_vertices_vit(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.traverse_exec(
            "traverse_create_bfs_from_all_vertices_vit",
            |v| traversal::bfs_order(v, None),
            graph,
            res,
        )
    }

    /// Breadth first over the vertices reachable from `vertex`
    pub fn traverse_create_bfs_from_vertex_vit(&mut self, graph: Handle, vertex: u64, res: &mut Handle) -> Status {
        self.traverse_exec(
            "traverse_create_bfs_from_vertex_vit",
            |v| traversal::bfs_order(v, Some(vertex)),
            graph,
            res,
        )
    }

    pub fn traverse_create_lex_bfs_vit(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.traverse_exec("traverse_create_lex_bfs_vit", traversal::lex_bfs_order, graph, res)
    }

    pub fn traverse_create_dfs_from_all_vertices_vit(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.traverse_exec(
            "traverse_create_dfs_from_all_vertices_vit",
            |v| traversal::dfs_order(v, None),
            graph,
            res,
        )
    }

    pub fn traverse_create_dfs_from_vertex_vit(&mut self, graph: Handle, vertex: u64, res: &mut Handle) -> Status {
        self.traverse_exec(
            "traverse_create_dfs_from_vertex_vit",
            |v| traversal::dfs_order(v, Some(vertex)),
            graph,
            res,
        )
    }

    /// Fails with `IllegalArgument` on an undirected graph or a directed cycle
    pub fn traverse_create_topological_order_vit(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.traverse_exec("traverse_create_topological_order_vit", traversal::topological_order, graph, res)
    }

    pub fn traverse_create_max_cardinality_vit(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.traverse_exec(
            "traverse_create_max_cardinality_vit",
            |v| Ok(traversal::max_cardinality_order(v)),
            graph,
            res,
        )
    }

    pub fn traverse_create_degeneracy_ordering_vit(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.traverse_exec(
            "traverse_create_degeneracy_ordering_vit",
            |v| Ok(traversal::degeneracy_order(v)),
            graph,
            res,
        )
    }

    /// Vertices in order of distance from `vertex`, stopping beyond `radius` when given
    pub fn traverse_create_closest_first_from_vertex_vit(
        &mut self,
        graph: Handle,
        vertex: u64,
        radius: Option<f64>,
        res: &mut Handle,
    ) -> Status {
        self.traverse_exec(
            "traverse_create_closest_first_from_vertex_vit",
            |v| traversal::closest_first_order(v, vertex, radius),
            graph,
            res,
        )
    }

    /// Random walk starting at `vertex`; `max_steps` of `None` walks until a dead end
    pub fn traverse_create_random_walk_from_vertex_vit(
        &mut self,
        graph: Handle,
        vertex: u64,
        weighted: bool,
        max_steps: Option<u64>,
        seed: u64,
        res: &mut Handle,
    ) -> Status {
        self.run("traverse_create_random_walk_from_vertex_vit", |ctx| {
            let view = ctx.shared_view_of(graph)?;
            let config = RandomWalkConfig {
                weighted,
                max_steps,
                seed,
            };
            let walk = RandomWalk::new(view, vertex, config)?;
            *res = ctx.register_iter(HandleIter::ids(walk))?;
            Ok(())
        })
    }
}
