//! Graph metrics and structural predicates

use super::id_set;
use crate::algo::timed;
use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::Handle;
use strata_algorithms::{community, topology, AlgoResult, GraphView};

type Predicate = fn(&GraphView) -> AlgoResult<bool>;

impl Context {
    fn graph_test(&mut self, op: &'static str, predicate: Predicate, graph: Handle, res: &mut bool) -> Status {
        self.run(op, |ctx| {
            let view = ctx.view_of(graph)?;
            *res = timed(op, &view, |v| -> GraphResult<bool> { Ok(predicate(v)?) })?;
            Ok(())
        })
    }

    /// No edges
    pub fn graph_test_is_empty(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_empty", |v| Ok(topology::is_empty(v)), graph, res)
    }

    /// No self-loops and no multiple edges
    pub fn graph_test_is_simple(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_simple", |v| Ok(topology::is_simple(v)), graph, res)
    }

    pub fn graph_test_has_selfloops(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_has_selfloops", |v| Ok(topology::has_self_loops(v)), graph, res)
    }

    pub fn graph_test_has_multipleedges(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_has_multipleedges", |v| Ok(topology::has_multiple_edges(v)), graph, res)
    }

    pub fn graph_test_is_complete(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_complete", |v| Ok(topology::is_complete(v)), graph, res)
    }

    pub fn graph_test_is_weakly_connected(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_weakly_connected", |v| Ok(community::is_weakly_connected(v)), graph, res)
    }

    pub fn graph_test_is_strongly_connected(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_strongly_connected", |v| Ok(community::is_strongly_connected(v)), graph, res)
    }

    /// Undirected graphs only; the empty graph is not a tree
    pub fn graph_test_is_tree(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_tree", topology::is_tree, graph, res)
    }

    pub fn graph_test_is_forest(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_forest", topology::is_forest, graph, res)
    }

    pub fn graph_test_is_overfull(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_overfull", topology::is_overfull, graph, res)
    }

    pub fn graph_test_is_cubic(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_cubic", topology::is_cubic, graph, res)
    }

    pub fn graph_test_is_bipartite(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_bipartite", |v| Ok(topology::is_bipartite(v)), graph, res)
    }

    /// Isolated vertices are ignored
    pub fn graph_test_is_eulerian(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_eulerian", |v| Ok(topology::is_eulerian(v)), graph, res)
    }

    pub fn graph_test_is_triangle_free(&mut self, graph: Handle, res: &mut bool) -> Status {
        self.graph_test("graph_test_is_triangle_free", |v| Ok(topology::is_triangle_free(v)), graph, res)
    }

    /// Two vertex sets with every edge crossing between them; `None` on an odd cycle.
    /// Direction is ignored.
    pub fn partition_exec_bipartite(
        &mut self,
        graph: Handle,
        is_bipartite: &mut bool,
        partition: &mut Option<(Handle, Handle)>,
    ) -> Status {
        self.run("partition_exec_bipartite", |ctx| {
            let view = ctx.view_of(graph)?;
            let sides = timed("bipartition", &view, |v| Ok(topology::bipartition(v)))?;
            let handles = match sides {
                Some((left, right)) => Some((ctx.register(id_set(left))?, ctx.register(id_set(right))?)),
                None => None,
            };
            *is_bipartite = handles.is_some();
            *partition = handles;
            Ok(())
        })
    }

    /// Largest eccentricity; infinite on a disconnected graph
    pub fn graph_metrics_diameter(&mut self, graph: Handle, res: &mut f64) -> Status {
        self.run("graph_metrics_diameter", |ctx| {
            let view = ctx.view_of(graph)?;
            *res = timed("diameter", &view, |v| Ok(topology::diameter(v)?))?;
            Ok(())
        })
    }

    pub fn graph_metrics_radius(&mut self, graph: Handle, res: &mut f64) -> Status {
        self.run("graph_metrics_radius", |ctx| {
            let view = ctx.view_of(graph)?;
            *res = timed("radius", &view, |v| Ok(topology::radius(v)?))?;
            Ok(())
        })
    }

    /// Shortest cycle length in edges, 0 for an acyclic graph
    pub fn graph_metrics_girth(&mut self, graph: Handle, res: &mut usize) -> Status {
        self.run("graph_metrics_girth", |ctx| {
            let view = ctx.view_of(graph)?;
            *res = timed("girth", &view, |v| Ok(topology::girth(v).unwrap_or(0)))?;
            Ok(())
        })
    }

    pub fn graph_metrics_triangles(&mut self, graph: Handle, res: &mut usize) -> Status {
        self.run("graph_metrics_triangles", |ctx| {
            let view = ctx.view_of(graph)?;
            *res = timed("triangles", &view, |v| Ok(topology::count_triangles(v)))?;
            Ok(())
        })
    }
}
