//! Shortest path family
//!
//! Point-to-point searches write `None` when the target is unreachable; that is a
//! result, not an error.

use crate::algo::timed;
use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::{Handle, Object};
use strata_algorithms::{pathfinding, Heuristic, PathResult};

impl Context {
    fn register_path(&mut self, path: Option<PathResult>) -> GraphResult<Option<Handle>> {
        path.map(|p| self.register(Object::Path(p))).transpose()
    }

    /// Fewest hops, weights ignored
    pub fn sp_exec_bfs_get_path_between_vertices(
        &mut self,
        graph: Handle,
        source: u64,
        target: u64,
        res: &mut Option<Handle>,
    ) -> Status {
        self.run("sp_exec_bfs_get_path_between_vertices", |ctx| {
            let view = ctx.view_of(graph)?;
            let path = timed("bfs", &view, |v| Ok(pathfinding::bfs(v, source, target)?))?;
            *res = ctx.register_path(path)?;
            Ok(())
        })
    }

    pub fn sp_exec_bfs_get_singlesource_from_vertex(&mut self, graph: Handle, source: u64, res: &mut Handle) -> Status {
        self.run("sp_exec_bfs_get_singlesource_from_vertex", |ctx| {
            let view = ctx.view_of(graph)?;
            let tree = timed("bfs single source", &view, |v| Ok(pathfinding::bfs_single_source(v, source)?))?;
            *res = ctx.register(Object::SingleSourcePaths(tree))?;
            Ok(())
        })
    }

    /// Fails with `IllegalArgument` on negative weights
    pub fn sp_exec_dijkstra_get_path_between_vertices(
        &mut self,
        graph: Handle,
        source: u64,
        target: u64,
        res: &mut Option<Handle>,
    ) -> Status {
        self.run("sp_exec_dijkstra_get_path_between_vertices", |ctx| {
            let view = ctx.view_of(graph)?;
            let path = timed("dijkstra", &view, |v| Ok(pathfinding::dijkstra(v, source, target)?))?;
            *res = ctx.register_path(path)?;
            Ok(())
        })
    }

    pub fn sp_exec_bidirectional_dijkstra_get_path_between_vertices(
        &mut self,
        graph: Handle,
        source: u64,
        target: u64,
        res: &mut Option<Handle>,
    ) -> Status {
        self.run("sp_exec_bidirectional_dijkstra_get_path_between_vertices", |ctx| {
            let view = ctx.view_of(graph)?;
            let path = timed("bidirectional dijkstra", &view, |v| {
                Ok(pathfinding::bidirectional_dijkstra(v, source, target)?)
            })?;
            *res = ctx.register_path(path)?;
            Ok(())
        })
    }

    pub fn sp_exec_dijkstra_get_singlesource_from_vertex(
        &mut self,
        graph: Handle,
        source: u64,
        res: &mut Handle,
    ) -> Status {
        self.run("sp_exec_dijkstra_get_singlesource_from_vertex", |ctx| {
            let view = ctx.view_of(graph)?;
            let tree = timed("dijkstra single source", &view, |v| {
                Ok(pathfinding::dijkstra_single_source(v, source)?)
            })?;
            *res = ctx.register(Object::SingleSourcePaths(tree))?;
            Ok(())
        })
    }

    /// Fails with `NegativeCycle` when one is reachable from `source`
    pub fn sp_exec_bellmanford_get_singlesource_from_vertex(
        &mut self,
        graph: Handle,
        source: u64,
        res: &mut Handle,
    ) -> Status {
        self.run("sp_exec_bellmanford_get_singlesource_from_vertex", |ctx| {
            let view = ctx.view_of(graph)?;
            let tree = timed("bellman-ford", &view, |v| Ok(pathfinding::bellman_ford(v, source)?))?;
            *res = ctx.register(Object::SingleSourcePaths(tree))?;
            Ok(())
        })
    }

    /// A* guided by a caller heuristic; an inadmissible heuristic is not detected
    pub fn sp_exec_astar_get_path_between_vertices(
        &mut self,
        graph: Handle,
        source: u64,
        target: u64,
        heuristic: &dyn Heuristic,
        res: &mut Option<Handle>,
    ) -> Status {
        self.run("sp_exec_astar_get_path_between_vertices", |ctx| {
            let view = ctx.view_of(graph)?;
            let path = timed("astar", &view, |v| Ok(pathfinding::astar(v, source, target, heuristic)?))?;
            *res = ctx.register_path(path)?;
            Ok(())
        })
    }

    /// A* with the ALT heuristic over a list or set of landmark vertices
    pub fn sp_exec_astar_alt_heuristic_get_path_between_vertices(
        &mut self,
        graph: Handle,
        source: u64,
        target: u64,
        landmarks: Handle,
        res: &mut Option<Handle>,
    ) -> Status {
        self.run("sp_exec_astar_alt_heuristic_get_path_between_vertices", |ctx| {
            let landmarks = ctx.ids_of(landmarks)?;
            let view = ctx.view_of(graph)?;
            let path = timed("astar alt", &view, |v| {
                Ok(pathfinding::astar_alt(v, source, target, &landmarks)?)
            })?;
            *res = ctx.register_path(path)?;
            Ok(())
        })
    }

    pub fn sp_exec_floydwarshall_get_allpairs(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.run("sp_exec_floydwarshall_get_allpairs", |ctx| {
            let view = ctx.view_of(graph)?;
            let paths = timed("floyd-warshall", &view, |v| Ok(pathfinding::floyd_warshall(v)?))?;
            *res = ctx.register(Object::AllPairsPaths(paths))?;
            Ok(())
        })
    }

    pub fn sp_exec_johnson_get_allpairs(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.run("sp_exec_johnson_get_allpairs", |ctx| {
            let view = ctx.view_of(graph)?;
            let paths = timed("johnson", &view, |v| Ok(pathfinding::johnson(v)?))?;
            *res = ctx.register(Object::AllPairsPaths(paths))?;
            Ok(())
        })
    }

    /// Iterator over up to `k` loopless paths in order of weight
    pub fn sp_exec_yen_get_k_loopless_paths_between_vertices(
        &mut self,
        graph: Handle,
        source: u64,
        target: u64,
        k: usize,
        res: &mut Handle,
    ) -> Status {
        self.run("sp_exec_yen_get_k_loopless_paths_between_vertices", |ctx| {
            let view = ctx.view_of(graph)?;
            let paths = timed("yen", &view, |v| Ok(pathfinding::yen_k_shortest_paths(v, source, target, k)?))?;
            *res = ctx.register_iter(crate::iter::HandleIter::objects(paths.into_iter().map(Object::Path)))?;
            Ok(())
        })
    }
}
