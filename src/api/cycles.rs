//! Cycles: Eulerian circuits, Chinese postman walks, simple cycle enumeration and cycle bases

use crate::algo::timed;
use crate::containers::{Element, ElementList};
use crate::context::Context;
use crate::error::Status;
use crate::handle::{Handle, Object};
use crate::iter::HandleIter;

fn id_list(ids: Vec<u64>) -> Object {
    Object::List(ids.into_iter().map(Element::id).collect::<ElementList>())
}

impl Context {
    /// Hierholzer's algorithm. The circuit is `None` when the graph is not Eulerian.
    pub fn cycles_eulerian_exec_hierholzer(
        &mut self,
        graph: Handle,
        is_eulerian: &mut bool,
        cycle: &mut Option<Handle>,
    ) -> Status {
        self.run("cycles_eulerian_exec_hierholzer", |ctx| {
            let view = ctx.view_of(graph)?;
            let result = timed("hierholzer", &view, |v| Ok(strata_algorithms::cycles::eulerian_cycle(v)))?;
            let path = result.cycle.map(|p| ctx.register(Object::Path(p))).transpose()?;
            *is_eulerian = result.is_eulerian;
            *cycle = path;
            Ok(())
        })
    }

    /// Minimum weight closed walk covering every edge of a connected undirected graph
    pub fn cycles_chinese_postman_exec_edmonds_johnson(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.run("cycles_chinese_postman_exec_edmonds_johnson", |ctx| {
            let view = ctx.view_of(graph)?;
            let walk = timed("chinese postman", &view, |v| Ok(strata_algorithms::cycles::chinese_postman(v)?))?;
            *res = ctx.register(Object::Path(walk))?;
            Ok(())
        })
    }

    /// Johnson's elementary circuit enumeration; each cycle is a list of vertices
    pub fn cycles_simple_enumeration_exec_johnson(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.run("cycles_simple_enumeration_exec_johnson", |ctx| {
            let view = ctx.view_of(graph)?;
            let cycles = timed("johnson cycles", &view, |v| Ok(strata_algorithms::cycles::simple_cycles(v)?))?;
            let lists: Vec<Object> = cycles.into_iter().map(id_list).collect();
            *res = ctx.register_iter(HandleIter::objects(lists))?;
            Ok(())
        })
    }

    /// Fundamental cycle basis from a BFS spanning forest; each cycle is a list of edges
    pub fn cycles_fundamental_basis_exec_queue_bfs(&mut self, graph: Handle, weight: &mut f64, res: &mut Handle) -> Status {
        self.run("cycles_fundamental_basis_exec_queue_bfs", |ctx| {
            let view = ctx.view_of(graph)?;
            let basis = timed("cycle basis", &view, |v| {
                Ok(strata_algorithms::cycles::fundamental_cycle_basis(v)?)
            })?;
            let lists: Vec<Object> = basis.cycles.into_iter().map(id_list).collect();
            let it = ctx.register_iter(HandleIter::objects(lists))?;
            *weight = basis.weight;
            *res = it;
            Ok(())
        })
    }
}
