//! Graph creation, queries, mutation, element iterators and views

use crate::context::Context;
use crate::error::{illegal, GraphResult, Status};
use crate::graph::{shared, EdgeId, Graph, GraphStore, GraphType, SparseGraph, VertexId, ViewGraph, ViewKind};
use crate::handle::{Handle, Object};
use crate::iter::HandleIter;
use tracing::debug;

fn check_weight(weight: f64) -> GraphResult<()> {
    if weight.is_nan() {
        return Err(illegal("edge weight must not be NaN"));
    }
    Ok(())
}

impl Context {
    pub fn graph_create(
        &mut self,
        directed: bool,
        allow_self_loops: bool,
        allow_multiple_edges: bool,
        weighted: bool,
        res: &mut Handle,
    ) -> Status {
        self.run("graph_create", |ctx| {
            let graph_type = GraphType::new(directed, allow_self_loops, allow_multiple_edges, weighted);
            *res = ctx.register(Object::Graph(shared(GraphStore::new(graph_type))))?;
            debug!("Created graph {:?}", graph_type);
            Ok(())
        })
    }

    /// Build an immutable graph from a list of edge pairs or edge triples
    pub fn graph_sparse_create(
        &mut self,
        num_vertices: usize,
        edge_list: Handle,
        directed: bool,
        weighted: bool,
        res: &mut Handle,
    ) -> Status {
        self.run("graph_sparse_create", |ctx| {
            ctx.config().check_sparse_vertices(num_vertices)?;
            let edges = ctx
                .registry()
                .list(edge_list)?
                .iter()
                .map(|e| match e.as_edge_triple() {
                    Ok((s, t, w)) => Ok((s, t, Some(w))),
                    Err(_) => e.as_edge_pair().map(|(s, t)| (s, t, None)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            for (_, _, w) in &edges {
                w.map(check_weight).transpose()?;
            }
            let graph = SparseGraph::new(num_vertices, edges, directed, weighted)?;
            *res = ctx.register(Object::Graph(shared(graph)))?;
            Ok(())
        })
    }

    /// Copy a graph into a sparse graph over vertices `0..=max_id`, edges renumbered
    pub fn graph_as_sparse(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.run("graph_as_sparse", |ctx| {
            let g = ctx.shared_graph(graph)?;
            let guard = g.read();
            ctx.config().check_sparse_vertices(SparseGraph::span_of(&*guard))?;
            let sparse = SparseGraph::from_graph(&*guard)?;
            drop(guard);
            *res = ctx.register(Object::Graph(shared(sparse)))?;
            Ok(())
        })
    }

    pub fn graph_type(&mut self, graph: Handle, res: &mut GraphType) -> Status {
        self.run("graph_type", |ctx| {
            *res = ctx.shared_graph(graph)?.read().graph_type();
            Ok(())
        })
    }

    pub fn graph_vertices_count(&mut self, graph: Handle, res: &mut usize) -> Status {
        self.run("graph_vertices_count", |ctx| {
            *res = ctx.shared_graph(graph)?.read().vertex_count();
            Ok(())
        })
    }

    pub fn graph_edges_count(&mut self, graph: Handle, res: &mut usize) -> Status {
        self.run("graph_edges_count", |ctx| {
            *res = ctx.shared_graph(graph)?.read().edge_count();
            Ok(())
        })
    }

    pub fn graph_add_vertex(&mut self, graph: Handle, res: &mut u64) -> Status {
        self.run("graph_add_vertex", |ctx| {
            *res = ctx.shared_graph(graph)?.write().add_vertex()?.0;
            Ok(())
        })
    }

    /// `res` is false when the vertex already exists
    pub fn graph_add_given_vertex(&mut self, graph: Handle, vertex: u64, res: &mut bool) -> Status {
        self.run("graph_add_given_vertex", |ctx| {
            *res = ctx.shared_graph(graph)?.write().add_given_vertex(VertexId(vertex))?;
            Ok(())
        })
    }

    pub fn graph_remove_vertex(&mut self, graph: Handle, vertex: u64) -> Status {
        self.run("graph_remove_vertex", |ctx| {
            ctx.shared_graph(graph)?.write().remove_vertex(VertexId(vertex))
        })
    }

    pub fn graph_contains_vertex(&mut self, graph: Handle, vertex: u64, res: &mut bool) -> Status {
        self.run("graph_contains_vertex", |ctx| {
            *res = ctx.shared_graph(graph)?.read().contains_vertex(VertexId(vertex));
            Ok(())
        })
    }

    /// `weight` must be `None` on unweighted graphs
    pub fn graph_add_edge(
        &mut self,
        graph: Handle,
        source: u64,
        target: u64,
        weight: Option<f64>,
        res: &mut u64,
    ) -> Status {
        self.run("graph_add_edge", |ctx| {
            weight.map(check_weight).transpose()?;
            let e = ctx
                .shared_graph(graph)?
                .write()
                .add_edge(VertexId(source), VertexId(target), weight)?;
            *res = e.0;
            Ok(())
        })
    }

    pub fn graph_add_given_edge(
        &mut self,
        graph: Handle,
        source: u64,
        target: u64,
        edge: u64,
        weight: Option<f64>,
        res: &mut bool,
    ) -> Status {
        self.run("graph_add_given_edge", |ctx| {
            weight.map(check_weight).transpose()?;
            *res = ctx.shared_graph(graph)?.write().add_given_edge(
                VertexId(source),
                VertexId(target),
                EdgeId(edge),
                weight,
            )?;
            Ok(())
        })
    }

    pub fn graph_remove_edge(&mut self, graph: Handle, edge: u64) -> Status {
        self.run("graph_remove_edge", |ctx| ctx.shared_graph(graph)?.write().remove_edge(EdgeId(edge)))
    }

    pub fn graph_contains_edge(&mut self, graph: Handle, edge: u64, res: &mut bool) -> Status {
        self.run("graph_contains_edge", |ctx| {
            *res = ctx.shared_graph(graph)?.read().contains_edge(EdgeId(edge));
            Ok(())
        })
    }

    pub fn graph_contains_edge_between(&mut self, graph: Handle, u: u64, v: u64, res: &mut bool) -> Status {
        self.run("graph_contains_edge_between", |ctx| {
            *res = ctx
                .shared_graph(graph)?
                .read()
                .contains_edge_between(VertexId(u), VertexId(v))?;
            Ok(())
        })
    }

    pub fn graph_degree_of(&mut self, graph: Handle, vertex: u64, res: &mut usize) -> Status {
        self.run("graph_degree_of", |ctx| {
            *res = ctx.shared_graph(graph)?.read().degree_of(VertexId(vertex))?;
            Ok(())
        })
    }

    pub fn graph_indegree_of(&mut self, graph: Handle, vertex: u64, res: &mut usize) -> Status {
        self.run("graph_indegree_of", |ctx| {
            *res = ctx.shared_graph(graph)?.read().in_degree_of(VertexId(vertex))?;
            Ok(())
        })
    }

    pub fn graph_outdegree_of(&mut self, graph: Handle, vertex: u64, res: &mut usize) -> Status {
        self.run("graph_outdegree_of", |ctx| {
            *res = ctx.shared_graph(graph)?.read().out_degree_of(VertexId(vertex))?;
            Ok(())
        })
    }

    pub fn graph_edge_source(&mut self, graph: Handle, edge: u64, res: &mut u64) -> Status {
        self.run("graph_edge_source", |ctx| {
            *res = ctx.shared_graph(graph)?.read().edge_source(EdgeId(edge))?.0;
            Ok(())
        })
    }

    pub fn graph_edge_target(&mut self, graph: Handle, edge: u64, res: &mut u64) -> Status {
        self.run("graph_edge_target", |ctx| {
            *res = ctx.shared_graph(graph)?.read().edge_target(EdgeId(edge))?.0;
            Ok(())
        })
    }

    pub fn graph_get_edge_weight(&mut self, graph: Handle, edge: u64, res: &mut f64) -> Status {
        self.run("graph_get_edge_weight", |ctx| {
            *res = ctx.shared_graph(graph)?.read().edge_weight(EdgeId(edge))?;
            Ok(())
        })
    }

    pub fn graph_set_edge_weight(&mut self, graph: Handle, edge: u64, weight: f64) -> Status {
        self.run("graph_set_edge_weight", |ctx| {
            check_weight(weight)?;
            ctx.shared_graph(graph)?.write().set_edge_weight(EdgeId(edge), weight)
        })
    }

    /// All vertices in creation order
    pub fn graph_vertices_it(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.run("graph_vertices_it", |ctx| {
            let vertices = ctx.shared_graph(graph)?.read().vertices();
            *res = ctx.register_iter(HandleIter::ids(vertices.into_iter().map(|v| v.0)))?;
            Ok(())
        })
    }

    /// All edges; creation order until an edge is removed
    pub fn graph_edges_it(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.run("graph_edges_it", |ctx| {
            let edges = ctx.shared_graph(graph)?.read().edges();
            *res = ctx.register_iter(edge_ids(edges))?;
            Ok(())
        })
    }

    pub fn graph_edges_between_it(&mut self, graph: Handle, u: u64, v: u64, res: &mut Handle) -> Status {
        self.run("graph_edges_between_it", |ctx| {
            let edges = ctx.shared_graph(graph)?.read().edges_between(VertexId(u), VertexId(v))?;
            *res = ctx.register_iter(edge_ids(edges))?;
            Ok(())
        })
    }

    pub fn graph_edges_of_it(&mut self, graph: Handle, vertex: u64, res: &mut Handle) -> Status {
        self.run("graph_edges_of_it", |ctx| {
            let edges = ctx.shared_graph(graph)?.read().edges_of(VertexId(vertex))?;
            *res = ctx.register_iter(edge_ids(edges))?;
            Ok(())
        })
    }

    pub fn graph_in_edges_of_it(&mut self, graph: Handle, vertex: u64, res: &mut Handle) -> Status {
        self.run("graph_in_edges_of_it", |ctx| {
            let edges = ctx.shared_graph(graph)?.read().in_edges_of(VertexId(vertex))?;
            *res = ctx.register_iter(edge_ids(edges))?;
            Ok(())
        })
    }

    pub fn graph_out_edges_of_it(&mut self, graph: Handle, vertex: u64, res: &mut Handle) -> Status {
        self.run("graph_out_edges_of_it", |ctx| {
            let edges = ctx.shared_graph(graph)?.read().out_edges_of(VertexId(vertex))?;
            *res = ctx.register_iter(edge_ids(edges))?;
            Ok(())
        })
    }

    fn graph_view(&mut self, op: &'static str, graph: Handle, kind: ViewKind, res: &mut Handle) -> Status {
        self.run(op, |ctx| {
            let base = ctx.shared_graph(graph)?;
            *res = ctx.register(Object::Graph(shared(ViewGraph::new(base, kind))))?;
            Ok(())
        })
    }

    /// View ignoring edge direction; edges cannot be added through it
    pub fn graph_as_undirected(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.graph_view("graph_as_undirected", graph, ViewKind::Undirected, res)
    }

    pub fn graph_as_unmodifiable(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.graph_view("graph_as_unmodifiable", graph, ViewKind::Unmodifiable, res)
    }

    pub fn graph_as_unweighted(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.graph_view("graph_as_unweighted", graph, ViewKind::Unweighted, res)
    }

    pub fn graph_as_edge_reversed(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.graph_view("graph_as_edge_reversed", graph, ViewKind::EdgeReversed, res)
    }
}

fn edge_ids(edges: Vec<EdgeId>) -> HandleIter {
    HandleIter::ids(edges.into_iter().map(|e| e.0))
}
