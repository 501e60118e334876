//! Lightweight views that share a base graph and transform it on read
//!
//! A view never copies structure: every call locks the base graph, so later
//! mutations of the base are visible through the view.

use super::traits::{Graph, SharedGraph};
use super::types::{EdgeId, GraphType, VertexId};
use crate::error::{GraphError, GraphResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Edge direction is ignored; adding edges is unsupported
    Undirected,
    /// Every mutator is unsupported
    Unmodifiable,
    /// Every weight reads as 1.0; setting weights is unsupported
    Unweighted,
    /// Source and target of every edge are swapped
    EdgeReversed,
}

pub struct ViewGraph {
    base: SharedGraph,
    kind: ViewKind,
}

impl ViewGraph {
    pub fn new(base: SharedGraph, kind: ViewKind) -> Self {
        ViewGraph { base, kind }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    fn base_directed(&self) -> bool {
        self.base.read().graph_type().directed
    }

    fn modifiable(&self) -> GraphResult<()> {
        if self.kind == ViewKind::Unmodifiable {
            Err(GraphError::Unsupported("graph is unmodifiable"))
        } else {
            Ok(())
        }
    }

    /// Union of in and out edges, each edge once
    fn all_incident(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        self.base.read().edges_of(v)
    }
}

impl Graph for ViewGraph {
    fn graph_type(&self) -> GraphType {
        let t = self.base.read().graph_type();
        match self.kind {
            ViewKind::Undirected => t.undirected(),
            ViewKind::Unmodifiable => t.unmodifiable(),
            ViewKind::Unweighted => t.unweighted(),
            ViewKind::EdgeReversed => t,
        }
    }

    fn vertex_count(&self) -> usize {
        self.base.read().vertex_count()
    }

    fn edge_count(&self) -> usize {
        self.base.read().edge_count()
    }

    fn vertices(&self) -> Vec<VertexId> {
        self.base.read().vertices()
    }

    fn edges(&self) -> Vec<EdgeId> {
        self.base.read().edges()
    }

    fn contains_vertex(&self, v: VertexId) -> bool {
        self.base.read().contains_vertex(v)
    }

    fn contains_edge(&self, e: EdgeId) -> bool {
        self.base.read().contains_edge(e)
    }

    fn edge_source(&self, e: EdgeId) -> GraphResult<VertexId> {
        match self.kind {
            ViewKind::EdgeReversed => self.base.read().edge_target(e),
            _ => self.base.read().edge_source(e),
        }
    }

    fn edge_target(&self, e: EdgeId) -> GraphResult<VertexId> {
        match self.kind {
            ViewKind::EdgeReversed => self.base.read().edge_source(e),
            _ => self.base.read().edge_target(e),
        }
    }

    fn edge_weight(&self, e: EdgeId) -> GraphResult<f64> {
        let weight = self.base.read().edge_weight(e)?;
        Ok(if self.kind == ViewKind::Unweighted { 1.0 } else { weight })
    }

    fn edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        self.all_incident(v)
    }

    fn in_edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        match self.kind {
            ViewKind::Undirected => self.all_incident(v),
            ViewKind::EdgeReversed => self.base.read().out_edges_of(v),
            _ => self.base.read().in_edges_of(v),
        }
    }

    fn out_edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        match self.kind {
            ViewKind::Undirected => self.all_incident(v),
            ViewKind::EdgeReversed => self.base.read().in_edges_of(v),
            _ => self.base.read().out_edges_of(v),
        }
    }

    fn edges_between(&self, u: VertexId, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        let base = self.base.read();
        match self.kind {
            ViewKind::Undirected if base.graph_type().directed => {
                let mut edges = base.edges_between(u, v)?;
                if u != v {
                    edges.extend(base.edges_between(v, u)?);
                }
                Ok(edges)
            }
            ViewKind::EdgeReversed => base.edges_between(v, u),
            _ => base.edges_between(u, v),
        }
    }

    fn degree_of(&self, v: VertexId) -> GraphResult<usize> {
        self.base.read().degree_of(v)
    }

    fn in_degree_of(&self, v: VertexId) -> GraphResult<usize> {
        match self.kind {
            ViewKind::Undirected => self.degree_of(v),
            ViewKind::EdgeReversed => self.base.read().out_degree_of(v),
            _ => self.base.read().in_degree_of(v),
        }
    }

    fn out_degree_of(&self, v: VertexId) -> GraphResult<usize> {
        match self.kind {
            ViewKind::Undirected => self.degree_of(v),
            ViewKind::EdgeReversed => self.base.read().in_degree_of(v),
            _ => self.base.read().out_degree_of(v),
        }
    }

    fn add_vertex(&mut self) -> GraphResult<VertexId> {
        self.modifiable()?;
        self.base.write().add_vertex()
    }

    fn add_given_vertex(&mut self, v: VertexId) -> GraphResult<bool> {
        self.modifiable()?;
        self.base.write().add_given_vertex(v)
    }

    fn remove_vertex(&mut self, v: VertexId) -> GraphResult<()> {
        self.modifiable()?;
        self.base.write().remove_vertex(v)
    }

    fn accepts_edges(&self) -> GraphResult<()> {
        match self.kind {
            ViewKind::Unmodifiable => Err(GraphError::Unsupported("graph is unmodifiable")),
            ViewKind::Undirected if self.base_directed() => {
                Err(GraphError::Unsupported("edges cannot be added through an undirected view"))
            }
            _ => self.base.read().accepts_edges(),
        }
    }

    fn add_edge(&mut self, source: VertexId, target: VertexId, weight: Option<f64>) -> GraphResult<EdgeId> {
        self.accepts_edges()?;
        match self.kind {
            ViewKind::Unweighted if weight.is_some() => Err(GraphError::Unweighted),
            ViewKind::EdgeReversed => self.base.write().add_edge(target, source, weight),
            _ => self.base.write().add_edge(source, target, weight),
        }
    }

    fn add_given_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        e: EdgeId,
        weight: Option<f64>,
    ) -> GraphResult<bool> {
        self.accepts_edges()?;
        match self.kind {
            ViewKind::Unweighted if weight.is_some() => Err(GraphError::Unweighted),
            ViewKind::EdgeReversed => self.base.write().add_given_edge(target, source, e, weight),
            _ => self.base.write().add_given_edge(source, target, e, weight),
        }
    }

    fn remove_edge(&mut self, e: EdgeId) -> GraphResult<()> {
        self.modifiable()?;
        self.base.write().remove_edge(e)
    }

    fn set_edge_weight(&mut self, e: EdgeId, weight: f64) -> GraphResult<()> {
        match self.kind {
            ViewKind::Unmodifiable => Err(GraphError::Unsupported("graph is unmodifiable")),
            ViewKind::Unweighted => Err(GraphError::Unsupported("weights of an unweighted view are fixed")),
            _ => self.base.write().set_edge_weight(e, weight),
        }
    }
}
