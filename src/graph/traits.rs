//! The query and mutation contract shared by every graph representation
//!
//! Implemented by the mutable [`GraphStore`](super::store::GraphStore), the immutable
//! [`SparseGraph`](super::sparse::SparseGraph) and the delegating
//! [`ViewGraph`](super::view::ViewGraph) wrappers.

use super::types::{EdgeId, GraphType, VertexId};
use crate::error::{GraphError, GraphResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// A graph shared between handles and views
pub type SharedGraph = Arc<RwLock<dyn Graph>>;

pub fn shared<G: Graph + 'static>(graph: G) -> SharedGraph {
    Arc::new(RwLock::new(graph))
}

pub trait Graph: Send + Sync {
    fn graph_type(&self) -> GraphType;

    fn vertex_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// All vertices in creation order
    fn vertices(&self) -> Vec<VertexId>;

    /// All edges; creation order until an edge is removed
    fn edges(&self) -> Vec<EdgeId>;

    fn contains_vertex(&self, v: VertexId) -> bool;

    fn contains_edge(&self, e: EdgeId) -> bool;

    fn edge_source(&self, e: EdgeId) -> GraphResult<VertexId>;

    fn edge_target(&self, e: EdgeId) -> GraphResult<VertexId>;

    /// 1.0 for every edge of an unweighted graph
    fn edge_weight(&self, e: EdgeId) -> GraphResult<f64>;

    /// Every edge touching `v`; a self-loop is listed once
    fn edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>>;

    /// Incoming edges; equal to `edges_of` for undirected graphs
    fn in_edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>>;

    /// Outgoing edges; equal to `edges_of` for undirected graphs
    fn out_edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>>;

    /// Edges from `u` to `v` (either way round when undirected)
    fn edges_between(&self, u: VertexId, v: VertexId) -> GraphResult<Vec<EdgeId>>;

    /// Self-loops count twice
    fn degree_of(&self, v: VertexId) -> GraphResult<usize>;

    fn in_degree_of(&self, v: VertexId) -> GraphResult<usize>;

    fn out_degree_of(&self, v: VertexId) -> GraphResult<usize>;

    fn add_vertex(&mut self) -> GraphResult<VertexId>;

    /// `false` when `v` is already present
    fn add_given_vertex(&mut self, v: VertexId) -> GraphResult<bool>;

    fn remove_vertex(&mut self, v: VertexId) -> GraphResult<()>;

    /// `weight` is rejected on unweighted graphs
    fn add_edge(&mut self, source: VertexId, target: VertexId, weight: Option<f64>) -> GraphResult<EdgeId>;

    /// `false` when `e` is already present
    fn add_given_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        e: EdgeId,
        weight: Option<f64>,
    ) -> GraphResult<bool>;

    fn remove_edge(&mut self, e: EdgeId) -> GraphResult<()>;

    fn set_edge_weight(&mut self, e: EdgeId, weight: f64) -> GraphResult<()>;

    /// Fails when `add_edge` would refuse every edge, whatever its endpoints
    fn accepts_edges(&self) -> GraphResult<()> {
        if self.graph_type().modifiable {
            Ok(())
        } else {
            Err(GraphError::Unsupported("graph is unmodifiable"))
        }
    }

    fn contains_edge_between(&self, u: VertexId, v: VertexId) -> GraphResult<bool> {
        Ok(!self.edges_between(u, v)?.is_empty())
    }
}
