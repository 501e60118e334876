//! In-memory mutable graph storage
//!
//! Uses insertion-ordered hash maps for O(1) lookup:
//! - vertices: VertexId -> incidence sets
//! - edges: EdgeId -> (source, target, weight)
//!
//! Removed ids are retired and never handed out again.

use super::traits::Graph;
use super::types::{EdgeId, GraphType, VertexId, MAX_ID};
use crate::error::{illegal, GraphError, GraphResult};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
struct EdgeData {
    source: VertexId,
    target: VertexId,
    weight: f64,
}

impl EdgeData {
    fn opposite(&self, v: VertexId) -> VertexId {
        if self.source == v {
            self.target
        } else {
            self.source
        }
    }
}

/// Incident edges of one vertex. Undirected graphs only use `outgoing`.
#[derive(Debug, Clone, Default)]
struct Incidence {
    outgoing: IndexSet<EdgeId>,
    incoming: IndexSet<EdgeId>,
    self_loops: usize,
}

/// In-memory graph storage with a configuration fixed at creation
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph_type: GraphType,

    /// Vertex storage in creation order
    vertices: IndexMap<VertexId, Incidence>,

    /// Edge storage in creation order until the first removal; removing an edge moves
    /// the newest edge into its position
    edges: IndexMap<EdgeId, EdgeData>,

    /// Next candidate for an auto-issued vertex id
    next_vertex_id: u64,

    /// Next candidate for an auto-issued edge id
    next_edge_id: u64,

    retired_vertices: HashSet<u64>,
    retired_edges: HashSet<u64>,
}

impl GraphStore {
    /// Create a new empty graph
    pub fn new(graph_type: GraphType) -> Self {
        GraphStore {
            graph_type: GraphType {
                modifiable: true,
                ..graph_type
            },
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
            next_vertex_id: 0,
            next_edge_id: 0,
            retired_vertices: HashSet::new(),
            retired_edges: HashSet::new(),
        }
    }

    fn incidence(&self, v: VertexId) -> GraphResult<&Incidence> {
        self.vertices.get(&v).ok_or(GraphError::VertexNotFound(v))
    }

    fn edge_data(&self, e: EdgeId) -> GraphResult<&EdgeData> {
        self.edges.get(&e).ok_or(GraphError::EdgeNotFound(e))
    }

    fn check_given_id(id: u64) -> GraphResult<()> {
        if id > MAX_ID {
            return Err(illegal(format!("id {} is larger than the maximum id {}", id, MAX_ID)));
        }
        Ok(())
    }

    fn issue_vertex_id(&mut self) -> VertexId {
        while self.vertices.contains_key(&VertexId(self.next_vertex_id))
            || self.retired_vertices.contains(&self.next_vertex_id)
        {
            self.next_vertex_id += 1;
        }
        let id = VertexId(self.next_vertex_id);
        self.next_vertex_id += 1;
        id
    }

    fn issue_edge_id(&mut self) -> EdgeId {
        while self.edges.contains_key(&EdgeId(self.next_edge_id)) || self.retired_edges.contains(&self.next_edge_id) {
            self.next_edge_id += 1;
        }
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        id
    }

    /// Check every configuration invariant of a prospective edge without touching state
    fn validate_edge(&self, source: VertexId, target: VertexId, weight: Option<f64>) -> GraphResult<()> {
        let source_incidence = self.incidence(source)?;
        self.incidence(target)?;
        if source == target && !self.graph_type.allow_self_loops {
            return Err(GraphError::SelfLoopForbidden(source));
        }
        if weight.is_some() && !self.graph_type.weighted {
            return Err(GraphError::Unweighted);
        }
        if !self.graph_type.allow_multiple_edges {
            let exists = source_incidence.outgoing.iter().any(|e| {
                self.edges.get(e).is_some_and(|d| {
                    if self.graph_type.directed {
                        d.target == target
                    } else {
                        d.opposite(source) == target
                    }
                })
            });
            if exists {
                return Err(GraphError::MultipleEdgesForbidden(source, target));
            }
        }
        Ok(())
    }

    fn insert_edge(&mut self, id: EdgeId, source: VertexId, target: VertexId, weight: Option<f64>) {
        let directed = self.graph_type.directed;
        if let Some(inc) = self.vertices.get_mut(&source) {
            inc.outgoing.insert(id);
            if source == target {
                inc.self_loops += 1;
                if directed {
                    inc.incoming.insert(id);
                }
            }
        }
        if source != target {
            if let Some(inc) = self.vertices.get_mut(&target) {
                if directed {
                    inc.incoming.insert(id);
                } else {
                    inc.outgoing.insert(id);
                }
            }
        }
        self.edges.insert(
            id,
            EdgeData {
                source,
                target,
                weight: weight.unwrap_or(1.0),
            },
        );
    }

    fn detach_edge(&mut self, id: EdgeId, data: &EdgeData) {
        for v in [data.source, data.target] {
            if let Some(inc) = self.vertices.get_mut(&v) {
                inc.outgoing.swap_remove(&id);
                inc.incoming.swap_remove(&id);
            }
        }
        if data.source == data.target {
            if let Some(inc) = self.vertices.get_mut(&data.source) {
                inc.self_loops = inc.self_loops.saturating_sub(1);
            }
        }
        self.retired_edges.insert(id.0);
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(GraphType::default())
    }
}

impl Graph for GraphStore {
    fn graph_type(&self) -> GraphType {
        self.graph_type
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn vertices(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    fn edges(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains_key(&v)
    }

    fn contains_edge(&self, e: EdgeId) -> bool {
        self.edges.contains_key(&e)
    }

    fn edge_source(&self, e: EdgeId) -> GraphResult<VertexId> {
        Ok(self.edge_data(e)?.source)
    }

    fn edge_target(&self, e: EdgeId) -> GraphResult<VertexId> {
        Ok(self.edge_data(e)?.target)
    }

    fn edge_weight(&self, e: EdgeId) -> GraphResult<f64> {
        Ok(self.edge_data(e)?.weight)
    }

    fn edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        let inc = self.incidence(v)?;
        let mut all: Vec<EdgeId> = inc.outgoing.iter().copied().collect();
        if self.graph_type.directed {
            all.extend(inc.incoming.iter().filter(|e| !inc.outgoing.contains(*e)));
        }
        Ok(all)
    }

    fn in_edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        let inc = self.incidence(v)?;
        let set = if self.graph_type.directed {
            &inc.incoming
        } else {
            &inc.outgoing
        };
        Ok(set.iter().copied().collect())
    }

    fn out_edges_of(&self, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        Ok(self.incidence(v)?.outgoing.iter().copied().collect())
    }

    fn edges_between(&self, u: VertexId, v: VertexId) -> GraphResult<Vec<EdgeId>> {
        let inc = self.incidence(u)?;
        self.incidence(v)?;
        let directed = self.graph_type.directed;
        Ok(inc
            .outgoing
            .iter()
            .copied()
            .filter(|e| {
                self.edges.get(e).is_some_and(|d| {
                    if directed {
                        d.target == v
                    } else {
                        d.opposite(u) == v
                    }
                })
            })
            .collect())
    }

    fn degree_of(&self, v: VertexId) -> GraphResult<usize> {
        let inc = self.incidence(v)?;
        if self.graph_type.directed {
            Ok(inc.outgoing.len() + inc.incoming.len())
        } else {
            Ok(inc.outgoing.len() + inc.self_loops)
        }
    }

    fn in_degree_of(&self, v: VertexId) -> GraphResult<usize> {
        if self.graph_type.directed {
            Ok(self.incidence(v)?.incoming.len())
        } else {
            self.degree_of(v)
        }
    }

    fn out_degree_of(&self, v: VertexId) -> GraphResult<usize> {
        if self.graph_type.directed {
            Ok(self.incidence(v)?.outgoing.len())
        } else {
            self.degree_of(v)
        }
    }

    fn add_vertex(&mut self) -> GraphResult<VertexId> {
        let id = self.issue_vertex_id();
        self.vertices.insert(id, Incidence::default());
        Ok(id)
    }

    fn add_given_vertex(&mut self, v: VertexId) -> GraphResult<bool> {
        Self::check_given_id(v.0)?;
        if self.vertices.contains_key(&v) {
            return Ok(false);
        }
        if self.retired_vertices.contains(&v.0) {
            return Err(GraphError::RetiredId(v.0));
        }
        self.vertices.insert(v, Incidence::default());
        Ok(true)
    }

    fn remove_vertex(&mut self, v: VertexId) -> GraphResult<()> {
        let inc = self.incidence(v)?;
        let incident: Vec<EdgeId> = inc.outgoing.iter().chain(inc.incoming.iter()).copied().collect();
        for e in incident {
            if let Some(data) = self.edges.swap_remove(&e) {
                self.detach_edge(e, &data);
            }
        }
        self.vertices.shift_remove(&v);
        self.retired_vertices.insert(v.0);
        Ok(())
    }

    fn add_edge(&mut self, source: VertexId, target: VertexId, weight: Option<f64>) -> GraphResult<EdgeId> {
        self.validate_edge(source, target, weight)?;
        let id = self.issue_edge_id();
        self.insert_edge(id, source, target, weight);
        Ok(id)
    }

    fn add_given_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        e: EdgeId,
        weight: Option<f64>,
    ) -> GraphResult<bool> {
        Self::check_given_id(e.0)?;
        if self.edges.contains_key(&e) {
            return Ok(false);
        }
        if self.retired_edges.contains(&e.0) {
            return Err(GraphError::RetiredId(e.0));
        }
        self.validate_edge(source, target, weight)?;
        self.insert_edge(e, source, target, weight);
        Ok(true)
    }

    fn remove_edge(&mut self, e: EdgeId) -> GraphResult<()> {
        let data = self.edges.swap_remove(&e).ok_or(GraphError::EdgeNotFound(e))?;
        self.detach_edge(e, &data);
        Ok(())
    }

    fn set_edge_weight(&mut self, e: EdgeId, weight: f64) -> GraphResult<()> {
        if !self.graph_type.weighted {
            return Err(GraphError::Unweighted);
        }
        let data = self.edges.get_mut(&e).ok_or(GraphError::EdgeNotFound(e))?;
        data.weight = weight;
        Ok(())
    }
}
