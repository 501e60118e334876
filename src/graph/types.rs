//! Core type definitions for the graph store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest vertex or edge id; ids cross the boundary as signed 64-bit integers
pub const MAX_ID: u64 = i64::MAX as u64;

/// Unique identifier for a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct VertexId(pub u64);

impl VertexId {
    pub fn new(id: u64) -> Self {
        VertexId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexId({})", self.0)
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        VertexId(id)
    }
}

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        EdgeId(id)
    }
}

/// Configuration of a graph, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphType {
    pub directed: bool,
    pub allow_self_loops: bool,
    pub allow_multiple_edges: bool,
    pub weighted: bool,
    /// False for sparse graphs and unmodifiable views
    pub modifiable: bool,
}

impl GraphType {
    pub fn new(directed: bool, allow_self_loops: bool, allow_multiple_edges: bool, weighted: bool) -> Self {
        GraphType {
            directed,
            allow_self_loops,
            allow_multiple_edges,
            weighted,
            modifiable: true,
        }
    }

    pub fn undirected(self) -> Self {
        GraphType {
            directed: false,
            ..self
        }
    }

    pub fn unweighted(self) -> Self {
        GraphType {
            weighted: false,
            ..self
        }
    }

    pub fn unmodifiable(self) -> Self {
        GraphType {
            modifiable: false,
            ..self
        }
    }
}

impl Default for GraphType {
    fn default() -> Self {
        GraphType::new(true, true, true, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let id = VertexId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "VertexId(42)");

        let id2: VertexId = 100.into();
        assert_eq!(id2.as_u64(), 100);
    }

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new(99);
        assert_eq!(id.as_u64(), 99);
        assert_eq!(format!("{}", id), "EdgeId(99)");
    }

    #[test]
    fn test_id_ordering() {
        assert!(VertexId::new(1) < VertexId::new(2));
    }

    #[test]
    fn test_graph_type_transforms() {
        let t = GraphType::new(true, false, false, true);
        assert!(t.modifiable);
        let u = t.undirected().unweighted().unmodifiable();
        assert!(!u.directed && !u.weighted && !u.modifiable);
        assert!(!u.allow_self_loops);
    }
}
