//! Strata Graph Engine
//!
//! An embeddable in-memory graph engine. Graphs, containers, iterators and algorithm
//! results live behind opaque [`Handle`]s owned by an execution [`Context`]; every
//! operation returns a [`Status`] and reports failures through the context's error
//! channel, so the surface maps directly onto a C-style call-and-status boundary.
//!
//! # Layout
//!
//! - [`graph`]: the mutable [`GraphStore`], the read-only [`SparseGraph`] and live views
//! - [`containers`], [`attributes`], [`iter`]: values exchanged across the boundary
//! - [`handle`], [`context`]: the handle registry and the per-context error channel
//! - [`algo`]: snapshots graphs into the `strata-algorithms` CSR view
//! - [`generate`]: random and deterministic graph generators
//!
//! ## Example Usage
//!
//! ```rust
//! use strata::{Context, ContextConfig, Handle, Status};
//!
//! let mut ctx = Context::new(ContextConfig::default());
//! let mut g = Handle::NULL;
//! assert_eq!(ctx.graph_create(false, false, false, true, &mut g), Status::Success);
//!
//! let mut v = [0u64; 3];
//! for slot in v.iter_mut() {
//!     ctx.graph_add_vertex(g, slot);
//! }
//! let mut e = 0;
//! ctx.graph_add_edge(g, v[0], v[1], Some(1.0), &mut e);
//! ctx.graph_add_edge(g, v[1], v[2], Some(2.0), &mut e);
//!
//! let mut weight = 0.0;
//! let mut tree = Handle::NULL;
//! assert_eq!(ctx.mst_exec_kruskal(g, &mut weight, &mut tree), Status::Success);
//! assert_eq!(weight, 3.0);
//!
//! // a self-loop is rejected and the message is kept until cleared
//! assert_eq!(ctx.graph_add_edge(g, v[0], v[0], None, &mut e), Status::IllegalArgument);
//! assert!(ctx.error_message().is_some());
//! ctx.error_clear();
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod api;
pub mod attributes;
pub mod config;
pub mod containers;
pub mod context;
pub mod error;
pub mod generate;
pub mod graph;
pub mod handle;
pub mod iter;

pub use attributes::{AttributeRegistry, AttributeStore, AttributeType, AttributeValue};
pub use config::ContextConfig;
pub use containers::{Element, ElementList, ElementMap, ElementSet};
pub use context::Context;
pub use error::{GraphError, GraphResult, Status};
pub use graph::{EdgeId, Graph, GraphStore, GraphType, SharedGraph, SparseGraph, VertexId, ViewGraph, ViewKind};
pub use handle::{Handle, HandleRegistry, Object, ObjectKind};
pub use iter::HandleIter;

pub use strata_algorithms::{
    AlphaCentralityConfig, CentralityConfig, CliqueStrategy, FlowProblem, Heuristic, PageRankConfig, PathResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
