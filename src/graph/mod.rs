//! Graph store, sparse graphs and views
//!
//! Every representation implements [`Graph`]; handles hold them as [`SharedGraph`]
//! so that views can share a base store.

pub mod sparse;
pub mod store;
pub mod traits;
pub mod types;
pub mod view;

pub use sparse::SparseGraph;
pub use store::GraphStore;
pub use traits::{shared, Graph, SharedGraph};
pub use types::{EdgeId, GraphType, VertexId, MAX_ID};
pub use view::{ViewGraph, ViewKind};
