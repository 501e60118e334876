//! Error types for graph algorithms

use crate::common::{EdgeId, NodeId};
use std::time::Duration;
use thiserror::Error;

/// Errors raised by algorithm preconditions or during execution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgoError {
    #[error("Vertex {0} not found")]
    NoSuchVertex(NodeId),

    #[error("Edge {0} not found")]
    NoSuchEdge(EdgeId),

    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    #[error("Negative cycle detected, reachable from vertex {0}")]
    NegativeCycle(NodeId),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

pub type AlgoResult<T> = Result<T, AlgoError>;

pub(crate) fn illegal(msg: impl Into<String>) -> AlgoError {
    AlgoError::IllegalArgument(msg.into())
}
