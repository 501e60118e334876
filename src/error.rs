//! Engine errors and the boundary status codes they map to

use crate::graph::types::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use strata_algorithms::AlgoError;
use thiserror::Error;

/// Errors that can occur during graph, container or handle operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Self-loops are not allowed: {0}")]
    SelfLoopForbidden(VertexId),

    #[error("Multiple edges are not allowed between {0} and {1}")]
    MultipleEdgesForbidden(VertexId, VertexId),

    #[error("Graph is unweighted")]
    Unweighted,

    #[error("Id {0} was retired and cannot be reused")]
    RetiredId(u64),

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Iterator is exhausted")]
    IteratorExhausted,

    #[error("Handle {0:#x} is not live")]
    UseAfterFree(u64),

    #[error("Handle {handle:#x} refers to a {actual}, expected a {expected}")]
    WrongHandleKind {
        handle: u64,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Negative cycle detected, reachable from vertex {0}")]
    NegativeCycle(u64),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Internal failure: {0}")]
    Internal(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

impl From<AlgoError> for GraphError {
    fn from(err: AlgoError) -> Self {
        match err {
            AlgoError::NoSuchVertex(v) => GraphError::VertexNotFound(VertexId(v)),
            AlgoError::NoSuchEdge(e) => GraphError::EdgeNotFound(EdgeId(e)),
            AlgoError::IllegalArgument(msg) => GraphError::IllegalArgument(msg),
            AlgoError::NegativeCycle(v) => GraphError::NegativeCycle(v),
            AlgoError::Timeout(budget) => GraphError::Timeout(budget),
        }
    }
}

pub(crate) fn illegal(msg: impl Into<String>) -> GraphError {
    GraphError::IllegalArgument(msg.into())
}

/// Integer status returned by every boundary call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    NoSuchElement = 1,
    IllegalArgument = 2,
    UnsupportedOperation = 3,
    NegativeCycle = 4,
    Timeout = 5,
    UseAfterFree = 6,
    InternalFailure = 7,
}

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Success => "Success",
            Status::NoSuchElement => "NoSuchElement",
            Status::IllegalArgument => "IllegalArgument",
            Status::UnsupportedOperation => "UnsupportedOperation",
            Status::NegativeCycle => "NegativeCycle",
            Status::Timeout => "Timeout",
            Status::UseAfterFree => "UseAfterFree",
            Status::InternalFailure => "InternalFailure",
        };
        write!(f, "{}", name)
    }
}

impl GraphError {
    /// Boundary classification of this error
    pub fn status(&self) -> Status {
        match self {
            GraphError::VertexNotFound(_)
            | GraphError::EdgeNotFound(_)
            | GraphError::NoSuchElement(_)
            | GraphError::IteratorExhausted => Status::NoSuchElement,
            GraphError::SelfLoopForbidden(_)
            | GraphError::MultipleEdgesForbidden(..)
            | GraphError::Unweighted
            | GraphError::RetiredId(_)
            | GraphError::IllegalArgument(_)
            | GraphError::WrongHandleKind { .. } => Status::IllegalArgument,
            GraphError::Unsupported(_) => Status::UnsupportedOperation,
            GraphError::NegativeCycle(_) => Status::NegativeCycle,
            GraphError::Timeout(_) => Status::Timeout,
            GraphError::UseAfterFree(_) => Status::UseAfterFree,
            GraphError::Internal(_) => Status::InternalFailure,
        }
    }
}
