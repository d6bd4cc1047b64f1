//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::id::NodeId;

/// Domain errors represent rejected tree operations.
/// None of them leave partial state behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("no such parent exists: {0:?}")]
    NoSuchParent(NodeId),

    #[error("nil data")]
    NilData,

    #[error("invalid index: {index} out of bounds for {len} children")]
    InvalidIndex { index: usize, len: usize },

    #[error("child rejected: {reason}")]
    Rejected { reason: String },

    #[error("cycle detected in model tree at: {label:?}")]
    CycleDetected { label: String },

    #[error("unknown node id: {0:?}")]
    UnknownId(NodeId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
