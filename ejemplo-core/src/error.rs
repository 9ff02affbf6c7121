//! Error types for content retrieval

use thiserror::Error;

use crate::identity::format_node_list;
use crate::NodeId;

/// Malformed or missing request input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing identifiers")]
    MissingIdentifiers,

    #[error("invalid value: {value}")]
    InvalidIdentifier { value: String },
}

/// Content store failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Failed to load seed content: {reason}")]
    Seed { reason: String },
}

/// Renderer failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Failed to render node {id}: {reason}")]
    Failed { id: NodeId, reason: String },
}

/// Master error type for a retrieval.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EjemploError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Requested ids the store did not return, ascending.
    #[error("Cannot find nodes: {}.", format_node_list(.missing))]
    NotFound { missing: Vec<NodeId> },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for retrieval operations.
pub type EjemploResult<T> = Result<T, EjemploError>;
