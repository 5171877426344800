//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::TodoId;

/// Domain errors represent misuse of the todo tree.
/// Every variant points at a caller-side bug, so none is recovered internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("no todo with id {0}")]
    NotFound(TodoId),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("todo {0} has no parent")]
    Detached(TodoId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
