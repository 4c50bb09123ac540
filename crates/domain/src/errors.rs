//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Work item id is not a positive integer
    #[error("Invalid work item id: {0}")]
    InvalidWorkItemId(String),

    /// Relation URL does not end with a work item id
    #[error("Invalid relation url: {0}")]
    InvalidRelation(String),
}
