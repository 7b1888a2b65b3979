use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The target record exists but is in a state that forbids the operation
    /// (unavailable car, inactive customer).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A multi-record update left car, customer and rental disagreeing.
    #[error("Consistency error: {0}")]
    Consistency(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
