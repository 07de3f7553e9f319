use crate::types::DbId;

/// Errors produced by the pure domain logic.
///
/// The reconciliation and aggregation functions themselves cannot fail;
/// this type covers the few operations that gate on state, such as
/// building a save payload from an invalid configuration.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
