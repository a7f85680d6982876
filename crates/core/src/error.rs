use crate::types::DbId;
use crate::validator::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The caller's view of the entity is stale: it is no longer at `version`.
    #[error("Edit conflict: {entity} {id} is no longer at version {version}")]
    EditConflict {
        entity: &'static str,
        id: DbId,
        version: i32,
    },
}
