use std::time::Duration;

use greenlight_core::types::DbId;

/// Failure modes of repository calls.
///
/// `Storage` and `Timeout` are both storage faults: opaque to clients,
/// logged with detail by the caller.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("record not found")]
    RecordNotFound,

    /// No row matched the `(id, version)` pair: it was changed (or deleted)
    /// after the caller read it.
    #[error("edit conflict on id {id} at version {version}")]
    EditConflict { id: DbId, version: i32 },

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("query exceeded its {0:?} deadline")]
    Timeout(Duration),
}
