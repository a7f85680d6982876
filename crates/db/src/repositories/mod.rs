//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Every call runs under its
//! own [`QUERY_TIMEOUT`] deadline.

use std::future::Future;
use std::time::Duration;

use crate::error::RepoError;

pub mod movie_repo;

pub use movie_repo::MovieRepo;

/// Deadline applied to each individual store call.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Run a store call under [`QUERY_TIMEOUT`], independent of any outer
/// request deadline.
async fn bounded<T, F>(query: F) -> Result<T, RepoError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(QUERY_TIMEOUT, query).await {
        Ok(result) => result.map_err(RepoError::from),
        Err(_) => Err(RepoError::Timeout(QUERY_TIMEOUT)),
    }
}
