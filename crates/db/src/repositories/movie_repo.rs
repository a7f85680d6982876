//! Repository for the `movies` table.

use greenlight_core::filters::{Filters, Metadata};
use greenlight_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgPool};

use super::bounded;
use crate::error::RepoError;
use crate::models::movie::Movie;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_at, title, year, runtime, genres, version";

/// A listing row: the movie plus the pre-pagination match count.
#[derive(FromRow)]
struct MovieWithTotal {
    total_records: i64,
    #[sqlx(flatten)]
    movie: Movie,
}

/// Provides CRUD and listing operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie and write the store-assigned `id`, `created_at`
    /// and `version` back into `movie`.
    pub async fn insert(pool: &PgPool, movie: &mut Movie) -> Result<(), RepoError> {
        let query = sqlx::query_as::<_, (DbId, Timestamp, i32)>(
            "INSERT INTO movies (title, year, runtime, genres)
             VALUES ($1, $2, $3, $4)
             RETURNING id, created_at, version",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime.minutes())
        .bind(&movie.genres)
        .fetch_one(pool);

        let (id, created_at, version) = bounded(query).await?;
        movie.id = id;
        movie.created_at = created_at;
        movie.version = version;
        tracing::debug!(movie_id = id, "Inserted movie");
        Ok(())
    }

    /// Fetch a movie by ID.
    ///
    /// IDs below 1 are never assigned, so they short-circuit to
    /// [`RepoError::RecordNotFound`] without a query.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Movie, RepoError> {
        if id < 1 {
            return Err(RepoError::RecordNotFound);
        }
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        let row = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool);
        bounded(row).await?.ok_or(RepoError::RecordNotFound)
    }

    /// Write every mutable field and bump `version`, provided the stored
    /// version still equals `movie.version`.
    ///
    /// On success the new version is written back into `movie`. If the row
    /// moved on since it was read, returns [`RepoError::EditConflict`] and
    /// leaves the row untouched.
    pub async fn update(pool: &PgPool, movie: &mut Movie) -> Result<(), RepoError> {
        if movie.id < 1 {
            return Err(RepoError::RecordNotFound);
        }
        let query = sqlx::query_scalar::<_, i32>(
            "UPDATE movies SET
                title = $1,
                year = $2,
                runtime = $3,
                genres = $4,
                version = version + 1
             WHERE id = $5 AND version = $6
             RETURNING version",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime.minutes())
        .bind(&movie.genres)
        .bind(movie.id)
        .bind(movie.version)
        .fetch_optional(pool);

        let new_version = bounded(query).await?;
        match new_version {
            Some(version) => {
                movie.version = version;
                Ok(())
            }
            None => Err(RepoError::EditConflict {
                id: movie.id,
                version: movie.version,
            }),
        }
    }

    /// Permanently delete a movie by ID.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), RepoError> {
        if id < 1 {
            return Err(RepoError::RecordNotFound);
        }
        let query = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool);
        let result = bounded(query).await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::RecordNotFound);
        }
        Ok(())
    }

    /// List one page of movies matching `title` and `genres`.
    ///
    /// - An empty `title` matches everything; otherwise a case-insensitive
    ///   full-text match on the title.
    /// - An empty `genres` matches everything; otherwise a movie matches
    ///   when its genres contain every requested genre.
    /// - Rows are ordered by the safelisted sort column, then `id ASC` so
    ///   pages stay deterministic when sort keys tie.
    ///
    /// The total match count comes from the same query as the page, so the
    /// metadata always describes the rows returned.
    ///
    /// # Panics
    ///
    /// Panics if `filters.sort` is not in its safelist; run
    /// [`validate_filters`](greenlight_core::filters::validate_filters) first.
    pub async fn get_all(
        pool: &PgPool,
        title: &str,
        genres: &[String],
        filters: &Filters,
    ) -> Result<(Vec<Movie>, Metadata), RepoError> {
        let query = format!(
            "SELECT count(*) OVER() AS total_records, {COLUMNS}
             FROM movies
             WHERE (to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR $1 = '')
               AND (genres @> $2 OR $2 = '{{}}')
             ORDER BY {} {}, id ASC
             LIMIT $3 OFFSET $4",
            filters.sort_column(),
            filters.sort_direction().as_sql(),
        );
        let rows = sqlx::query_as::<_, MovieWithTotal>(&query)
            .bind(title)
            .bind(genres)
            .bind(filters.limit())
            .bind(filters.offset())
            .fetch_all(pool);
        let rows = bounded(rows).await?;

        let total_records = rows.first().map_or(0, |row| row.total_records);
        let movies = rows.into_iter().map(|row| row.movie).collect();
        let metadata = Metadata::calculate(total_records, filters.page, filters.page_size);
        Ok((movies, metadata))
    }
}
