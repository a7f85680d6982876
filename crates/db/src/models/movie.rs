//! Movie entity model, DTOs, and validation rules.

use chrono::Datelike;
use greenlight_core::runtime::Runtime;
use greenlight_core::types::{DbId, Timestamp};
use greenlight_core::validator::{unique, Validator};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Earliest accepted release year (the first known motion picture).
pub const MIN_YEAR: i32 = 1888;

/// Maximum title length in bytes.
pub const MAX_TITLE_BYTES: usize = 500;

/// Maximum number of genres per movie.
pub const MAX_GENRES: usize = 5;

/// A row from the `movies` table.
///
/// `id`, `created_at` and `version` are written only by the repository.
/// `created_at` never appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    #[serde(skip)]
    pub created_at: Timestamp,
    pub title: String,
    pub year: i32,
    #[serde(rename = "runTime")]
    #[sqlx(try_from = "i32")]
    pub runtime: Runtime,
    pub genres: Vec<String>,
    pub version: i32,
}

/// DTO for creating a new movie.
///
/// Missing fields fall back to their zero value so that validation, not
/// decoding, reports them as "must be provided".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateMovie {
    pub title: String,
    pub year: i32,
    #[serde(alias = "runTime")]
    pub runtime: Runtime,
    pub genres: Vec<String>,
}

impl From<CreateMovie> for Movie {
    fn from(input: CreateMovie) -> Self {
        Self {
            title: input.title,
            year: input.year,
            runtime: input.runtime,
            genres: input.genres,
            ..Self::default()
        }
    }
}

/// DTO for a partial update. Absent (or `null`) fields leave the stored
/// value unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, alias = "runTime")]
    pub runtime: Option<Runtime>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
}

impl UpdateMovie {
    /// Overlay the supplied fields onto a previously fetched movie.
    pub fn apply_to(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
    }
}

/// Check the caller-writable fields of `movie`.
///
/// Always run before [`MovieRepo::insert`](crate::repositories::MovieRepo::insert)
/// and [`MovieRepo::update`](crate::repositories::MovieRepo::update); the
/// repository does not re-check business rules.
pub fn validate_movie(v: &mut Validator, movie: &Movie) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= MIN_YEAR, "year", "must be greater than 1888");
    v.check(
        movie.year <= chrono::Utc::now().year(),
        "year",
        "must not be in the future",
    );

    let minutes = movie.runtime.minutes();
    v.check(minutes != 0, "runtime", "must be provided");
    v.check(minutes > 0, "runtime", "must be a positive integer");

    v.check(!movie.genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(
        movie.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        unique(&movie.genres),
        "genres",
        "must not contain duplicate values",
    );
}
