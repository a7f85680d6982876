//! Handlers for the `/movies` resource.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::Json;
use greenlight_core::error::CoreError;
use greenlight_core::filters::{validate_filters, Filters, DEFAULT_PAGE_SIZE};
use greenlight_core::types::DbId;
use greenlight_core::validator::Validator;
use greenlight_db::models::movie::{validate_movie, CreateMovie, Movie, UpdateMovie};
use greenlight_db::repositories::MovieRepo;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::query::{read_csv, read_int, read_string, QueryParams};
use crate::response::{MessageResponse, MovieListResponse, MovieResponse};
use crate::state::AppState;

/// Sort values accepted by `GET /v1/movies`.
pub const MOVIE_SORT_SAFELIST: &[&str] = &[
    "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
];

/// Optional precondition header carrying the version the client last saw.
pub const EXPECTED_VERSION_HEADER: &str = "x-expected-version";

/// Parse an `{id}` path segment. Anything that is not a positive integer
/// addresses no resource.
fn read_id_param(raw: &str) -> AppResult<DbId> {
    match raw.parse::<DbId>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::NotFound),
    }
}

/// GET /v1/movies
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> AppResult<Json<MovieListResponse>> {
    let Query(params) = query?;
    let mut v = Validator::new();

    let title = read_string(&params, "title", "");
    let genres = read_csv(&params, "genres", Vec::new());
    let filters = Filters {
        page: read_int(&params, "page", 1, &mut v),
        page_size: read_int(&params, "page_size", DEFAULT_PAGE_SIZE, &mut v),
        sort: read_string(&params, "sort", "id"),
        sort_safelist: MOVIE_SORT_SAFELIST,
    };

    validate_filters(&mut v, &filters);
    v.into_result()?;

    let (movies, metadata) = MovieRepo::get_all(&state.pool, &title, &genres, &filters).await?;
    Ok(Json(MovieListResponse { movies, metadata }))
}

/// POST /v1/movies
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateMovie>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<MovieResponse>)> {
    let mut movie = Movie::from(input);

    let mut v = Validator::new();
    validate_movie(&mut v, &movie);
    v.into_result()?;

    MovieRepo::insert(&state.pool, &mut movie).await?;
    tracing::info!(movie_id = movie.id, "Created movie");

    let location = format!("/v1/movies/{}", movie.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(MovieResponse { movie }),
    ))
}

/// GET /v1/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieResponse>> {
    let id = read_id_param(&id)?;
    let movie = MovieRepo::get(&state.pool, id).await?;
    Ok(Json(MovieResponse { movie }))
}

/// PATCH /v1/movies/{id}
///
/// Applies the supplied fields onto the stored movie, validates the result
/// and writes it back under the optimistic version check. If the request
/// carries `X-Expected-Version` and it differs from the stored version, the
/// write is refused before anything is changed.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    JsonBody(input): JsonBody<UpdateMovie>,
) -> AppResult<Json<MovieResponse>> {
    let id = read_id_param(&id)?;
    let mut movie = MovieRepo::get(&state.pool, id).await?;

    if let Some(expected) = headers.get(EXPECTED_VERSION_HEADER) {
        let matches = expected
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i32>().ok())
            .is_some_and(|expected| expected == movie.version);
        if !matches {
            return Err(CoreError::EditConflict {
                entity: "Movie",
                id,
                version: movie.version,
            }
            .into());
        }
    }

    input.apply_to(&mut movie);

    let mut v = Validator::new();
    validate_movie(&mut v, &movie);
    v.into_result()?;

    MovieRepo::update(&state.pool, &mut movie).await?;
    tracing::info!(movie_id = id, version = movie.version, "Updated movie");

    Ok(Json(MovieResponse { movie }))
}

/// DELETE /v1/movies/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = read_id_param(&id)?;
    MovieRepo::delete(&state.pool, id).await?;
    tracing::info!(movie_id = id, "Deleted movie");

    Ok(Json(MessageResponse {
        message: "movie successfully deleted",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_param_accepts_positive_integers() {
        assert_eq!(read_id_param("42").unwrap(), 42);
    }

    #[test]
    fn id_param_rejects_everything_else() {
        for raw in ["0", "-1", "abc", "", "1.5", "9223372036854775808"] {
            assert!(
                matches!(read_id_param(raw), Err(AppError::NotFound)),
                "{raw} should not address a movie"
            );
        }
    }

    #[test]
    fn safelist_has_ascending_and_descending_forms() {
        for column in ["id", "title", "year", "runtime"] {
            assert!(MOVIE_SORT_SAFELIST.contains(&column));
            assert!(MOVIE_SORT_SAFELIST.contains(&format!("-{column}").as_str()));
        }
        assert_eq!(MOVIE_SORT_SAFELIST.len(), 8);
    }
}
