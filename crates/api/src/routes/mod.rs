pub mod health;
pub mod movies;

use axum::Router;

use crate::handlers::fallback;
use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /healthcheck                 service health
///
/// /movies                      list, create
/// /movies/{id}                 get, update (PATCH), delete
/// ```
///
/// A known path requested with a method it does not accept gets a JSON 405.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/movies", movies::router())
        .method_not_allowed_fallback(fallback::method_not_allowed)
}
