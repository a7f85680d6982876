use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `available` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    /// Deployment environment from configuration.
    pub environment: String,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// GET /v1/healthcheck -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = greenlight_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "available" } else { "degraded" };

    Json(HealthResponse {
        status,
        environment: state.config.env.clone(),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(health_check))
}
