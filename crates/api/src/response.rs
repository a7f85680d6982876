//! Response envelope types for API handlers.
//!
//! Every successful response wraps its payload in an object keyed by what it
//! contains (`movie`, `movies`, `message`), so clients can tell payloads
//! apart and new keys can be added without breaking them.

use greenlight_core::filters::Metadata;
use greenlight_db::models::movie::Movie;
use serde::Serialize;

/// `{ "movie": ... }`
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub movie: Movie,
}

/// `{ "movies": [...], "metadata": {...} }`
#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub metadata: Metadata,
}

/// `{ "message": "..." }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
