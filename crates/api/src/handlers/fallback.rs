//! Handlers for requests no route accepts.

use axum::http::Method;

use crate::error::AppError;

/// No route matches the path.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// The path matches a route that does not accept `method`.
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}
