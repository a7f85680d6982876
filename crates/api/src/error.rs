use axum::extract::rejection::QueryRejection;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use greenlight_core::error::CoreError;
use greenlight_db::error::RepoError;
use serde_json::{json, Value};

use crate::extract::DecodeError;

const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";
const INTERNAL_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

/// Application-level error type for HTTP handlers.
///
/// Wraps domain, repository and decode errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{"error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `greenlight_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A repository outcome other than success.
    #[error(transparent)]
    Repo(#[from] RepoError),

    /// The request body could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The addressed resource does not exist (or the id is malformed).
    #[error("Not found")]
    NotFound,

    /// The route exists but does not accept this method.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Method),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message): (StatusCode, &str, Value) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(errors) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    json!(errors),
                ),
                CoreError::EditConflict {
                    entity,
                    id,
                    version,
                } => {
                    tracing::warn!(entity, id, version, "Edit conflict");
                    edit_conflict()
                }
            },

            // --- Repository errors ---
            AppError::Repo(err) => match err {
                RepoError::RecordNotFound => not_found(),
                RepoError::EditConflict { id, version } => {
                    tracing::warn!(id, version, "Edit conflict");
                    edit_conflict()
                }
                RepoError::Storage(_) | RepoError::Timeout(_) => {
                    tracing::error!(error = %err, "Storage fault");
                    internal_error()
                }
            },

            // --- Decode errors ---
            AppError::Decode(DecodeError::InvalidField { field, message }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                json!({ field.as_str(): message }),
            ),
            AppError::Decode(err) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                json!(err.to_string()),
            ),

            // --- HTTP-specific errors ---
            AppError::NotFound => not_found(),
            AppError::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                json!(format!("the {method} method is not supported for this resource")),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", json!(msg)),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn not_found() -> (StatusCode, &'static str, Value) {
    (StatusCode::NOT_FOUND, "NOT_FOUND", json!(NOT_FOUND_MESSAGE))
}

fn edit_conflict() -> (StatusCode, &'static str, Value) {
    (StatusCode::CONFLICT, "EDIT_CONFLICT", json!(EDIT_CONFLICT_MESSAGE))
}

fn internal_error() -> (StatusCode, &'static str, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        json!(INTERNAL_MESSAGE),
    )
}
