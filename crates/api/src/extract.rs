//! JSON request body extraction with client-facing error triage.
//!
//! [`JsonBody`] replaces `axum::Json` for request bodies. It caps the body at
//! [`MAX_BODY_BYTES`], decodes exactly one JSON value, and turns every
//! decoder failure into a [`DecodeError`] whose message tells the client
//! what to fix. Target types are expected to use
//! `#[serde(deny_unknown_fields)]`.

use std::error::Error as StdError;

use axum::extract::{FromRequest, Request};
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use greenlight_core::runtime::RuntimeError;

use crate::error::AppError;

/// Largest accepted request body (1 MiB).
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Why a request body could not be decoded.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("body contains badly-formed JSON (at character {offset})")]
    Syntax { offset: usize },

    #[error("body contains badly-formed JSON")]
    UnexpectedEof,

    #[error("body contains incorrect JSON type for field {field:?}")]
    IncorrectFieldType { field: String },

    #[error("body contains incorrect JSON type (at character {offset})")]
    IncorrectType { offset: usize },

    #[error("body must not be empty")]
    Empty,

    #[error("body must only contain a single JSON value")]
    TrailingData,

    #[error("body contains unknown key {0:?}")]
    UnknownField(String),

    #[error("body must not be larger than {} bytes", MAX_BODY_BYTES)]
    TooLarge,

    /// A value was well-typed JSON but its own codec rejected it, e.g. a
    /// runtime that is not `"<N> mins"`. Reported as a field validation error.
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("{0}")]
    Other(String),
}

/// Extractor that decodes a bounded JSON body into `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|err| {
                let err = err.into_inner();
                if is_length_limit(err.as_ref()) {
                    DecodeError::TooLarge
                } else {
                    DecodeError::Other(err.to_string())
                }
            })?;

        Ok(Self(decode(&bytes)?))
    }
}

fn is_length_limit(err: &(dyn StdError + Send + Sync + 'static)) -> bool {
    let mut current = Some(err as &(dyn StdError + 'static));
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Decode exactly one JSON value from `bytes` into `T`.
///
/// # Panics
///
/// Panics on an I/O-category decoder error. Decoding reads from an
/// in-memory buffer, so such an error means the decoder itself was misused.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::Empty);
    }

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| classify(bytes, err))?;
    deserializer.end().map_err(|_| DecodeError::TrailingData)?;
    Ok(value)
}

fn classify(bytes: &[u8], err: serde_path_to_error::Error<serde_json::Error>) -> DecodeError {
    let path = err.path().to_string();
    let inner = err.into_inner();
    let offset = byte_offset(bytes, inner.line(), inner.column());

    match inner.classify() {
        Category::Syntax => DecodeError::Syntax { offset },
        Category::Eof => DecodeError::UnexpectedEof,
        Category::Data => classify_data(path, &inner, offset),
        Category::Io => panic!("JSON decoder failed reading an in-memory body: {inner}"),
    }
}

fn classify_data(path: String, inner: &serde_json::Error, offset: usize) -> DecodeError {
    let message = inner.to_string();
    let runtime_message = RuntimeError::InvalidFormat.to_string();

    if let Some(field) = unknown_field_name(&message) {
        return DecodeError::UnknownField(field.to_string());
    }

    if message.starts_with(&runtime_message) {
        return DecodeError::InvalidField {
            field: field_key(&path),
            message: runtime_message,
        };
    }

    let wrong_type = ["invalid type:", "invalid value:", "invalid length"]
        .iter()
        .any(|prefix| message.starts_with(prefix));
    if wrong_type {
        return if path == "." {
            DecodeError::IncorrectType { offset }
        } else {
            DecodeError::IncorrectFieldType { field: path }
        };
    }

    DecodeError::Other(message)
}

/// `unknown field `name`, expected ...` -> `name`.
fn unknown_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unknown field `")?;
    rest.split('`').next()
}

/// Top-level field key for a decode path (`genres[2]` -> `genres`).
///
/// Validation errors are keyed by the lowercase field name, so a value sent
/// under a camelCase alias (`runTime`) reports as `runtime`.
fn field_key(path: &str) -> String {
    path.split(['.', '['])
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
        .to_ascii_lowercase()
}

/// Byte offset of a 1-based `(line, column)` position within `bytes`.
fn byte_offset(bytes: &[u8], line: usize, column: usize) -> usize {
    let preceding: usize = bytes
        .split(|&b| b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    preceding + column
}
