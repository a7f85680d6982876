//! Helpers for reading typed values out of a query string.
//!
//! Handlers extract `Query<HashMap<String, String>>` and read each parameter
//! through these helpers so that a missing value falls back to its default
//! and a malformed integer is recorded in the request's [`Validator`]
//! instead of rejecting the whole query string.

use std::collections::HashMap;

use greenlight_core::validator::Validator;

/// Raw query string parameters.
pub type QueryParams = HashMap<String, String>;

/// Return the value for `key`, or `default` when absent or empty.
pub fn read_string(params: &QueryParams, key: &str, default: &str) -> String {
    match params.get(key) {
        Some(value) if !value.is_empty() => value.clone(),
        _ => default.to_string(),
    }
}

/// Split the value for `key` on commas, or return `default` when absent or
/// empty.
pub fn read_csv(params: &QueryParams, key: &str, default: Vec<String>) -> Vec<String> {
    match params.get(key) {
        Some(csv) if !csv.is_empty() => csv.split(',').map(str::to_string).collect(),
        _ => default,
    }
}

/// Parse the value for `key` as an integer, or return `default` when absent
/// or empty. A value that is not an integer records
/// `"must be an integer value"` under `key` and yields `default`.
pub fn read_int(params: &QueryParams, key: &str, default: i64, v: &mut Validator) -> i64 {
    let Some(value) = params.get(key).filter(|value| !value.is_empty()) else {
        return default;
    };
    match value.parse() {
        Ok(n) => n,
        Err(_) => {
            v.add_error(key, "must be an integer value");
            default
        }
    }
}
