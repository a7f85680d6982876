//! Keyed validation accumulator.
//!
//! A [`Validator`] collects at most one message per field key. Checks run in
//! order and the first failure for a key wins; later failures for the same
//! key are dropped so the client sees the most fundamental problem first
//! (e.g. "must be provided" rather than "must be greater than 1888").

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::Hash;

use serde::Serialize;

use crate::error::CoreError;

/// Field key to error message, ordered by key for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {message}")?;
        }
        Ok(())
    }
}

/// Per-request validation state. Never shared across requests.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no check has failed.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` under `key` unless the key already has an entry.
    ///
    /// Exposed for checks that are not a simple boolean, such as a
    /// uniqueness lookup or a failed integer parse.
    pub fn add_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors
            .0
            .entry(key.into())
            .or_insert_with(|| message.into());
    }

    /// Record `message` under `key` only if `ok` is false.
    pub fn check(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_error(key, message);
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Convert into `Ok(())` when valid, otherwise [`CoreError::Validation`]
    /// carrying every recorded message.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.valid() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

/// Whether `value` is one of `list`.
pub fn permitted_value<T: PartialEq>(value: T, list: &[T]) -> bool {
    list.contains(&value)
}

/// Whether every element of `values` is distinct.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let distinct: HashSet<&T> = values.iter().collect();
    distinct.len() == values.len()
}
