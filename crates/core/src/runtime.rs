//! Movie runtime value and its `"<N> mins"` text codec.
//!
//! On the wire a runtime is always a JSON string such as `"102 mins"`. The
//! decoder is strict: exactly two space-separated tokens, the second being
//! the literal `mins`, the first an `i32`. Every other shape yields
//! [`RuntimeError::InvalidFormat`] so callers can report a single, specific
//! field error instead of a generic parser message.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Suffix token that follows the minute count.
const UNIT: &str = "mins";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("invalid runtime format")]
    InvalidFormat,
}

/// A movie runtime in whole minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(i32);

impl Runtime {
    pub const fn new(minutes: i32) -> Self {
        Self(minutes)
    }

    pub const fn minutes(self) -> i32 {
        self.0
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Self(minutes)
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {UNIT}", self.0)
    }
}

impl FromStr for Runtime {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(' ').collect();
        let [number, unit] = parts.as_slice() else {
            return Err(RuntimeError::InvalidFormat);
        };
        if *unit != UNIT {
            return Err(RuntimeError::InvalidFormat);
        }
        number
            .parse::<i32>()
            .map(Self)
            .map_err(|_| RuntimeError::InvalidFormat)
    }
}

impl Serialize for Runtime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RuntimeVisitor)
    }
}

/// Accepts only strings; every other JSON type is an invalid format rather
/// than serde's generic "invalid type" error.
struct RuntimeVisitor;

impl RuntimeVisitor {
    fn reject<E: de::Error>() -> E {
        E::custom(RuntimeError::InvalidFormat)
    }
}

impl<'de> Visitor<'de> for RuntimeVisitor {
    type Value = Runtime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string of the form \"<minutes> mins\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Runtime, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Runtime, E> {
        Err(Self::reject())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Runtime, E> {
        Err(Self::reject())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Runtime, E> {
        Err(Self::reject())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Runtime, E> {
        Err(Self::reject())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Runtime, E> {
        Err(Self::reject())
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, _: A) -> Result<Runtime, A::Error> {
        Err(Self::reject())
    }

    fn visit_map<A: de::MapAccess<'de>>(self, _: A) -> Result<Runtime, A::Error> {
        Err(Self::reject())
    }
}
