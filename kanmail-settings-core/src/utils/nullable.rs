//! Serde helpers for loosely typed backend JSON.
//!
//! The settings backend may send `null` (or nothing) for sections it has no
//! data for:
//! - `deserialize`: `null` -> `T::default()`
//! - `present`: keep any value, including `null`, as `Some(value)`

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes `T`, mapping `null` to `T::default()`.
///
/// Pair with `#[serde(default)]` so a missing key also yields the default.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes an opaque value verbatim.
///
/// Pair with `#[serde(default)]`: a missing key stays `None`, an explicit
/// `null` becomes `Some(Value::Null)` so it is passed back unchanged.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
