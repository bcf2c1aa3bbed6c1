//! Helpers for partial-update payloads.

use serde::{Deserialize, Deserializer};

/// Field presence for clearable optional values.
///
/// Use with `#[serde(default, deserialize_with = "clearable")]` on an
/// `Option<Option<T>>`: an absent field stays `None` (keep), `null` becomes
/// `Some(None)` (clear) and a value becomes `Some(Some(v))` (set).
pub fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
