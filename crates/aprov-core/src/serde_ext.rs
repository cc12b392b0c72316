//! Serde helpers for the loosely typed payloads Protheus returns.

use serde::{Deserialize, Deserializer};

/// Decodes an explicit JSON `null` as `T::default()`.
///
/// `#[serde(default)]` only covers missing keys; the host sends `null` for
/// blank columns, which would otherwise fail the whole record.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
