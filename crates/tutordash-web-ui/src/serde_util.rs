use std::fmt::Display;
use std::str::FromStr;

use serde::de::{self, IntoDeserializer as _};
use serde::{Deserialize, Deserializer};

/// Treat blank form and query values as absent.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => {
            T::deserialize(value.trim().into_deserializer()).map(Some)
        }
        _ => Ok(None),
    }
}

/// Like [`empty_string_as_none`], for values parsed from their text, e.g.
/// numbers posted by a form.
pub(crate) fn empty_string_as_none_parsed<'de, D, T>(
    deserializer: D,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}
