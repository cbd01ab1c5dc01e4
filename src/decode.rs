//! Field decoders for aria2's string-encoded wire values
//!
//! aria2 sends integers and booleans as JSON strings and bitfields as hex
//! text. These helpers are used through `#[serde(deserialize_with)]` so every
//! record exposes true numeric types, and any value that does not parse fails
//! the whole decode instead of being defaulted. The matching `*_str`
//! serializers write the same string forms back, so a serialized record
//! decodes again.

use crate::{Error, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt::Display;
use serde_json::Value;

/// Decode a raw `result` payload for `method` into `T`.
pub fn decode<T: DeserializeOwned>(method: &str, result: Value) -> Result<T> {
    let decoded = serde_json::from_value(result).map_err(|e| Error::malformed(method, e))?;
    log::debug!("Decoded {} response", method);
    Ok(decoded)
}

/// Plain ASCII digits only; `str::parse` alone would also take a leading `+`.
fn decimal_digits<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(D::Error::custom(format!("expected decimal digits, got {:?}", s)));
    }
    Ok(s)
}

pub fn u64_from_str<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = decimal_digits(deserializer)?;
    s.parse::<u64>()
        .map_err(|e| D::Error::custom(format!("invalid unsigned integer {:?}: {}", s, e)))
}

pub fn u16_from_str<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let s = decimal_digits(deserializer)?;
    s.parse::<u16>()
        .map_err(|e| D::Error::custom(format!("invalid port {:?}: {}", s, e)))
}

pub fn bool_from_str<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(D::Error::custom(format!(
            "expected \"true\" or \"false\", got {:?}",
            s
        ))),
    }
}

/// Hex text to raw bytes. An empty string is an empty bitfield.
pub fn bytes_from_hex<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    hex::decode(&s).map_err(|e| D::Error::custom(format!("invalid bitfield {:?}: {}", s, e)))
}

/// Number as a decimal string.
pub fn decimal_str<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

pub fn bool_str<S>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *value { "true" } else { "false" })
}

/// Raw bytes as lowercase hex text.
pub fn hex_str<T, S>(bytes: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}
