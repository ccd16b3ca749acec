//! Deserialization helpers for ledger JSON conventions.
//!
//! The ledger's REST API encodes 64-bit integers as JSON strings. These
//! helpers accept either form.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Unsigned(u64),
    Signed(i64),
    Str(String),
}

/// Deserialize a `u64` from either a JSON number or a decimal string.
pub fn u64_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Unsigned(n) => Ok(n),
        NumOrStr::Signed(n) => u64::try_from(n).map_err(serde::de::Error::custom),
        NumOrStr::Str(s) => s.parse::<u64>().map_err(serde::de::Error::custom),
    }
}

/// Deserialize an `i64` from either a JSON number or a decimal string.
pub fn i64_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Unsigned(n) => i64::try_from(n).map_err(serde::de::Error::custom),
        NumOrStr::Signed(n) => Ok(n),
        NumOrStr::Str(s) => s.parse::<i64>().map_err(serde::de::Error::custom),
    }
}
