//! Ledger account address type.

use crate::error::InvalidAddress;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 32-byte account address on the ledger.
///
/// Addresses are parsed from hex strings in their canonical fixed-width form.
/// Short forms (fewer than 64 hex digits, with or without a `0x` prefix) are
/// left-padded with zeros, matching the ledger's canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    /// Canonical byte length of an account address.
    pub const LENGTH: usize = 32;

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse an address from a hex string.
    ///
    /// Accepts an optional `0x` prefix and short forms (e.g. `0x1`), which
    /// are left-padded to the full 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, InvalidAddress> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > 2 * Self::LENGTH {
            return Err(InvalidAddress(s.to_string()));
        }

        let mut padded = String::with_capacity(2 * Self::LENGTH);
        for _ in 0..(2 * Self::LENGTH - digits.len()) {
            padded.push('0');
        }
        padded.push_str(digits);

        let raw = hex::decode(&padded).map_err(|_| InvalidAddress(s.to_string()))?;
        let mut bytes = [0u8; Self::LENGTH];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }

    /// Full-width hex encoding with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress(0x{}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for AccountAddress {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
