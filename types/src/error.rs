//! Parse errors for ledger types.

use thiserror::Error;

/// A string could not be parsed into a canonical 32-byte account address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid account address: {0}")]
pub struct InvalidAddress(pub String);
