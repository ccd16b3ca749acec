//! Fundamental types for the granary staking client.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: ledger account addresses, token identifiers, ownership records,
//! and reward-vault read models.

pub mod address;
pub mod error;
pub mod token;
pub mod vault;

pub use address::AccountAddress;
pub use error::InvalidAddress;
pub use token::{Token, TokenId, TokenRecord};
pub use vault::{TotalStaked, VaultSnapshot};
