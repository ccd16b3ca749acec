//! Cryptographic derivation primitives for the granary staking client.
//!
//! The only primitive the client needs is the ledger's named resource-account
//! derivation: any party can recompute a custodial account's address offline,
//! before that account ever exists on-chain.

pub mod derive;

pub use derive::{
    resource_account_address, resource_account_address_hex, RESOURCE_ACCOUNT_SCHEME,
};
