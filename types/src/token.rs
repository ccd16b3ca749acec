//! Non-fungible token identifiers and materialized token views.

use crate::address::AccountAddress;
use serde::{Deserialize, Serialize};

/// Identifies one non-fungible token edition.
///
/// Two values with the same (creator, collection, name, property_version)
/// tuple refer to the same token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId {
    pub creator: AccountAddress,
    pub collection: String,
    pub name: String,
    pub property_version: u64,
}

/// A token id together with its net ownership change since the indexing
/// baseline.
///
/// `delta == 0` means the address once held the token but no longer does;
/// such records must never surface in a materialized inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token_id: TokenId,
    pub delta: i64,
}

impl TokenRecord {
    /// Whether the owning address currently holds this token.
    pub fn is_held(&self) -> bool {
        self.delta != 0
    }
}

/// A token id enriched with its on-chain metadata.
///
/// Produced only for records whose delta is non-zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub creator: AccountAddress,
    pub collection: String,
    pub name: String,
    pub description: String,
    pub uri: String,
    pub property_version: u64,
    pub maximum: u64,
    pub supply: u64,
}

impl Token {
    pub fn id(&self) -> TokenId {
        TokenId {
            creator: self.creator,
            collection: self.collection.clone(),
            name: self.name.clone(),
            property_version: self.property_version,
        }
    }
}
