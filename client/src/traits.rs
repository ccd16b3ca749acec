//! Collaborator traits at the system boundary.
//!
//! Orchestration code depends on these traits rather than on concrete HTTP
//! clients, so every state-machine path can be exercised against in-memory
//! fakes.

use async_trait::async_trait;
use granary_types::{AccountAddress, TokenId};

use crate::error::ClientError;
use crate::indexer::{TokenData, TokenIdsPage};
use crate::ledger::ExecutedTransaction;
use crate::payload::EntryFunctionPayload;

/// Read access to ledger account state and transaction results.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Fetch the `data` of a published resource.
    ///
    /// Fails with [`ClientError::ResourceNotFound`] if the address has never
    /// published a resource of this type.
    async fn get_account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<serde_json::Value, ClientError>;

    /// Block (asynchronously) until the transaction is committed and return
    /// its result.
    ///
    /// Implementations may poll indefinitely; callers that need a bounded
    /// wait wrap this in a timeout.
    async fn wait_for_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<ExecutedTransaction, ClientError>;
}

/// Read access to the ledger's token indexing service.
#[async_trait]
pub trait TokenIndex: Send + Sync {
    /// Fetch one page of token ownership records for an address.
    ///
    /// Cursors advance across pages; the current client only reads page 0,
    /// so inventories beyond `page_size` distinct token ids are truncated.
    async fn get_token_ids(
        &self,
        address: &AccountAddress,
        page_size: u32,
        deposit_cursor: u64,
        withdraw_cursor: u64,
    ) -> Result<TokenIdsPage, ClientError>;

    /// Fetch on-chain metadata for one token edition.
    async fn get_token_data(&self, token_id: &TokenId) -> Result<TokenData, ClientError>;
}

/// External wallet that signs and relays entry-function payloads.
///
/// May reject before any network transmission (the user declines the
/// signature); that maps to [`ClientError::UserRejected`].
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Sign the payload and submit it, returning the ledger transaction hash.
    async fn sign_and_submit(&self, payload: &EntryFunctionPayload)
        -> Result<String, ClientError>;
}
