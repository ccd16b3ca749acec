//! Token inventory: which tokens an address currently holds.

use futures_util::future::try_join_all;
use granary_types::{AccountAddress, Token, TokenRecord};
use tracing::debug;

use crate::error::ClientError;
use crate::traits::TokenIndex;

/// Page size for inventory queries.
///
/// Only page 0 is read: inventories beyond this many distinct token ids are
/// truncated until cursor-based pagination is wired through.
pub const TOKEN_PAGE_SIZE: u32 = 100;

async fn held_records<I: TokenIndex + ?Sized>(
    index: &I,
    owner: &AccountAddress,
) -> Result<Vec<TokenRecord>, ClientError> {
    let page = index.get_token_ids(owner, TOKEN_PAGE_SIZE, 0, 0).await?;
    Ok(page
        .records
        .into_iter()
        .filter(TokenRecord::is_held)
        .collect())
}

/// List the tokens currently held by `owner`, enriched with metadata.
///
/// Records with a net-zero ownership delta (fully withdrawn historically) are
/// dropped before the optional creator/collection equality filters apply.
/// Metadata for the surviving ids is fetched concurrently; the returned order
/// matches the filtered record order regardless of completion order. A single
/// metadata failure fails the whole call — no partial results.
pub async fn list_tokens<I: TokenIndex + ?Sized>(
    index: &I,
    owner: &AccountAddress,
    creator: Option<&AccountAddress>,
    collection: Option<&str>,
) -> Result<Vec<Token>, ClientError> {
    let mut records = held_records(index, owner).await?;

    if let Some(creator) = creator {
        records.retain(|r| r.token_id.creator == *creator);
    }
    if let Some(collection) = collection {
        records.retain(|r| r.token_id.collection == collection);
    }

    debug!(%owner, count = records.len(), "materializing token inventory");

    try_join_all(records.into_iter().map(|record| async move {
        let data = index.get_token_data(&record.token_id).await?;
        Ok(Token {
            creator: record.token_id.creator,
            collection: data.collection,
            name: data.name,
            description: data.description,
            uri: data.uri,
            property_version: record.token_id.property_version,
            maximum: data.maximum,
            supply: data.supply,
        })
    }))
    .await
}

/// Count the tokens currently held by `owner` without fetching metadata.
pub async fn count_held<I: TokenIndex + ?Sized>(
    index: &I,
    owner: &AccountAddress,
) -> Result<usize, ClientError> {
    Ok(held_records(index, owner).await?.len())
}

/// A refreshable, materialized view of one address's token inventory.
///
/// `refresh` re-runs the query and replaces the previous snapshot wholesale;
/// there is no incremental merge. Callers must treat the returned slice as a
/// snapshot — concurrent refreshes are not serialized against each other.
pub struct TokenInventory<I> {
    index: I,
    owner: AccountAddress,
    creator_filter: Option<AccountAddress>,
    collection_filter: Option<String>,
    tokens: Vec<Token>,
}

impl<I: TokenIndex> TokenInventory<I> {
    pub fn new(
        index: I,
        owner: AccountAddress,
        creator_filter: Option<AccountAddress>,
        collection_filter: Option<String>,
    ) -> Self {
        Self {
            index,
            owner,
            creator_filter,
            collection_filter,
            tokens: Vec::new(),
        }
    }

    pub fn owner(&self) -> &AccountAddress {
        &self.owner
    }

    /// The most recently materialized snapshot (empty before first refresh).
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Re-run the inventory query and atomically replace the snapshot.
    ///
    /// On error the previous snapshot is kept.
    pub async fn refresh(&mut self) -> Result<&[Token], ClientError> {
        let tokens = list_tokens(
            &self.index,
            &self.owner,
            self.creator_filter.as_ref(),
            self.collection_filter.as_deref(),
        )
        .await?;
        self.tokens = tokens;
        Ok(&self.tokens)
    }
}
