//! HTTP client for the ledger's token indexing service.

use std::time::Duration;

use async_trait::async_trait;
use granary_types::{AccountAddress, TokenId, TokenRecord};
use serde::Deserialize;
use tracing::debug;

use crate::error::ClientError;
use crate::json::{i64_from_any, u64_from_any};
use crate::traits::TokenIndex;

/// One page of token ownership records for an address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenIdsPage {
    pub records: Vec<TokenRecord>,
    pub max_deposit_sequence_number: u64,
    pub max_withdraw_sequence_number: u64,
}

/// On-chain metadata for one token edition.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenData {
    pub collection: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub uri: String,
    #[serde(deserialize_with = "u64_from_any")]
    pub maximum: u64,
    #[serde(deserialize_with = "u64_from_any")]
    pub supply: u64,
}

// ── Wire shapes ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenIdsResponse {
    #[serde(rename = "tokenIds", default)]
    token_ids: Vec<TokenIdEntry>,
    #[serde(rename = "maxDepositSequenceNumber", deserialize_with = "u64_from_any")]
    max_deposit_sequence_number: u64,
    #[serde(rename = "maxWithdrawSequenceNumber", deserialize_with = "u64_from_any")]
    max_withdraw_sequence_number: u64,
}

#[derive(Debug, Deserialize)]
struct TokenIdEntry {
    data: TokenIdData,
    #[serde(deserialize_with = "i64_from_any")]
    difference: i64,
}

#[derive(Debug, Deserialize)]
struct TokenIdData {
    #[serde(deserialize_with = "u64_from_any")]
    property_version: u64,
    token_data_id: TokenDataIdWire,
}

#[derive(Debug, Deserialize)]
struct TokenDataIdWire {
    creator: AccountAddress,
    collection: String,
    name: String,
}

impl From<TokenIdEntry> for TokenRecord {
    fn from(entry: TokenIdEntry) -> Self {
        TokenRecord {
            token_id: TokenId {
                creator: entry.data.token_data_id.creator,
                collection: entry.data.token_data_id.collection,
                name: entry.data.token_data_id.name,
                property_version: entry.data.property_version,
            },
            delta: entry.difference,
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────────

/// HTTP client for the token indexing service.
#[derive(Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    base_url: String,
}

impl IndexerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "indexer returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("invalid indexer response: {e}")))
    }
}

#[async_trait]
impl TokenIndex for IndexerClient {
    async fn get_token_ids(
        &self,
        address: &AccountAddress,
        page_size: u32,
        deposit_cursor: u64,
        withdraw_cursor: u64,
    ) -> Result<TokenIdsPage, ClientError> {
        let url = format!("{}/accounts/{}/token_ids", self.base_url, address.to_hex());
        debug!(%address, page_size, "fetching token ids");
        let response: TokenIdsResponse = self
            .get_json(
                &url,
                &[
                    ("limit", page_size.to_string()),
                    ("deposit_start", deposit_cursor.to_string()),
                    ("withdraw_start", withdraw_cursor.to_string()),
                ],
            )
            .await?;

        Ok(TokenIdsPage {
            records: response.token_ids.into_iter().map(Into::into).collect(),
            max_deposit_sequence_number: response.max_deposit_sequence_number,
            max_withdraw_sequence_number: response.max_withdraw_sequence_number,
        })
    }

    async fn get_token_data(&self, token_id: &TokenId) -> Result<TokenData, ClientError> {
        let url = format!("{}/tokens/data", self.base_url);
        self.get_json(
            &url,
            &[
                ("creator", token_id.creator.to_hex()),
                ("collection", token_id.collection.clone()),
                ("name", token_id.name.clone()),
                ("property_version", token_id.property_version.to_string()),
            ],
        )
        .await
    }
}
