//! HTTP client for a ledger full node's REST API.

use std::time::Duration;

use async_trait::async_trait;
use granary_types::AccountAddress;
use serde::Deserialize;
use tracing::debug;

use crate::error::ClientError;
use crate::traits::LedgerQuery;

/// Interval between finality polls.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// HTTP client for communicating with a ledger full node.
///
/// Wraps `reqwest::Client` with the node's base URL and provides typed
/// methods for each query the staking client needs.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

/// The committed result of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutedTransaction {
    pub hash: String,
    pub success: bool,
    pub vm_status: String,
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    #[serde(rename = "type")]
    transaction_type: String,
    hash: String,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
}

impl RestClient {
    /// Create a new client targeting the given base URL
    /// (e.g. `https://fullnode.mainnet.example.com/v1`).
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

    /// The configured node URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ClientError> {
        self.http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("request failed: {e}")))
    }

    /// Fetch the transaction with the given hash, or `None` while the node
    /// still reports it as pending (or does not know it yet).
    pub async fn get_transaction_by_hash(
        &self,
        tx_hash: &str,
    ) -> Result<Option<ExecutedTransaction>, ClientError> {
        let url = format!("{}/transactions/by_hash/{tx_hash}", self.base_url);
        let response = self.get(&url).await?;

        // Unknown hashes return 404 until the node has seen the submission.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "node returned HTTP {} for transaction {tx_hash}",
                response.status()
            )));
        }

        let tx: TransactionResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("invalid transaction response: {e}")))?;

        if tx.transaction_type == "pending_transaction" {
            return Ok(None);
        }
        match (tx.success, tx.vm_status) {
            (Some(success), Some(vm_status)) => Ok(Some(ExecutedTransaction {
                hash: tx.hash,
                success,
                vm_status,
            })),
            _ => Err(ClientError::Transport(format!(
                "committed transaction {tx_hash} is missing success/vm_status"
            ))),
        }
    }
}

#[async_trait]
impl LedgerQuery for RestClient {
    async fn get_account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let url = format!(
            "{}/accounts/{}/resource/{resource_type}",
            self.base_url,
            address.to_hex()
        );
        debug!(%address, resource_type, "fetching account resource");
        let response = self.get(&url).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::ResourceNotFound {
                address: *address,
                resource: resource_type.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let resource: ResourceResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("invalid resource response: {e}")))?;
        Ok(resource.data)
    }

    async fn wait_for_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<ExecutedTransaction, ClientError> {
        loop {
            if let Some(executed) = self.get_transaction_by_hash(tx_hash).await? {
                debug!(tx_hash, success = executed.success, "transaction committed");
                return Ok(executed);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
