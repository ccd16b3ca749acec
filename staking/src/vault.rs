//! Read path over aggregate reward-vault state.

use futures_util::future::join_all;
use granary_client::json::u64_from_any;
use granary_client::{count_held, ClientError, LedgerQuery, TokenIndex};
use granary_crypto::resource_account_address;
use granary_types::{AccountAddress, TotalStaked, VaultSnapshot};
use serde::Deserialize;
use tracing::warn;

use crate::config::{FarmConfig, BANK_SEED, TRANSMITTER_SEED};

// ── Resource shapes ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RewardTransmitterData {
    #[serde(deserialize_with = "u64_from_any")]
    available: u64,
    #[serde(deserialize_with = "u64_from_any")]
    reward_rate: u64,
    #[serde(deserialize_with = "u64_from_any")]
    num_receivers: u64,
    debt_queue: DebtQueue,
}

#[derive(Debug, Deserialize)]
struct DebtQueue {
    #[serde(default)]
    inner: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RewardVaultData {
    /// Registered reward receiver addresses.
    rxs: Vec<AccountAddress>,
}

/// Fetches aggregate vault state and the total-staked counter.
///
/// Snapshots are never cached; every call re-reads the ledger.
pub struct VaultAccounting<L, I> {
    config: FarmConfig,
    farm: AccountAddress,
    ledger: L,
    index: I,
}

impl<L, I> VaultAccounting<L, I>
where
    L: LedgerQuery,
    I: TokenIndex,
{
    pub fn new(config: FarmConfig, ledger: L, index: I) -> Self {
        let farm = config.farm_address();
        Self {
            config,
            farm,
            ledger,
            index,
        }
    }

    pub fn farm_address(&self) -> &AccountAddress {
        &self.farm
    }

    /// Read the reward transmitter resource at the farm's `transmitter`
    /// sub-account.
    ///
    /// Errors (including `ResourceNotFound` for a farm that has not been
    /// published yet) propagate to the caller unchanged.
    pub async fn fetch_snapshot(&self) -> Result<VaultSnapshot, ClientError> {
        let transmitter = resource_account_address(&self.farm, TRANSMITTER_SEED);
        let data = self
            .ledger
            .get_account_resource(&transmitter, &self.config.reward_transmitter_type())
            .await?;

        let raw: RewardTransmitterData = serde_json::from_value(data)
            .map_err(|e| ClientError::Transport(format!("invalid reward transmitter data: {e}")))?;

        Ok(VaultSnapshot {
            available_rewards: raw.available,
            reward_rate: raw.reward_rate,
            num_receivers: raw.num_receivers,
            debt_queue_len: raw.debt_queue.inner.len(),
        })
    }

    /// Sum staked-token counts across every registered receiver's bank.
    ///
    /// Bank counts are queried concurrently. One participant's failure never
    /// aborts the aggregate: failed participants are excluded from the sum
    /// and surfaced in [`TotalStaked::failed_participants`].
    pub async fn fetch_total_staked(&self) -> Result<TotalStaked, ClientError> {
        let data = self
            .ledger
            .get_account_resource(&self.farm, &self.config.reward_vault_type())
            .await?;

        let vault: RewardVaultData = serde_json::from_value(data)
            .map_err(|e| ClientError::Transport(format!("invalid reward vault data: {e}")))?;

        let counts = join_all(vault.rxs.iter().map(|receiver| async move {
            let bank = resource_account_address(receiver, BANK_SEED);
            count_held(&self.index, &bank).await
        }))
        .await;

        let mut total = 0u64;
        let mut failed_participants = Vec::new();
        for (receiver, result) in vault.rxs.iter().zip(counts) {
            match result {
                Ok(count) => total += count as u64,
                Err(error) => {
                    warn!(participant = %receiver, %error, "bank inventory query failed; excluded from total");
                    failed_participants.push(*receiver);
                }
            }
        }

        Ok(TotalStaked {
            total,
            failed_participants,
        })
    }
}
