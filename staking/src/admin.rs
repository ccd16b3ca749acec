//! Operator-side farm management calls.
//!
//! These run against the same farm module as the user-facing operations and
//! share the same submit-and-await-finality lifecycle, but are only callable
//! by the farm owner's signer.

use granary_client::{EntryFunctionPayload, LedgerQuery, WalletSigner};
use serde_json::json;

use crate::config::FarmConfig;
use crate::orchestrator::{execute, TransactionOutcome};

/// Farm administration: publish the farm, whitelist collections, fund the
/// reward vault.
pub struct FarmAdmin<S, L> {
    config: FarmConfig,
    signer: S,
    ledger: L,
}

impl<S, L> FarmAdmin<S, L>
where
    S: WalletSigner,
    L: LedgerQuery,
{
    pub fn new(config: FarmConfig, signer: S, ledger: L) -> Self {
        Self {
            config,
            signer,
            ledger,
        }
    }

    /// Payload for `farm::publish_farm()`.
    pub fn publish_farm_payload(&self) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.config.entry_function("publish_farm"),
            vec![self.config.reward_coin_type.clone()],
            vec![],
        )
    }

    /// Payload for `farm::add_to_whitelist(collection_name, reward_per_second)`.
    pub fn whitelist_payload(
        &self,
        collection_name: &str,
        reward_per_second: u64,
    ) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.config.entry_function("add_to_whitelist"),
            vec![self.config.reward_coin_type.clone()],
            vec![json!(collection_name), json!(reward_per_second)],
        )
    }

    /// Payload for `farm::fund_reward(amount)`.
    pub fn fund_reward_payload(&self, amount: u64) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.config.entry_function("fund_reward"),
            vec![self.config.reward_coin_type.clone()],
            vec![json!(amount)],
        )
    }

    /// Create the farm resource under the publisher's account.
    pub async fn publish_farm(&self) -> TransactionOutcome {
        self.run(self.publish_farm_payload()).await
    }

    /// Whitelist a collection for staking with its reward rate.
    pub async fn add_to_whitelist(
        &self,
        collection_name: &str,
        reward_per_second: u64,
    ) -> TransactionOutcome {
        self.run(self.whitelist_payload(collection_name, reward_per_second))
            .await
    }

    /// Top up the reward vault with coin units.
    pub async fn fund_reward(&self, amount: u64) -> TransactionOutcome {
        self.run(self.fund_reward_payload(amount)).await
    }

    async fn run(&self, payload: EntryFunctionPayload) -> TransactionOutcome {
        execute(
            &self.signer,
            &self.ledger,
            self.config.finality_timeout(),
            payload,
        )
        .await
    }
}
