//! Farm configuration with TOML file support.

use std::time::Duration;

use granary_crypto::resource_account_address;
use granary_types::AccountAddress;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed of the farm resource account under the module publisher.
pub const FARM_SEED: &[u8] = b"farm";
/// Seed of a participant's custodial ("bank") account.
pub const BANK_SEED: &[u8] = b"bank";
/// Seed of the farm's reward transmitter sub-account.
pub const TRANSMITTER_SEED: &[u8] = b"transmitter";

const FARM_MODULE: &str = "farm";
const REWARD_VAULT_MODULE: &str = "reward_vault";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config read error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    Parse(String),
}

/// Configuration for one target farm program.
///
/// Passed explicitly to [`crate::Orchestrator`] and [`crate::VaultAccounting`]
/// at construction; nothing here lives in ambient module state. Can be loaded
/// from a TOML file via [`FarmConfig::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FarmConfig {
    /// Base URL of the ledger full node REST API.
    pub node_url: String,

    /// Base URL of the token indexing service.
    pub indexer_url: String,

    /// Address that published the farm and coin modules. The farm resource
    /// account hangs off this address under [`FARM_SEED`].
    pub module_publisher: AccountAddress,

    /// Creator address of the stakeable collection. An explicit input, not a
    /// literal: the target program whitelists a single creator.
    pub creator: AccountAddress,

    /// Fully-qualified reward coin type, e.g.
    /// `0x69c1..dd46::apetos_coin::ApetosCoin`.
    pub reward_coin_type: String,

    /// Optional default collection filter for inventories.
    #[serde(default)]
    pub collection: Option<String>,

    /// Property version used for every stake/unstake call. The target
    /// program only supports a single version per collection.
    #[serde(default)]
    pub property_version: u64,

    /// Upper bound on the wait for transaction finality.
    #[serde(default = "default_finality_timeout_secs")]
    pub finality_timeout_secs: u64,
}

fn default_finality_timeout_secs() -> u64 {
    60
}

impl FarmConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("FarmConfig is always serializable to TOML")
    }

    /// The farm's resource account address, derived from the publisher.
    pub fn farm_address(&self) -> AccountAddress {
        resource_account_address(&self.module_publisher, FARM_SEED)
    }

    /// Fully-qualified id of an entry function in the farm module.
    pub fn entry_function(&self, name: &str) -> String {
        format!("{}::{FARM_MODULE}::{name}", self.module_publisher.to_hex())
    }

    /// Resource type tag of the reward transmitter.
    pub fn reward_transmitter_type(&self) -> String {
        format!(
            "{}::{REWARD_VAULT_MODULE}::RewardTransmitter<{}>",
            self.module_publisher.to_hex(),
            self.reward_coin_type
        )
    }

    /// Resource type tag of the reward vault (receiver registry).
    pub fn reward_vault_type(&self) -> String {
        format!(
            "{}::{REWARD_VAULT_MODULE}::RewardVault<{}>",
            self.module_publisher.to_hex(),
            self.reward_coin_type
        )
    }

    pub fn finality_timeout(&self) -> Duration {
        Duration::from_secs(self.finality_timeout_secs)
    }
}
