//! Staking orchestration core.
//!
//! Turns user intent (stake / unstake / claim) into ledger-submitted
//! operations and reconciles local token inventories afterwards:
//! - [`FarmConfig`] — explicit configuration for the target farm program
//!   (no ambient singletons)
//! - [`Orchestrator`] — the per-operation transaction lifecycle
//! - [`VaultAccounting`] — read path over aggregate reward-vault state
//! - [`FarmAdmin`] — operator-side farm management calls

pub mod admin;
pub mod config;
pub mod orchestrator;
pub mod vault;

pub use admin::FarmAdmin;
pub use config::{ConfigError, FarmConfig, BANK_SEED, FARM_SEED, TRANSMITTER_SEED};
pub use orchestrator::{OperationState, Orchestrator, TokenRef, TransactionOutcome};
pub use vault::VaultAccounting;
