//! Read models for aggregate reward-vault state.

use crate::address::AccountAddress;
use serde::{Deserialize, Serialize};

/// Point-in-time read of the reward vault's aggregate state.
///
/// Never cached; re-fetched on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSnapshot {
    /// Reward coin units still available for distribution.
    pub available_rewards: u64,
    /// Reward coin units emitted per second.
    pub reward_rate: u64,
    /// Number of registered reward receivers.
    pub num_receivers: u64,
    /// Length of the pending reward-debt queue.
    pub debt_queue_len: usize,
}

/// Aggregate staked-token count across all participants.
///
/// Participants whose bank inventory could not be queried are excluded from
/// `total` and listed in `failed_participants`, so callers can decide whether
/// a partial sum is acceptable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalStaked {
    pub total: u64,
    pub failed_participants: Vec<AccountAddress>,
}

impl TotalStaked {
    /// Whether every participant's bank was queried successfully.
    pub fn is_complete(&self) -> bool {
        self.failed_participants.is_empty()
    }
}
