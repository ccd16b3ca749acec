//! Error taxonomy for ledger interactions.

use granary_types::{AccountAddress, InvalidAddress};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    InvalidAddress(#[from] InvalidAddress),

    /// The queried account has never published the resource. Expected for
    /// freshly-derived custodial accounts; callers treat this as "empty".
    #[error("resource {resource} not found at {address}")]
    ResourceNotFound {
        address: AccountAddress,
        resource: String,
    },

    #[error("signature request rejected by wallet")]
    UserRejected,

    /// The on-chain program rejected the call (stale ownership, whitelist
    /// violation, ...). Carries the ledger's vm_status string verbatim.
    #[error("ledger rejected transaction: {vm_status}")]
    LedgerRejected { vm_status: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out after {waited_secs}s awaiting finality")]
    Timeout { waited_secs: u64 },
}

/// Discriminant of a [`ClientError`], reported in transaction outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAddress,
    ResourceNotFound,
    UserRejected,
    LedgerRejected,
    Transport,
    Timeout,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            ClientError::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            ClientError::UserRejected => ErrorKind::UserRejected,
            ClientError::LedgerRejected { .. } => ErrorKind::LedgerRejected,
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}
