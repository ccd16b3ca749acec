//! Ledger-facing client layer for the granary staking system.
//!
//! Provides:
//! - Collaborator traits at the system boundary ([`LedgerQuery`],
//!   [`TokenIndex`], [`WalletSigner`]) so orchestration code can be tested
//!   against in-memory fakes
//! - HTTP implementations for a ledger full node ([`RestClient`]) and its
//!   token indexing service ([`IndexerClient`])
//! - The token inventory: reconciling which tokens an address currently
//!   holds, enriched with on-chain metadata

pub mod error;
pub mod indexer;
pub mod inventory;
pub mod json;
pub mod ledger;
pub mod payload;
pub mod traits;

pub use error::{ClientError, ErrorKind};
pub use indexer::{IndexerClient, TokenData, TokenIdsPage};
pub use inventory::{count_held, list_tokens, TokenInventory, TOKEN_PAGE_SIZE};
pub use ledger::{ExecutedTransaction, RestClient};
pub use payload::EntryFunctionPayload;
pub use traits::{LedgerQuery, TokenIndex, WalletSigner};
