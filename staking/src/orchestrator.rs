//! Transaction lifecycle for stake / unstake / claim operations.

use std::time::Duration;

use granary_client::{
    ClientError, EntryFunctionPayload, LedgerQuery, TokenIndex, TokenInventory, WalletSigner,
};
use granary_crypto::resource_account_address;
use granary_types::{AccountAddress, Token};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::{FarmConfig, BANK_SEED};

/// Lifecycle of one ledger operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    Building,
    Submitted,
    AwaitingFinality,
    Succeeded,
    Failed,
}

/// Terminal report of one submitted operation, consumed once by the caller.
#[derive(Clone, Debug)]
pub struct TransactionOutcome {
    pub success: bool,
    /// Human-readable status: the ledger's `vm_status` on commit, or the
    /// error text otherwise.
    pub status: String,
    /// Ledger transaction hash, once the wallet relayed the payload.
    pub tx_hash: Option<String>,
    /// Error discriminant for failed operations.
    pub failure: Option<granary_client::ErrorKind>,
}

/// The minimal pair identifying one token within the configured
/// creator/property-version context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRef {
    pub collection: String,
    pub name: String,
}

impl TokenRef {
    pub fn new(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            name: name.into(),
        }
    }
}

/// Run one payload through the full lifecycle:
/// `Building → Submitted → AwaitingFinality → {Succeeded | Failed}`.
///
/// Every error kind is folded into a terminal `Failed` outcome; there is no
/// automatic retry. The wait for finality is bounded by `finality_timeout`
/// and resolves to a `Timeout` failure instead of hanging.
pub(crate) async fn execute<S, L>(
    signer: &S,
    ledger: &L,
    finality_timeout: Duration,
    payload: EntryFunctionPayload,
) -> TransactionOutcome
where
    S: WalletSigner + ?Sized,
    L: LedgerQuery + ?Sized,
{
    let mut state = OperationState::Building;
    debug!(?state, function = %payload.function, "assembled entry function payload");

    state = OperationState::Submitted;
    debug!(?state, "handing payload to wallet signer");
    let tx_hash = match signer.sign_and_submit(&payload).await {
        Ok(hash) => hash,
        Err(error) => return failed(None, error),
    };

    state = OperationState::AwaitingFinality;
    debug!(?state, tx_hash = %tx_hash, "awaiting finality");
    let waited_secs = finality_timeout.as_secs();
    let result = match tokio::time::timeout(finality_timeout, ledger.wait_for_transaction(&tx_hash))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout { waited_secs }),
    };

    let executed = match result {
        Ok(executed) => executed,
        Err(error) => return failed(Some(tx_hash), error),
    };

    if !executed.success {
        return failed(
            Some(tx_hash),
            ClientError::LedgerRejected {
                vm_status: executed.vm_status,
            },
        );
    }

    state = OperationState::Succeeded;
    info!(?state, tx_hash = %tx_hash, vm_status = %executed.vm_status, "transaction committed");
    TransactionOutcome {
        success: true,
        status: executed.vm_status,
        tx_hash: Some(tx_hash),
        failure: None,
    }
}

fn failed(tx_hash: Option<String>, error: ClientError) -> TransactionOutcome {
    warn!(state = ?OperationState::Failed, %error, "operation failed");
    TransactionOutcome {
        success: false,
        status: error.to_string(),
        tx_hash,
        failure: Some(error.kind()),
    }
}

/// Orchestrates stake / unstake / claim operations for one wallet.
///
/// Holds the wallet's own inventory and the inventory of its derived
/// custodial ("bank") account. After every successful operation both are
/// refreshed — wallet first, then bank, sequentially — so a token never shows
/// up in both lists at once. Failed operations leave both snapshots
/// untouched.
pub struct Orchestrator<S, L, I> {
    config: FarmConfig,
    farm: AccountAddress,
    wallet: AccountAddress,
    bank: AccountAddress,
    signer: S,
    ledger: L,
    wallet_inventory: TokenInventory<I>,
    bank_inventory: TokenInventory<I>,
}

impl<S, L, I> Orchestrator<S, L, I>
where
    S: WalletSigner,
    L: LedgerQuery,
    I: TokenIndex + Clone,
{
    /// All derived addresses are computed here, once; operations never
    /// re-derive them.
    pub fn new(config: FarmConfig, wallet: AccountAddress, signer: S, ledger: L, index: I) -> Self {
        let farm = config.farm_address();
        let bank = resource_account_address(&wallet, BANK_SEED);
        let creator = Some(config.creator);
        let collection = config.collection.clone();
        let wallet_inventory =
            TokenInventory::new(index.clone(), wallet, creator, collection.clone());
        let bank_inventory = TokenInventory::new(index, bank, creator, collection);
        Self {
            config,
            farm,
            wallet,
            bank,
            signer,
            ledger,
            wallet_inventory,
            bank_inventory,
        }
    }

    pub fn wallet_address(&self) -> &AccountAddress {
        &self.wallet
    }

    pub fn farm_address(&self) -> &AccountAddress {
        &self.farm
    }

    /// The wallet's custodial account inside the farm.
    pub fn bank_address(&self) -> &AccountAddress {
        &self.bank
    }

    /// Latest snapshot of tokens held by the wallet itself.
    pub fn wallet_tokens(&self) -> &[Token] {
        self.wallet_inventory.tokens()
    }

    /// Latest snapshot of tokens held by the wallet's bank account.
    pub fn bank_tokens(&self) -> &[Token] {
        self.bank_inventory.tokens()
    }

    /// Manual refresh of both inventories (wallet first, then bank).
    pub async fn refresh_inventories(&mut self) -> Result<(), ClientError> {
        self.wallet_inventory.refresh().await?;
        self.bank_inventory.refresh().await?;
        Ok(())
    }

    /// Payload for `farm::stake(creator, collection, name, property_version, farm)`.
    pub fn stake_payload(&self, token: &TokenRef) -> EntryFunctionPayload {
        self.token_payload("stake", token)
    }

    /// Payload for `farm::unstake(creator, collection, name, property_version, farm)`.
    pub fn unstake_payload(&self, token: &TokenRef) -> EntryFunctionPayload {
        self.token_payload("unstake", token)
    }

    /// Payload for `farm::claim_rewards(farm)`.
    pub fn claim_payload(&self) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.config.entry_function("claim_rewards"),
            vec![self.config.reward_coin_type.clone()],
            vec![json!(self.farm.to_hex())],
        )
    }

    fn token_payload(&self, function: &str, token: &TokenRef) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.config.entry_function(function),
            vec![self.config.reward_coin_type.clone()],
            vec![
                json!(self.config.creator.to_hex()),
                json!(token.collection),
                json!(token.name),
                json!(self.config.property_version),
                json!(self.farm.to_hex()),
            ],
        )
    }

    /// Stake the given tokens into the farm, one ledger call per token.
    ///
    /// The program's argument shape only supports a single token per call, so
    /// the caller decides the batch size and receives one outcome per token.
    /// Tokens are processed sequentially; a failure does not stop the rest.
    pub async fn stake(&mut self, tokens: &[TokenRef]) -> Vec<TransactionOutcome> {
        let mut outcomes = Vec::with_capacity(tokens.len());
        for token in tokens {
            let payload = self.stake_payload(token);
            outcomes.push(self.run(payload).await);
        }
        outcomes
    }

    /// Withdraw the given tokens from the farm, one ledger call per token.
    pub async fn unstake(&mut self, tokens: &[TokenRef]) -> Vec<TransactionOutcome> {
        let mut outcomes = Vec::with_capacity(tokens.len());
        for token in tokens {
            let payload = self.unstake_payload(token);
            outcomes.push(self.run(payload).await);
        }
        outcomes
    }

    /// Claim accrued rewards from the farm.
    pub async fn claim(&mut self) -> TransactionOutcome {
        let payload = self.claim_payload();
        self.run(payload).await
    }

    async fn run(&mut self, payload: EntryFunctionPayload) -> TransactionOutcome {
        let outcome = execute(
            &self.signer,
            &self.ledger,
            self.config.finality_timeout(),
            payload,
        )
        .await;
        if outcome.success {
            self.refresh_after_success().await;
        }
        outcome
    }

    /// Wallet first, then bank, strictly sequential. The transaction already
    /// committed, so a refresh failure only leaves a stale snapshot.
    async fn refresh_after_success(&mut self) {
        if let Err(error) = self.wallet_inventory.refresh().await {
            warn!(owner = %self.wallet, %error, "wallet inventory refresh failed");
        }
        if let Err(error) = self.bank_inventory.refresh().await {
            warn!(owner = %self.bank, %error, "bank inventory refresh failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use granary_client::{ErrorKind, ExecutedTransaction, TokenData, TokenIdsPage};
    use granary_types::{TokenId, TokenRecord};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // ── Fakes ───────────────────────────────────────────────────────────

    #[derive(Default)]
    struct ChainState {
        records: Mutex<HashMap<AccountAddress, Vec<TokenRecord>>>,
        index_queries: AtomicUsize,
    }

    impl ChainState {
        fn set_holding(&self, owner: AccountAddress, record: TokenRecord) {
            let mut records = self.records.lock().unwrap();
            let entries = records.entry(owner).or_default();
            if let Some(existing) = entries
                .iter_mut()
                .find(|r| r.token_id == record.token_id)
            {
                existing.delta = record.delta;
            } else {
                entries.push(record);
            }
        }
    }

    #[derive(Clone)]
    struct FakeIndex(Arc<ChainState>);

    #[async_trait]
    impl TokenIndex for FakeIndex {
        async fn get_token_ids(
            &self,
            address: &AccountAddress,
            _page_size: u32,
            _deposit_cursor: u64,
            _withdraw_cursor: u64,
        ) -> Result<TokenIdsPage, ClientError> {
            self.0.index_queries.fetch_add(1, Ordering::SeqCst);
            let records = self
                .0
                .records
                .lock()
                .unwrap()
                .get(address)
                .cloned()
                .unwrap_or_default();
            Ok(TokenIdsPage {
                records,
                max_deposit_sequence_number: 0,
                max_withdraw_sequence_number: 0,
            })
        }

        async fn get_token_data(&self, token_id: &TokenId) -> Result<TokenData, ClientError> {
            Ok(TokenData {
                collection: token_id.collection.clone(),
                name: token_id.name.clone(),
                description: String::new(),
                uri: String::new(),
                maximum: 1000,
                supply: 1000,
            })
        }
    }

    type SubmitHook = Box<dyn Fn() + Send + Sync>;

    struct FakeSigner {
        reject: bool,
        on_submit: Option<SubmitHook>,
        submitted: Mutex<Vec<EntryFunctionPayload>>,
    }

    impl FakeSigner {
        fn accepting() -> Self {
            Self {
                reject: false,
                on_submit: None,
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn rejecting() -> Self {
            Self {
                reject: true,
                on_submit: None,
                submitted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WalletSigner for FakeSigner {
        async fn sign_and_submit(
            &self,
            payload: &EntryFunctionPayload,
        ) -> Result<String, ClientError> {
            if self.reject {
                return Err(ClientError::UserRejected);
            }
            self.submitted.lock().unwrap().push(payload.clone());
            if let Some(hook) = &self.on_submit {
                hook();
            }
            Ok("0xfeed".to_string())
        }
    }

    enum LedgerBehavior {
        Commit { success: bool, vm_status: String },
        Hang,
    }

    struct FakeLedger {
        behavior: LedgerBehavior,
        waits: AtomicUsize,
    }

    impl FakeLedger {
        fn committing(success: bool, vm_status: &str) -> Self {
            Self {
                behavior: LedgerBehavior::Commit {
                    success,
                    vm_status: vm_status.to_string(),
                },
                waits: AtomicUsize::new(0),
            }
        }

        fn hanging() -> Self {
            Self {
                behavior: LedgerBehavior::Hang,
                waits: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LedgerQuery for FakeLedger {
        async fn get_account_resource(
            &self,
            address: &AccountAddress,
            resource_type: &str,
        ) -> Result<serde_json::Value, ClientError> {
            Err(ClientError::ResourceNotFound {
                address: *address,
                resource: resource_type.to_string(),
            })
        }

        async fn wait_for_transaction(
            &self,
            tx_hash: &str,
        ) -> Result<ExecutedTransaction, ClientError> {
            self.waits.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                LedgerBehavior::Commit { success, vm_status } => Ok(ExecutedTransaction {
                    hash: tx_hash.to_string(),
                    success: *success,
                    vm_status: vm_status.clone(),
                }),
                LedgerBehavior::Hang => std::future::pending().await,
            }
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn addr(n: u8) -> AccountAddress {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        AccountAddress::new(bytes)
    }

    fn test_config() -> FarmConfig {
        FarmConfig {
            node_url: "http://127.0.0.1:8080".to_string(),
            indexer_url: "http://127.0.0.1:8081".to_string(),
            module_publisher: addr(0x69),
            creator: addr(9),
            reward_coin_type: format!("{}::apetos_coin::ApetosCoin", addr(0x69).to_hex()),
            collection: None,
            property_version: 0,
            finality_timeout_secs: 5,
        }
    }

    fn ape_record(delta: i64) -> TokenRecord {
        TokenRecord {
            token_id: TokenId {
                creator: addr(9),
                collection: "apes".to_string(),
                name: "ape #1".to_string(),
                property_version: 0,
            },
            delta,
        }
    }

    // ── Payload shape ───────────────────────────────────────────────────

    #[test]
    fn stake_payload_shape() {
        let config = test_config();
        let farm = config.farm_address();
        let orchestrator = Orchestrator::new(
            config.clone(),
            addr(1),
            FakeSigner::accepting(),
            FakeLedger::committing(true, "Executed successfully"),
            FakeIndex(Arc::new(ChainState::default())),
        );

        let payload = orchestrator.stake_payload(&TokenRef::new("apes", "ape #1"));
        assert_eq!(payload.function, config.entry_function("stake"));
        assert_eq!(payload.type_arguments, vec![config.reward_coin_type.clone()]);
        assert_eq!(
            payload.arguments,
            vec![
                serde_json::json!(config.creator.to_hex()),
                serde_json::json!("apes"),
                serde_json::json!("ape #1"),
                serde_json::json!(0),
                serde_json::json!(farm.to_hex()),
            ]
        );
    }

    #[test]
    fn claim_payload_shape() {
        let config = test_config();
        let farm = config.farm_address();
        let orchestrator = Orchestrator::new(
            config.clone(),
            addr(1),
            FakeSigner::accepting(),
            FakeLedger::committing(true, "Executed successfully"),
            FakeIndex(Arc::new(ChainState::default())),
        );

        let payload = orchestrator.claim_payload();
        assert_eq!(payload.function, config.entry_function("claim_rewards"));
        assert_eq!(payload.arguments, vec![serde_json::json!(farm.to_hex())]);
    }

    // ── Lifecycle scenarios ─────────────────────────────────────────────

    #[tokio::test]
    async fn successful_stake_refreshes_wallet_then_bank() {
        let chain = Arc::new(ChainState::default());
        let wallet = addr(1);
        let bank = resource_account_address(&wallet, BANK_SEED);
        chain.set_holding(wallet, ape_record(1));

        // Simulate the on-chain move at commit time: the wallet's delta drops
        // to zero and the bank's rises to one.
        let mut signer = FakeSigner::accepting();
        let chain_for_hook = Arc::clone(&chain);
        signer.on_submit = Some(Box::new(move || {
            chain_for_hook.set_holding(wallet, ape_record(0));
            chain_for_hook.set_holding(bank, ape_record(1));
        }));

        let mut orchestrator = Orchestrator::new(
            test_config(),
            wallet,
            signer,
            FakeLedger::committing(true, "Executed successfully"),
            FakeIndex(Arc::clone(&chain)),
        );

        let outcomes = orchestrator.stake(&[TokenRef::new("apes", "ape #1")]).await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].success);
        assert_eq!(outcomes[0].tx_hash.as_deref(), Some("0xfeed"));

        // The staked token moved out of the wallet view and into the bank view.
        assert!(orchestrator.wallet_tokens().is_empty());
        let bank_names: Vec<_> = orchestrator
            .bank_tokens()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(bank_names, vec!["ape #1"]);
    }

    #[tokio::test]
    async fn ledger_rejection_fails_without_refresh() {
        let chain = Arc::new(ChainState::default());
        let wallet = addr(1);
        chain.set_holding(wallet, ape_record(1));

        let mut orchestrator = Orchestrator::new(
            test_config(),
            wallet,
            FakeSigner::accepting(),
            FakeLedger::committing(false, "Move abort: token not owned"),
            FakeIndex(Arc::clone(&chain)),
        );

        let outcomes = orchestrator.stake(&[TokenRef::new("apes", "ape #1")]).await;
        assert!(!outcomes[0].success);
        assert_eq!(outcomes[0].failure, Some(ErrorKind::LedgerRejected));
        assert!(outcomes[0].status.contains("Move abort"));

        // No refresh happened: the index was never queried.
        assert_eq!(chain.index_queries.load(Ordering::SeqCst), 0);
        assert!(orchestrator.wallet_tokens().is_empty());
    }

    #[tokio::test]
    async fn user_rejection_fails_before_submission() {
        let chain = Arc::new(ChainState::default());
        let ledger = FakeLedger::committing(true, "Executed successfully");
        let mut orchestrator = Orchestrator::new(
            test_config(),
            addr(1),
            FakeSigner::rejecting(),
            ledger,
            FakeIndex(Arc::clone(&chain)),
        );

        let outcome = orchestrator.claim().await;
        assert!(!outcome.success);
        assert_eq!(outcome.failure, Some(ErrorKind::UserRejected));
        assert!(outcome.tx_hash.is_none());
        // Never reached the finality wait or a refresh.
        assert_eq!(orchestrator.ledger.waits.load(Ordering::SeqCst), 0);
        assert_eq!(chain.index_queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn finality_wait_is_bounded() {
        let chain = Arc::new(ChainState::default());
        let mut orchestrator = Orchestrator::new(
            test_config(),
            addr(1),
            FakeSigner::accepting(),
            FakeLedger::hanging(),
            FakeIndex(Arc::clone(&chain)),
        );

        let outcome = orchestrator.claim().await;
        assert!(!outcome.success);
        assert_eq!(outcome.failure, Some(ErrorKind::Timeout));
        assert_eq!(chain.index_queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn batch_outcomes_are_per_token() {
        let chain = Arc::new(ChainState::default());
        let wallet = addr(1);
        chain.set_holding(wallet, ape_record(1));

        let mut orchestrator = Orchestrator::new(
            test_config(),
            wallet,
            FakeSigner::accepting(),
            FakeLedger::committing(true, "Executed successfully"),
            FakeIndex(Arc::clone(&chain)),
        );

        let outcomes = orchestrator
            .stake(&[
                TokenRef::new("apes", "ape #1"),
                TokenRef::new("apes", "ape #2"),
            ])
            .await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.success));
        assert_eq!(orchestrator.signer.submitted.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn derived_addresses_are_fixed_at_construction() {
        let config = test_config();
        let orchestrator = Orchestrator::new(
            config.clone(),
            addr(1),
            FakeSigner::accepting(),
            FakeLedger::committing(true, "ok"),
            FakeIndex(Arc::new(ChainState::default())),
        );

        assert_eq!(orchestrator.farm_address(), &config.farm_address());
        assert_eq!(
            orchestrator.bank_address(),
            &resource_account_address(&addr(1), BANK_SEED)
        );
    }
}
