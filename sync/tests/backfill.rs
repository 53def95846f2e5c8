//! End-to-end orchestrator tests against mock providers.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use txledger_providers::{
    AdapterRegistry, ChainAdapter, HistoryProvider, ProviderError, RebaseProvider, RebasingAsset,
    RebasingAssets, TxHistoryPage, TxHistoryRequest,
};
use txledger_store::tx_key;
use txledger_sync::{shared_ledger, CancelController, CancelToken, SyncConfig, SyncError, SyncOrchestrator};
use txledger_types::{
    AccountSpecifier, AssetId, BlockTime, ChainId, RebaseEntry, SyncStatus, Transaction, Transfer,
    TransferDirection, TxStatus,
};

const FOXY_CONTRACT: &str = "0xdc49108ce5c57bc3408c3a5e95f3d864ec386ed3";

// ── Mock providers ─────────────────────────────────────────────────────

#[derive(Default)]
struct MockHistoryProvider {
    /// Queued pages per pubkey; exhausted pubkeys get a final empty page.
    pages: Mutex<HashMap<String, VecDeque<Result<TxHistoryPage, ProviderError>>>>,
    /// Every request seen, for asserting cursors and page sizes.
    requests: Arc<Mutex<Vec<TxHistoryRequest>>>,
    /// When set, every request gets this page — simulates a provider that
    /// never returns a final cursor.
    repeat_page: Option<TxHistoryPage>,
}

impl MockHistoryProvider {
    fn queue(&self, pubkey: &str, page: Result<TxHistoryPage, ProviderError>) {
        self.pages
            .lock()
            .unwrap()
            .entry(pubkey.to_string())
            .or_default()
            .push_back(page);
    }
}

impl HistoryProvider for MockHistoryProvider {
    async fn tx_history(&self, req: &TxHistoryRequest) -> Result<TxHistoryPage, ProviderError> {
        self.requests.lock().unwrap().push(req.clone());
        if let Some(page) = &self.repeat_page {
            return Ok(page.clone());
        }
        self.pages
            .lock()
            .unwrap()
            .get_mut(&req.pubkey)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Ok(TxHistoryPage {
                    transactions: Vec::new(),
                    cursor: String::new(),
                })
            })
    }
}

#[derive(Default)]
struct MockRebaseProvider {
    /// One canned response per contract address; unknown contracts yield
    /// an empty history.
    responses: Mutex<HashMap<String, Result<Vec<RebaseEntry>, ProviderError>>>,
}

impl MockRebaseProvider {
    fn respond(&self, contract: &str, response: Result<Vec<RebaseEntry>, ProviderError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(contract.to_string(), response);
    }
}

impl RebaseProvider for MockRebaseProvider {
    async fn rebase_history(
        &self,
        _owner_address: &str,
        contract_address: &str,
    ) -> Result<Vec<RebaseEntry>, ProviderError> {
        self.responses
            .lock()
            .unwrap()
            .remove(contract_address)
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

struct MockAdapter {
    chain_id: ChainId,
    history: MockHistoryProvider,
    rebase: MockRebaseProvider,
}

impl MockAdapter {
    fn new(chain: &str) -> Self {
        Self {
            chain_id: ChainId::new(chain),
            history: MockHistoryProvider::default(),
            rebase: MockRebaseProvider::default(),
        }
    }
}

impl ChainAdapter for MockAdapter {
    type History = MockHistoryProvider;
    type Rebase = MockRebaseProvider;

    fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    fn history_provider(&self) -> &MockHistoryProvider {
        &self.history
    }

    fn rebase_provider(&self) -> &MockRebaseProvider {
        &self.rebase
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

fn tx(txid: &str, block_time: u64) -> Transaction {
    Transaction {
        txid: txid.to_string(),
        address: "0xme".to_string(),
        block_time: Some(BlockTime::new(block_time)),
        transfers: vec![Transfer {
            direction: TransferDirection::Send,
            asset_id: AssetId::new("eip155:1/slip44:60"),
            from: "0xme".to_string(),
            to: "0xyou".to_string(),
            value: "1000".to_string(),
        }],
        contract_call: None,
        fee: None,
        trade_details: None,
        status: TxStatus::Confirmed,
    }
}

fn page(txs: Vec<Transaction>, cursor: &str) -> TxHistoryPage {
    TxHistoryPage {
        transactions: txs,
        cursor: cursor.to_string(),
    }
}

fn rebase(block_time: u64) -> RebaseEntry {
    RebaseEntry {
        block_time: BlockTime::new(block_time),
        balance_prior: "100".to_string(),
        balance_post: "101".to_string(),
    }
}

fn specifier() -> AccountSpecifier {
    AccountSpecifier::new(ChainId::new("eip155:1"), "0xme").unwrap()
}

fn foxy_registry() -> RebasingAssets {
    RebasingAssets::new(vec![RebasingAsset {
        contract_address: FOXY_CONTRACT.to_string(),
        chain_id: ChainId::new("eip155:1"),
    }])
}

fn orchestrator(
    adapter: MockAdapter,
    config: SyncConfig,
) -> SyncOrchestrator<AdapterRegistry<MockAdapter>> {
    let mut registry = AdapterRegistry::new();
    registry.register(adapter);
    SyncOrchestrator::new(registry, shared_ledger(), config, foxy_registry())
}

fn never() -> CancelToken {
    CancelToken::never()
}

// ── Full-history backfill ──────────────────────────────────────────────

#[tokio::test]
async fn backfill_accumulates_pages_into_one_batch() {
    let adapter = MockAdapter::new("eip155:1");
    adapter
        .history
        .queue("0xme", Ok(page(vec![tx("tx1", 300), tx("tx2", 100)], "c1")));
    adapter.history.queue("0xme", Ok(page(vec![tx("tx3", 200)], "")));
    let requests = Arc::clone(&adapter.history.requests);

    let orch = orchestrator(adapter, SyncConfig::default());
    let spec = specifier();
    let txs = orch.fetch_all_history(&spec, &never()).await.unwrap();
    assert_eq!(txs.len(), 3);

    // Two requests: first with an empty cursor, second resuming from c1.
    let seen = requests.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].cursor, "");
    assert_eq!(seen[1].cursor, "c1");
    assert_eq!(seen[0].page_size, 100);

    let ledger = orch.ledger().read().await;
    let account_id = spec.account_id();
    let bucket = ledger.tx_ids_by_account(&account_id);
    assert_eq!(bucket.len(), 3);

    // Ordered newest block time first, not arrival order.
    let txids: Vec<&str> = bucket
        .iter()
        .map(|k| ledger.tx(k).unwrap().txid.as_str())
        .collect();
    assert_eq!(txids, vec!["tx1", "tx3", "tx2"]);
}

#[tokio::test]
async fn backfill_failure_mid_pagination_leaves_store_unchanged() {
    let adapter = MockAdapter::new("eip155:1");
    adapter
        .history
        .queue("0xme", Ok(page(vec![tx("tx1", 300)], "c1")));
    adapter
        .history
        .queue("0xme", Err(ProviderError::Http("boom".to_string())));

    let orch = orchestrator(adapter, SyncConfig::default());
    let err = orch.fetch_all_history(&specifier(), &never()).await.unwrap_err();
    assert!(matches!(err, SyncError::Provider(_)));

    // No partial upsert of the first page.
    assert!(orch.ledger().read().await.tx_ids().is_empty());
}

#[tokio::test]
async fn backfill_rejects_unsupported_chain() {
    let adapter = MockAdapter::new("eip155:1");
    let orch = orchestrator(adapter, SyncConfig::default());

    let other = AccountSpecifier::new(ChainId::new("cosmos:cosmoshub-4"), "cosmos1abc").unwrap();
    let err = orch.fetch_all_history(&other, &never()).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Provider(ProviderError::UnsupportedChain(_))
    ));
    assert!(orch.ledger().read().await.tx_ids().is_empty());
}

#[tokio::test]
async fn backfill_rejects_malformed_specifier_before_io() {
    let adapter = MockAdapter::new("eip155:1");
    let requests = Arc::clone(&adapter.history.requests);
    let orch = orchestrator(adapter, SyncConfig::default());

    let err = orch.fetch_all_history_raw("nocolon", &never()).await.unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)));

    assert!(requests.lock().unwrap().is_empty());
    assert!(orch.ledger().read().await.tx_ids().is_empty());
}

#[tokio::test]
async fn backfill_fails_when_provider_never_ends() {
    let mut adapter = MockAdapter::new("eip155:1");
    adapter.history.repeat_page = Some(page(vec![tx("tx1", 100)], "again"));

    let config = SyncConfig {
        max_pages: 3,
        ..SyncConfig::default()
    };
    let orch = orchestrator(adapter, config);
    let err = orch.fetch_all_history(&specifier(), &never()).await.unwrap_err();
    assert!(matches!(err, SyncError::PageLimitExceeded { .. }));
    assert!(orch.ledger().read().await.tx_ids().is_empty());
}

#[tokio::test]
async fn backfill_observes_cancellation_between_pages() {
    let adapter = MockAdapter::new("eip155:1");
    let requests = Arc::clone(&adapter.history.requests);
    let orch = orchestrator(adapter, SyncConfig::default());

    let controller = CancelController::new();
    let token = controller.token();
    controller.cancel();

    let err = orch.fetch_all_history(&specifier(), &token).await.unwrap_err();
    assert!(matches!(err, SyncError::Cancelled));
    assert!(requests.lock().unwrap().is_empty());
    assert!(orch.ledger().read().await.tx_ids().is_empty());
}

#[tokio::test]
async fn repeated_backfill_is_idempotent() {
    let adapter = MockAdapter::new("eip155:1");
    for _ in 0..2 {
        adapter
            .history
            .queue("0xme", Ok(page(vec![tx("tx1", 300), tx("tx2", 100)], "")));
    }

    let orch = orchestrator(adapter, SyncConfig::default());
    let spec = specifier();
    orch.fetch_all_history(&spec, &never()).await.unwrap();
    orch.fetch_all_history(&spec, &never()).await.unwrap();

    let ledger = orch.ledger().read().await;
    assert_eq!(ledger.tx_ids().len(), 2);
    assert_eq!(ledger.tx_ids_by_account(&spec.account_id()).len(), 2);
}

#[tokio::test]
async fn concurrent_backfills_for_distinct_accounts() {
    let adapter = MockAdapter::new("eip155:1");
    adapter
        .history
        .queue("0xalice", Ok(page(vec![tx("a1", 100)], "")));
    adapter
        .history
        .queue("0xbob", Ok(page(vec![tx("b1", 200)], "")));

    let orch = orchestrator(adapter, SyncConfig::default());
    let alice = AccountSpecifier::new(ChainId::new("eip155:1"), "0xalice").unwrap();
    let bob = AccountSpecifier::new(ChainId::new("eip155:1"), "0xbob").unwrap();

    let token = never();
    let (a, b) = tokio::join!(
        orch.fetch_all_history(&alice, &token),
        orch.fetch_all_history(&bob, &token),
    );
    a.unwrap();
    b.unwrap();

    let ledger = orch.ledger().read().await;
    assert_eq!(ledger.tx_ids().len(), 2);
    assert_eq!(ledger.tx_ids_by_account(&alice.account_id()).len(), 1);
    assert_eq!(ledger.tx_ids_by_account(&bob.account_id()).len(), 1);
}

#[tokio::test]
async fn sync_account_drives_status_to_loaded() {
    let adapter = MockAdapter::new("eip155:1");
    adapter.history.queue("0xme", Ok(page(vec![tx("tx1", 100)], "")));

    let orch = orchestrator(adapter, SyncConfig::default());
    assert_eq!(orch.ledger().read().await.status(), SyncStatus::Idle);

    orch.sync_account(&specifier(), &never()).await.unwrap();
    assert_eq!(orch.ledger().read().await.status(), SyncStatus::Loaded);
}

#[tokio::test]
async fn sync_account_marks_loaded_even_on_failure() {
    let adapter = MockAdapter::new("eip155:1");
    adapter
        .history
        .queue("0xme", Err(ProviderError::Http("boom".to_string())));

    let orch = orchestrator(adapter, SyncConfig::default());
    assert!(orch.sync_account(&specifier(), &never()).await.is_err());
    // Loaded means "attempted", not "error-free".
    assert_eq!(orch.ledger().read().await.status(), SyncStatus::Loaded);
    assert!(orch.ledger().read().await.tx_ids().is_empty());
}

// ── Rebase backfill ────────────────────────────────────────────────────

fn rebase_config() -> SyncConfig {
    SyncConfig {
        enable_rebase_history: true,
        ..SyncConfig::default()
    }
}

fn held_foxy() -> Vec<AssetId> {
    vec![AssetId::new(format!("eip155:1/erc20:{FOXY_CONTRACT}"))]
}

#[tokio::test]
async fn rebase_feature_gate_off_is_a_noop() {
    let adapter = MockAdapter::new("eip155:1");
    adapter.rebase.respond(FOXY_CONTRACT, Ok(vec![rebase(100)]));

    let orch = orchestrator(adapter, SyncConfig::default());
    let upserted = orch
        .fetch_rebase_history(&specifier(), &held_foxy())
        .await
        .unwrap();
    assert!(upserted.is_empty());
    assert!(orch.ledger().read().await.rebase_ids().is_empty());
}

#[tokio::test]
async fn rebase_skips_when_no_rebasing_asset_held() {
    let adapter = MockAdapter::new("eip155:1");
    let orch = orchestrator(adapter, rebase_config());

    let held = vec![AssetId::new("eip155:1/slip44:60")];
    let upserted = orch
        .fetch_rebase_history(&specifier(), &held)
        .await
        .unwrap();
    assert!(upserted.is_empty());
    assert!(orch.ledger().read().await.rebase_ids().is_empty());
}

#[tokio::test]
async fn rebase_skips_on_chain_mismatch() {
    let adapter = MockAdapter::new("eip155:137");
    let orch = orchestrator(adapter, rebase_config());

    // Holding is real, but the account lives on a different chain than
    // the rebasing token's fixed home chain.
    let polygon = AccountSpecifier::new(ChainId::new("eip155:137"), "0xme").unwrap();
    let upserted = orch
        .fetch_rebase_history(&polygon, &held_foxy())
        .await
        .unwrap();
    assert!(upserted.is_empty());
    assert!(orch.ledger().read().await.rebase_ids().is_empty());
}

#[tokio::test]
async fn rebase_upserts_entries_for_held_asset() {
    let adapter = MockAdapter::new("eip155:1");
    adapter
        .rebase
        .respond(FOXY_CONTRACT, Ok(vec![rebase(100), rebase(200)]));

    let orch = orchestrator(adapter, rebase_config());
    let spec = specifier();
    let upserted = orch
        .fetch_rebase_history(&spec, &held_foxy())
        .await
        .unwrap();
    assert_eq!(upserted.len(), 1);
    assert_eq!(upserted[0].1, 2);

    let ledger = orch.ledger().read().await;
    assert_eq!(ledger.rebase_ids().len(), 2);
    assert_eq!(ledger.rebase_ids_by_asset(&upserted[0].0).len(), 2);
    assert_eq!(ledger.rebase_ids_by_account(&spec.account_id()).len(), 2);
}

#[tokio::test]
async fn rebase_failure_for_one_asset_does_not_abort_siblings() {
    let second_contract = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    let adapter = MockAdapter::new("eip155:1");
    adapter.rebase.respond(FOXY_CONTRACT, Ok(vec![rebase(100)]));
    adapter
        .rebase
        .respond(second_contract, Err(ProviderError::Http("boom".to_string())));

    let registry = RebasingAssets::new(vec![
        RebasingAsset {
            contract_address: FOXY_CONTRACT.to_string(),
            chain_id: ChainId::new("eip155:1"),
        },
        RebasingAsset {
            contract_address: second_contract.to_string(),
            chain_id: ChainId::new("eip155:1"),
        },
    ]);

    let mut adapters = AdapterRegistry::new();
    adapters.register(adapter);
    let orch = SyncOrchestrator::new(adapters, shared_ledger(), rebase_config(), registry);

    let held = vec![
        AssetId::new(format!("eip155:1/erc20:{FOXY_CONTRACT}")),
        AssetId::new(format!("eip155:1/erc20:{second_contract}")),
    ];
    let upserted = orch
        .fetch_rebase_history(&specifier(), &held)
        .await
        .unwrap();

    // The healthy asset still landed.
    assert_eq!(upserted.len(), 1);
    let ledger = orch.ledger().read().await;
    assert_eq!(ledger.rebase_ids().len(), 1);
    assert_eq!(ledger.rebase_ids_by_asset(&upserted[0].0).len(), 1);
}

#[tokio::test]
async fn rebase_empty_history_is_not_upserted() {
    let adapter = MockAdapter::new("eip155:1");
    adapter.rebase.respond(FOXY_CONTRACT, Ok(Vec::new()));

    let orch = orchestrator(adapter, rebase_config());
    let upserted = orch
        .fetch_rebase_history(&specifier(), &held_foxy())
        .await
        .unwrap();
    assert!(upserted.is_empty());
    assert!(orch.ledger().read().await.rebase_ids().is_empty());
}

// ── Store consistency through the orchestrator ─────────────────────────

#[tokio::test]
async fn utxo_send_and_change_are_distinct_records() {
    let adapter = MockAdapter::new("bip122:000000000019d6");
    let mut send = tx("deadbeef", 100);
    send.address = "bc1qsend".to_string();
    let mut change = tx("deadbeef", 100);
    change.address = "bc1qchange".to_string();
    adapter
        .history
        .queue("xpub1", Ok(page(vec![send.clone(), change], "")));

    let orch = orchestrator(adapter, SyncConfig::default());
    let spec = AccountSpecifier::new(ChainId::new("bip122:000000000019d6"), "xpub1").unwrap();
    orch.fetch_all_history(&spec, &never()).await.unwrap();

    let ledger = orch.ledger().read().await;
    let account_id = spec.account_id();
    assert_eq!(ledger.tx_ids_by_account(&account_id).len(), 2);
    assert!(ledger.tx(&tx_key(&send, &account_id)).is_some());
}

#[tokio::test]
async fn clear_resets_ledger_and_status() {
    let adapter = MockAdapter::new("eip155:1");
    adapter.history.queue("0xme", Ok(page(vec![tx("tx1", 100)], "")));

    let orch = orchestrator(adapter, SyncConfig::default());
    orch.sync_account(&specifier(), &never()).await.unwrap();

    {
        let mut ledger = orch.ledger().write().await;
        ledger.clear();
    }
    let ledger = orch.ledger().read().await;
    assert!(ledger.tx_ids().is_empty());
    assert_eq!(ledger.status(), SyncStatus::Idle);
}
