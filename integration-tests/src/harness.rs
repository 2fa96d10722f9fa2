//! Vote-Card Test Harness
//!
//! Wires a [`VoteCardClient`] to an [`InMemoryLedger`] that executes the
//! vote-card program's rules, with helpers for funding wallets and reading
//! balances.

use {
    solana_keypair::Keypair,
    solana_native_token::LAMPORTS_PER_SOL,
    solana_pubkey::Pubkey,
    solana_signer::Signer,
    std::sync::Arc,
    votecard_client::{
        in_memory::{InMemoryLedger, LAMPORTS_PER_SIGNATURE},
        AccountLayout, ClientConfig, Deployment, VoteCard, VoteCardClient, VoteService,
        WalletAdapter,
    },
};

// ─── Constants ───────────────────────────────────────────────────────────────

/// One SOL in lamports.
pub const SOL: u64 = LAMPORTS_PER_SOL;

/// Balance given to every wallet the harness creates.
pub const DEFAULT_WALLET_LAMPORTS: u64 = SOL;

/// Transaction fees a create-then-remove round trip costs the author.
pub const ROUND_TRIP_FEE_TOLERANCE: u64 = 2 * LAMPORTS_PER_SIGNATURE;

// ─── Test harness ────────────────────────────────────────────────────────────

pub struct VoteCardTestHarness {
    pub ledger: Arc<InMemoryLedger>,
    pub client: Arc<VoteCardClient<InMemoryLedger>>,
}

impl VoteCardTestHarness {
    /// A fresh ledger for `layout`. Administered deployments start
    /// uninitialized.
    pub fn new(layout: AccountLayout) -> Self {
        let deployment = Deployment {
            layout,
            ..Deployment::default()
        };
        let ledger = Arc::new(InMemoryLedger::new(deployment));
        let config = ClientConfig::dev_default().with_deployment(deployment);
        let client = Arc::new(VoteCardClient::new(Arc::clone(&ledger), config));
        Self { ledger, client }
    }

    /// Like [`Self::new`], with the admin singleton in place when the layout
    /// has one.
    pub async fn initialized(layout: AccountLayout) -> Self {
        let harness = Self::new(layout);
        if layout.uses_admin() {
            let admin = harness.wallet();
            harness
                .client
                .initialize(&admin)
                .await
                .expect("initialize program");
        }
        harness
    }

    pub fn service(&self) -> Arc<dyn VoteService> {
        self.client.clone()
    }

    pub fn layout(&self) -> AccountLayout {
        self.ledger.deployment().layout
    }

    pub fn funded_wallet(&self, lamports: u64) -> WalletAdapter {
        let keypair = Keypair::new();
        self.ledger.airdrop(&keypair.pubkey(), lamports);
        WalletAdapter::new(keypair)
    }

    /// A wallet holding [`DEFAULT_WALLET_LAMPORTS`].
    pub fn wallet(&self) -> WalletAdapter {
        self.funded_wallet(DEFAULT_WALLET_LAMPORTS)
    }

    pub fn balance(&self, pubkey: &Pubkey) -> u64 {
        self.ledger.balance(pubkey)
    }

    /// Fetch a card that must exist.
    pub async fn card(&self, address: &Pubkey) -> VoteCard {
        self.client
            .fetch_card(address)
            .await
            .expect("fetch card")
            .expect("card exists")
    }
}
