//! The `votecard` command-line front-end.
//!
//! Each command mounts the same screen controllers a graphical front-end
//! would, drives them through one action and renders the resulting cards,
//! toasts and alerts as text or JSON.

pub mod clap_app;
pub mod cli;
pub mod network_info;
pub mod output;
pub mod settings;
pub mod vote_card;

#[cfg(test)]
pub(crate) mod test_utils {
    use {
        crate::{
            cli::{CliCommand, CliConfig},
            output::OutputFormat,
        },
        solana_hash::Hash,
        solana_keypair::Keypair,
        solana_native_token::LAMPORTS_PER_SOL,
        solana_signer::Signer,
        std::sync::Arc,
        votecard_client::{
            in_memory::InMemoryLedger, AccountLayout, ClientConfig, Deployment, VoteCardClient,
            VoteService, WalletAdapter,
        },
    };

    pub struct Fixture {
        pub ledger: Arc<InMemoryLedger>,
        pub client: Arc<VoteCardClient<InMemoryLedger>>,
    }

    impl Fixture {
        fn from_ledger(ledger: InMemoryLedger) -> Self {
            let config = ClientConfig::dev_default().with_deployment(*ledger.deployment());
            let ledger = Arc::new(ledger);
            let client = Arc::new(VoteCardClient::new(Arc::clone(&ledger), config));
            Self { ledger, client }
        }

        pub fn new(layout: AccountLayout) -> Self {
            Self::from_ledger(InMemoryLedger::new(Deployment {
                layout,
                ..Deployment::default()
            }))
        }

        pub fn with_genesis_hash(genesis_hash: Hash) -> Self {
            Self::from_ledger(
                InMemoryLedger::new(Deployment::default()).with_genesis_hash(genesis_hash),
            )
        }

        pub async fn initialized() -> Self {
            let fixture = Self::new(AccountLayout::Administered);
            fixture.client.initialize(&fixture.wallet()).await.unwrap();
            fixture
        }

        pub fn service(&self) -> Arc<dyn VoteService> {
            self.client.clone()
        }

        pub fn funded_wallet(&self, lamports: u64) -> WalletAdapter {
            let keypair = Keypair::new();
            self.ledger.airdrop(&keypair.pubkey(), lamports);
            WalletAdapter::new(keypair)
        }

        /// A wallet holding 1 SOL.
        pub fn wallet(&self) -> WalletAdapter {
            self.funded_wallet(LAMPORTS_PER_SOL)
        }
    }

    pub fn cli_config(
        command: CliCommand,
        wallet: Option<WalletAdapter>,
        fixture: &Fixture,
    ) -> CliConfig {
        CliConfig {
            command,
            json_rpc_url: "http://localhost:8899".to_string(),
            keypair_path: "/nonexistent/id.json".to_string(),
            wallet,
            client_config: fixture.client.config().clone(),
            output_format: OutputFormat::Display,
        }
    }
}
