//! The narrow interface screen controllers program against.

use {
    crate::{error::Result, network::Network, state::VoteCard, wallet::WalletAdapter},
    async_trait::async_trait,
    solana_pubkey::Pubkey,
    solana_signature::Signature,
};

/// Vote-card operations, independent of how the ledger is reached.
#[async_trait]
pub trait VoteService: Send + Sync {
    /// Identify the cluster behind the endpoint.
    async fn network(&self) -> Result<Network>;

    /// Whether the admin singleton exists and is marked initialized. Read
    /// failures count as "not initialized". Layouts without the singleton are
    /// always initialized.
    async fn is_initialized(&self) -> bool;

    async fn initialize(&self, wallet: &WalletAdapter) -> Result<Signature>;

    /// Create a card and return its derived address once it is readable.
    async fn create_card(
        &self,
        wallet: &WalletAdapter,
        title: &str,
        description: &str,
    ) -> Result<Pubkey>;

    async fn cast_vote(&self, wallet: &WalletAdapter, card: &Pubkey) -> Result<Signature>;

    async fn unvote(&self, wallet: &WalletAdapter, card: &Pubkey) -> Result<Signature>;

    async fn remove_card(&self, wallet: &WalletAdapter, card: &Pubkey) -> Result<Signature>;

    /// Every decodable card, in ledger order.
    async fn list_cards(&self, wallet: &WalletAdapter) -> Result<Vec<VoteCard>>;

    async fn fetch_card(&self, address: &Pubkey) -> Result<Option<VoteCard>>;
}
