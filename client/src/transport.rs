//! The ledger the client reads from and submits to.
//!
//! [`LedgerTransport`] is the seam between the vote-card operations and the
//! network. [`RpcTransport`] talks JSON RPC to a cluster; tests substitute the
//! in-memory ledger.

use {
    crate::error::{Result, VoteCardError},
    async_trait::async_trait,
    log::*,
    solana_account::Account,
    solana_account_decoder_client_types::UiAccountEncoding,
    solana_commitment_config::CommitmentConfig,
    solana_hash::Hash,
    solana_pubkey::Pubkey,
    solana_rpc_client::nonblocking::rpc_client::RpcClient,
    solana_rpc_client_api::{
        config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
        filter::{Memcmp, RpcFilterType},
    },
    solana_signature::Signature,
    solana_transaction::Transaction,
    std::{sync::Arc, time::Duration},
};

#[async_trait]
pub trait LedgerTransport: Send + Sync {
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64>;

    async fn get_genesis_hash(&self) -> Result<Hash>;

    /// Latest blockhash and the last block height it stays valid for.
    async fn get_latest_blockhash(&self) -> Result<(Hash, u64)>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature>;

    /// Wait until `signature` reaches the configured commitment, or fail once
    /// `blockhash` can no longer land.
    async fn confirm_transaction(&self, signature: &Signature, blockhash: &Hash) -> Result<()>;

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>>;

    /// All accounts of `program_id` whose data starts with `discriminator`.
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Account)>>;
}

/// [`LedgerTransport`] over a cluster's JSON RPC endpoint.
pub struct RpcTransport {
    rpc_client: Arc<RpcClient>,
    commitment: CommitmentConfig,
    poll_interval: Duration,
}

impl RpcTransport {
    pub fn new(json_rpc_url: String, commitment: CommitmentConfig) -> Self {
        Self::with_client(
            Arc::new(RpcClient::new_with_commitment(json_rpc_url, commitment)),
            commitment,
        )
    }

    pub fn with_client(rpc_client: Arc<RpcClient>, commitment: CommitmentConfig) -> Self {
        Self {
            rpc_client,
            commitment,
            poll_interval: Duration::from_millis(500),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn url(&self) -> String {
        self.rpc_client.url()
    }
}

#[async_trait]
impl LedgerTransport for RpcTransport {
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        Ok(self
            .rpc_client
            .get_balance_with_commitment(pubkey, self.commitment)
            .await?
            .value)
    }

    async fn get_genesis_hash(&self) -> Result<Hash> {
        Ok(self.rpc_client.get_genesis_hash().await?)
    }

    async fn get_latest_blockhash(&self) -> Result<(Hash, u64)> {
        Ok(self
            .rpc_client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        Ok(self.rpc_client.send_transaction(transaction).await?)
    }

    async fn confirm_transaction(&self, signature: &Signature, blockhash: &Hash) -> Result<()> {
        loop {
            match self
                .rpc_client
                .get_signature_status_with_commitment(signature, self.commitment)
                .await?
            {
                Some(Ok(())) => return Ok(()),
                Some(Err(err)) => return Err(VoteCardError::Transaction(err)),
                None => {
                    if !self
                        .rpc_client
                        .is_blockhash_valid(blockhash, self.commitment)
                        .await?
                    {
                        return Err(VoteCardError::ConfirmationExpired(*signature));
                    }
                    trace!("waiting for {signature} to reach {:?}", self.commitment);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>> {
        Ok(self
            .rpc_client
            .get_account_with_commitment(pubkey, self.commitment)
            .await?
            .value)
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Account)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                0,
                discriminator,
            ))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };
        Ok(self
            .rpc_client
            .get_program_accounts_with_config(program_id, config)
            .await?)
    }
}
