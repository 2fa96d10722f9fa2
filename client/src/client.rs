//! Remote ledger client for the vote-card program.

use {
    crate::{
        config::ClientConfig,
        error::{Result, VoteCardError},
        instruction,
        network::Network,
        pda::{find_program_admin_address, find_vote_card_address},
        service::VoteService,
        state::{ProgramAdmin, VoteCard, VoteCardAccount},
        transport::LedgerTransport,
        wallet::WalletAdapter,
    },
    async_trait::async_trait,
    log::*,
    solana_account::Account,
    solana_instruction::Instruction,
    solana_pubkey::Pubkey,
    solana_signature::Signature,
    solana_transaction::Transaction,
    std::sync::Arc,
};

/// Typed operations over a [`LedgerTransport`].
///
/// Constructed once and shared; every operation reuses the same transport.
pub struct VoteCardClient<T: LedgerTransport + ?Sized> {
    transport: Arc<T>,
    config: ClientConfig,
}

impl<T: LedgerTransport + ?Sized> Clone for VoteCardClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: self.config.clone(),
        }
    }
}

impl<T: LedgerTransport + ?Sized> VoteCardClient<T> {
    pub fn new(transport: Arc<T>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Address `author` would create a card titled `title` at.
    pub fn card_address(&self, author: &Pubkey, title: &str) -> Result<Pubkey> {
        let (address, _) =
            find_vote_card_address(&self.config.deployment.program_id, author, title)?;
        Ok(address)
    }

    pub fn program_admin_address(&self) -> Pubkey {
        find_program_admin_address(&self.config.deployment.program_id).0
    }

    async fn ensure_balance(&self, pubkey: &Pubkey, required: u64) -> Result<()> {
        let balance = self.transport.get_balance(pubkey).await?;
        if balance < required {
            debug!("{pubkey} holds {balance} lamports, {required} required");
            return Err(VoteCardError::InsufficientBalance { required, balance });
        }
        Ok(())
    }

    /// Sign, send and confirm a single-instruction transaction paid by the
    /// wallet.
    async fn submit(&self, wallet: &WalletAdapter, instruction: Instruction) -> Result<Signature> {
        let (blockhash, _) = self.transport.get_latest_blockhash().await?;
        let mut transaction = Transaction::new_with_payer(&[instruction], Some(&wallet.pubkey()));
        wallet.sign_transaction(&mut transaction, blockhash)?;

        let signature = self
            .transport
            .send_transaction(&transaction)
            .await
            .map_err(VoteCardError::classify)?;
        debug!("sent {signature}");

        let (latest_blockhash, _) = self.transport.get_latest_blockhash().await?;
        self.transport
            .confirm_transaction(&signature, &latest_blockhash)
            .await
            .map_err(VoteCardError::classify)?;
        debug!(
            "confirmed {signature} at {:?}",
            self.config.commitment.commitment
        );
        Ok(signature)
    }

    /// Read the freshly created card back until it is visible.
    async fn wait_for_card(&self, address: &Pubkey) -> Result<()> {
        let attempts = self.config.visibility_attempts;
        let mut last_error = VoteCardError::AccountNotFound(*address);
        for attempt in 1..=attempts {
            match self.fetch_card(address).await {
                Ok(Some(_)) => return Ok(()),
                Ok(None) => last_error = VoteCardError::AccountNotFound(*address),
                Err(err) => last_error = err,
            }
            debug!("card {address} not visible yet (attempt {attempt}/{attempts}): {last_error}");
            if attempt < attempts {
                tokio::time::sleep(self.config.visibility_retry_delay).await;
            }
        }
        warn!("card {address} still not visible after {attempts} attempts");
        Err(last_error)
    }

    fn decode_card(&self, address: Pubkey, account: &Account) -> Result<VoteCard> {
        if account.owner != self.config.deployment.program_id {
            return Err(VoteCardError::InvalidAccountData {
                address,
                reason: format!("owned by {}", account.owner),
            });
        }
        let record = VoteCardAccount::deserialize(&account.data).map_err(|err| {
            VoteCardError::InvalidAccountData {
                address,
                reason: err.to_string(),
            }
        })?;
        Ok(VoteCard::from_account(address, record))
    }
}

#[async_trait]
impl<T: LedgerTransport + ?Sized> VoteService for VoteCardClient<T> {
    async fn network(&self) -> Result<Network> {
        let genesis_hash = self.transport.get_genesis_hash().await?;
        Ok(Network::from_genesis_hash(&genesis_hash))
    }

    async fn is_initialized(&self) -> bool {
        if !self.config.deployment.layout.uses_admin() {
            return true;
        }
        let address = self.program_admin_address();
        match self.transport.get_account(&address).await {
            Ok(Some(account)) => match ProgramAdmin::deserialize(&account.data) {
                Ok(admin) => admin.is_initialized,
                Err(err) => {
                    warn!("program admin {address} is not decodable: {err}");
                    false
                }
            },
            Ok(None) => false,
            Err(err) => {
                warn!("failed to read program admin {address}: {err}");
                false
            }
        }
    }

    async fn initialize(&self, wallet: &WalletAdapter) -> Result<Signature> {
        let ix = instruction::initialize(&self.config.deployment, &wallet.pubkey());
        let signature = self.submit(wallet, ix).await?;
        info!("program initialized by {}: {signature}", wallet.pubkey());
        Ok(signature)
    }

    async fn create_card(
        &self,
        wallet: &WalletAdapter,
        title: &str,
        description: &str,
    ) -> Result<Pubkey> {
        let author = wallet.pubkey();
        self.ensure_balance(&author, self.config.create_min_balance)
            .await?;
        let (ix, address) =
            instruction::create_vote_card(&self.config.deployment, &author, title, description)?;
        let signature = self.submit(wallet, ix).await?;
        info!("created vote card {address}: {signature}");
        self.wait_for_card(&address).await?;
        Ok(address)
    }

    async fn cast_vote(&self, wallet: &WalletAdapter, card: &Pubkey) -> Result<Signature> {
        let voter = wallet.pubkey();
        self.ensure_balance(&voter, self.config.vote_min_balance)
            .await?;
        let ix = instruction::cast_vote(&self.config.deployment, &voter, card);
        let signature = self.submit(wallet, ix).await?;
        info!("{voter} voted on {card}: {signature}");
        Ok(signature)
    }

    async fn unvote(&self, wallet: &WalletAdapter, card: &Pubkey) -> Result<Signature> {
        let voter = wallet.pubkey();
        let ix = instruction::unvote(&self.config.deployment, &voter, card);
        let signature = self.submit(wallet, ix).await?;
        info!("{voter} withdrew vote on {card}: {signature}");
        Ok(signature)
    }

    async fn remove_card(&self, wallet: &WalletAdapter, card: &Pubkey) -> Result<Signature> {
        let ix = instruction::remove_card(&self.config.deployment, &wallet.pubkey(), card);
        let signature = self.submit(wallet, ix).await?;
        info!("removed vote card {card}: {signature}");
        Ok(signature)
    }

    async fn list_cards(&self, wallet: &WalletAdapter) -> Result<Vec<VoteCard>> {
        let accounts = self
            .transport
            .get_program_accounts(
                &self.config.deployment.program_id,
                &VoteCardAccount::discriminator(),
            )
            .await?;
        debug!(
            "fetched {} vote card accounts for {}",
            accounts.len(),
            wallet.pubkey()
        );
        Ok(accounts
            .into_iter()
            .filter_map(|(address, account)| match self.decode_card(address, &account) {
                Ok(card) => Some(card),
                Err(err) => {
                    warn!("skipping vote card {address}: {err}");
                    None
                }
            })
            .collect())
    }

    async fn fetch_card(&self, address: &Pubkey) -> Result<Option<VoteCard>> {
        match self.transport.get_account(address).await? {
            Some(account) => self.decode_card(*address, &account).map(Some),
            None => Ok(None),
        }
    }
}
