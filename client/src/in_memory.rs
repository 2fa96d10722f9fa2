//! In-memory stand-in for a cluster running the vote-card program.
//!
//! Transactions are executed at send time against a private account map using
//! the same account constraints and error codes the deployed program returns.
//! Rejected transactions surface as preflight failures and leave no trace.

#![allow(clippy::arithmetic_side_effects)]

use {
    crate::{
        error::{Result, VoteCardError},
        instruction::VoteInstruction,
        network::Network,
        pda::{find_program_admin_address, find_vote_card_address},
        program::{
            Deployment, VoteProgramError, CREATE_FEE_LAMPORTS, MAX_DESCRIPTION_LEN,
            MAX_TITLE_LEN, VOTE_FEE_LAMPORTS,
        },
        state::{ProgramAdmin, VoteCardAccount},
        transport::LedgerTransport,
    },
    async_trait::async_trait,
    log::*,
    solana_account::Account,
    solana_hash::Hash,
    solana_instruction::error::InstructionError,
    solana_pubkey::Pubkey,
    solana_rpc_client_api::client_error::{Error as ClientError, ErrorKind as ClientErrorKind},
    solana_sdk_ids::system_program,
    solana_signature::Signature,
    solana_transaction::Transaction,
    solana_transaction_error::TransactionError,
    std::{
        collections::{HashMap, HashSet},
        sync::{Mutex, MutexGuard, PoisonError},
    },
};

/// Fee charged per transaction signature.
pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;
const LAMPORTS_PER_BYTE_YEAR: u64 = 3_480;
const EXEMPTION_THRESHOLD_YEARS: u64 = 2;

/// Blockhashes a transaction may reference before it is rejected.
const MAX_RECENT_BLOCKHASHES: usize = 150;

/// 2025-01-01T00:00:00Z
const GENESIS_UNIX_TIMESTAMP: i64 = 1_735_689_600;

// System program error codes surfaced through account creation and transfers.
const ACCOUNT_ALREADY_IN_USE: u32 = 0;
const RESULT_WITH_NEGATIVE_LAMPORTS: u32 = 1;

/// Rent-exempt minimum for an account holding `data_len` bytes.
pub fn minimum_balance(data_len: usize) -> u64 {
    (ACCOUNT_STORAGE_OVERHEAD + data_len as u64) * LAMPORTS_PER_BYTE_YEAR * EXEMPTION_THRESHOLD_YEARS
}

fn program_error(error: VoteProgramError) -> InstructionError {
    InstructionError::Custom(error.code())
}

fn offline_error() -> VoteCardError {
    ClientError::from(ClientErrorKind::Custom("ledger is offline".to_string())).into()
}

/// A single-program ledger held in memory.
pub struct InMemoryLedger {
    deployment: Deployment,
    state: Mutex<LedgerState>,
}

struct LedgerState {
    accounts: HashMap<Pubkey, Account>,
    confirmed: HashSet<Signature>,
    genesis_hash: Hash,
    recent_blockhashes: Vec<Hash>,
    block_height: u64,
    unix_timestamp: i64,
    /// Reads a newly created card stays hidden for.
    visibility_lag: u32,
    hidden: HashMap<Pubkey, u32>,
    offline: bool,
    drop_transactions: bool,
    transaction_count: u64,
}

impl InMemoryLedger {
    pub fn new(deployment: Deployment) -> Self {
        Self {
            deployment,
            state: Mutex::new(LedgerState {
                accounts: HashMap::new(),
                confirmed: HashSet::new(),
                genesis_hash: Network::Devnet.genesis_hash().unwrap_or_default(),
                recent_blockhashes: vec![Hash::new_unique()],
                block_height: 0,
                unix_timestamp: GENESIS_UNIX_TIMESTAMP,
                visibility_lag: 0,
                hidden: HashMap::new(),
                offline: false,
                drop_transactions: false,
                transaction_count: 0,
            }),
        }
    }

    pub fn with_genesis_hash(self, genesis_hash: Hash) -> Self {
        self.state().genesis_hash = genesis_hash;
        self
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn airdrop(&self, pubkey: &Pubkey, lamports: u64) {
        self.state()
            .accounts
            .entry(*pubkey)
            .or_insert_with(|| Account::new(0, 0, &system_program::id()))
            .lamports += lamports;
    }

    pub fn balance(&self, pubkey: &Pubkey) -> u64 {
        self.state()
            .accounts
            .get(pubkey)
            .map_or(0, |account| account.lamports)
    }

    pub fn account(&self, pubkey: &Pubkey) -> Option<Account> {
        self.state().accounts.get(pubkey).cloned()
    }

    /// Store raw data under the program, bypassing every rule.
    pub fn set_program_account(&self, pubkey: &Pubkey, data: Vec<u8>) {
        let account = Account {
            lamports: minimum_balance(data.len()),
            data,
            owner: self.deployment.program_id,
            executable: false,
            rent_epoch: 0,
        };
        self.state().accounts.insert(*pubkey, account);
    }

    /// Fail every call as if the endpoint were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Hide newly created cards from the next `reads` reads of each.
    pub fn set_visibility_lag(&self, reads: u32) {
        self.state().visibility_lag = reads;
    }

    /// Accept transactions without ever landing them.
    pub fn set_drop_transactions(&self, drop: bool) {
        self.state().drop_transactions = drop;
    }

    /// Transactions that have landed.
    pub fn transaction_count(&self) -> u64 {
        self.state().transaction_count
    }
}

impl LedgerState {
    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(offline_error());
        }
        Ok(())
    }

    fn is_visible(&self, pubkey: &Pubkey) -> bool {
        !self.hidden.get(pubkey).is_some_and(|reads| *reads > 0)
    }

    fn advance(&mut self) {
        self.block_height += 1;
        self.unix_timestamp += 1;
        self.recent_blockhashes.push(Hash::new_unique());
        if self.recent_blockhashes.len() > MAX_RECENT_BLOCKHASHES {
            self.recent_blockhashes.remove(0);
        }
    }

    fn process(
        &mut self,
        deployment: &Deployment,
        transaction: &Transaction,
    ) -> std::result::Result<(), TransactionError> {
        let message = &transaction.message;
        if !self.recent_blockhashes.contains(&message.recent_blockhash) {
            return Err(TransactionError::BlockhashNotFound);
        }
        transaction.verify()?;

        let payer = *message
            .account_keys
            .first()
            .ok_or(TransactionError::AccountNotFound)?;
        let fee = LAMPORTS_PER_SIGNATURE * transaction.signatures.len() as u64;
        let mut accounts = self.accounts.clone();
        match accounts.get_mut(&payer) {
            Some(account) if account.lamports >= fee => account.lamports -= fee,
            Some(_) => return Err(TransactionError::InsufficientFundsForFee),
            None => return Err(TransactionError::AccountNotFound),
        }

        let mut created_cards = Vec::new();
        for (index, compiled) in message.instructions.iter().enumerate() {
            let index = u8::try_from(index).map_err(|_| TransactionError::SanitizeFailure)?;
            let program_id = message
                .account_keys
                .get(usize::from(compiled.program_id_index))
                .ok_or(TransactionError::SanitizeFailure)?;
            if *program_id != deployment.program_id {
                return Err(TransactionError::InstructionError(
                    index,
                    InstructionError::UnsupportedProgramId,
                ));
            }
            let keys = compiled
                .accounts
                .iter()
                .map(|&key_index| {
                    let key_index = usize::from(key_index);
                    message
                        .account_keys
                        .get(key_index)
                        .map(|key| (*key, message.is_signer(key_index)))
                })
                .collect::<Option<Vec<_>>>()
                .ok_or(TransactionError::SanitizeFailure)?;
            let mut invocation = Invocation {
                deployment,
                accounts: &mut accounts,
                keys,
                unix_timestamp: self.unix_timestamp + 1,
            };
            let created = invocation
                .execute(&compiled.data)
                .map_err(|err| TransactionError::InstructionError(index, err))?;
            created_cards.extend(created);
        }

        self.accounts = accounts;
        for card in created_cards {
            if self.visibility_lag > 0 {
                self.hidden.insert(card, self.visibility_lag);
            }
        }
        self.transaction_count += 1;
        self.advance();
        Ok(())
    }
}

/// One instruction executing against the transaction's working accounts.
struct Invocation<'a> {
    deployment: &'a Deployment,
    accounts: &'a mut HashMap<Pubkey, Account>,
    keys: Vec<(Pubkey, bool)>,
    unix_timestamp: i64,
}

impl Invocation<'_> {
    /// Run the instruction, returning the address of a card it created.
    fn execute(&mut self, data: &[u8]) -> std::result::Result<Option<Pubkey>, InstructionError> {
        let instruction =
            VoteInstruction::unpack(data).ok_or(InstructionError::InvalidInstructionData)?;
        match instruction {
            VoteInstruction::Initialize => self.initialize().map(|()| None),
            VoteInstruction::CreateVoteCard { title, description } => {
                self.create_vote_card(title, description).map(Some)
            }
            VoteInstruction::CastVote => self.cast_vote().map(|()| None),
            VoteInstruction::Unvote => self.unvote().map(|()| None),
            VoteInstruction::RemoveCard => self.remove_card().map(|()| None),
        }
    }

    fn key(&self, index: usize) -> std::result::Result<Pubkey, InstructionError> {
        self.keys
            .get(index)
            .map(|(key, _)| *key)
            .ok_or(InstructionError::NotEnoughAccountKeys)
    }

    fn signer(&self, index: usize) -> std::result::Result<Pubkey, InstructionError> {
        match self.keys.get(index) {
            Some((key, true)) => Ok(*key),
            Some((_, false)) => Err(InstructionError::MissingRequiredSignature),
            None => Err(InstructionError::NotEnoughAccountKeys),
        }
    }

    fn check_system_program(&self, index: usize) -> std::result::Result<(), InstructionError> {
        if self.key(index)? != system_program::id() {
            return Err(InstructionError::IncorrectProgramId);
        }
        Ok(())
    }

    /// Validate the admin account at `index` when the layout carries one and
    /// return the index of the next account.
    fn check_admin(&self, index: usize) -> std::result::Result<usize, InstructionError> {
        if !self.deployment.layout.uses_admin() {
            return Ok(index);
        }
        let address = self.key(index)?;
        let (expected, _) = find_program_admin_address(&self.deployment.program_id);
        if address != expected {
            return Err(program_error(VoteProgramError::ConstraintSeeds));
        }
        let account = self
            .accounts
            .get(&address)
            .ok_or(program_error(VoteProgramError::AccountNotInitialized))?;
        ProgramAdmin::deserialize(&account.data)
            .map_err(|_| program_error(VoteProgramError::AccountDiscriminatorMismatch))?;
        Ok(index + 1)
    }

    fn debit(&mut self, key: &Pubkey, amount: u64) -> std::result::Result<(), InstructionError> {
        match self.accounts.get_mut(key) {
            Some(account) if account.lamports >= amount => {
                account.lamports -= amount;
                Ok(())
            }
            _ => Err(InstructionError::Custom(RESULT_WITH_NEGATIVE_LAMPORTS)),
        }
    }

    fn credit(&mut self, key: &Pubkey, amount: u64) {
        self.accounts
            .entry(*key)
            .or_insert_with(|| Account::new(0, 0, &system_program::id()))
            .lamports += amount;
    }

    fn transfer(
        &mut self,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> std::result::Result<(), InstructionError> {
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(())
    }

    /// Allocate a zeroed, rent-exempt program account funded by `payer`.
    fn create_account(
        &mut self,
        payer: &Pubkey,
        address: &Pubkey,
        space: usize,
    ) -> std::result::Result<(), InstructionError> {
        if self
            .accounts
            .get(address)
            .is_some_and(|account| account.lamports > 0 || !account.data.is_empty())
        {
            return Err(InstructionError::Custom(ACCOUNT_ALREADY_IN_USE));
        }
        let rent = minimum_balance(space);
        self.debit(payer, rent)?;
        self.accounts.insert(
            *address,
            Account::new(rent, space, &self.deployment.program_id),
        );
        Ok(())
    }

    fn load_card(&self, address: &Pubkey) -> std::result::Result<VoteCardAccount, InstructionError> {
        let account = self
            .accounts
            .get(address)
            .ok_or(program_error(VoteProgramError::AccountNotInitialized))?;
        if account.owner != self.deployment.program_id {
            return Err(InstructionError::IllegalOwner);
        }
        VoteCardAccount::deserialize(&account.data)
            .map_err(|_| program_error(VoteProgramError::AccountDiscriminatorMismatch))
    }

    fn store_card(
        &mut self,
        address: &Pubkey,
        record: &VoteCardAccount,
    ) -> std::result::Result<(), InstructionError> {
        let data = record
            .serialize_to_account_data()
            .map_err(|_| program_error(VoteProgramError::AccountDidNotSerialize))?;
        let account = self
            .accounts
            .get_mut(address)
            .ok_or(program_error(VoteProgramError::AccountNotInitialized))?;
        account.data = data;
        Ok(())
    }

    fn initialize(&mut self) -> std::result::Result<(), InstructionError> {
        let address = self.key(0)?;
        let admin = self.signer(1)?;
        self.check_system_program(2)?;
        let (expected, _) = find_program_admin_address(&self.deployment.program_id);
        if address != expected {
            return Err(program_error(VoteProgramError::ConstraintSeeds));
        }

        self.create_account(&admin, &address, ProgramAdmin::SPACE)?;
        let data = ProgramAdmin {
            admin,
            is_initialized: true,
        }
        .serialize_to_account_data()
        .map_err(|_| program_error(VoteProgramError::AccountDidNotSerialize))?;
        if let Some(account) = self.accounts.get_mut(&address) {
            account.data = data;
        }
        Ok(())
    }

    fn create_vote_card(
        &mut self,
        title: String,
        description: String,
    ) -> std::result::Result<Pubkey, InstructionError> {
        let address = self.key(0)?;
        let author = self.signer(1)?;
        let mut next = self.check_admin(2)?;
        let fee_receiver = if self.deployment.layout.uses_admin() {
            let fee_receiver = self.key(next)?;
            if fee_receiver != self.key(2)? {
                return Err(program_error(VoteProgramError::ConstraintSeeds));
            }
            next += 1;
            fee_receiver
        } else {
            address
        };
        self.check_system_program(next)?;

        let seeds_match = find_vote_card_address(&self.deployment.program_id, &author, &title)
            .is_ok_and(|(expected, _)| expected == address);
        if !seeds_match {
            return Err(program_error(VoteProgramError::ConstraintSeeds));
        }
        self.create_account(&author, &address, VoteCardAccount::SPACE)?;

        if title.len() > MAX_TITLE_LEN {
            return Err(program_error(VoteProgramError::TitleTooLong));
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(program_error(VoteProgramError::DescriptionTooLong));
        }
        self.transfer(&author, &fee_receiver, CREATE_FEE_LAMPORTS)?;

        let record = VoteCardAccount {
            title,
            description,
            author,
            create_time: self.unix_timestamp,
            vote_count: 0,
            voters: Vec::new(),
        };
        self.store_card(&address, &record)?;
        trace!("created card {address} for {author}");
        Ok(address)
    }

    /// Resolve `(card, voter)` for `cast_vote` and `unvote`.
    fn voter_accounts(&self) -> std::result::Result<(Pubkey, Pubkey), InstructionError> {
        let address = self.key(0)?;
        let voter = self.signer(1)?;
        let next = self.check_admin(2)?;
        self.check_system_program(next)?;
        Ok((address, voter))
    }

    fn cast_vote(&mut self) -> std::result::Result<(), InstructionError> {
        let (address, voter) = self.voter_accounts()?;
        let mut record = self.load_card(&address)?;
        if record.has_voted(&voter) {
            return Err(program_error(VoteProgramError::AlreadyVoted));
        }
        self.transfer(&voter, &address, VOTE_FEE_LAMPORTS)?;
        record.vote_count += 1;
        record.voters.push(voter);
        self.store_card(&address, &record)
    }

    fn unvote(&mut self) -> std::result::Result<(), InstructionError> {
        let (address, voter) = self.voter_accounts()?;
        let mut record = self.load_card(&address)?;
        if !record.has_voted(&voter) {
            return Err(program_error(VoteProgramError::HasNotVoted));
        }
        self.debit(&address, VOTE_FEE_LAMPORTS)
            .map_err(|_| InstructionError::InsufficientFunds)?;
        self.credit(&voter, VOTE_FEE_LAMPORTS);
        record.vote_count = record
            .vote_count
            .checked_sub(1)
            .ok_or(InstructionError::ArithmeticOverflow)?;
        record.voters.retain(|key| *key != voter);
        self.store_card(&address, &record)
    }

    fn remove_card(&mut self) -> std::result::Result<(), InstructionError> {
        let address = self.key(0)?;
        let author = self.signer(1)?;
        let record = self.load_card(&address)?;
        if record.author != author {
            return Err(program_error(VoteProgramError::ConstraintHasOne));
        }
        let lamports = self
            .accounts
            .remove(&address)
            .map_or(0, |account| account.lamports);
        self.credit(&author, lamports);
        Ok(())
    }
}

#[async_trait]
impl LedgerTransport for InMemoryLedger {
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        let state = self.state();
        state.check_online()?;
        Ok(state.accounts.get(pubkey).map_or(0, |account| account.lamports))
    }

    async fn get_genesis_hash(&self) -> Result<Hash> {
        let state = self.state();
        state.check_online()?;
        Ok(state.genesis_hash)
    }

    async fn get_latest_blockhash(&self) -> Result<(Hash, u64)> {
        let state = self.state();
        state.check_online()?;
        let blockhash = state
            .recent_blockhashes
            .last()
            .copied()
            .unwrap_or_default();
        Ok((blockhash, state.block_height + MAX_RECENT_BLOCKHASHES as u64))
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        let mut state = self.state();
        state.check_online()?;
        let signature = transaction
            .signatures
            .first()
            .copied()
            .ok_or(TransactionError::SignatureFailure)?;
        if state.drop_transactions {
            debug!("dropping {signature}");
            return Ok(signature);
        }
        state.process(&self.deployment, transaction)?;
        state.confirmed.insert(signature);
        Ok(signature)
    }

    async fn confirm_transaction(&self, signature: &Signature, _blockhash: &Hash) -> Result<()> {
        let state = self.state();
        state.check_online()?;
        if state.confirmed.contains(signature) {
            Ok(())
        } else {
            Err(VoteCardError::ConfirmationExpired(*signature))
        }
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>> {
        let mut state = self.state();
        state.check_online()?;
        if let Some(reads) = state.hidden.get_mut(pubkey) {
            if *reads > 0 {
                *reads -= 1;
                return Ok(None);
            }
        }
        Ok(state.accounts.get(pubkey).cloned())
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8],
    ) -> Result<Vec<(Pubkey, Account)>> {
        let state = self.state();
        state.check_online()?;
        Ok(state
            .accounts
            .iter()
            .filter(|(pubkey, account)| {
                account.owner == *program_id
                    && account.data.starts_with(discriminator)
                    && state.is_visible(pubkey)
            })
            .map(|(pubkey, account)| (*pubkey, account.clone()))
            .collect())
    }
}
