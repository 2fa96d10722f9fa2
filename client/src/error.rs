//! Error types for the vote-card client.

use {
    crate::program::{VoteProgramError, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN},
    solana_instruction::error::InstructionError,
    solana_pubkey::Pubkey,
    solana_rpc_client_api::client_error::Error as ClientError,
    solana_signature::Signature,
    solana_signer::SignerError,
    solana_transaction_error::TransactionError,
    thiserror::Error,
};

/// Marker the program's duplicate-vote message carries when no structured
/// code is available.
const DUPLICATE_VOTE_MARKER: &str = "already voted";

/// Input rejected by the program's length rules or by address derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,

    #[error("description is required")]
    EmptyDescription,

    #[error("title exceeds {} characters", MAX_TITLE_LEN)]
    TitleTooLong,

    #[error("description exceeds {} characters", MAX_DESCRIPTION_LEN)]
    DescriptionTooLong,

    #[error("title is {0} bytes, longer than an address seed allows")]
    TitleSeedTooLong(usize),
}

/// Errors surfaced by the vote-card client.
#[derive(Error, Debug)]
pub enum VoteCardError {
    #[error("insufficient balance: {required} lamports required, {balance} available")]
    InsufficientBalance { required: u64, balance: u64 },

    #[error("you have already voted on this card")]
    DuplicateVote,

    #[error("you have not voted on this card")]
    NotVoted,

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("only the author can perform this operation")]
    Unauthorized,

    #[error("the program has not been initialized")]
    InitializationRequired,

    #[error("account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("account {address} has invalid data: {reason}")]
    InvalidAccountData { address: Pubkey, reason: String },

    #[error("program returned custom error {code}")]
    Program { code: u32 },

    #[error("transaction failed: {0}")]
    Transaction(TransactionError),

    #[error("rpc error: {0}")]
    Rpc(#[from] Box<ClientError>),

    #[error("signing failed: {0}")]
    Signer(#[from] SignerError),

    #[error("transaction {0} was not confirmed before its blockhash expired")]
    ConfirmationExpired(Signature),

    #[error("failed to encode instruction data: {0}")]
    Encoding(#[from] borsh::io::Error),
}

impl From<ClientError> for VoteCardError {
    fn from(err: ClientError) -> Self {
        match err.get_transaction_error() {
            Some(tx_err) => Self::Transaction(tx_err),
            None => Self::Rpc(Box::new(err)),
        }
    }
}

impl From<TransactionError> for VoteCardError {
    fn from(err: TransactionError) -> Self {
        Self::Transaction(err)
    }
}

impl VoteCardError {
    /// Map a failure returned by the ledger onto the typed variants.
    ///
    /// A custom program code is the discriminant; the duplicate-vote message
    /// marker is only consulted for errors that carry no code.
    pub fn classify(self) -> Self {
        match self {
            Self::Transaction(TransactionError::InstructionError(
                _,
                InstructionError::Custom(code),
            ))
            | Self::Program { code } => Self::from_program_code(code),
            Self::Rpc(err) if contains_duplicate_marker(&err.to_string()) => Self::DuplicateVote,
            other => other,
        }
    }

    fn from_program_code(code: u32) -> Self {
        match VoteProgramError::from_code(code) {
            Some(VoteProgramError::TitleTooLong) => ValidationError::TitleTooLong.into(),
            Some(VoteProgramError::DescriptionTooLong) => {
                ValidationError::DescriptionTooLong.into()
            }
            Some(VoteProgramError::AlreadyVoted) => Self::DuplicateVote,
            Some(VoteProgramError::HasNotVoted) => Self::NotVoted,
            Some(
                VoteProgramError::UnauthorizedOperation | VoteProgramError::ConstraintHasOne,
            ) => Self::Unauthorized,
            Some(VoteProgramError::AccountNotInitialized) => Self::InitializationRequired,
            _ => Self::Program { code },
        }
    }

    /// True for the length-rule failures, whether caught locally or by the
    /// program.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

fn contains_duplicate_marker(message: &str) -> bool {
    message.to_lowercase().contains(DUPLICATE_VOTE_MARKER)
}

/// Convenience result type for vote-card client operations.
pub type Result<T> = std::result::Result<T, VoteCardError>;
