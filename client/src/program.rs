//! Constants and identifiers of the external vote-card program.
//!
//! The program itself is deployed separately; everything here mirrors what it
//! enforces so the client can derive addresses, build instructions and
//! pre-check balances without a generated binding.

use {
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
    std::{fmt, str::FromStr},
};

// ---------------------------------------------------------------------------
// Program ID
// ---------------------------------------------------------------------------

solana_pubkey::declare_id!("6RcLuYsYfmbfbwkd1bDeFy2MpnU3fUg4NMmWmx5Dy3bE");

/// Default JSON RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

pub const VOTE_CARD_SEED: &[u8] = b"vote-card";
pub const PROGRAM_ADMIN_SEED: &[u8] = b"program-admin";

/// Maximum length of a single PDA seed.
pub const MAX_SEED_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Limits and fees
// ---------------------------------------------------------------------------

pub const MAX_TITLE_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 280;

/// Voter slots reserved in the account allocation.
pub const MAX_VOTERS: usize = 50;

/// Charged by the program on `create_vote_card` (0.01 SOL).
pub const CREATE_FEE_LAMPORTS: u64 = 10_000_000;

/// Charged on `cast_vote` and refunded on `unvote` (0.001 SOL).
pub const VOTE_FEE_LAMPORTS: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// Error codes
// ---------------------------------------------------------------------------

/// First code of the program's own error enum.
pub const ERROR_CODE_OFFSET: u32 = 6000;

/// Custom error codes the program (and its framework) can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteProgramError {
    TitleTooLong,
    DescriptionTooLong,
    AlreadyVoted,
    HasNotVoted,
    UnauthorizedOperation,
    InsufficientBalance,
    RefundFailed,
    ConstraintHasOne,
    ConstraintSeeds,
    AccountDiscriminatorMismatch,
    AccountDidNotSerialize,
    AccountNotInitialized,
}

impl VoteProgramError {
    pub fn code(self) -> u32 {
        match self {
            Self::TitleTooLong => ERROR_CODE_OFFSET,
            Self::DescriptionTooLong => ERROR_CODE_OFFSET + 1,
            Self::AlreadyVoted => ERROR_CODE_OFFSET + 2,
            Self::HasNotVoted => ERROR_CODE_OFFSET + 3,
            Self::UnauthorizedOperation => ERROR_CODE_OFFSET + 4,
            Self::InsufficientBalance => ERROR_CODE_OFFSET + 5,
            Self::RefundFailed => ERROR_CODE_OFFSET + 6,
            Self::ConstraintHasOne => 2001,
            Self::ConstraintSeeds => 2006,
            Self::AccountDiscriminatorMismatch => 3002,
            Self::AccountDidNotSerialize => 3004,
            Self::AccountNotInitialized => 3012,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        let error = match code {
            6000 => Self::TitleTooLong,
            6001 => Self::DescriptionTooLong,
            6002 => Self::AlreadyVoted,
            6003 => Self::HasNotVoted,
            6004 => Self::UnauthorizedOperation,
            6005 => Self::InsufficientBalance,
            6006 => Self::RefundFailed,
            2001 => Self::ConstraintHasOne,
            2006 => Self::ConstraintSeeds,
            3002 => Self::AccountDiscriminatorMismatch,
            3004 => Self::AccountDidNotSerialize,
            3012 => Self::AccountNotInitialized,
            _ => return None,
        };
        Some(error)
    }
}

// ---------------------------------------------------------------------------
// Deployment
// ---------------------------------------------------------------------------

/// Which account set the deployed program expects.
///
/// The program source takes only the card, the signer and the system program.
/// Deployed builds additionally require the `program-admin` singleton, which
/// also receives the creation fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountLayout {
    Standalone,
    #[default]
    Administered,
}

impl AccountLayout {
    pub fn uses_admin(self) -> bool {
        matches!(self, Self::Administered)
    }
}

impl FromStr for AccountLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standalone" => Ok(Self::Standalone),
            "administered" => Ok(Self::Administered),
            _ => Err(format!(
                "Invalid account layout '{s}'. Valid: standalone, administered"
            )),
        }
    }
}

impl fmt::Display for AccountLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone"),
            Self::Administered => write!(f, "administered"),
        }
    }
}

/// A program deployment: its address and the account set it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub program_id: Pubkey,
    pub layout: AccountLayout,
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            program_id: id(),
            layout: AccountLayout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_roundtrip() {
        for code in (6000..=6006).chain([2001, 2006, 3002, 3004, 3012]) {
            let error = VoteProgramError::from_code(code).unwrap();
            assert_eq!(error.code(), code);
        }
        assert_eq!(VoteProgramError::from_code(6007), None);
        assert_eq!(VoteProgramError::from_code(0), None);
    }

    #[test]
    fn test_account_layout_parse() {
        assert_eq!(
            "standalone".parse::<AccountLayout>().unwrap(),
            AccountLayout::Standalone
        );
        assert_eq!(
            "administered".parse::<AccountLayout>().unwrap(),
            AccountLayout::Administered
        );
        assert!("admin".parse::<AccountLayout>().is_err());
        assert!(AccountLayout::Administered.uses_admin());
        assert!(!AccountLayout::Standalone.uses_admin());
    }

    #[test]
    fn test_default_deployment() {
        let deployment = Deployment::default();
        assert_eq!(
            deployment.program_id.to_string(),
            "6RcLuYsYfmbfbwkd1bDeFy2MpnU3fUg4NMmWmx5Dy3bE"
        );
        assert_eq!(deployment.layout, AccountLayout::Administered);
    }
}
