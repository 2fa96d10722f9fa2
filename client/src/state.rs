//! Account layouts of the vote-card program and their client projections.

use {
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    sha2::{Digest, Sha256},
    solana_pubkey::Pubkey,
};

/// Length of the type tag prefixed to every program account and instruction.
pub const DISCRIMINATOR_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Discriminators
// ---------------------------------------------------------------------------

fn hashed_discriminator(preimage: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(preimage.as_bytes());
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    discriminator
}

/// Tag of an account type, `sha256("account:<TypeName>")[..8]`.
pub fn account_discriminator(type_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    hashed_discriminator(&format!("account:{type_name}"))
}

/// Tag of an instruction, `sha256("global:<snake_name>")[..8]`.
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    hashed_discriminator(&format!("global:{name}"))
}

fn decode_tagged<T: BorshDeserialize>(
    data: &[u8],
    discriminator: &[u8; DISCRIMINATOR_LEN],
) -> Result<T, std::io::Error> {
    if data.len() < DISCRIMINATOR_LEN || &data[..DISCRIMINATOR_LEN] != discriminator {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "missing or invalid account discriminator",
        ));
    }
    // Allocations are fixed-size; whatever follows the record is padding.
    let mut cursor = &data[DISCRIMINATOR_LEN..];
    T::deserialize(&mut cursor)
}

fn encode_tagged<T: BorshSerialize>(
    value: &T,
    discriminator: &[u8; DISCRIMINATOR_LEN],
    space: usize,
) -> Result<Vec<u8>, std::io::Error> {
    let mut data = discriminator.to_vec();
    value.serialize(&mut data)?;
    if data.len() > space {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "record does not fit in the account allocation",
        ));
    }
    data.resize(space, 0);
    Ok(data)
}

// ---------------------------------------------------------------------------
// VoteCardAccount
// ---------------------------------------------------------------------------

/// On-chain record of one vote card.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VoteCardAccount {
    pub title: String,
    pub description: String,
    pub author: Pubkey,
    pub create_time: i64,
    pub vote_count: u64,
    pub voters: Vec<Pubkey>,
}

impl VoteCardAccount {
    /// Allocated account size.
    ///
    /// Layout:
    ///   discriminator   (8)
    ///   title           (4 + 50)
    ///   description     (4 + 280)
    ///   author          (32)
    ///   create_time     (8)
    ///   vote_count      (8)
    ///   voters          (4 + 32 * 50)
    ///   reserved        (8)
    ///   = 2006 bytes
    pub const SPACE: usize = DISCRIMINATOR_LEN
        + 4
        + 50
        + 4
        + 280
        + 32
        + 8
        + 8
        + 4
        + 32 * crate::program::MAX_VOTERS
        + 8;

    pub fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator("VoteCard")
    }

    /// Decode raw account data (expects the leading discriminator).
    pub fn deserialize(data: &[u8]) -> Result<Self, std::io::Error> {
        decode_tagged(data, &Self::discriminator())
    }

    /// Encode into a full-size account buffer.
    pub fn serialize_to_account_data(&self) -> Result<Vec<u8>, std::io::Error> {
        encode_tagged(self, &Self::discriminator(), Self::SPACE)
    }

    pub fn has_voted(&self, voter: &Pubkey) -> bool {
        self.voters.contains(voter)
    }
}

// ---------------------------------------------------------------------------
// ProgramAdmin
// ---------------------------------------------------------------------------

/// Singleton written once by `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ProgramAdmin {
    pub admin: Pubkey,
    pub is_initialized: bool,
}

impl ProgramAdmin {
    /// discriminator (8) + admin (32) + is_initialized (1)
    pub const SPACE: usize = DISCRIMINATOR_LEN + 32 + 1;

    pub fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator("ProgramAdmin")
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, std::io::Error> {
        decode_tagged(data, &Self::discriminator())
    }

    pub fn serialize_to_account_data(&self) -> Result<Vec<u8>, std::io::Error> {
        encode_tagged(self, &Self::discriminator(), Self::SPACE)
    }
}

// ---------------------------------------------------------------------------
// VoteCard projection
// ---------------------------------------------------------------------------

/// A vote card as the screens see it: the decoded record plus its address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCard {
    pub address: Pubkey,
    pub title: String,
    pub description: String,
    pub author: Pubkey,
    pub vote_count: u64,
    pub create_time: i64,
    pub voters: Vec<Pubkey>,
}

impl VoteCard {
    pub fn from_account(address: Pubkey, account: VoteCardAccount) -> Self {
        let VoteCardAccount {
            title,
            description,
            author,
            create_time,
            vote_count,
            voters,
        } = account;
        Self {
            address,
            title,
            description,
            author,
            vote_count,
            create_time,
            voters,
        }
    }

    pub fn has_voted(&self, voter: &Pubkey) -> bool {
        self.voters.contains(voter)
    }

    pub fn is_author(&self, key: &Pubkey) -> bool {
        self.author == *key
    }
}

/// Newest first.
pub fn sort_newest_first(cards: &mut [VoteCard]) {
    cards.sort_by(|a, b| b.create_time.cmp(&a.create_time));
}
