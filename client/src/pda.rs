//! Program-derived addresses used by the vote-card program.

use {
    crate::{
        error::ValidationError,
        program::{MAX_SEED_LEN, PROGRAM_ADMIN_SEED, VOTE_CARD_SEED},
    },
    solana_pubkey::Pubkey,
};

/// Address of the card `author` creates with `title`.
///
/// The same (author, title) pair always yields the same address, so a second
/// creation with that pair lands on the existing record and is rejected.
pub fn find_vote_card_address(
    program_id: &Pubkey,
    author: &Pubkey,
    title: &str,
) -> Result<(Pubkey, u8), ValidationError> {
    let title_seed = title.as_bytes();
    if title_seed.len() > MAX_SEED_LEN {
        return Err(ValidationError::TitleSeedTooLong(title_seed.len()));
    }
    Pubkey::try_find_program_address(&[VOTE_CARD_SEED, author.as_ref(), title_seed], program_id)
        .ok_or(ValidationError::TitleSeedTooLong(title_seed.len()))
}

/// Address of the program's admin singleton.
pub fn find_program_admin_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PROGRAM_ADMIN_SEED], program_id)
}
