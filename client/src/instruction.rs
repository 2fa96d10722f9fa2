//! Instruction builders for the vote-card program.
//!
//! Instruction data is the 8-byte method discriminator followed by the
//! Borsh-encoded arguments. The account list depends on the deployment's
//! [`AccountLayout`].

use {
    crate::{
        error::VoteCardError,
        pda::{find_program_admin_address, find_vote_card_address},
        program::{AccountLayout, Deployment},
        state::{instruction_discriminator, DISCRIMINATOR_LEN},
    },
    borsh::{BorshDeserialize, BorshSerialize},
    solana_instruction::{AccountMeta, Instruction},
    solana_pubkey::Pubkey,
    solana_sdk_ids::system_program,
};

/// Methods exposed by the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteInstruction {
    Initialize,
    CreateVoteCard { title: String, description: String },
    CastVote,
    Unvote,
    RemoveCard,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct CreateVoteCardArgs {
    title: String,
    description: String,
}

impl VoteInstruction {
    fn method_name(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::CreateVoteCard { .. } => "create_vote_card",
            Self::CastVote => "cast_vote",
            Self::Unvote => "unvote",
            Self::RemoveCard => "remove_card",
        }
    }

    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        instruction_discriminator(self.method_name())
    }

    /// Discriminator followed by the Borsh-encoded arguments, if any.
    pub fn data(&self) -> borsh::io::Result<Vec<u8>> {
        let mut data = self.discriminator().to_vec();
        if let Self::CreateVoteCard { title, description } = self {
            let args = CreateVoteCardArgs {
                title: title.clone(),
                description: description.clone(),
            };
            data.extend(borsh::to_vec(&args)?);
        }
        Ok(data)
    }

    /// Decode instruction data produced by [`VoteInstruction::data`].
    pub fn unpack(data: &[u8]) -> Option<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return None;
        }
        let (tag, mut args) = data.split_at(DISCRIMINATOR_LEN);
        let instruction = [
            Self::Initialize,
            Self::CastVote,
            Self::Unvote,
            Self::RemoveCard,
        ]
        .into_iter()
        .find(|candidate| instruction_discriminator(candidate.method_name()) == tag);
        if instruction.is_some() {
            return instruction;
        }
        if instruction_discriminator("create_vote_card") == tag {
            let CreateVoteCardArgs { title, description } =
                CreateVoteCardArgs::deserialize(&mut args).ok()?;
            return Some(Self::CreateVoteCard { title, description });
        }
        None
    }
}

fn admin_meta(deployment: &Deployment) -> Option<AccountMeta> {
    deployment.layout.uses_admin().then(|| {
        let (admin, _) = find_program_admin_address(&deployment.program_id);
        AccountMeta::new_readonly(admin, false)
    })
}

/// Build `initialize`, creating the admin singleton with `admin` as payer.
pub fn initialize(deployment: &Deployment, admin: &Pubkey) -> Instruction {
    let (program_admin, _) = find_program_admin_address(&deployment.program_id);
    Instruction::new_with_bytes(
        deployment.program_id,
        &VoteInstruction::Initialize.discriminator(),
        vec![
            AccountMeta::new(program_admin, false),
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Build `create_vote_card`, returning the instruction and the card address.
pub fn create_vote_card(
    deployment: &Deployment,
    author: &Pubkey,
    title: &str,
    description: &str,
) -> Result<(Instruction, Pubkey), VoteCardError> {
    let (vote_card, _) = find_vote_card_address(&deployment.program_id, author, title)?;
    let mut accounts = vec![
        AccountMeta::new(vote_card, false),
        AccountMeta::new(*author, true),
    ];
    if let Some(admin) = admin_meta(deployment) {
        // The admin singleton doubles as the fee receiver.
        let fee_receiver = AccountMeta::new(admin.pubkey, false);
        accounts.push(admin);
        accounts.push(fee_receiver);
    }
    accounts.push(AccountMeta::new_readonly(system_program::id(), false));

    let data = VoteInstruction::CreateVoteCard {
        title: title.to_string(),
        description: description.to_string(),
    }
    .data()?;
    Ok((
        Instruction::new_with_bytes(deployment.program_id, &data, accounts),
        vote_card,
    ))
}

fn voter_instruction(
    deployment: &Deployment,
    instruction: VoteInstruction,
    voter: &Pubkey,
    vote_card: &Pubkey,
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new(*vote_card, false),
        AccountMeta::new(*voter, true),
    ];
    accounts.extend(admin_meta(deployment));
    accounts.push(AccountMeta::new_readonly(system_program::id(), false));
    Instruction::new_with_bytes(deployment.program_id, &instruction.discriminator(), accounts)
}

pub fn cast_vote(deployment: &Deployment, voter: &Pubkey, vote_card: &Pubkey) -> Instruction {
    voter_instruction(deployment, VoteInstruction::CastVote, voter, vote_card)
}

pub fn unvote(deployment: &Deployment, voter: &Pubkey, vote_card: &Pubkey) -> Instruction {
    voter_instruction(deployment, VoteInstruction::Unvote, voter, vote_card)
}

/// Build `remove_card`; the program closes the card into `author`.
pub fn remove_card(deployment: &Deployment, author: &Pubkey, vote_card: &Pubkey) -> Instruction {
    Instruction::new_with_bytes(
        deployment.program_id,
        &VoteInstruction::RemoveCard.discriminator(),
        vec![
            AccountMeta::new(*vote_card, false),
            AccountMeta::new(*author, true),
        ],
    )
}

/// Index of the signer account in an instruction built by this module.
pub const SIGNER_ACCOUNT_INDEX: usize = 1;

/// Index of the program-admin account, when the layout carries one.
pub fn admin_account_index(layout: AccountLayout) -> Option<usize> {
    layout.uses_admin().then_some(2)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{error::ValidationError, program::id},
        assert_matches::assert_matches,
    };

    fn administered() -> Deployment {
        Deployment::default()
    }

    fn standalone() -> Deployment {
        Deployment {
            program_id: id(),
            layout: AccountLayout::Standalone,
        }
    }

    #[test]
    fn test_create_vote_card_accounts() {
        let author = Pubkey::new_unique();
        let (ix, card) = create_vote_card(&administered(), &author, "Budget 2025", "Allocate funds")
            .unwrap();
        let (admin, _) = find_program_admin_address(&id());
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(keys, vec![card, author, admin, admin, system_program::id()]);
        assert!(ix.accounts[SIGNER_ACCOUNT_INDEX].is_signer);
        assert!(ix.accounts[3].is_writable);
        assert_eq!(admin_account_index(AccountLayout::Administered), Some(2));

        let (ix, card) =
            create_vote_card(&standalone(), &author, "Budget 2025", "Allocate funds").unwrap();
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(keys, vec![card, author, system_program::id()]);
        assert_eq!(admin_account_index(AccountLayout::Standalone), None);
    }

    #[test]
    fn test_create_vote_card_data() {
        let (ix, _) = create_vote_card(
            &standalone(),
            &Pubkey::new_unique(),
            "Budget 2025",
            "Allocate funds",
        )
        .unwrap();
        assert_eq!(&ix.data[..8], &instruction_discriminator("create_vote_card"));
        // u32 length prefix + bytes for each string argument.
        assert_eq!(&ix.data[8..12], &11u32.to_le_bytes());
        assert_eq!(&ix.data[12..23], b"Budget 2025");
        assert_eq!(
            VoteInstruction::unpack(&ix.data),
            Some(VoteInstruction::CreateVoteCard {
                title: "Budget 2025".to_string(),
                description: "Allocate funds".to_string(),
            })
        );
    }

    #[test]
    fn test_data_of_argumentless_methods_is_the_discriminator() {
        for instruction in [
            VoteInstruction::Initialize,
            VoteInstruction::CastVote,
            VoteInstruction::Unvote,
            VoteInstruction::RemoveCard,
        ] {
            assert_eq!(
                instruction.data().unwrap(),
                instruction.discriminator().to_vec()
            );
        }

        let data = VoteInstruction::CreateVoteCard {
            title: String::new(),
            description: "d".to_string(),
        }
        .data()
        .unwrap();
        assert_eq!(data.len(), DISCRIMINATOR_LEN + 4 + 4 + 1);
    }

    #[test]
    fn test_create_vote_card_rejects_long_seed() {
        let result = create_vote_card(
            &standalone(),
            &Pubkey::new_unique(),
            &"x".repeat(40),
            "description",
        );
        assert_matches!(
            result,
            Err(VoteCardError::Validation(ValidationError::TitleSeedTooLong(40)))
        );
    }

    #[test]
    fn test_unpack_argumentless_methods() {
        let voter = Pubkey::new_unique();
        let card = Pubkey::new_unique();
        assert_eq!(
            VoteInstruction::unpack(&cast_vote(&administered(), &voter, &card).data),
            Some(VoteInstruction::CastVote)
        );
        assert_eq!(
            VoteInstruction::unpack(&unvote(&administered(), &voter, &card).data),
            Some(VoteInstruction::Unvote)
        );
        assert_eq!(
            VoteInstruction::unpack(&remove_card(&administered(), &voter, &card).data),
            Some(VoteInstruction::RemoveCard)
        );
        assert_eq!(
            VoteInstruction::unpack(&initialize(&administered(), &voter).data),
            Some(VoteInstruction::Initialize)
        );
        assert_eq!(VoteInstruction::unpack(&[1, 2, 3]), None);
        assert_eq!(VoteInstruction::unpack(&[0u8; 8]), None);
    }

    #[test]
    fn test_remove_card_has_no_admin_account() {
        let ix = remove_card(&administered(), &Pubkey::new_unique(), &Pubkey::new_unique());
        assert_eq!(ix.accounts.len(), 2);
        assert!(ix.accounts[0].is_writable);
        assert!(ix.accounts[1].is_signer);
    }
}
