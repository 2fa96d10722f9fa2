//! Adapts a connected wallet's signing capability to what the client needs.

use {
    solana_hash::Hash,
    solana_pubkey::Pubkey,
    solana_signer::{Signer, SignerError},
    solana_transaction::Transaction,
    std::{fmt, sync::Arc},
};

/// A connected wallet: its identity key plus the ability to sign.
///
/// Cheap to clone; every clone signs with the same underlying signer.
#[derive(Clone)]
pub struct WalletAdapter {
    pubkey: Pubkey,
    signer: Arc<dyn Signer + Send + Sync>,
}

impl WalletAdapter {
    pub fn new<S>(signer: S) -> Self
    where
        S: Signer + Send + Sync + 'static,
    {
        Self::from_arc(Arc::new(signer))
    }

    pub fn from_arc(signer: Arc<dyn Signer + Send + Sync>) -> Self {
        Self {
            pubkey: signer.pubkey(),
            signer,
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    pub fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }

    /// Sign `transaction` for `recent_blockhash`.
    pub fn sign_transaction(
        &self,
        transaction: &mut Transaction,
        recent_blockhash: Hash,
    ) -> Result<(), SignerError> {
        let signers: Vec<&dyn Signer> = vec![self.signer()];
        transaction.try_sign(&signers, recent_blockhash)
    }

    /// Sign every transaction, stopping at the first failure.
    pub fn sign_all_transactions(
        &self,
        transactions: &mut [Transaction],
        recent_blockhash: Hash,
    ) -> Result<(), SignerError> {
        transactions
            .iter_mut()
            .try_for_each(|transaction| self.sign_transaction(transaction, recent_blockhash))
    }
}

impl fmt::Debug for WalletAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletAdapter")
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        solana_instruction::{AccountMeta, Instruction},
        solana_keypair::Keypair,
        solana_signature::Signature,
    };

    fn transaction_for(payer: &Pubkey) -> Transaction {
        let ix = Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[1, 2, 3],
            vec![AccountMeta::new(*payer, true)],
        );
        Transaction::new_with_payer(&[ix], Some(payer))
    }

    #[test]
    fn test_sign_transaction() {
        let keypair = Keypair::new();
        let pubkey = keypair.pubkey();
        let wallet = WalletAdapter::new(keypair);
        assert_eq!(wallet.pubkey(), pubkey);

        let mut transaction = transaction_for(&pubkey);
        wallet
            .sign_transaction(&mut transaction, Hash::new_unique())
            .unwrap();
        assert_ne!(transaction.signatures[0], Signature::default());
    }

    #[test]
    fn test_sign_all_transactions() {
        let wallet = WalletAdapter::new(Keypair::new());
        let mut transactions = vec![
            transaction_for(&wallet.pubkey()),
            transaction_for(&wallet.pubkey()),
        ];
        wallet
            .sign_all_transactions(&mut transactions, Hash::new_unique())
            .unwrap();
        assert!(transactions
            .iter()
            .all(|transaction| transaction.signatures[0] != Signature::default()));
    }

    #[test]
    fn test_sign_rejects_foreign_payer() {
        let wallet = WalletAdapter::new(Keypair::new());
        let mut transaction = transaction_for(&Pubkey::new_unique());
        assert!(wallet
            .sign_transaction(&mut transaction, Hash::new_unique())
            .is_err());
    }
}
