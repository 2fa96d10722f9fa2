//! One vote card in the list, with its vote and delete actions.

use {
    crate::toast::{Outcome, Toast},
    log::*,
    std::sync::Arc,
    votecard_client::{VoteCard, VoteCardError, VoteService, WalletAdapter},
};

pub const VOTE_SUCCESS: &str = "Vote cast successfully!";
pub const DUPLICATE_VOTE: &str = "You have already voted!";
pub const VOTE_INSUFFICIENT_BALANCE: &str = "Insufficient balance, voting requires 0.001 SOL";
pub const UNVOTE_SUCCESS: &str = "Vote withdrawn, 0.001 SOL has been refunded!";
pub const REMOVE_SUCCESS: &str = "Vote card deleted";

/// Per-card screen state.
///
/// Rebuilt from the card and the connected wallet whenever the list is
/// refreshed.
pub struct VoteCardView {
    service: Arc<dyn VoteService>,
    card: VoteCard,
    wallet: Option<WalletAdapter>,
    has_voted: bool,
    loading: bool,
    confirm_delete_open: bool,
    toast: Option<Toast>,
}

impl VoteCardView {
    pub fn new(service: Arc<dyn VoteService>, card: VoteCard, wallet: Option<WalletAdapter>) -> Self {
        let has_voted = wallet
            .as_ref()
            .is_some_and(|wallet| card.has_voted(&wallet.pubkey()));
        Self {
            service,
            card,
            wallet,
            has_voted,
            loading: false,
            confirm_delete_open: false,
            toast: None,
        }
    }

    pub fn card(&self) -> &VoteCard {
        &self.card
    }

    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    /// Delete is only offered to the card's author.
    pub fn is_author(&self) -> bool {
        self.wallet
            .as_ref()
            .is_some_and(|wallet| self.card.is_author(&wallet.pubkey()))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_confirm_delete_open(&self) -> bool {
        self.confirm_delete_open
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    pub async fn vote(&mut self) -> Outcome {
        let Some(wallet) = self.wallet.clone() else {
            return Outcome::Unchanged;
        };
        self.loading = true;
        let result = self.service.cast_vote(&wallet, &self.card.address).await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.has_voted = true;
                self.toast = Some(Toast::success(VOTE_SUCCESS));
                Outcome::RefreshRequested
            }
            Err(err) => {
                warn!("vote on {} failed: {err}", self.card.address);
                self.toast = Some(Toast::error(match err {
                    VoteCardError::InsufficientBalance { .. } => {
                        VOTE_INSUFFICIENT_BALANCE.to_string()
                    }
                    VoteCardError::DuplicateVote => DUPLICATE_VOTE.to_string(),
                    err => format!("Vote failed: {err}"),
                }));
                Outcome::Unchanged
            }
        }
    }

    pub async fn unvote(&mut self) -> Outcome {
        let Some(wallet) = self.wallet.clone() else {
            return Outcome::Unchanged;
        };
        self.loading = true;
        let result = self.service.unvote(&wallet, &self.card.address).await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.has_voted = false;
                self.toast = Some(Toast::success(UNVOTE_SUCCESS));
                Outcome::RefreshRequested
            }
            Err(err) => {
                warn!("unvote on {} failed: {err}", self.card.address);
                self.toast = Some(Toast::error(format!("Failed to withdraw vote: {err}")));
                Outcome::Unchanged
            }
        }
    }

    /// Open the delete confirmation. Does nothing for non-authors.
    pub fn request_remove(&mut self) {
        if self.is_author() {
            self.confirm_delete_open = true;
        }
    }

    pub fn cancel_remove(&mut self) {
        self.confirm_delete_open = false;
    }

    /// Delete the card once the confirmation is open.
    ///
    /// The program decides who may delete; a rejection is reported the same
    /// way as any other failure.
    pub async fn confirm_remove(&mut self) -> Outcome {
        if !self.confirm_delete_open {
            return Outcome::Unchanged;
        }
        let Some(wallet) = self.wallet.clone() else {
            return Outcome::Unchanged;
        };
        self.loading = true;
        let result = self.service.remove_card(&wallet, &self.card.address).await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.confirm_delete_open = false;
                self.toast = Some(Toast::success(REMOVE_SUCCESS));
                Outcome::RefreshRequested
            }
            Err(err) => {
                warn!("remove of {} failed: {err}", self.card.address);
                self.toast = Some(Toast::error(format!("Delete failed: {err}")));
                Outcome::Unchanged
            }
        }
    }

    /// Delete without the confirmation step, for callers that confirmed up
    /// front.
    pub async fn remove_confirmed(&mut self) -> Outcome {
        self.confirm_delete_open = true;
        self.confirm_remove().await
    }
}
