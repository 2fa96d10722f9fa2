//! Screen controllers for the vote-card front-end.
//!
//! Each controller holds the state one screen renders (loading flags, dialog
//! visibility, toasts and alerts) and delegates every mutation to a
//! [`VoteService`](votecard_client::VoteService). Nothing here talks to the
//! ledger directly, so any front-end can drive these types.

pub mod card_view;
pub mod create_dialog;
pub mod home;
pub mod toast;

pub use {
    card_view::VoteCardView,
    create_dialog::CreateVoteDialog,
    home::{HomeScreen, NetworkStatus, ScreenState},
    toast::{Outcome, Toast, ToastKind},
};
