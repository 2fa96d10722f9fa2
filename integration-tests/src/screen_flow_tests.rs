//! Integration tests for the screen controllers.
//!
//! Drives the home screen, card views and the create dialog the way a user
//! would, checking what each screen shows after every step.

use {
    crate::harness::VoteCardTestHarness,
    solana_keypair::Keypair,
    solana_native_token::LAMPORTS_PER_SOL,
    std::sync::Arc,
    votecard_app::{
        card_view::{DUPLICATE_VOTE, REMOVE_SUCCESS, UNVOTE_SUCCESS, VOTE_SUCCESS},
        home::{CONNECT_WALLET_FIRST, FETCH_FAILED},
        HomeScreen, NetworkStatus, ScreenState, Toast,
    },
    votecard_client::{
        in_memory::InMemoryLedger, AccountLayout, ClientConfig, Deployment, Network,
        VoteCardClient, VoteService,
    },
};

/// Mount a home screen and connect a fresh wallet to it.
async fn connected_screen(harness: &VoteCardTestHarness) -> HomeScreen {
    let mut screen = HomeScreen::new(harness.service());
    screen.mount().await;
    screen.connect_wallet(harness.wallet()).await;
    screen
}

/// Create a card through the dialog, as the connected wallet.
async fn create_through_dialog(screen: &mut HomeScreen, title: &str) {
    screen.open_create_dialog();
    assert!(screen.create_dialog().is_open());
    let dialog = screen.create_dialog_mut();
    dialog.set_title(title);
    dialog.set_description("Allocate funds");
    screen.submit_create().await;
    assert!(!screen.create_dialog().is_open());
    assert!(screen.create_dialog().created().is_some());
}

// ═══════════════════════════════════════════════════════════════════════════
//  1. Mounting and initialization
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_first_visit_initializes_program() {
    let harness = VoteCardTestHarness::new(AccountLayout::Administered);
    let mut screen = HomeScreen::new(harness.service());

    screen.mount().await;
    assert_eq!(screen.state(), ScreenState::Uninitialized);
    assert_eq!(screen.network(), NetworkStatus::Connected(Network::Devnet));
    assert_eq!(screen.network_warning(), None);

    screen.initialize_program().await;
    assert_eq!(screen.take_alert().as_deref(), Some(CONNECT_WALLET_FIRST));

    screen.connect_wallet(harness.wallet()).await;
    assert!(screen.cards().is_empty());
    screen.initialize_program().await;
    assert_eq!(screen.alert(), None);
    assert!(screen.is_initialized());
    assert!(!screen.is_initializing());
    assert_eq!(screen.state(), ScreenState::Ready);

    // A second visit sees the program as initialized straight away.
    let mut screen = HomeScreen::new(harness.service());
    screen.mount().await;
    assert_eq!(screen.state(), ScreenState::Ready);
}

#[tokio::test]
async fn test_standalone_deployment_needs_no_initialization() {
    let harness = VoteCardTestHarness::new(AccountLayout::Standalone);
    let mut screen = connected_screen(&harness).await;
    assert!(screen.is_initialized());
    assert_eq!(screen.state(), ScreenState::Ready);

    create_through_dialog(&mut screen, "Budget 2025").await;
    assert_eq!(screen.cards().len(), 1);
}

#[tokio::test]
async fn test_off_devnet_shows_warning() {
    let ledger = InMemoryLedger::new(Deployment::default())
        .with_genesis_hash(Network::Testnet.genesis_hash().unwrap());
    let config = ClientConfig::dev_default();
    let client = Arc::new(VoteCardClient::new(Arc::new(ledger), config));

    let mut screen = HomeScreen::new(client);
    screen.mount().await;
    assert_eq!(screen.network_label(), "Testnet");
    assert_eq!(
        screen.network_warning(),
        Some("Please switch to the Devnet network")
    );
}

// ═══════════════════════════════════════════════════════════════════════════
//  2. Wallet connection
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_disconnect_clears_and_reconnect_refetches() {
    let harness = VoteCardTestHarness::initialized(AccountLayout::Administered).await;
    let mut screen = connected_screen(&harness).await;
    create_through_dialog(&mut screen, "Budget 2025").await;
    assert_eq!(screen.cards().len(), 1);

    screen.disconnect_wallet();
    assert!(screen.cards().is_empty());
    assert!(!screen.can_create());

    // Another author creates a card while this screen is disconnected.
    let other = harness.wallet();
    harness
        .client
        .create_card(&other, "Budget 2026", "Allocate funds")
        .await
        .unwrap();

    screen.connect_wallet(harness.wallet()).await;
    assert_eq!(screen.cards().len(), 2);
}

#[tokio::test]
async fn test_cards_listed_newest_first() {
    let harness = VoteCardTestHarness::initialized(AccountLayout::Administered).await;
    let mut screen = connected_screen(&harness).await;
    create_through_dialog(&mut screen, "First").await;
    create_through_dialog(&mut screen, "Second").await;
    create_through_dialog(&mut screen, "Third").await;

    let titles: Vec<_> = screen.cards().iter().map(|card| card.title.as_str()).collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_created_card_visible_despite_read_lag() {
    let harness = VoteCardTestHarness::initialized(AccountLayout::Administered).await;
    harness.ledger.set_visibility_lag(3);
    let mut screen = connected_screen(&harness).await;

    create_through_dialog(&mut screen, "Budget 2025").await;
    assert_eq!(screen.cards().len(), 1);
    assert_eq!(screen.cards()[0].title, "Budget 2025");
}

#[tokio::test]
async fn test_failed_refresh_raises_alert_and_settles() {
    let harness = VoteCardTestHarness::initialized(AccountLayout::Administered).await;
    let mut screen = connected_screen(&harness).await;
    create_through_dialog(&mut screen, "Budget 2025").await;

    harness.ledger.set_offline(true);
    screen.refresh().await;
    assert_eq!(screen.take_alert().as_deref(), Some(FETCH_FAILED));
    assert_eq!(screen.state(), ScreenState::Ready);
    // The last good snapshot stays on screen.
    assert_eq!(screen.cards().len(), 1);

    harness.ledger.set_offline(false);
    screen.refresh().await;
    assert_eq!(screen.alert(), None);
}

// ═══════════════════════════════════════════════════════════════════════════
//  3. Card actions
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_vote_unvote_remove_through_views() {
    let harness = VoteCardTestHarness::initialized(AccountLayout::Standalone).await;
    let author = harness.wallet();
    let mut author_screen = HomeScreen::new(harness.service());
    author_screen.mount().await;
    author_screen.connect_wallet(author).await;
    create_through_dialog(&mut author_screen, "Budget 2025").await;

    let mut voter_screen = connected_screen(&harness).await;
    let mut view = voter_screen.card_views().remove(0);
    assert!(!view.is_author());
    view.request_remove();
    assert!(!view.is_confirm_delete_open());

    let outcome = view.vote().await;
    assert_eq!(view.toast(), Some(&Toast::success(VOTE_SUCCESS)));
    voter_screen.apply(outcome).await;
    assert_eq!(voter_screen.cards()[0].vote_count, 1);
    assert!(voter_screen.card_views()[0].has_voted());

    let mut view = voter_screen.card_views().remove(0);
    let outcome = view.vote().await;
    assert_eq!(view.toast(), Some(&Toast::error(DUPLICATE_VOTE)));
    voter_screen.apply(outcome).await;
    assert_eq!(voter_screen.cards()[0].vote_count, 1);

    let outcome = view.unvote().await;
    assert_eq!(view.toast(), Some(&Toast::success(UNVOTE_SUCCESS)));
    voter_screen.apply(outcome).await;
    assert_eq!(voter_screen.cards()[0].vote_count, 0);

    // A non-author pushing past the hidden action is stopped by the program.
    let outcome = view.remove_confirmed().await;
    assert!(view.toast().unwrap().is_error());
    voter_screen.apply(outcome).await;
    assert_eq!(voter_screen.cards().len(), 1);

    author_screen.refresh().await;
    let mut view = author_screen.card_views().remove(0);
    assert!(view.is_author());
    view.request_remove();
    assert!(view.is_confirm_delete_open());
    view.cancel_remove();
    assert_eq!(view.confirm_remove().await, votecard_app::Outcome::Unchanged);

    view.request_remove();
    let outcome = view.confirm_remove().await;
    assert_eq!(view.toast(), Some(&Toast::success(REMOVE_SUCCESS)));
    author_screen.apply(outcome).await;
    assert!(author_screen.cards().is_empty());

    voter_screen.refresh().await;
    assert!(voter_screen.cards().is_empty());
}

#[tokio::test]
async fn test_create_dialog_errors_keep_dialog_open() {
    let harness = VoteCardTestHarness::initialized(AccountLayout::Administered).await;
    let mut screen = HomeScreen::new(harness.service());
    screen.mount().await;
    screen
        .connect_wallet(harness.funded_wallet(LAMPORTS_PER_SOL / 1_000))
        .await;

    screen.open_create_dialog();
    screen.create_dialog_mut().set_title("Budget 2025");
    screen.submit_create().await;
    assert_eq!(
        screen.create_dialog().toast(),
        Some(&Toast::error("description is required"))
    );
    assert!(screen.create_dialog().is_open());

    screen.create_dialog_mut().set_description("Allocate funds");
    screen.submit_create().await;
    assert_eq!(
        screen.create_dialog().toast(),
        Some(&Toast::error(
            "Insufficient balance, creating a vote requires 0.01 SOL"
        ))
    );
    assert!(screen.create_dialog().is_open());
    assert_eq!(screen.create_dialog().title(), "Budget 2025");
    assert!(screen.cards().is_empty());
}

#[tokio::test]
async fn test_wallet_without_funds_sees_cards() {
    let harness = VoteCardTestHarness::initialized(AccountLayout::Administered).await;
    let author = harness.wallet();
    harness
        .client
        .create_card(&author, "Budget 2025", "Allocate funds")
        .await
        .unwrap();

    // Listing needs no balance at all.
    let mut screen = HomeScreen::new(harness.service());
    screen.mount().await;
    screen
        .connect_wallet(votecard_client::WalletAdapter::new(Keypair::new()))
        .await;
    assert_eq!(screen.cards().len(), 1);
    assert_eq!(screen.alert(), None);
}
