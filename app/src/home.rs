//! The home screen: network banner, initialization gate and card list.

use {
    crate::{
        card_view::VoteCardView,
        create_dialog::CreateVoteDialog,
        toast::Outcome,
    },
    log::*,
    serde::Serialize,
    std::sync::Arc,
    votecard_client::{state::sort_newest_first, Network, VoteCard, VoteService, WalletAdapter},
};

pub const CONNECTION_ERROR: &str = "Connection error";
pub const NOT_CONNECTED: &str = "Not connected";
pub const SWITCH_TO_DEVNET: &str = "Please switch to the Devnet network";
pub const FETCH_FAILED: &str = "Failed to fetch vote cards, check the network connection and retry";
pub const CONNECT_WALLET_FIRST: &str = "Please connect a wallet first";
pub const INITIALIZE_FAILED: &str = "Failed to initialize the program";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenState {
    Unmounted,
    CheckingNetwork,
    CheckingInit,
    Uninitialized,
    Loading,
    Ready,
}

/// Result of the network identity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    NotConnected,
    Connected(Network),
    ConnectionError,
}

impl NetworkStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotConnected => NOT_CONNECTED,
            Self::Connected(network) => network.label(),
            Self::ConnectionError => CONNECTION_ERROR,
        }
    }
}

/// Controller of the home screen.
///
/// Failures never leave the screen stuck: they raise an alert and the state
/// settles back to `Ready` or `Uninitialized`.
pub struct HomeScreen {
    service: Arc<dyn VoteService>,
    state: ScreenState,
    network: NetworkStatus,
    is_initialized: bool,
    is_initializing: bool,
    wallet: Option<WalletAdapter>,
    cards: Vec<VoteCard>,
    create_dialog: CreateVoteDialog,
    alert: Option<String>,
}

impl HomeScreen {
    pub fn new(service: Arc<dyn VoteService>) -> Self {
        Self {
            create_dialog: CreateVoteDialog::new(Arc::clone(&service)),
            service,
            state: ScreenState::Unmounted,
            network: NetworkStatus::NotConnected,
            is_initialized: false,
            is_initializing: false,
            wallet: None,
            cards: Vec::new(),
            alert: None,
        }
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn network(&self) -> NetworkStatus {
        self.network
    }

    pub fn network_label(&self) -> &'static str {
        self.network.label()
    }

    /// Shown next to the label whenever the endpoint is not Devnet.
    pub fn network_warning(&self) -> Option<&'static str> {
        match self.network {
            NetworkStatus::Connected(network) if network.is_supported() => None,
            _ => Some(SWITCH_TO_DEVNET),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn is_initializing(&self) -> bool {
        self.is_initializing
    }

    pub fn is_loading(&self) -> bool {
        self.state == ScreenState::Loading
    }

    pub fn wallet(&self) -> Option<&WalletAdapter> {
        self.wallet.as_ref()
    }

    /// Cards to render; empty until the program is initialized.
    pub fn cards(&self) -> &[VoteCard] {
        if self.is_initialized {
            &self.cards
        } else {
            &[]
        }
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    fn settle(&mut self) {
        self.state = if self.is_initialized {
            ScreenState::Ready
        } else {
            ScreenState::Uninitialized
        };
    }

    /// Probe the network, then the initialization flag, then load cards when
    /// a wallet is already connected.
    pub async fn mount(&mut self) {
        self.state = ScreenState::CheckingNetwork;
        self.network = match self.service.network().await {
            Ok(network) => NetworkStatus::Connected(network),
            Err(err) => {
                warn!("failed to identify network: {err}");
                NetworkStatus::ConnectionError
            }
        };

        self.state = ScreenState::CheckingInit;
        self.is_initialized = self.service.is_initialized().await;
        self.settle();

        if self.wallet.is_some() {
            self.refresh().await;
        }
    }

    pub fn unmount(&mut self) {
        self.state = ScreenState::Unmounted;
        self.cards.clear();
        self.alert = None;
    }

    /// Every connect starts from an empty list and refetches.
    pub async fn connect_wallet(&mut self, wallet: WalletAdapter) {
        debug!("wallet {} connected", wallet.pubkey());
        self.wallet = Some(wallet);
        self.cards.clear();
        if self.state != ScreenState::Unmounted {
            self.refresh().await;
        }
    }

    pub fn disconnect_wallet(&mut self) {
        if let Some(wallet) = self.wallet.take() {
            debug!("wallet {} disconnected", wallet.pubkey());
        }
        self.cards.clear();
        self.create_dialog.close();
    }

    /// Replace the card list with a fresh snapshot, newest first.
    pub async fn refresh(&mut self) {
        let Some(wallet) = self.wallet.clone() else {
            return;
        };
        self.state = ScreenState::Loading;
        match self.service.list_cards(&wallet).await {
            Ok(mut cards) => {
                sort_newest_first(&mut cards);
                self.cards = cards;
            }
            Err(err) => {
                warn!("failed to fetch vote cards: {err}");
                self.alert = Some(FETCH_FAILED.to_string());
            }
        }
        self.settle();
    }

    pub async fn initialize_program(&mut self) {
        let Some(wallet) = self.wallet.clone() else {
            self.alert = Some(CONNECT_WALLET_FIRST.to_string());
            return;
        };
        self.is_initializing = true;
        match self.service.initialize(&wallet).await {
            Ok(signature) => {
                info!("program initialized: {signature}");
                self.is_initialized = true;
            }
            Err(err) => {
                warn!("failed to initialize program: {err}");
                self.alert = Some(INITIALIZE_FAILED.to_string());
            }
        }
        self.is_initializing = false;
        self.settle();
    }

    /// Creation is offered once a wallet is connected.
    pub fn can_create(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn open_create_dialog(&mut self) {
        if self.can_create() {
            self.create_dialog.open();
        }
    }

    pub fn create_dialog(&self) -> &CreateVoteDialog {
        &self.create_dialog
    }

    pub fn create_dialog_mut(&mut self) -> &mut CreateVoteDialog {
        &mut self.create_dialog
    }

    /// Submit the creation dialog and refresh on success.
    pub async fn submit_create(&mut self) {
        let outcome = self.create_dialog.submit(self.wallet.as_ref()).await;
        self.apply(outcome).await;
    }

    /// One view per visible card, bound to the connected wallet.
    pub fn card_views(&self) -> Vec<VoteCardView> {
        self.cards()
            .iter()
            .map(|card| {
                VoteCardView::new(Arc::clone(&self.service), card.clone(), self.wallet.clone())
            })
            .collect()
    }

    pub async fn apply(&mut self, outcome: Outcome) {
        if outcome.needs_refresh() {
            self.refresh().await;
        }
    }
}
