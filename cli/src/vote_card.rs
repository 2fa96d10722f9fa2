use {
    crate::cli::{CliCommand, CliConfig, CliError, ProcessResult},
    clap::{App, Arg, ArgMatches, SubCommand},
    console::style,
    log::*,
    serde::{Deserialize, Serialize},
    solana_clap_utils::{input_parsers::pubkey_of, input_validators::is_pubkey},
    solana_pubkey::Pubkey,
    std::{
        fmt,
        sync::Arc,
        time::{Duration, UNIX_EPOCH},
    },
    votecard_app::{HomeScreen, Toast, VoteCardView},
    votecard_client::{
        pda::find_vote_card_address,
        program::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN},
        ValidationError, VoteCardError, VoteService,
    },
};

// ── Output Structs ──────────────────────────────────────────────────
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CliVoteCard {
    pub address: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub vote_count: u64,
    pub create_time: i64,
    pub voters: Vec<String>,
    /// Set only when a wallet is connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_voted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_author: Option<bool>,
}

impl CliVoteCard {
    fn from_view(view: &VoteCardView, connected: bool) -> Self {
        let card = view.card();
        Self {
            address: card.address.to_string(),
            title: card.title.clone(),
            description: card.description.clone(),
            author: card.author.to_string(),
            vote_count: card.vote_count,
            create_time: card.create_time,
            voters: card.voters.iter().map(ToString::to_string).collect(),
            has_voted: connected.then(|| view.has_voted()),
            is_author: connected.then(|| view.is_author()),
        }
    }
}

fn format_create_time(create_time: i64) -> String {
    u64::try_from(create_time)
        .ok()
        .and_then(|secs| UNIX_EPOCH.checked_add(Duration::from_secs(secs)))
        .map(|time| humantime::format_rfc3339_seconds(time).to_string())
        .unwrap_or_else(|| create_time.to_string())
}

impl fmt::Display for CliVoteCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", style(&self.title).bold())?;
        writeln!(f, "  Address:      {}", self.address)?;
        if self.is_author == Some(true) {
            writeln!(f, "  Author:       {} (you)", self.author)?;
        } else {
            writeln!(f, "  Author:       {}", self.author)?;
        }
        writeln!(f, "  Description:  {}", self.description)?;
        writeln!(f, "  Votes:        {}", self.vote_count)?;
        writeln!(f, "  Created:      {}", format_create_time(self.create_time))?;
        if let Some(has_voted) = self.has_voted {
            writeln!(f, "  Voted:        {}", if has_voted { "yes" } else { "no" })?;
        }
        for (index, voter) in self.voters.iter().enumerate() {
            let label = if index == 0 { "Voters:" } else { "" };
            writeln!(f, "  {label:<13} {voter}")?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CliVoteCards {
    pub cards: Vec<CliVoteCard>,
}

impl fmt::Display for CliVoteCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cards.is_empty() {
            return writeln!(f, "No vote cards yet");
        }
        for (index, card) in self.cards.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

/// Result of a write: the toast it raised and the card as it now stands.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CliCardAction {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CliVoteCard>,
}

impl fmt::Display for CliCardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", style(Toast::success(self.message.as_str())).green())?;
        if let Some(card) = &self.card {
            writeln!(f)?;
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CliCardAddress {
    pub address: String,
    pub bump: u8,
}

impl fmt::Display for CliCardAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Address:  {}", self.address)?;
        writeln!(f, "Bump:     {}", self.bump)
    }
}

// ── Subcommand Definition (clap) ────────────────────────────────────
fn card_address_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("address")
        .index(1)
        .value_name("CARD_ADDRESS")
        .takes_value(true)
        .required(true)
        .validator(is_pubkey)
        .help("Address of the vote card")
}

pub trait VoteCardSubCommands {
    fn vote_card_subcommands(self) -> Self;
}

impl VoteCardSubCommands for App<'_, '_> {
    fn vote_card_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("init")
                .about("Create the program's admin record; needed once per deployment"),
        )
        .subcommand(SubCommand::with_name("list").about("List vote cards, newest first"))
        .subcommand(
            SubCommand::with_name("show")
                .about("Show a single vote card")
                .arg(card_address_arg()),
        )
        .subcommand(
            SubCommand::with_name("create")
                .about("Create a vote card; costs 0.01 SOL")
                .arg(
                    Arg::with_name("title")
                        .long("title")
                        .value_name("TITLE")
                        .takes_value(true)
                        .required(true)
                        .help("Card title, at most 50 characters and 32 bytes"),
                )
                .arg(
                    Arg::with_name("description")
                        .long("description")
                        .value_name("TEXT")
                        .takes_value(true)
                        .required(true)
                        .help("Card description, at most 280 characters"),
                ),
        )
        .subcommand(
            SubCommand::with_name("vote")
                .about("Vote on a card; costs 0.001 SOL, refunded on unvote")
                .arg(card_address_arg()),
        )
        .subcommand(
            SubCommand::with_name("unvote")
                .about("Withdraw your vote and its fee")
                .arg(card_address_arg()),
        )
        .subcommand(
            SubCommand::with_name("remove")
                .about("Delete a card you authored and reclaim its rent")
                .arg(card_address_arg())
                .arg(
                    Arg::with_name("confirm")
                        .long("confirm")
                        .takes_value(false)
                        .help("Delete without asking again"),
                ),
        )
        .subcommand(
            SubCommand::with_name("address")
                .about("Derive the address of the card an author creates with a title")
                .arg(
                    Arg::with_name("author")
                        .long("author")
                        .value_name("AUTHOR_ADDRESS")
                        .takes_value(true)
                        .required(true)
                        .validator(is_pubkey)
                        .help("Author's wallet address"),
                )
                .arg(
                    Arg::with_name("title")
                        .long("title")
                        .value_name("TITLE")
                        .takes_value(true)
                        .required(true)
                        .help("Card title"),
                ),
        )
    }
}

// ── Argument Parsing ────────────────────────────────────────────────
fn required_pubkey(matches: &ArgMatches<'_>, name: &str) -> Result<Pubkey, CliError> {
    pubkey_of(matches, name).ok_or_else(|| CliError::BadParameter(format!("Invalid {name}")))
}

fn required_value(matches: &ArgMatches<'_>, name: &str) -> Result<String, CliError> {
    matches
        .value_of(name)
        .map(str::to_string)
        .ok_or_else(|| CliError::BadParameter(format!("Missing {name}")))
}

pub fn parse_show_card(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    Ok(CliCommand::ShowCard {
        address: required_pubkey(matches, "address")?,
    })
}

pub fn parse_create_card(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    Ok(CliCommand::CreateCard {
        title: required_value(matches, "title")?,
        description: required_value(matches, "description")?,
    })
}

pub fn parse_cast_vote(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    Ok(CliCommand::CastVote {
        address: required_pubkey(matches, "address")?,
    })
}

pub fn parse_unvote(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    Ok(CliCommand::Unvote {
        address: required_pubkey(matches, "address")?,
    })
}

pub fn parse_remove_card(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    Ok(CliCommand::RemoveCard {
        address: required_pubkey(matches, "address")?,
        confirm: matches.is_present("confirm"),
    })
}

pub fn parse_card_address(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    Ok(CliCommand::CardAddress {
        author: required_pubkey(matches, "author")?,
        title: required_value(matches, "title")?,
    })
}

// ── Command Processing ──────────────────────────────────────────────
/// Mount the home screen and connect the configured wallet, which loads the
/// card list.
async fn connected_screen(
    config: &CliConfig,
    service: Arc<dyn VoteService>,
) -> Result<HomeScreen, CliError> {
    let wallet = config.wallet()?.clone();
    let mut screen = HomeScreen::new(service);
    screen.mount().await;
    if let Some(warning) = screen.network_warning() {
        warn!("{}: {warning}", screen.network_label());
    }
    screen.connect_wallet(wallet).await;
    match screen.take_alert() {
        Some(alert) => Err(CliError::Alert(alert)),
        None => Ok(screen),
    }
}

fn find_view(screen: &HomeScreen, address: &Pubkey) -> Result<VoteCardView, CliError> {
    if !screen.is_initialized() {
        return Err(VoteCardError::InitializationRequired.into());
    }
    screen
        .card_views()
        .into_iter()
        .find(|view| view.card().address == *address)
        .ok_or_else(|| VoteCardError::AccountNotFound(*address).into())
}

/// Error toasts fail the command; success toasts become its message.
fn toast_message(toast: Option<&Toast>) -> Result<String, CliError> {
    match toast {
        Some(toast) if toast.is_error() => Err(CliError::Toast(toast.message.clone())),
        Some(toast) => Ok(toast.message.clone()),
        None => Ok(String::new()),
    }
}

/// The card at `address` after the screen's last refresh.
fn refreshed_card(screen: &mut HomeScreen, address: &Pubkey) -> Option<CliVoteCard> {
    if let Some(alert) = screen.take_alert() {
        warn!("{alert}");
    }
    screen
        .card_views()
        .iter()
        .find(|view| view.card().address == *address)
        .map(|view| CliVoteCard::from_view(view, true))
}

pub async fn process_initialize(
    config: &CliConfig,
    service: Arc<dyn VoteService>,
) -> ProcessResult {
    let wallet = config.wallet()?.clone();
    let mut screen = HomeScreen::new(service);
    screen.mount().await;
    if screen.is_initialized() {
        return Ok("Program is already initialized".to_string());
    }
    screen.connect_wallet(wallet).await;
    if let Some(alert) = screen.take_alert() {
        debug!("ignoring before initialization: {alert}");
    }

    screen.initialize_program().await;
    match screen.take_alert() {
        Some(alert) => Err(CliError::Alert(alert).into()),
        None => Ok("Program initialized".to_string()),
    }
}

pub async fn process_list_cards(
    config: &CliConfig,
    service: Arc<dyn VoteService>,
) -> ProcessResult {
    let screen = connected_screen(config, service).await?;
    if !screen.is_initialized() {
        return Err(CliError::from(VoteCardError::InitializationRequired).into());
    }
    let cards = CliVoteCards {
        cards: screen
            .card_views()
            .iter()
            .map(|view| CliVoteCard::from_view(view, true))
            .collect(),
    };
    Ok(config.output_format.formatted_string(&cards)?)
}

pub async fn process_show_card(
    config: &CliConfig,
    service: Arc<dyn VoteService>,
    address: &Pubkey,
) -> ProcessResult {
    let card = service
        .fetch_card(address)
        .await?
        .ok_or(VoteCardError::AccountNotFound(*address))?;
    let view = VoteCardView::new(service, card, config.wallet.clone());
    let card = CliVoteCard::from_view(&view, config.wallet.is_some());
    Ok(config.output_format.formatted_string(&card)?)
}

pub async fn process_create_card(
    config: &CliConfig,
    service: Arc<dyn VoteService>,
    title: &str,
    description: &str,
) -> ProcessResult {
    let mut screen = connected_screen(config, service).await?;
    screen.open_create_dialog();
    let dialog = screen.create_dialog_mut();
    dialog.set_title(title);
    dialog.set_description(description);
    // The dialog truncates to its limits; an argument must not be shortened
    // behind the user's back.
    if dialog.title() != title {
        return Err(CliError::from(VoteCardError::from(ValidationError::TitleTooLong)).into());
    }
    if dialog.description() != description {
        return Err(
            CliError::from(VoteCardError::from(ValidationError::DescriptionTooLong)).into(),
        );
    }
    debug!(
        "creating card of {}/{MAX_TITLE_LEN} and {}/{MAX_DESCRIPTION_LEN} characters",
        title.chars().count(),
        description.chars().count()
    );

    screen.submit_create().await;
    let dialog = screen.create_dialog_mut();
    if let Some(alert) = dialog.take_alert() {
        return Err(CliError::Alert(alert).into());
    }
    toast_message(dialog.toast())?;
    let address = dialog
        .created()
        .ok_or_else(|| CliError::Alert("Failed to create vote".to_string()))?;

    let action = CliCardAction {
        message: "Vote card created".to_string(),
        address: Some(address.to_string()),
        card: refreshed_card(&mut screen, &address),
    };
    Ok(config.output_format.formatted_string(&action)?)
}

pub async fn process_cast_vote(
    config: &CliConfig,
    service: Arc<dyn VoteService>,
    address: &Pubkey,
) -> ProcessResult {
    let mut screen = connected_screen(config, service).await?;
    let mut view = find_view(&screen, address)?;
    let outcome = view.vote().await;
    let message = toast_message(view.toast())?;
    screen.apply(outcome).await;

    let action = CliCardAction {
        message,
        address: None,
        card: refreshed_card(&mut screen, address),
    };
    Ok(config.output_format.formatted_string(&action)?)
}

pub async fn process_unvote(
    config: &CliConfig,
    service: Arc<dyn VoteService>,
    address: &Pubkey,
) -> ProcessResult {
    let mut screen = connected_screen(config, service).await?;
    let mut view = find_view(&screen, address)?;
    let outcome = view.unvote().await;
    let message = toast_message(view.toast())?;
    screen.apply(outcome).await;

    let action = CliCardAction {
        message,
        address: None,
        card: refreshed_card(&mut screen, address),
    };
    Ok(config.output_format.formatted_string(&action)?)
}

pub async fn process_remove_card(
    config: &CliConfig,
    service: Arc<dyn VoteService>,
    address: &Pubkey,
    confirm: bool,
) -> ProcessResult {
    let mut screen = connected_screen(config, service).await?;
    let mut view = find_view(&screen, address)?;

    let outcome = if confirm {
        // Non-authors are not stopped here; the program rejects them.
        view.remove_confirmed().await
    } else {
        view.request_remove();
        if !view.is_confirm_delete_open() {
            return Err(CliError::from(VoteCardError::Unauthorized).into());
        }
        view.cancel_remove();
        return Ok(format!(
            "Deleting \"{}\" cannot be undone. Run again with --confirm to delete it.",
            view.card().title
        ));
    };
    let message = toast_message(view.toast())?;
    screen.apply(outcome).await;
    if let Some(alert) = screen.take_alert() {
        warn!("{alert}");
    }

    let action = CliCardAction {
        message,
        address: None,
        card: None,
    };
    Ok(config.output_format.formatted_string(&action)?)
}

pub fn process_card_address(config: &CliConfig, author: &Pubkey, title: &str) -> ProcessResult {
    let (address, bump) =
        find_vote_card_address(&config.client_config.deployment.program_id, author, title)
            .map_err(|err| CliError::BadParameter(err.to_string()))?;
    let address = CliCardAddress {
        address: address.to_string(),
        bump,
    };
    Ok(config.output_format.formatted_string(&address)?)
}
