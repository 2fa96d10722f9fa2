use {
    crate::{network_info::*, output::OutputFormat, vote_card::*},
    clap::ArgMatches,
    log::*,
    solana_keypair::read_keypair_file,
    solana_pubkey::Pubkey,
    std::{error, sync::Arc},
    thiserror::Error,
    votecard_cli_config::{parse_deployment, Config, ConfigInput},
    votecard_client::{ClientConfig, VoteCardError, VoteService, WalletAdapter},
};

#[derive(Debug, PartialEq, Eq)]
pub enum CliCommand {
    // Network Commands
    Network,
    Status,
    // Vote Card Commands
    Initialize,
    ListCards,
    ShowCard {
        address: Pubkey,
    },
    CreateCard {
        title: String,
        description: String,
    },
    CastVote {
        address: Pubkey,
    },
    Unvote {
        address: Pubkey,
    },
    RemoveCard {
        address: Pubkey,
        confirm: bool,
    },
    CardAddress {
        author: Pubkey,
        title: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Bad parameter: {0}")]
    BadParameter(String),
    #[error("Command not recognized: {0}")]
    CommandNotRecognized(String),
    #[error("Keypair file not found: {0}")]
    KeypairFileNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    ClientError(#[from] VoteCardError),
    /// A blocking alert raised by a screen.
    #[error("{0}")]
    Alert(String),
    /// An error toast raised by a card or the create dialog.
    #[error("{0}")]
    Toast(String),
}

pub type ProcessResult = Result<String, Box<dyn error::Error>>;

pub struct CliConfig {
    pub command: CliCommand,
    pub json_rpc_url: String,
    pub keypair_path: String,
    /// The connected wallet; `None` when the keypair file could not be read.
    pub wallet: Option<WalletAdapter>,
    pub client_config: ClientConfig,
    pub output_format: OutputFormat,
}

impl CliConfig {
    /// The connected wallet, for commands that sign or list.
    pub fn wallet(&self) -> Result<&WalletAdapter, CliError> {
        self.wallet
            .as_ref()
            .ok_or_else(|| CliError::KeypairFileNotFound(self.keypair_path.clone()))
    }
}

/// Resolve every setting from the command line, then the config file, then
/// the built-in defaults, and connect the wallet if its keypair is readable.
pub fn parse_args(matches: &ArgMatches<'_>) -> Result<CliConfig, Box<dyn error::Error>> {
    let config = match matches.value_of("config_file") {
        Some(config_file) => Config::load_or_default(config_file)?,
        None => Config::default(),
    };
    let arg = |name: &str| matches.value_of(name).unwrap_or("");

    let (_, json_rpc_url) =
        ConfigInput::compute_json_rpc_url_setting(arg("json_rpc_url"), &config.json_rpc_url);
    let (_, keypair_path) =
        ConfigInput::compute_keypair_path_setting(arg("keypair"), &config.keypair_path);
    let (_, program_id) =
        ConfigInput::compute_program_id_setting(arg("program_id"), &config.program_id);
    let (_, account_layout) =
        ConfigInput::compute_account_layout_setting(arg("account_layout"), &config.account_layout);
    let (_, commitment) =
        ConfigInput::compute_commitment_config(arg("commitment"), &config.commitment)
            .map_err(CliError::InvalidConfig)?;

    let deployment =
        parse_deployment(&program_id, &account_layout).map_err(CliError::InvalidConfig)?;
    let wallet = match read_keypair_file(&keypair_path) {
        Ok(keypair) => Some(WalletAdapter::new(keypair)),
        Err(err) => {
            debug!("no wallet connected, failed to read {keypair_path}: {err}");
            None
        }
    };

    Ok(CliConfig {
        command: parse_command(matches)?,
        json_rpc_url,
        keypair_path,
        wallet,
        client_config: ClientConfig {
            deployment,
            commitment,
            ..ClientConfig::default()
        },
        output_format: OutputFormat::from_matches(matches, "output_format"),
    })
}

pub fn parse_command(matches: &ArgMatches<'_>) -> Result<CliCommand, Box<dyn error::Error>> {
    let response = match matches.subcommand() {
        // Network Commands
        ("network", Some(_)) => CliCommand::Network,
        ("status", Some(_)) => CliCommand::Status,
        // Vote Card Commands
        ("init", Some(_)) => CliCommand::Initialize,
        ("list", Some(_)) => CliCommand::ListCards,
        ("show", Some(matches)) => parse_show_card(matches)?,
        ("create", Some(matches)) => parse_create_card(matches)?,
        ("vote", Some(matches)) => parse_cast_vote(matches)?,
        ("unvote", Some(matches)) => parse_unvote(matches)?,
        ("remove", Some(matches)) => parse_remove_card(matches)?,
        ("address", Some(matches)) => parse_card_address(matches)?,
        ("", None) => {
            eprintln!("{}", matches.usage());
            return Err(CliError::CommandNotRecognized(
                "no subcommand given".to_string(),
            )
            .into());
        }
        (name, _) => {
            return Err(CliError::CommandNotRecognized(name.to_string()).into());
        }
    };
    Ok(response)
}

pub async fn process_command(config: &CliConfig, service: Arc<dyn VoteService>) -> ProcessResult {
    debug!("processing {:?}", config.command);
    match &config.command {
        // Network Commands
        CliCommand::Network => process_network(config, service).await,
        CliCommand::Status => process_status(config, service).await,
        // Vote Card Commands
        CliCommand::Initialize => process_initialize(config, service).await,
        CliCommand::ListCards => process_list_cards(config, service).await,
        CliCommand::ShowCard { address } => process_show_card(config, service, address).await,
        CliCommand::CreateCard { title, description } => {
            process_create_card(config, service, title, description).await
        }
        CliCommand::CastVote { address } => process_cast_vote(config, service, address).await,
        CliCommand::Unvote { address } => process_unvote(config, service, address).await,
        CliCommand::RemoveCard { address, confirm } => {
            process_remove_card(config, service, address, *confirm).await
        }
        CliCommand::CardAddress { author, title } => process_card_address(config, author, title),
    }
}
