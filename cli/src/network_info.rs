use {
    crate::cli::{CliConfig, ProcessResult},
    clap::{App, SubCommand},
    serde::{Deserialize, Serialize},
    std::{fmt, sync::Arc},
    votecard_app::HomeScreen,
    votecard_client::VoteService,
};

// ── Output Structs ──────────────────────────────────────────────────
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CliNetwork {
    pub network: String,
    pub json_rpc_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl fmt::Display for CliNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network:  {}", self.network)?;
        writeln!(f, "RPC URL:  {}", self.json_rpc_url)?;
        if let Some(warning) = &self.warning {
            writeln!(f, "Warning:  {warning}")?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CliStatus {
    #[serde(flatten)]
    pub network: CliNetwork,
    pub program_id: String,
    pub account_layout: String,
    pub initialized: bool,
    pub wallet: Option<String>,
}

impl fmt::Display for CliStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network)?;
        writeln!(f, "Program:      {}", self.program_id)?;
        writeln!(f, "Layout:       {}", self.account_layout)?;
        writeln!(
            f,
            "Initialized:  {}",
            if self.initialized { "yes" } else { "no" }
        )?;
        writeln!(
            f,
            "Wallet:       {}",
            self.wallet.as_deref().unwrap_or("(not connected)")
        )?;
        Ok(())
    }
}

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait NetworkInfoSubCommands {
    fn network_info_subcommands(self) -> Self;
}

impl NetworkInfoSubCommands for App<'_, '_> {
    fn network_info_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("network")
                .about("Identify the cluster behind the RPC endpoint"),
        )
        .subcommand(
            SubCommand::with_name("status")
                .about("Show the cluster, the program deployment and its initialization"),
        )
    }
}

// ── Command Processing ──────────────────────────────────────────────
async fn mounted_screen(service: Arc<dyn VoteService>) -> HomeScreen {
    let mut screen = HomeScreen::new(service);
    screen.mount().await;
    screen
}

fn cli_network(config: &CliConfig, screen: &HomeScreen) -> CliNetwork {
    CliNetwork {
        network: screen.network_label().to_string(),
        json_rpc_url: config.json_rpc_url.clone(),
        warning: screen.network_warning().map(str::to_string),
    }
}

pub async fn process_network(config: &CliConfig, service: Arc<dyn VoteService>) -> ProcessResult {
    let screen = mounted_screen(service).await;
    let network = cli_network(config, &screen);
    Ok(config.output_format.formatted_string(&network)?)
}

pub async fn process_status(config: &CliConfig, service: Arc<dyn VoteService>) -> ProcessResult {
    let screen = mounted_screen(service).await;
    let deployment = &config.client_config.deployment;
    let status = CliStatus {
        network: cli_network(config, &screen),
        program_id: deployment.program_id.to_string(),
        account_layout: deployment.layout.to_string(),
        initialized: screen.is_initialized(),
        wallet: config.wallet.as_ref().map(|wallet| wallet.pubkey().to_string()),
    };
    Ok(config.output_format.formatted_string(&status)?)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            cli::{process_command, CliCommand},
            output::OutputFormat,
            test_utils::{cli_config, Fixture},
        },
        solana_hash::Hash,
        votecard_client::{AccountLayout, Network},
    };

    #[tokio::test]
    async fn test_process_network_devnet() {
        let fixture = Fixture::new(AccountLayout::Administered);
        let config = cli_config(CliCommand::Network, None, &fixture);
        let output = process_command(&config, fixture.service()).await.unwrap();
        assert!(output.contains("Network:  Devnet"));
        assert!(!output.contains("Warning"));
    }

    #[tokio::test]
    async fn test_process_network_warns_off_devnet() {
        let fixture = Fixture::with_genesis_hash(Network::MainnetBeta.genesis_hash().unwrap());
        let mut config = cli_config(CliCommand::Network, None, &fixture);
        config.output_format = OutputFormat::JsonCompact;
        let output = process_command(&config, fixture.service()).await.unwrap();
        let network: CliNetwork = serde_json::from_str(&output).unwrap();
        assert_eq!(network.network, "Mainnet Beta");
        assert_eq!(
            network.warning.as_deref(),
            Some("Please switch to the Devnet network")
        );

        let fixture = Fixture::with_genesis_hash(Hash::new_unique());
        let config = cli_config(CliCommand::Network, None, &fixture);
        let output = process_command(&config, fixture.service()).await.unwrap();
        assert!(output.contains("Unknown network"));
    }

    #[tokio::test]
    async fn test_process_network_offline() {
        let fixture = Fixture::new(AccountLayout::Administered);
        fixture.ledger.set_offline(true);
        let config = cli_config(CliCommand::Network, None, &fixture);
        let output = process_command(&config, fixture.service()).await.unwrap();
        assert!(output.contains("Connection error"));
    }

    #[tokio::test]
    async fn test_process_status() {
        let fixture = Fixture::new(AccountLayout::Administered);
        let config = cli_config(CliCommand::Status, None, &fixture);
        let output = process_command(&config, fixture.service()).await.unwrap();
        assert!(output.contains("Initialized:  no"));
        assert!(output.contains("Wallet:       (not connected)"));

        let fixture = Fixture::initialized().await;
        let wallet = fixture.wallet();
        let mut config = cli_config(CliCommand::Status, Some(wallet.clone()), &fixture);
        config.output_format = OutputFormat::Json;
        let output = process_command(&config, fixture.service()).await.unwrap();
        let status: CliStatus = serde_json::from_str(&output).unwrap();
        assert!(status.initialized);
        assert_eq!(status.account_layout, "administered");
        assert_eq!(status.wallet, Some(wallet.pubkey().to_string()));
        assert_eq!(status.network.network, "Devnet");
    }
}
