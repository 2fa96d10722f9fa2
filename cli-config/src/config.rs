use {
    crate::{load_config_file, save_config_file},
    serde::{Deserialize, Serialize},
    solana_commitment_config::{CommitmentConfig, CommitmentLevel},
    std::{fmt, io, path::Path},
    url::Url,
    votecard_client::{id, program::DEFAULT_RPC_URL, AccountLayout, Deployment},
};

/// Contents of the configuration file.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// JSON RPC endpoint of the cluster the program is deployed on.
    pub json_rpc_url: String,
    /// Keypair file used as the connected wallet.
    pub keypair_path: String,
    /// Address of the vote-card program.
    pub program_id: String,
    /// `standalone` or `administered`.
    pub account_layout: String,
    /// `processed`, `confirmed` or `finalized`.
    pub commitment: String,
}

impl Default for Config {
    fn default() -> Self {
        let keypair_path = {
            let mut keypair_path = dirs_next::home_dir().unwrap_or_default();
            keypair_path.extend([".config", "solana", "id.json"]);
            keypair_path.to_str().unwrap_or_default().to_string()
        };

        Self {
            json_rpc_url: DEFAULT_RPC_URL.to_string(),
            keypair_path,
            program_id: id().to_string(),
            account_layout: AccountLayout::default().to_string(),
            commitment: CommitmentLevel::Confirmed.to_string(),
        }
    }
}

impl Config {
    pub fn load(config_file: &str) -> Result<Self, io::Error> {
        load_config_file(config_file)
    }

    pub fn save(&self, config_file: &str) -> Result<(), io::Error> {
        save_config_file(self, config_file)
    }

    /// Load `config_file`, falling back to defaults when it does not exist.
    pub fn load_or_default(config_file: &str) -> Result<Self, io::Error> {
        if Path::new(config_file).exists() {
            Self::load(config_file)
        } else {
            Ok(Self::default())
        }
    }
}

/// The deployment a resolved program id and account layout describe.
pub fn parse_deployment(program_id: &str, account_layout: &str) -> Result<Deployment, String> {
    Ok(Deployment {
        program_id: program_id
            .parse()
            .map_err(|_| format!("Invalid program id '{program_id}'"))?,
        layout: account_layout.parse()?,
    })
}

/// Expand a cluster moniker to its RPC URL; anything else is returned as is.
pub fn normalize_to_url_if_moniker<T: AsRef<str>>(url_or_moniker: T) -> String {
    match url_or_moniker.as_ref() {
        "m" | "mainnet-beta" => "https://api.mainnet-beta.solana.com",
        "t" | "testnet" => "https://api.testnet.solana.com",
        "d" | "devnet" => "https://api.devnet.solana.com",
        "l" | "localhost" => "http://localhost:8899",
        url => url,
    }
    .to_string()
}

/// Accepts an http(s) URL or one of the cluster monikers.
pub fn is_url_or_moniker<T: AsRef<str>>(string: T) -> Result<(), String> {
    let url = normalize_to_url_if_moniker(string);
    match Url::parse(&url) {
        Ok(url) if url.has_host() && matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(format!("'{url}' is not an http(s) URL")),
        Err(err) => Err(format!("'{url}' is not a valid URL: {err}")),
    }
}

/// Where a resolved setting came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingType {
    Explicit,
    SystemDefault,
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, ""),
            Self::SystemDefault => write!(f, "(default)"),
        }
    }
}

/// Resolves each setting from the command line, the config file and the
/// built-in default, in that order.
pub struct ConfigInput;

impl ConfigInput {
    fn first_nonempty_setting(
        settings: impl IntoIterator<Item = (SettingType, String)>,
    ) -> (SettingType, String) {
        settings
            .into_iter()
            .find(|(_, value)| !value.is_empty())
            .unwrap_or((SettingType::SystemDefault, String::new()))
    }

    pub fn compute_json_rpc_url_setting(
        json_rpc_cmd_url: &str,
        json_rpc_cfg_url: &str,
    ) -> (SettingType, String) {
        Self::first_nonempty_setting([
            (SettingType::Explicit, normalize_to_url_if_moniker(json_rpc_cmd_url)),
            (SettingType::Explicit, json_rpc_cfg_url.to_string()),
            (SettingType::SystemDefault, DEFAULT_RPC_URL.to_string()),
        ])
    }

    pub fn compute_keypair_path_setting(
        keypair_cmd_path: &str,
        keypair_cfg_path: &str,
    ) -> (SettingType, String) {
        Self::first_nonempty_setting([
            (SettingType::Explicit, keypair_cmd_path.to_string()),
            (SettingType::Explicit, keypair_cfg_path.to_string()),
            (SettingType::SystemDefault, Config::default().keypair_path),
        ])
    }

    pub fn compute_program_id_setting(
        program_id_cmd: &str,
        program_id_cfg: &str,
    ) -> (SettingType, String) {
        Self::first_nonempty_setting([
            (SettingType::Explicit, program_id_cmd.to_string()),
            (SettingType::Explicit, program_id_cfg.to_string()),
            (SettingType::SystemDefault, id().to_string()),
        ])
    }

    pub fn compute_account_layout_setting(
        layout_cmd: &str,
        layout_cfg: &str,
    ) -> (SettingType, String) {
        Self::first_nonempty_setting([
            (SettingType::Explicit, layout_cmd.to_string()),
            (SettingType::Explicit, layout_cfg.to_string()),
            (
                SettingType::SystemDefault,
                AccountLayout::default().to_string(),
            ),
        ])
    }

    /// Unset values fall back to `confirmed`; a set value must be a valid
    /// commitment level.
    pub fn compute_commitment_config(
        commitment_cmd: &str,
        commitment_cfg: &str,
    ) -> Result<(SettingType, CommitmentConfig), String> {
        let (setting_type, commitment) = Self::first_nonempty_setting([
            (SettingType::Explicit, commitment_cmd.to_string()),
            (SettingType::Explicit, commitment_cfg.to_string()),
        ]);
        if commitment.is_empty() {
            return Ok((SettingType::SystemDefault, CommitmentConfig::confirmed()));
        }
        let commitment = commitment.parse::<CommitmentLevel>().map_err(|_| {
            format!(
                "Invalid commitment '{commitment}'. Valid: processed, confirmed, finalized"
            )
        })?;
        Ok((setting_type, CommitmentConfig { commitment }))
    }
}
