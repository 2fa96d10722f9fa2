use {
    crate::{
        cli::CliError,
        output::{writeln_name_value, writeln_name_value_or, OutputFormat},
    },
    clap::{App, AppSettings, Arg, ArgGroup, ArgMatches, SubCommand},
    serde::Serialize,
    std::{error, fmt},
    votecard_cli_config::{normalize_to_url_if_moniker, Config, ConfigInput, SettingType},
};

const SETTING_NAMES: &[&str] = &[
    "json_rpc_url",
    "keypair",
    "program_id",
    "account_layout",
    "commitment",
];

// ── Output Structs ──────────────────────────────────────────────────
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliSetting {
    pub name: &'static str,
    pub value: String,
    #[serde(skip)]
    label: &'static str,
    #[serde(skip)]
    setting_type: SettingType,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliSettings {
    pub config_file: String,
    pub settings: Vec<CliSetting>,
}

impl CliSettings {
    fn resolve(config_file: &str, config: &Config) -> Self {
        let setting = |name, label, (setting_type, value)| CliSetting {
            name,
            value,
            label,
            setting_type,
        };
        // An invalid level is shown as written so it can be corrected.
        let commitment = ConfigInput::compute_commitment_config("", &config.commitment)
            .map(|(setting_type, commitment)| (setting_type, commitment.commitment.to_string()))
            .unwrap_or_else(|_| (SettingType::Explicit, config.commitment.clone()));
        Self {
            config_file: config_file.to_string(),
            settings: vec![
                setting(
                    "json_rpc_url",
                    "RPC URL:",
                    ConfigInput::compute_json_rpc_url_setting("", &config.json_rpc_url),
                ),
                setting(
                    "keypair",
                    "Keypair Path:",
                    ConfigInput::compute_keypair_path_setting("", &config.keypair_path),
                ),
                setting(
                    "program_id",
                    "Program Id:",
                    ConfigInput::compute_program_id_setting("", &config.program_id),
                ),
                setting(
                    "account_layout",
                    "Account Layout:",
                    ConfigInput::compute_account_layout_setting("", &config.account_layout),
                ),
                setting(
                    "commitment",
                    "Commitment:",
                    commitment,
                ),
            ],
        }
    }

    fn only(mut self, name: &str) -> Self {
        self.settings.retain(|setting| setting.name == name);
        self
    }
}

impl fmt::Display for CliSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln_name_value(f, "Config File:", &self.config_file)?;
        for setting in &self.settings {
            writeln_name_value_or(f, setting.label, &setting.value, setting.setting_type)?;
        }
        Ok(())
    }
}

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait SettingsSubCommands {
    fn settings_subcommands(self) -> Self;
}

impl SettingsSubCommands for App<'_, '_> {
    fn settings_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("config")
                .about("votecard command-line tool configuration settings")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(
                    SubCommand::with_name("get")
                        .about("Get current config settings")
                        .arg(
                            Arg::with_name("specific_setting")
                                .index(1)
                                .value_name("CONFIG_FIELD")
                                .takes_value(true)
                                .possible_values(SETTING_NAMES)
                                .help("Return a specific config setting"),
                        ),
                )
                .subcommand(
                    SubCommand::with_name("set")
                        .about("Set a config setting")
                        .group(
                            ArgGroup::with_name("config_settings")
                                .args(SETTING_NAMES)
                                .multiple(true)
                                .required(true),
                        ),
                ),
        )
    }
}

// ── Command Processing ──────────────────────────────────────────────
/// Handle `config get` and `config set`. Returns `None` for every other
/// command, which needs a cluster connection.
pub fn process_settings(matches: &ArgMatches<'_>) -> Result<Option<String>, Box<dyn error::Error>> {
    let ("config", Some(matches)) = matches.subcommand() else {
        return Ok(None);
    };
    let config_file = matches.value_of("config_file").ok_or_else(|| {
        CliError::InvalidConfig(
            "No config file found. Either provide the `--config` arg or ensure home directory \
             exists to use the default config location"
                .to_string(),
        )
    })?;
    let mut config = Config::load_or_default(config_file)?;
    let output_format = OutputFormat::from_matches(matches, "output_format");

    let settings = match matches.subcommand() {
        ("get", Some(subcommand_matches)) => {
            let settings = CliSettings::resolve(config_file, &config);
            match subcommand_matches.value_of("specific_setting") {
                Some(name) => settings.only(name),
                None => settings,
            }
        }
        ("set", Some(subcommand_matches)) => {
            if let Some(url) = subcommand_matches.value_of("json_rpc_url") {
                config.json_rpc_url = normalize_to_url_if_moniker(url);
            }
            if let Some(keypair) = subcommand_matches.value_of("keypair") {
                config.keypair_path = keypair.to_string();
            }
            if let Some(program_id) = subcommand_matches.value_of("program_id") {
                config.program_id = program_id.to_string();
            }
            if let Some(layout) = subcommand_matches.value_of("account_layout") {
                config.account_layout = layout.to_string();
            }
            if let Some(commitment) = subcommand_matches.value_of("commitment") {
                config.commitment = commitment.to_string();
            }
            config.save(config_file)?;
            CliSettings::resolve(config_file, &config)
        }
        _ => unreachable!(),
    };
    Ok(Some(output_format.formatted_string(&settings)?))
}

#[cfg(test)]
mod tests {
    use {
        super::*, crate::clap_app::get_clap_app, serde_json::Value, tempfile::TempDir,
        votecard_client::program::DEFAULT_RPC_URL,
    };

    fn run(args: &[&str]) -> Option<String> {
        let matches = get_clap_app("test", "desc", "version").get_matches_from(args.iter().copied());
        process_settings(&matches).unwrap()
    }

    #[test]
    fn test_settings_ignores_other_commands() {
        assert_eq!(run(&["test", "list"]), None);
    }

    #[test]
    fn test_settings_get_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        let path = path.to_str().unwrap();

        let output = run(&["test", "config", "get", "--config", path, "--output", "json"]).unwrap();
        let output: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(output["configFile"], path);
        assert_eq!(output["settings"][0]["name"], "json_rpc_url");
        assert_eq!(output["settings"][0]["value"], DEFAULT_RPC_URL);
        assert_eq!(output["settings"][3]["value"], "administered");
        assert_eq!(output["settings"][4]["value"], "confirmed");

        // Reading does not create the file.
        assert!(!dir.path().join("config.yml").exists());
    }

    #[test]
    fn test_settings_set_then_get() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cli").join("config.yml");
        let path = path.to_str().unwrap();

        run(&[
            "test",
            "config",
            "set",
            "--url",
            "localhost",
            "--account-layout",
            "standalone",
            "--config",
            path,
        ])
        .unwrap();
        let config = Config::load(path).unwrap();
        assert_eq!(config.json_rpc_url, "http://localhost:8899");
        assert_eq!(config.account_layout, "standalone");
        assert_eq!(config.commitment, "confirmed");

        let output = run(&[
            "test",
            "config",
            "get",
            "account_layout",
            "--config",
            path,
            "--output",
            "json-compact",
        ])
        .unwrap();
        let output: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(output["settings"].as_array().unwrap().len(), 1);
        assert_eq!(output["settings"][0]["value"], "standalone");
    }

    #[test]
    fn test_settings_get_shows_invalid_commitment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        let path = path.to_str().unwrap();
        Config {
            commitment: "fast".to_string(),
            ..Config::default()
        }
        .save(path)
        .unwrap();

        let output = run(&[
            "test", "config", "get", "commitment", "--config", path, "--output", "json",
        ])
        .unwrap();
        let output: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(output["settings"][0]["value"], "fast");
    }

    #[test]
    fn test_settings_set_requires_a_setting() {
        let result = get_clap_app("test", "desc", "version")
            .get_matches_from_safe(vec!["test", "config", "set"]);
        assert!(result.is_err());
    }
}
