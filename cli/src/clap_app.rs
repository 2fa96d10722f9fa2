use {
    crate::{
        network_info::NetworkInfoSubCommands, settings::SettingsSubCommands,
        vote_card::VoteCardSubCommands,
    },
    clap::{App, AppSettings, Arg},
    solana_clap_utils::input_validators::is_pubkey,
    votecard_cli_config::{is_url_or_moniker, CONFIG_FILE},
};

pub fn get_clap_app<'ab, 'v>(name: &str, about: &'ab str, version: &'v str) -> App<'ab, 'v> {
    App::new(name)
        .about(about)
        .version(version)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg({
            let arg = Arg::with_name("config_file")
                .short("C")
                .long("config")
                .value_name("FILEPATH")
                .takes_value(true)
                .global(true)
                .help("Configuration file to use");
            if let Some(ref config_file) = *CONFIG_FILE {
                arg.default_value(config_file)
            } else {
                arg
            }
        })
        .arg(
            Arg::with_name("json_rpc_url")
                .short("u")
                .long("url")
                .value_name("URL_OR_MONIKER")
                .takes_value(true)
                .global(true)
                .validator(is_url_or_moniker)
                .help(
                    "URL for the cluster's JSON RPC endpoint. \
                     [possible values: mainnet-beta, testnet, devnet, localhost]",
                ),
        )
        .arg(
            Arg::with_name("keypair")
                .short("k")
                .long("keypair")
                .value_name("KEYPAIR")
                .takes_value(true)
                .global(true)
                .help("Filepath of the keypair used as the connected wallet"),
        )
        .arg(
            Arg::with_name("program_id")
                .long("program-id")
                .value_name("ADDRESS")
                .takes_value(true)
                .global(true)
                .validator(is_pubkey)
                .help("Address of the vote-card program"),
        )
        .arg(
            Arg::with_name("account_layout")
                .long("account-layout")
                .value_name("LAYOUT")
                .takes_value(true)
                .global(true)
                .possible_values(&["standalone", "administered"])
                .help("Account set the deployed program expects"),
        )
        .arg(
            Arg::with_name("commitment")
                .long("commitment")
                .value_name("COMMITMENT_LEVEL")
                .takes_value(true)
                .global(true)
                .possible_values(&["processed", "confirmed", "finalized"])
                .hide_possible_values(true)
                .help(
                    "Return information at the selected commitment level \
                     [possible values: processed, confirmed, finalized]",
                ),
        )
        .arg(
            Arg::with_name("output_format")
                .long("output")
                .value_name("FORMAT")
                .takes_value(true)
                .global(true)
                .possible_values(&["json", "json-compact"])
                .help("Return information in specified output format"),
        )
        .network_info_subcommands()
        .vote_card_subcommands()
        .settings_subcommands()
}
