use {
    clap::{crate_description, crate_name, crate_version, ArgMatches},
    console::style,
    std::{error, fmt, sync::Arc},
    votecard_cli::{
        clap_app::get_clap_app,
        cli::{parse_args, process_command},
        settings::process_settings,
    },
    votecard_client::{RpcTransport, VoteCardClient, VoteService},
};

/// Prints the error's message rather than its debug form when `main` fails.
struct DisplayError(Box<dyn error::Error>);

impl fmt::Debug for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", style(&self.0).red())
    }
}

async fn do_main(matches: &ArgMatches<'_>) -> Result<(), Box<dyn error::Error>> {
    if let Some(output) = process_settings(matches)? {
        print!("{output}");
        return Ok(());
    }

    let config = parse_args(matches)?;
    let transport = RpcTransport::new(
        config.json_rpc_url.clone(),
        config.client_config.commitment,
    )
    .with_poll_interval(config.client_config.confirm_poll_interval);
    let service: Arc<dyn VoteService> = Arc::new(VoteCardClient::new(
        Arc::new(transport),
        config.client_config.clone(),
    ));

    let result = process_command(&config, service).await?;
    println!("{}", result.trim_end());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), DisplayError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("votecard=info"))
        .init();

    let matches = get_clap_app(crate_name!(), crate_description!(), crate_version!()).get_matches();
    do_main(&matches).await.map_err(DisplayError)
}
