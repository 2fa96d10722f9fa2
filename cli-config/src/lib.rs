//! Loading and saving the `votecard` configuration file.
//!
//! The file is YAML and lives at `~/.config/votecard/cli/config.yml` unless a
//! path is given on the command line.

mod config;

pub use config::{
    is_url_or_moniker, normalize_to_url_if_moniker, parse_deployment, Config, ConfigInput,
    SettingType,
};
use std::{
    fs::{create_dir_all, File},
    io::{self, Write},
    path::Path,
    sync::LazyLock,
};

/// Default location of the configuration file, if a home directory exists.
pub static CONFIG_FILE: LazyLock<Option<String>> = LazyLock::new(|| {
    dirs_next::home_dir().map(|mut path| {
        path.extend([".config", "votecard", "cli", "config.yml"]);
        path.to_str().unwrap_or_default().to_string()
    })
});

/// Load a YAML file into `T`.
pub fn load_config_file<T, P>(config_file: P) -> Result<T, io::Error>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(config_file)?;
    let config = serde_yaml::from_reader(file).map_err(|err| io::Error::other(format!("{err:?}")))?;
    Ok(config)
}

/// Write `config` as YAML, creating parent directories as needed.
pub fn save_config_file<T, P>(config: &T, config_file: P) -> Result<(), io::Error>
where
    T: serde::ser::Serialize,
    P: AsRef<Path>,
{
    let serialized =
        serde_yaml::to_string(config).map_err(|err| io::Error::other(format!("{err:?}")))?;

    if let Some(outdir) = config_file.as_ref().parent() {
        create_dir_all(outdir)?;
    }
    let mut file = File::create(config_file)?;
    file.write_all(&serialized.into_bytes())?;

    Ok(())
}
