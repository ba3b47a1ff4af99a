use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LarderError;
use crate::store::{StoreType, default_store_path};

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub r#type: StoreType,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. "larder_core=debug"
    pub filter: Option<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("larder").join("config.toml"))
}

/// Loads the user config. A missing file means defaults; a broken one is an error.
pub fn load_config() -> Result<Config, LarderError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config, LarderError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(err) => return Err(err.into()),
    };
    Ok(toml::from_str(&content)?)
}

/// Command-line values win over the config file, which wins over defaults.
pub fn resolve_store_config(
    config: &Config,
    cli_type: Option<StoreType>,
    cli_path: Option<PathBuf>,
) -> (StoreType, PathBuf) {
    let store_type = cli_type.unwrap_or(config.store.r#type);
    let store_path = cli_path
        .or_else(|| config.store.path.clone())
        .unwrap_or_else(default_store_path);

    (store_type, store_path)
}

pub fn log_filter(config: &Config) -> &str {
    config.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
}
