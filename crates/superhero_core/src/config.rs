//! Store configuration shared by the CLI and HTTP entry points.
//!
//! Values come from defaults, then `SUPERHEROES_*` environment variables,
//! then explicit overrides by the caller.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SUPERHEROES_DB";
pub const ENV_ASSET_ROOT: &str = "SUPERHEROES_ASSETS";
pub const ENV_LOG_LEVEL: &str = "SUPERHEROES_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SUPERHEROES_LOG_DIR";

/// Locations of the datastore, the Asset Store and the log files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file (default: `superheroes.sqlite3`).
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Root directory of the local Asset Store (default: `storage/app/public`).
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,

    /// Log level (default: `debug` in debug builds, `info` otherwise).
    #[serde(default = "default_level")]
    pub log_level: String,

    /// Absolute log directory; logging stays off when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("superheroes.sqlite3")
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("storage/app/public")
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            asset_root: default_asset_root(),
            log_level: default_level(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Builds a config from defaults overlaid with `SUPERHEROES_*` variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from defaults overlaid with values from `lookup`.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_ASSET_ROOT) {
            config.asset_root = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value;
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(value));
        }

        config
    }
}
