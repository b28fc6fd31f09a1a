//! Configuration for sqlauth.
//!
//! Settings are read once at startup from an optional `sqlauth.toml` in the
//! working directory, then overridden by `SQLAUTH_*` environment variables
//! (`SQLAUTH_CONNECTION_STRING`, `SQLAUTH_LOG_FILE`). The resulting value is
//! passed explicitly to whatever needs it.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

const CONFIG_FILE: &str = "sqlauth";
const ENV_PREFIX: &str = "SQLAUTH";
const DEFAULT_LOG_FILE: &str = "sqlauth.log";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// SQLite path or `file:` URI. Empty when unset, in which case opening a
    /// connection fails.
    #[serde(default)]
    pub connection_string: String,

    /// Where the terminal front-end writes its log.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Settings {
    /// Loads `sqlauth.toml` (if present) with environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Parses settings from TOML text, without environment overrides.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn log_file(&self) -> &str {
        self.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE)
    }
}
