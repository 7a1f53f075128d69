//! Host configuration schemas.
//!
//! The configuration is assembled by the `config` crate from an optional
//! TOML file and `GPD__`-prefixed environment variables. Every section and
//! field has a default, so an empty source set yields a usable host.

pub mod host;
pub mod logging;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::host::HostConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Default configuration file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Prefix for configuration environment variables (`GPD__HOST__MODULE=...`).
pub const ENV_PREFIX: &str = "GPD";

/// Root host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which plugin convention the host drives and how.
    #[serde(default)]
    pub host: HostConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Values seeded into the config handed to `Init`.
    #[serde(default)]
    pub module_config: HashMap<String, serde_json::Value>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// When `path` is given the file must exist; otherwise
    /// [`DEFAULT_CONFIG_FILE`] is read if present. Environment variables
    /// prefixed with `GPD__` override both.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
