//! Host behavior configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Export convention a host run expects from the plugin unit.
///
/// A single run drives exactly one convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// Look up `Command` and call it with the configured subject.
    Command,
    /// Look up `Types`, bulk-register it, then instantiate a module.
    #[default]
    Types,
    /// Rely on the plugin's on-load hook to register modules.
    OnLoad,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Types => write!(f, "types"),
            Self::OnLoad => write!(f, "on_load"),
        }
    }
}

/// Config generation injected into modules at `Init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigVersion {
    /// Read-only keyed config.
    #[default]
    V1,
    /// Read-write single-slot config.
    V2,
}

/// What the host does once a plugin unit is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Export convention to drive.
    #[serde(default)]
    pub convention: Convention,
    /// Module instantiated by the `types` and `on_load` conventions.
    #[serde(default = "default_module")]
    pub module: String,
    /// Name reported by the value passed to `Command`.
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Config generation handed to `Init`.
    #[serde(default)]
    pub config_version: ConfigVersion,
    /// How many times `Init` is invoked on the instantiated module.
    #[serde(default = "default_init_passes")]
    pub init_passes: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            convention: Convention::default(),
            module: default_module(),
            subject: default_subject(),
            config_version: ConfigVersion::default(),
            init_passes: default_init_passes(),
        }
    }
}

fn default_module() -> String {
    "mod_go".to_string()
}

fn default_subject() -> String {
    "Lucy".to_string()
}

fn default_init_passes() -> u32 {
    1
}
