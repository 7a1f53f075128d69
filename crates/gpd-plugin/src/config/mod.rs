//! Config capabilities consumed by modules at `Init`.
//!
//! Two generations coexist. [`ConfigV1`] can only read; [`ConfigV2`] adds
//! `set`. A module receives a [`Config`] handle tagged with the generation
//! the host injected, and asks it at runtime for the level it needs.

pub mod defaults;
pub mod v1;
pub mod v2;

use std::fmt;

use serde_json::Value;

use gpd_core::error::AppError;

use crate::context::Context;

pub use self::v1::StaticConfig;
pub use self::v2::SingleSlotConfig;

/// Capability level of a config value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLevel {
    /// `get` only.
    V1,
    /// `get` and `set`.
    V2,
}

impl fmt::Display for ConfigLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

/// Read-only configuration provider.
pub trait ConfigV1: Send + Sync {
    /// Returns the value for `key`, or `None` when there is no value.
    fn get(&self, ctx: &Context, key: &str) -> Option<Value>;
}

/// Read-write configuration provider. Usable anywhere a [`ConfigV1`] is.
pub trait ConfigV2: ConfigV1 {
    /// Stores `value` under `key`.
    fn set(&self, ctx: &Context, key: &str, value: Value);
}

/// A config value as handed to `Init`, tagged with its generation.
#[derive(Clone, Copy)]
pub enum Config<'a> {
    /// A read-only provider.
    V1(&'a dyn ConfigV1),
    /// A read-write provider.
    V2(&'a dyn ConfigV2),
}

impl<'a> Config<'a> {
    /// The capability level this handle provides.
    pub fn level(&self) -> ConfigLevel {
        match self {
            Self::V1(_) => ConfigLevel::V1,
            Self::V2(_) => ConfigLevel::V2,
        }
    }

    /// Fails with `UnsupportedConfig` unless this handle provides `required`.
    pub fn require(&self, required: ConfigLevel) -> Result<(), AppError> {
        let provided = self.level();
        if provided < required {
            return Err(AppError::unsupported_config(format!(
                "module requires a {required} config, got {provided}"
            )));
        }
        Ok(())
    }

    /// Reads `key`. Available on every generation.
    pub fn get(&self, ctx: &Context, key: &str) -> Option<Value> {
        match self {
            Self::V1(config) => config.get(ctx, key),
            Self::V2(config) => config.get(ctx, key),
        }
    }

    /// Reads `key` as a string, ignoring non-string values.
    pub fn get_str(&self, ctx: &Context, key: &str) -> Option<String> {
        match self.get(ctx, key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The read-write view, or `UnsupportedConfig` for a v1 handle.
    pub fn as_v2(&self) -> Result<&'a dyn ConfigV2, AppError> {
        match *self {
            Self::V2(config) => Ok(config),
            Self::V1(_) => Err(AppError::unsupported_config(
                "set requires a v2 config, got v1",
            )),
        }
    }

    /// Writes `key`. Fails with `UnsupportedConfig` on a v1 handle.
    pub fn set(&self, ctx: &Context, key: &str, value: Value) -> Result<(), AppError> {
        self.as_v2()?.set(ctx, key, value);
        Ok(())
    }
}

impl fmt::Debug for Config<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Config").field(&self.level()).finish()
    }
}
