//! Module lifecycle: the capability every module implements and the
//! instance wrapper that tracks its state.

use std::fmt;

use tracing::debug;

use gpd_core::error::AppError;

use crate::config::{Config, ConfigLevel};
use crate::context::Context;

/// Argument capability of the `Command` export.
pub trait Named {
    /// Returns the name of the value.
    fn name(&self) -> String;
}

/// A named, constructible unit of behavior.
pub trait Module: Send + fmt::Debug {
    /// Config level this module needs. Checked before every `init`.
    fn required_config(&self) -> ConfigLevel {
        ConfigLevel::V1
    }

    /// Initializes (or re-initializes) the module.
    ///
    /// Side effects are module-defined. May be called any number of times.
    fn init(&mut self, ctx: &Context, config: Config<'_>) -> Result<(), AppError>;
}

/// Lifecycle state of a [`ModuleInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, `init` never succeeded.
    Uninitialized,
    /// `init` succeeded at least once.
    Initialized,
}

/// A module produced by the registry, owned by whoever instantiated it.
#[derive(Debug)]
pub struct ModuleInstance {
    name: String,
    module: Box<dyn Module>,
    state: LifecycleState,
    init_count: u32,
}

impl ModuleInstance {
    /// Wraps a freshly constructed module.
    pub fn new(name: impl Into<String>, module: Box<dyn Module>) -> Self {
        Self {
            name: name.into(),
            module,
            state: LifecycleState::Uninitialized,
            init_count: 0,
        }
    }

    /// Name the module was instantiated under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Number of successful `init` calls.
    pub fn init_count(&self) -> u32 {
        self.init_count
    }

    /// Config level the wrapped module needs.
    pub fn required_config(&self) -> ConfigLevel {
        self.module.required_config()
    }

    /// Runs `init` on the module.
    ///
    /// The config layer rejects an insufficient config with
    /// `UnsupportedConfig` before any module code runs. A failed `init`
    /// leaves the state unchanged.
    pub fn init(&mut self, ctx: &Context, config: Config<'_>) -> Result<(), AppError> {
        config.require(self.module.required_config())?;

        self.module.init(ctx, config)?;

        self.state = LifecycleState::Initialized;
        self.init_count += 1;

        debug!(
            module = %self.name,
            config = %config.level(),
            init_count = self.init_count,
            "Module initialized"
        );

        Ok(())
    }

    /// Unwraps the module.
    pub fn into_inner(self) -> Box<dyn Module> {
        self.module
    }
}
