//! Host runner: opens one plugin unit and drives the configured convention.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use gpd_core::config::AppConfig;
use gpd_core::config::host::{ConfigVersion, Convention};
use gpd_core::error::AppError;
use gpd_plugin::abi::{COMMAND_SYMBOL, TYPES_SYMBOL};
use gpd_plugin::{
    CommandShape, Config, ConfigV2, Context, ModuleRegistry, Named, PluginHandle, PluginLoader,
    SingleSlotConfig, StaticConfig, TypesShape,
};

/// Lines printed when no plugin is given.
pub const PLACEHOLDER: [&str; 2] = ["Yes, we have no bananas,", "We have no bananas today."];

/// Value handed to a `Command` export.
#[derive(Debug, Clone)]
struct Subject {
    name: String,
}

impl Named for Subject {
    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Owns the loader and the registry for one host run.
#[derive(Debug)]
pub struct Host {
    config: AppConfig,
    loader: PluginLoader,
    registry: Arc<ModuleRegistry>,
}

impl Host {
    /// A host loading native shared libraries.
    pub fn new(config: AppConfig) -> Self {
        Self::with_loader(config, PluginLoader::new())
    }

    /// A host using `loader`.
    pub fn with_loader(config: AppConfig, loader: PluginLoader) -> Self {
        Self {
            config,
            loader,
            registry: Arc::new(ModuleRegistry::new()),
        }
    }

    /// Runs the host against `plugin`, or prints the placeholder when no
    /// plugin is given.
    pub fn run(&self, ctx: &Context, plugin: Option<&Path>) -> Result<(), AppError> {
        let Some(path) = plugin else {
            for line in PLACEHOLDER {
                ctx.println(line)?;
            }
            return Ok(());
        };

        ctx.check()?;
        let convention = self.config.host.convention;
        info!(path = %path.display(), convention = %convention, "Loading plugin");

        let handle = self.loader.open(path, &self.registry)?;

        match convention {
            Convention::Command => self.run_command(&handle),
            Convention::Types => self.run_types(ctx, &handle),
            Convention::OnLoad => self.run_module(ctx),
        }
    }

    fn run_command(&self, handle: &PluginHandle) -> Result<(), AppError> {
        let command = handle
            .lookup(COMMAND_SYMBOL)?
            .assert_shape::<CommandShape>()?;

        let subject = Subject {
            name: self.config.host.subject.clone(),
        };
        debug!(subject = %subject.name, "Invoking plugin command");
        command(&subject);

        Ok(())
    }

    fn run_types(&self, ctx: &Context, handle: &PluginHandle) -> Result<(), AppError> {
        let table = handle
            .lookup(TYPES_SYMBOL)?
            .assert_shape::<TypesShape>()?;
        self.registry.register_table(table);

        self.run_module(ctx)
    }

    /// Instantiates the configured module and initializes it
    /// `init_passes` times with the configured config generation.
    fn run_module(&self, ctx: &Context) -> Result<(), AppError> {
        let host = &self.config.host;
        let mut instance = self.registry.instantiate(&host.module)?;

        match host.config_version {
            ConfigVersion::V1 => {
                let config = StaticConfig::with_defaults().with_values(
                    self.config
                        .module_config
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone())),
                );
                for _ in 0..host.init_passes {
                    ctx.check()?;
                    instance.init(ctx, Config::V1(&config))?;
                }
            }
            ConfigVersion::V2 => {
                let config = SingleSlotConfig::new();
                let mut seeds: Vec<_> = self.config.module_config.iter().collect();
                seeds.sort_by(|a, b| a.0.cmp(b.0));
                for (key, value) in seeds {
                    config.set(ctx, key, value.clone());
                }
                for _ in 0..host.init_passes {
                    ctx.check()?;
                    instance.init(ctx, Config::V2(&config))?;
                }
            }
        }

        info!(
            module = %instance.name(),
            registered = self.registry.len(),
            init_count = instance.init_count(),
            "Module run finished"
        );
        Ok(())
    }
}
