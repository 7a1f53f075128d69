//! Example plugin providing the banana modules.
//!
//! Both registration strategies are exported: the `Types` table for hosts
//! that pull, and an on-load hook that pushes the same modules into the
//! host's registry when the unit is opened.

use tracing::info;

use gpd_plugin_sdk::prelude::*;

/// Config key read by every banana module.
pub const BANANAS_KEY: &str = "bananas";

/// Prints the configured lyric. Works with any config generation.
#[derive(Debug, Default)]
pub struct Go;

impl Module for Go {
    fn init(&mut self, ctx: &Context, config: Config<'_>) -> Result<(), AppError> {
        ctx.check()?;
        let lyric = read_str_or_default(ctx, config, BANANAS_KEY).unwrap_or_default();
        print_lines(ctx, &lyric)
    }
}

/// Stores a lyric, then prints whatever the config hands back. Needs a
/// writable config.
#[derive(Debug, Default)]
pub struct GoV2 {
    runs: u32,
}

impl Module for GoV2 {
    fn required_config(&self) -> ConfigLevel {
        ConfigLevel::V2
    }

    fn init(&mut self, ctx: &Context, config: Config<'_>) -> Result<(), AppError> {
        ctx.check()?;
        self.runs += 1;

        let lyric = if self.runs == 1 {
            "Yes, we have no bananas,".to_string()
        } else {
            "We have no bananas today.".to_string()
        };
        config.set(ctx, BANANAS_KEY, json!(lyric))?;

        let stored = read_str_or_default(ctx, config, BANANAS_KEY).unwrap_or_default();
        print_lines(ctx, &stored)
    }
}

/// Module table shared by both registration strategies.
pub static MODULES: TypeTable = type_table! {
    "mod_go" => Go,
    "mod_go_v2" => GoV2,
};

/// Pushes every module in [`MODULES`] into the host's registry.
pub fn on_load(registry: &ModuleRegistry) {
    registry.register("mod_go", ModuleConstructor::of::<Go>());
    registry.register("mod_go_v2", ModuleConstructor::of::<GoV2>());
    info!(modules = MODULES.len(), "Banana modules self-registered");
}

declare_plugin!();
export_types!(MODULES);
export_on_load!(on_load);
