//! Small helpers shared by module implementations.

use tracing::debug;

use gpd_core::error::AppError;
use gpd_plugin::config::{Config, defaults};
use gpd_plugin::context::Context;

/// Reads `key` as a string, falling back to the built-in default for keys
/// the host knows about.
pub fn read_str_or_default(ctx: &Context, config: Config<'_>, key: &str) -> Option<String> {
    if let Some(value) = config.get_str(ctx, key) {
        return Some(value);
    }

    debug!(key = %key, config = %config.level(), "Config has no value, using built-in default");
    defaults::builtin(key).and_then(|value| value.as_str().map(str::to_string))
}

/// Writes `text` to the context output one line at a time, stopping early
/// if the context is cancelled.
pub fn print_lines(ctx: &Context, text: &str) -> Result<(), AppError> {
    for line in text.lines() {
        ctx.check()?;
        ctx.println(line)?;
    }
    Ok(())
}
