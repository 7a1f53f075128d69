//! On-load hook execution.
//!
//! This is the one place the loader runs plugin code: right after a unit is
//! opened, with full host privileges and a reference to the host's module
//! registry. Plugins use it to self-register their modules.

use tracing::{debug, info};

use gpd_core::error::AppError;

use crate::abi::ON_LOAD_SYMBOL;
use crate::contract::OnLoadShape;
use crate::loader::PluginHandle;
use crate::registry::ModuleRegistry;

/// Runs the unit's on-load hook, if it exports one.
///
/// Returns whether a hook ran. A hook export of the wrong shape is a
/// `ContractViolation` and nothing runs.
pub(crate) fn run_on_load(handle: &PluginHandle, registry: &ModuleRegistry) -> Result<bool, AppError> {
    let Some(symbol) = handle.find(ON_LOAD_SYMBOL) else {
        debug!(path = %handle.path().display(), "No on-load hook exported");
        return Ok(false);
    };

    let hook = symbol.assert_shape::<OnLoadShape>()?;

    info!(
        path = %handle.path().display(),
        "Running plugin on-load hook with host privileges"
    );

    let before = registry.len();
    hook(registry);

    info!(
        path = %handle.path().display(),
        registered = registry.len().saturating_sub(before),
        "Plugin on-load hook finished"
    );

    Ok(true)
}
