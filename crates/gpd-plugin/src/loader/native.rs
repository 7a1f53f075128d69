//! Native shared-library units, opened with `libloading`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;

use gpd_core::error::{AppError, ErrorKind};

use super::{PluginUnit, UnitOpener};
use crate::abi::{BUILD_TAG_MAGIC, BUILD_TAG_SYMBOL, BuildTag, Exported, classify_export};

/// Opens `.so` / `.dll` / `.dylib` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeOpener;

impl UnitOpener for NativeOpener {
    fn open_unit(&self, path: &Path) -> Result<Arc<dyn PluginUnit>, AppError> {
        // SAFETY: opening a library runs its initializers. Plugin units come
        // from the same trusted build as the host.
        let library = unsafe { Library::new(path) }.map_err(|e| {
            AppError::with_source(
                ErrorKind::PluginOpenFailed,
                format!("{}: {e}", path.display()),
                e,
            )
        })?;

        // Units are never unloaded; leaking keeps every symbol address valid
        // for the rest of the process.
        let library: &'static Library = Box::leak(Box::new(library));

        Ok(Arc::new(NativeUnit {
            path: path.to_path_buf(),
            library,
        }))
    }
}

/// A shared library opened for the lifetime of the process.
#[derive(Debug)]
pub struct NativeUnit {
    /// Path the library was opened from.
    path: PathBuf,
    /// The leaked library.
    library: &'static Library,
}

impl NativeUnit {
    /// Address of the data symbol `name`, if present and non-null.
    fn symbol_address(&self, name: &str) -> Option<*const u8> {
        // SAFETY: only the symbol's address is taken here; nothing behind it
        // is read.
        let symbol = unsafe { self.library.get::<*const u8>(name.as_bytes()) }.ok()?;
        let ptr: *const u8 = *symbol;
        (!ptr.is_null()).then_some(ptr)
    }
}

impl PluginUnit for NativeUnit {
    fn location(&self) -> &Path {
        &self.path
    }

    fn build_tag(&self) -> Result<Option<BuildTag>, AppError> {
        let Some(ptr) = self.symbol_address(BUILD_TAG_SYMBOL) else {
            return Ok(None);
        };
        // SAFETY: a data symbol holds at least one word; read unaligned so
        // a foreign symbol's alignment does not matter.
        let header = unsafe { ptr.cast::<u64>().read_unaligned() };
        if header != BUILD_TAG_MAGIC {
            return Err(AppError::plugin_open_failed(format!(
                "{}: {BUILD_TAG_SYMBOL} is not a gpd build tag (header {header:#018x})",
                self.path.display()
            )));
        }
        // SAFETY: the header matches, so the symbol was emitted by
        // `declare_plugin!`; the library is leaked so the address stays valid.
        Ok(Some(unsafe { *ptr.cast::<BuildTag>() }))
    }

    fn export(&self, name: &str) -> Option<Exported> {
        let ptr = self.symbol_address(name)?;
        // SAFETY: non-null data symbol in a leaked library.
        Some(unsafe { classify_export(ptr) })
    }
}
