//! Plugin loader: opens plugin units and exposes symbol lookup.
//!
//! Units are opened at most once per process and never closed. Opening a
//! unit verifies its build tag and runs its on-load hook (see
//! [`crate::hooks`]) exactly once; lookups afterwards never execute plugin
//! code.

pub mod memory;
pub mod native;

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use gpd_core::error::AppError;

use crate::abi::{BuildTag, Export, Exported};
use crate::contract::{self, SymbolShape};
use crate::hooks;
use crate::registry::ModuleRegistry;

pub use self::memory::{StaticOpener, StaticUnit};
pub use self::native::{NativeOpener, NativeUnit};

/// An opened plugin unit.
pub trait PluginUnit: Send + Sync + fmt::Debug {
    /// Where the unit was opened from.
    fn location(&self) -> &Path;

    /// The unit's build tag, if it exports one. Fails with
    /// `PluginOpenFailed` when the symbol exists but is not a build tag.
    fn build_tag(&self) -> Result<Option<BuildTag>, AppError>;

    /// The symbol named `name`, if present. Must not run plugin code.
    fn export(&self, name: &str) -> Option<Exported>;
}

/// Turns a path into an opened [`PluginUnit`].
pub trait UnitOpener: Send + Sync + fmt::Debug {
    /// Opens the unit at `path`. Failures are `PluginOpenFailed`.
    fn open_unit(&self, path: &Path) -> Result<Arc<dyn PluginUnit>, AppError>;
}

/// Handle to an opened unit; valid for the rest of the process.
#[derive(Debug, Clone)]
pub struct PluginHandle {
    unit: Arc<dyn PluginUnit>,
}

impl PluginHandle {
    /// Path the unit was opened from.
    pub fn path(&self) -> &Path {
        self.unit.location()
    }

    /// Looks up the export named `name`.
    pub fn lookup(&self, name: &str) -> Result<RawSymbol, AppError> {
        self.find(name).ok_or_else(|| {
            AppError::symbol_not_found(format!(
                "symbol {name} not found in {}",
                self.path().display()
            ))
        })
    }

    pub(crate) fn find(&self, name: &str) -> Option<RawSymbol> {
        self.unit.export(name).map(|exported| RawSymbol {
            name: name.to_string(),
            exported,
        })
    }
}

/// A looked-up symbol whose shape has not been checked yet.
#[derive(Debug, Clone)]
pub struct RawSymbol {
    name: String,
    exported: Exported,
}

impl RawSymbol {
    /// Wraps an export found under `name`.
    pub fn new(name: impl Into<String>, export: &'static Export) -> Self {
        Self {
            name: name.into(),
            exported: Exported::Export(export),
        }
    }

    /// Symbol name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The untyped export, or `None` for a symbol of some other type.
    pub fn export(&self) -> Option<&'static Export> {
        match self.exported {
            Exported::Export(export) => Some(export),
            Exported::Foreign { .. } => None,
        }
    }

    /// Asserts the symbol has shape `S` and returns the typed value.
    pub fn assert_shape<S: SymbolShape>(&self) -> Result<S::Output, AppError> {
        match self.exported {
            Exported::Export(export) => contract::assert_shape::<S>(&self.name, export),
            Exported::Foreign { header } => Err(AppError::contract_violation(format!(
                "symbol {} is not a gpd export (header {header:#018x}), expected {}",
                self.name,
                S::SIGNATURE
            ))),
        }
    }
}

/// Opens plugin units and keeps them alive for the process lifetime.
pub struct PluginLoader {
    /// Backend turning paths into units.
    opener: Box<dyn UnitOpener>,
    /// Canonical path → handle of every unit opened so far.
    opened: Mutex<HashMap<PathBuf, PluginHandle>>,
}

impl PluginLoader {
    /// A loader opening native shared libraries.
    pub fn new() -> Self {
        Self::with_opener(NativeOpener)
    }

    /// A loader using a custom backend.
    pub fn with_opener(opener: impl UnitOpener + 'static) -> Self {
        Self {
            opener: Box::new(opener),
            opened: Mutex::new(HashMap::new()),
        }
    }

    /// Opens the unit at `path` and runs its on-load hook against
    /// `registry`.
    ///
    /// Fails with `PluginNotFound` if nothing exists at `path` (no open is
    /// attempted), and with `PluginOpenFailed` if the unit cannot be opened
    /// or was built against a different ABI, SDK, or toolchain. A path that was already
    /// opened returns the existing handle without re-running the hook.
    pub fn open(&self, path: &Path, registry: &ModuleRegistry) -> Result<PluginHandle, AppError> {
        probe(path)?;

        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let mut opened = self.opened.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(handle) = opened.get(&key) {
            debug!(path = %path.display(), "Plugin unit already open");
            return Ok(handle.clone());
        }

        let unit = self.opener.open_unit(path)?;
        verify_build_tag(path, unit.build_tag()?)?;

        let handle = PluginHandle { unit };
        hooks::run_on_load(&handle, registry)?;

        info!(path = %path.display(), "Plugin unit opened");
        opened.insert(key, handle.clone());

        Ok(handle)
    }

    /// Paths of every unit opened so far, sorted.
    pub fn loaded(&self) -> Vec<PathBuf> {
        let opened = self.opened.lock().unwrap_or_else(|e| e.into_inner());
        let mut paths: Vec<PathBuf> = opened.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginLoader")
            .field("opener", &self.opener)
            .field("loaded_count", &self.loaded().len())
            .finish()
    }
}

/// Fails with `PluginNotFound` when `path` does not exist. Any other probe
/// error is left for the open attempt to report.
fn probe(path: &Path) -> Result<(), AppError> {
    match std::fs::metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AppError::plugin_not_found(
            path.display().to_string(),
        )),
        _ => Ok(()),
    }
}

fn verify_build_tag(path: &Path, tag: Option<BuildTag>) -> Result<(), AppError> {
    let tag = tag.ok_or_else(|| {
        AppError::plugin_open_failed(format!(
            "{}: missing build tag; not built with gpd-plugin",
            path.display()
        ))
    })?;

    if let Some(mismatch) = tag.mismatch() {
        return Err(AppError::plugin_open_failed(format!(
            "{}: plugin was built with a different version of package gpd-plugin \
             or a different toolchain: {mismatch}",
            path.display()
        )));
    }

    Ok(())
}
