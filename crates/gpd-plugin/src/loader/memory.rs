//! In-process units: export tables compiled into the host.
//!
//! Used for statically linked plugins and to exercise the loader without
//! building shared libraries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gpd_core::error::AppError;

use super::{PluginUnit, UnitOpener};
use crate::abi::{BuildTag, Export, Exported};

/// A unit backed by a table of `'static` exports.
#[derive(Debug, Clone)]
pub struct StaticUnit {
    /// Path this unit answers to.
    location: PathBuf,
    /// Build tag reported to the loader.
    build_tag: Option<BuildTag>,
    /// Symbol name → exported value.
    exports: HashMap<String, Exported>,
}

impl StaticUnit {
    /// An empty unit tagged with the host's own build tag.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            build_tag: Some(BuildTag::CURRENT),
            exports: HashMap::new(),
        }
    }

    /// Adds an export under `name`.
    pub fn with_export(self, name: impl Into<String>, export: &'static Export) -> Self {
        self.with_symbol(name, Exported::Export(export))
    }

    /// Adds an arbitrary symbol under `name`, including ones that are not
    /// exports at all.
    pub fn with_symbol(mut self, name: impl Into<String>, symbol: Exported) -> Self {
        self.exports.insert(name.into(), symbol);
        self
    }

    /// Replaces the build tag.
    pub fn with_build_tag(mut self, build_tag: Option<BuildTag>) -> Self {
        self.build_tag = build_tag;
        self
    }
}

impl PluginUnit for StaticUnit {
    fn location(&self) -> &Path {
        &self.location
    }

    fn build_tag(&self) -> Result<Option<BuildTag>, AppError> {
        Ok(self.build_tag)
    }

    fn export(&self, name: &str) -> Option<Exported> {
        self.exports.get(name).copied()
    }
}

/// Opener resolving paths to pre-registered [`StaticUnit`]s.
#[derive(Debug, Default)]
pub struct StaticOpener {
    units: HashMap<PathBuf, Arc<StaticUnit>>,
}

impl StaticOpener {
    /// An opener that knows no units.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `unit` openable at its location.
    pub fn with_unit(mut self, unit: StaticUnit) -> Self {
        self.units.insert(unit.location.clone(), Arc::new(unit));
        self
    }
}

impl UnitOpener for StaticOpener {
    fn open_unit(&self, path: &Path) -> Result<Arc<dyn PluginUnit>, AppError> {
        self.units
            .get(path)
            .map(|unit| Arc::clone(unit) as Arc<dyn PluginUnit>)
            .ok_or_else(|| {
                AppError::plugin_open_failed(format!("{}: not a plugin unit", path.display()))
            })
    }
}
