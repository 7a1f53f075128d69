//! Prelude for convenient imports.

pub use gpd_core::error::{AppError, ErrorKind};

pub use crate::abi::{Export, TypeEntry, TypeTable};
pub use crate::config::{Config, ConfigLevel, ConfigV1, ConfigV2};
pub use crate::context::Context;
pub use crate::module::{Module, Named};
pub use crate::registry::{ModuleConstructor, ModuleRegistry};

pub use crate::{declare_plugin, export_command, export_on_load, export_types, type_table};
