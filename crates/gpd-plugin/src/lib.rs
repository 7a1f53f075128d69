//! # gpd-plugin
//!
//! Dynamic plugin framework for GPD. Provides:
//!
//! - Plugin loading by path, at most once per process (`loader`)
//! - Symbol lookup and shape assertion with no coercion (`contract`)
//! - A thread-safe name → constructor registry (`registry`)
//! - The module lifecycle and the capabilities handed to `init` (`module`,
//!   `config`, `context`)
//! - Export macros used by plugin crates (`macros`)

pub mod abi;
pub mod config;
pub mod context;
pub mod contract;
mod hooks;
pub mod loader;
pub mod macros;
pub mod module;
pub mod prelude;
pub mod registry;

pub use abi::{BuildTag, Export, ExportPayload, Exported, TypeEntry, TypeTable};
pub use config::{Config, ConfigLevel, ConfigV1, ConfigV2, SingleSlotConfig, StaticConfig};
pub use context::{Context, Output};
pub use contract::{CommandShape, OnLoadShape, SymbolShape, TypesShape};
pub use loader::{PluginHandle, PluginLoader, RawSymbol};
pub use module::{LifecycleState, Module, ModuleInstance, Named};
pub use registry::{ModuleConstructor, ModuleRegistry};
