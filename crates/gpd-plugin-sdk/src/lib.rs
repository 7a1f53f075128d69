//! # gpd-plugin-sdk
//!
//! SDK for developing GPD plugins.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gpd_plugin_sdk::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Hello;
//!
//! impl Module for Hello {
//!     fn init(&mut self, ctx: &Context, config: Config<'_>) -> Result<(), AppError> {
//!         let greeting = read_str_or_default(ctx, config, "greeting")
//!             .unwrap_or_else(|| "hello".to_string());
//!         print_lines(ctx, &greeting)
//!     }
//! }
//!
//! pub static MODULES: TypeTable = type_table! {
//!     "hello" => Hello,
//! };
//!
//! declare_plugin!();
//! export_types!(MODULES);
//! ```
//!
//! Build the crate as a `cdylib` and pass the resulting library to `gpd`.

pub mod helpers;

pub use gpd_plugin::{declare_plugin, export_command, export_on_load, export_types, type_table};

/// Prelude for convenient imports.
pub mod prelude {
    pub use gpd_plugin::prelude::*;
    pub use serde_json::{Value, json};

    pub use crate::helpers::{print_lines, read_str_or_default};
}
