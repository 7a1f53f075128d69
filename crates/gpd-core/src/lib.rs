//! # gpd-core
//!
//! Core crate for GPD. Contains the unified error system and the host
//! configuration schema.
//!
//! This crate has **no** internal dependencies on other GPD crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
