//! Unified application error types for GPD.
//!
//! Every boundary-crossing operation (file probe, open, lookup, shape
//! assertion, instantiation, init) maps its failure into [`AppError`] so the
//! host can report it and exit through a single path.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the entire workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The host was invoked with the wrong arguments.
    InvalidArgs,
    /// The plugin path does not exist.
    PluginNotFound,
    /// The plugin exists but could not be opened (format, ABI, or build tag).
    PluginOpenFailed,
    /// The plugin does not export the requested symbol.
    SymbolNotFound,
    /// A symbol was found but its shape does not match the expected contract.
    ContractViolation,
    /// A type-table symbol has the right shape but carries no table.
    NilTable,
    /// No constructor is registered under the requested module name.
    ModuleNotRegistered,
    /// The supplied config does not provide the capability level required.
    UnsupportedConfig,
    /// The operation observed a cancelled context or an expired deadline.
    Cancelled,
    /// The host configuration could not be loaded.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Short human-readable cause used in `error: <cause>: <detail>` diagnostics.
    pub fn cause(&self) -> &'static str {
        match self {
            Self::InvalidArgs => "invalid args",
            Self::PluginNotFound => "invalid plugin file",
            Self::PluginOpenFailed => "failed to load plugin",
            Self::SymbolNotFound => "failed to lookup symbol",
            Self::ContractViolation => "invalid symbol",
            Self::NilTable => "nil type table",
            Self::ModuleNotRegistered => "module not registered",
            Self::UnsupportedConfig => "unsupported config",
            Self::Cancelled => "cancelled",
            Self::Configuration => "invalid configuration",
            Self::Internal => "internal error",
        }
    }

    /// Process exit code for a host run that failed with this kind.
    ///
    /// Every failure is terminal and reported the same way.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgs => write!(f, "INVALID_ARGS"),
            Self::PluginNotFound => write!(f, "PLUGIN_NOT_FOUND"),
            Self::PluginOpenFailed => write!(f, "PLUGIN_OPEN_FAILED"),
            Self::SymbolNotFound => write!(f, "SYMBOL_NOT_FOUND"),
            Self::ContractViolation => write!(f, "CONTRACT_VIOLATION"),
            Self::NilTable => write!(f, "NIL_TABLE"),
            Self::ModuleNotRegistered => write!(f, "MODULE_NOT_REGISTERED"),
            Self::UnsupportedConfig => write!(f, "UNSUPPORTED_CONFIG"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout GPD.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgs, message)
    }

    /// Create a plugin-not-found error.
    pub fn plugin_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PluginNotFound, message)
    }

    /// Create a plugin-open-failed error.
    pub fn plugin_open_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PluginOpenFailed, message)
    }

    /// Create a symbol-not-found error.
    pub fn symbol_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SymbolNotFound, message)
    }

    /// Create a contract-violation error.
    pub fn contract_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContractViolation, message)
    }

    /// Create a nil-table error.
    pub fn nil_table(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NilTable, message)
    }

    /// Create a module-not-registered error.
    pub fn module_not_registered(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModuleNotRegistered, message)
    }

    /// Create an unsupported-config error.
    pub fn unsupported_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedConfig, message)
    }

    /// Create a cancellation error.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Renders the `<cause>: <detail>` pair written after `error: `.
    pub fn diagnostic(&self) -> String {
        format!("{}: {}", self.kind.cause(), self.message)
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
