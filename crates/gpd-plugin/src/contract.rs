//! Symbol contract validation.
//!
//! A looked-up symbol is an [`Export`] of unknown shape. Each expected shape
//! is a [`SymbolShape`]; asserting it checks the header, the ABI version,
//! the declared signature and the payload variant, and only then hands out the typed
//! value. There is no coercion: a near miss is a contract violation.

use gpd_core::error::AppError;

use crate::abi::{
    ABI_VERSION, COMMAND_SIGNATURE, CommandFn, EXPORT_MAGIC, Export, ExportPayload,
    ON_LOAD_SIGNATURE, OnLoadFn, TYPES_SIGNATURE, TypeTable,
};

/// A shape a raw symbol can be asserted against.
pub trait SymbolShape {
    /// Typed value handed out on success.
    type Output;

    /// Human-readable name of the shape.
    const NAME: &'static str;

    /// Signature a conforming export declares.
    const SIGNATURE: &'static str;

    /// Extracts the typed value from a payload of the right variant, or
    /// returns `None` when the variant differs.
    fn extract(symbol: &str, payload: &ExportPayload) -> Option<Result<Self::Output, AppError>>;
}

/// `fn(&dyn Named)`, used for direct command dispatch.
#[derive(Debug)]
pub struct CommandShape;

impl SymbolShape for CommandShape {
    type Output = CommandFn;

    const NAME: &'static str = "command";
    const SIGNATURE: &'static str = COMMAND_SIGNATURE;

    fn extract(_symbol: &str, payload: &ExportPayload) -> Option<Result<CommandFn, AppError>> {
        match payload {
            ExportPayload::Command(command) => Some(Ok(*command)),
            _ => None,
        }
    }
}

/// Pointer to a name → factory table, used for bulk registration.
#[derive(Debug)]
pub struct TypesShape;

impl SymbolShape for TypesShape {
    type Output = &'static TypeTable;

    const NAME: &'static str = "type table";
    const SIGNATURE: &'static str = TYPES_SIGNATURE;

    fn extract(
        symbol: &str,
        payload: &ExportPayload,
    ) -> Option<Result<&'static TypeTable, AppError>> {
        match payload {
            ExportPayload::Types(Some(table)) => Some(Ok(*table)),
            ExportPayload::Types(None) => Some(Err(AppError::nil_table(format!(
                "{symbol} points to no table"
            )))),
            _ => None,
        }
    }
}

/// `fn(&ModuleRegistry)`, the plugin's one-time initialization hook.
#[derive(Debug)]
pub struct OnLoadShape;

impl SymbolShape for OnLoadShape {
    type Output = OnLoadFn;

    const NAME: &'static str = "on-load hook";
    const SIGNATURE: &'static str = ON_LOAD_SIGNATURE;

    fn extract(_symbol: &str, payload: &ExportPayload) -> Option<Result<OnLoadFn, AppError>> {
        match payload {
            ExportPayload::OnLoad(hook) => Some(Ok(*hook)),
            _ => None,
        }
    }
}

/// Asserts that `export`, found under `symbol`, has shape `S`.
///
/// Fails with `ContractViolation` on an ABI, variant, or signature mismatch,
/// and with `NilTable` for a type-table export carrying no table.
pub fn assert_shape<S: SymbolShape>(symbol: &str, export: &Export) -> Result<S::Output, AppError> {
    if export.magic != EXPORT_MAGIC {
        return Err(AppError::contract_violation(format!(
            "{symbol}: not a gpd export (header {:#018x})",
            export.magic
        )));
    }

    if export.abi_version != ABI_VERSION {
        return Err(AppError::contract_violation(format!(
            "{symbol}: abi version {} (host expects {ABI_VERSION})",
            export.abi_version
        )));
    }

    if export.signature != S::SIGNATURE {
        return Err(AppError::contract_violation(format!(
            "{symbol}: {} (expected {})",
            export.signature,
            S::SIGNATURE
        )));
    }

    S::extract(symbol, &export.payload).unwrap_or_else(|| {
        Err(AppError::contract_violation(format!(
            "{symbol}: {} payload where a {} was expected",
            export.payload.variant(),
            S::NAME
        )))
    })
}
