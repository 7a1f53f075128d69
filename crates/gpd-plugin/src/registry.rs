//! Module registry: maps module names to constructors.
//!
//! One registry is created per host and shared by reference with the loader
//! (for on-load self-registration) and with instantiation call sites. A
//! single lock guards the map, so a reader never observes a half-inserted
//! entry.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use tracing::{debug, info};

use gpd_core::error::AppError;

use crate::abi::{AnyFactory, TypeTable};
use crate::module::{Module, ModuleInstance};

/// Zero-argument factory for a module.
#[derive(Clone, Copy)]
pub enum ModuleConstructor {
    /// Factory that already returns a module.
    Typed(fn() -> Box<dyn Module>),
    /// Factory returning an unconstrained value; asserted to be a module
    /// when called.
    Untyped(AnyFactory),
}

impl ModuleConstructor {
    /// Constructor building `M::default()`.
    pub fn of<M>() -> Self
    where
        M: Module + Default + 'static,
    {
        Self::Typed(boxed_default::<M>)
    }

    /// Builds a fresh, uninitialized module.
    ///
    /// An untyped factory whose value is not a boxed module is a
    /// `ContractViolation`.
    pub fn construct(&self, name: &str) -> Result<Box<dyn Module>, AppError> {
        match self {
            Self::Typed(factory) => Ok(factory()),
            Self::Untyped(factory) => factory()
                .downcast::<Box<dyn Module>>()
                .map(|module| *module)
                .map_err(|_| {
                    AppError::contract_violation(format!(
                        "factory for module '{name}' did not produce a module"
                    ))
                }),
        }
    }
}

impl fmt::Debug for ModuleConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(_) => f.write_str("ModuleConstructor::Typed"),
            Self::Untyped(_) => f.write_str("ModuleConstructor::Untyped"),
        }
    }
}

fn boxed_default<M>() -> Box<dyn Module>
where
    M: Module + Default + 'static,
{
    Box::new(M::default())
}

/// Registry of module constructors keyed by module name.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    /// Module name → constructor.
    constructors: RwLock<HashMap<String, ModuleConstructor>>,
}

impl ModuleRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` under `name`.
    ///
    /// Inserts or overwrites; the last registration for a name wins.
    pub fn register(&self, name: impl Into<String>, constructor: ModuleConstructor) {
        let name = name.into();
        let mut constructors = self.constructors.write().unwrap_or_else(|e| e.into_inner());
        let replaced = constructors.insert(name.clone(), constructor).is_some();

        debug!(module = %name, replaced = replaced, "Module constructor registered");
    }

    /// Registers every entry of a plugin's type table. Returns the number
    /// of entries registered.
    pub fn register_table(&self, table: &TypeTable) -> usize {
        for entry in table.entries() {
            self.register(entry.name, ModuleConstructor::Untyped(entry.factory));
        }

        info!(count = table.len(), "Type table registered");
        table.len()
    }

    /// Instantiates a fresh, uninitialized module registered under `name`.
    ///
    /// A name with no registration fails with `ModuleNotRegistered`.
    pub fn instantiate(&self, name: &str) -> Result<ModuleInstance, AppError> {
        let constructor = {
            let constructors = self.constructors.read().unwrap_or_else(|e| e.into_inner());
            constructors.get(name).copied()
        };

        let constructor = constructor.ok_or_else(|| {
            AppError::module_not_registered(format!("no constructor registered for '{name}'"))
        })?;

        let module = constructor.construct(name)?;
        debug!(module = %name, "Module instantiated");

        Ok(ModuleInstance::new(name, module))
    }

    /// Whether `name` has a constructor.
    pub fn contains(&self, name: &str) -> bool {
        let constructors = self.constructors.read().unwrap_or_else(|e| e.into_inner());
        constructors.contains_key(name)
    }

    /// Registered module names, sorted.
    pub fn names(&self) -> Vec<String> {
        let constructors = self.constructors.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = constructors.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        let constructors = self.constructors.read().unwrap_or_else(|e| e.into_inner());
        constructors.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
