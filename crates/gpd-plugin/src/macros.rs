//! Macros that emit a plugin unit's exported symbols.
//!
//! Every symbol is a `#[no_mangle]` static so the loader can find it by
//! name without running any plugin code.

/// Emits the mandatory build tag. Call once per plugin crate.
///
/// # Example
/// ```rust,ignore
/// gpd_plugin::declare_plugin!();
/// ```
#[macro_export]
macro_rules! declare_plugin {
    () => {
        #[allow(non_upper_case_globals)]
        #[unsafe(no_mangle)]
        pub static gpd_build_tag: $crate::abi::BuildTag = $crate::abi::BuildTag::CURRENT;
    };
}

/// Exports `$command` under the `Command` symbol.
///
/// # Example
/// ```rust,ignore
/// fn bark(dog: &dyn Named) {
///     println!("{}", dog.name());
/// }
///
/// gpd_plugin::export_command!(bark);
/// ```
#[macro_export]
macro_rules! export_command {
    ($command:path) => {
        #[allow(non_upper_case_globals)]
        #[unsafe(no_mangle)]
        pub static Command: $crate::abi::Export = $crate::abi::Export::command($command);
    };
}

/// Builds a [`TypeTable`](crate::abi::TypeTable) from `name => Type` pairs.
///
/// Each type must implement `Module + Default`. Meant for static
/// initializers.
///
/// # Example
/// ```rust,ignore
/// pub static MODULES: TypeTable = gpd_plugin::type_table! {
///     "mod_go" => Go,
/// };
/// ```
#[macro_export]
macro_rules! type_table {
    ($($name:literal => $module:ty),* $(,)?) => {
        $crate::abi::TypeTable {
            entries: &[
                $(
                    $crate::abi::TypeEntry {
                        name: $name,
                        factory: $crate::abi::erased_module::<$module>,
                    },
                )*
            ],
        }
    };
}

/// Exports the static table `$table` under the `Types` symbol.
///
/// # Example
/// ```rust,ignore
/// gpd_plugin::export_types!(MODULES);
/// ```
#[macro_export]
macro_rules! export_types {
    ($table:path) => {
        #[allow(non_upper_case_globals)]
        #[unsafe(no_mangle)]
        pub static Types: $crate::abi::Export = $crate::abi::Export::types(&$table);
    };
}

/// Exports `$hook` as the plugin's on-load hook.
///
/// # Example
/// ```rust,ignore
/// fn on_load(registry: &ModuleRegistry) {
///     registry.register("mod_go", ModuleConstructor::of::<Go>());
/// }
///
/// gpd_plugin::export_on_load!(on_load);
/// ```
#[macro_export]
macro_rules! export_on_load {
    ($hook:path) => {
        #[allow(non_upper_case_globals)]
        #[unsafe(no_mangle)]
        pub static gpd_on_load: $crate::abi::Export = $crate::abi::Export::on_load($hook);
    };
}
