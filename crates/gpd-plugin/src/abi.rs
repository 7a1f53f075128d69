//! ABI declarations shared by the host and plugin units.
//!
//! A plugin unit exposes data symbols of type [`Export`] under well-known
//! names, plus a mandatory [`BuildTag`]. Host and plugins are built by the
//! same toolchain from the same workspace, so Rust types (trait objects,
//! `&'static str`, fn pointers) cross the boundary directly; the build tag
//! is what detects a plugin built against a different SDK or compiler.
//!
//! Both [`Export`] and [`BuildTag`] start with a magic word. The loader
//! reads that word before touching any pointer field, so a symbol of some
//! other type under a well-known name is rejected instead of dereferenced.

use std::any::Any;

use crate::module::{Module, Named};
use crate::registry::ModuleRegistry;

/// Version of the export layout. Bumped on any change to [`Export`] or
/// [`ExportPayload`].
pub const ABI_VERSION: u32 = 1;

/// SDK version baked into every build tag.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Symbol carrying the [`BuildTag`].
pub const BUILD_TAG_SYMBOL: &str = "gpd_build_tag";

/// Symbol of the direct-dispatch command export.
pub const COMMAND_SYMBOL: &str = "Command";

/// Symbol of the bulk type-table export.
pub const TYPES_SYMBOL: &str = "Types";

/// Symbol of the on-load hook export.
pub const ON_LOAD_SYMBOL: &str = "gpd_on_load";

/// Signature declared by a conforming `Command` export.
pub const COMMAND_SIGNATURE: &str = "fn(&dyn gpd_plugin::Named)";

/// Signature declared by a conforming `Types` export.
pub const TYPES_SIGNATURE: &str = "&gpd_plugin::TypeTable";

/// Signature declared by a conforming on-load hook export.
pub const ON_LOAD_SIGNATURE: &str = "fn(&gpd_plugin::ModuleRegistry)";

/// Value of unconstrained type produced by type-table factories.
pub type AnyValue = Box<dyn Any + Send>;

/// Direct-dispatch command: receives a value able to report its name.
pub type CommandFn = fn(&dyn Named);

/// Zero-argument factory returning an unconstrained value.
pub type AnyFactory = fn() -> AnyValue;

/// Plugin initialization hook, run once by the loader.
pub type OnLoadFn = fn(&ModuleRegistry);

/// First word of every [`Export`]. Checked before any other field is read.
pub const EXPORT_MAGIC: u64 = u64::from_be_bytes(*b"GPDEXPT1");

/// First word of every [`BuildTag`]. Bumped whenever the tag's layout
/// changes.
pub const BUILD_TAG_MAGIC: u64 = u64::from_be_bytes(*b"GPDBTAG1");

/// Identifies the ABI, SDK, and toolchain a plugin unit was built with.
///
/// Trait objects and `TypeId`s cross the boundary with Rust layout, so the
/// compiler, target, and panic strategy must match as well as the SDK.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTag {
    /// Always [`BUILD_TAG_MAGIC`].
    pub magic: u64,
    /// Export layout version.
    pub abi_version: u32,
    /// `gpd-plugin` crate version.
    pub sdk_version: &'static str,
    /// `rustc` release and commit hash.
    pub rustc: &'static str,
    /// Target triple.
    pub target: &'static str,
    /// Panic strategy (`unwind` or `abort`).
    pub panic: &'static str,
}

impl BuildTag {
    /// The tag of the running host.
    pub const CURRENT: BuildTag = BuildTag {
        magic: BUILD_TAG_MAGIC,
        abi_version: ABI_VERSION,
        sdk_version: SDK_VERSION,
        rustc: env!("GPD_RUSTC"),
        target: env!("GPD_TARGET"),
        panic: env!("GPD_PANIC"),
    };

    /// Whether a plugin tagged `self` can be opened by this host.
    pub fn is_compatible(&self) -> bool {
        *self == Self::CURRENT
    }

    /// Describes the first field that differs from the host's tag.
    pub fn mismatch(&self) -> Option<String> {
        let host = Self::CURRENT;
        if self.magic != host.magic {
            return Some(format!("tag header {:#018x}", self.magic));
        }
        if self.abi_version != host.abi_version {
            return Some(format!(
                "abi {} (host {})",
                self.abi_version, host.abi_version
            ));
        }
        [
            ("sdk", self.sdk_version, host.sdk_version),
            ("rustc", self.rustc, host.rustc),
            ("target", self.target, host.target),
            ("panic", self.panic, host.panic),
        ]
        .into_iter()
        .find(|(_, plugin, host)| plugin != host)
        .map(|(field, plugin, host)| format!("{field} {plugin} (host {host})"))
    }
}

/// Exported symbol value: header, version, declared signature, and tagged
/// payload.
#[repr(C)]
#[derive(Debug)]
pub struct Export {
    /// Always [`EXPORT_MAGIC`].
    pub magic: u64,
    /// Export layout version the plugin was built with.
    pub abi_version: u32,
    /// Signature the plugin claims for the payload.
    pub signature: &'static str,
    /// The payload itself.
    pub payload: ExportPayload,
}

impl Export {
    /// A `Command` export over `command`.
    pub const fn command(command: CommandFn) -> Self {
        Self {
            magic: EXPORT_MAGIC,
            abi_version: ABI_VERSION,
            signature: COMMAND_SIGNATURE,
            payload: ExportPayload::Command(command),
        }
    }

    /// A `Types` export over `table`.
    pub const fn types(table: &'static TypeTable) -> Self {
        Self {
            magic: EXPORT_MAGIC,
            abi_version: ABI_VERSION,
            signature: TYPES_SIGNATURE,
            payload: ExportPayload::Types(Some(table)),
        }
    }

    /// An on-load hook export.
    pub const fn on_load(hook: OnLoadFn) -> Self {
        Self {
            magic: EXPORT_MAGIC,
            abi_version: ABI_VERSION,
            signature: ON_LOAD_SIGNATURE,
            payload: ExportPayload::OnLoad(hook),
        }
    }
}

/// What a unit holds under a symbol name.
#[derive(Debug, Clone, Copy)]
pub enum Exported {
    /// A value whose header identifies it as an [`Export`].
    Export(&'static Export),
    /// A symbol of some other type; only its first word was read.
    Foreign {
        /// The word found where [`EXPORT_MAGIC`] was expected.
        header: u64,
    },
}

/// Classifies the symbol at `ptr` by its first word.
///
/// # Safety
///
/// `ptr` must be non-null and point to at least eight readable bytes that
/// stay valid for the rest of the process.
pub unsafe fn classify_export(ptr: *const u8) -> Exported {
    // SAFETY: caller guarantees eight readable bytes; no alignment assumed.
    let header = unsafe { ptr.cast::<u64>().read_unaligned() };
    if header != EXPORT_MAGIC {
        return Exported::Foreign { header };
    }
    // SAFETY: the header matches, so the symbol is an `Export` emitted by
    // the export macros of this SDK.
    Exported::Export(unsafe { &*ptr.cast::<Export>() })
}

/// Payload variants an [`Export`] may carry.
#[repr(C, u32)]
#[derive(Debug)]
pub enum ExportPayload {
    /// A callable taking a [`Named`] value.
    Command(CommandFn),
    /// A pointer to a type table; `None` is a nil table.
    Types(Option<&'static TypeTable>),
    /// A hook receiving the host's module registry.
    OnLoad(OnLoadFn),
}

impl ExportPayload {
    /// Variant name, used in contract diagnostics.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::Command(_) => "Command",
            Self::Types(_) => "Types",
            Self::OnLoad(_) => "OnLoad",
        }
    }
}

/// One `name -> factory` row of a [`TypeTable`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TypeEntry {
    /// Module name the factory registers under.
    pub name: &'static str,
    /// Factory producing the module, type-erased.
    pub factory: AnyFactory,
}

/// Mapping from module name to zero-argument factory.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TypeTable {
    /// Rows in declaration order.
    pub entries: &'static [TypeEntry],
}

impl TypeTable {
    /// Wraps a static slice of entries.
    pub const fn new(entries: &'static [TypeEntry]) -> Self {
        Self { entries }
    }

    /// The table's entries, in declaration order.
    pub fn entries(&self) -> &'static [TypeEntry] {
        self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Factory usable in a [`TypeEntry`]: builds a default `M` and erases it
/// as a boxed module.
pub fn erased_module<M>() -> AnyValue
where
    M: Module + Default + 'static,
{
    let module: Box<dyn Module> = Box::new(M::default());
    Box::new(module)
}
