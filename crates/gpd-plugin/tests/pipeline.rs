//! End-to-end tests for open → lookup → assert → register → instantiate → init.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gpd_core::ErrorKind;
use gpd_plugin::abi::{COMMAND_SYMBOL, ON_LOAD_SYMBOL, TYPES_SYMBOL};
use gpd_plugin::config::defaults::{BANANAS_KEY, BANANAS_LYRIC};
use gpd_plugin::loader::{StaticOpener, StaticUnit};
use gpd_plugin::prelude::*;
use gpd_plugin::{
    CommandShape, LifecycleState, Output, PluginLoader, SingleSlotConfig, StaticConfig, TypesShape,
};

#[derive(Debug, Default)]
struct Go;

impl Module for Go {
    fn init(&mut self, ctx: &Context, config: Config<'_>) -> Result<(), AppError> {
        ctx.check()?;
        let lyric = config
            .get_str(ctx, BANANAS_KEY)
            .unwrap_or_else(|| BANANAS_LYRIC.to_string());
        for line in lyric.lines() {
            ctx.println(line)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct GoV2;

impl Module for GoV2 {
    fn required_config(&self) -> ConfigLevel {
        ConfigLevel::V2
    }

    fn init(&mut self, ctx: &Context, config: Config<'_>) -> Result<(), AppError> {
        config.set(ctx, BANANAS_KEY, serde_json::json!("no bananas"))?;
        let value = config.get_str(ctx, BANANAS_KEY).unwrap_or_default();
        ctx.println(&value)
    }
}

static MODULES: TypeTable = type_table! {
    "mod_go" => Go,
    "mod_go_v2" => GoV2,
};

fn self_register(registry: &ModuleRegistry) {
    registry.register("mod_go", ModuleConstructor::of::<Go>());
    registry.register("mod_go_v2", ModuleConstructor::of::<GoV2>());
}

static TYPES: Export = Export::types(&MODULES);
static ON_LOAD: Export = Export::on_load(self_register);

static SEEN: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn record_name(named: &dyn Named) {
    SEEN.lock().expect("lock").push(format!("{}\n", named.name()));
}

static COMMAND: Export = Export::command(record_name);

struct Dog;

impl Named for Dog {
    fn name(&self) -> String {
        "Lucy".to_string()
    }
}

fn plugin_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"plugin").expect("write plugin file");
    path
}

#[test]
fn test_command_scenario_prints_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = plugin_file(dir.path(), "dog.so");
    let loader = PluginLoader::with_opener(
        StaticOpener::new().with_unit(StaticUnit::new(&path).with_export(COMMAND_SYMBOL, &COMMAND)),
    );
    let registry = ModuleRegistry::new();

    let handle = loader.open(&path, &registry).expect("open");
    let command = handle
        .lookup(COMMAND_SYMBOL)
        .expect("lookup")
        .assert_shape::<CommandShape>()
        .expect("shape");
    command(&Dog);

    let seen = SEEN.lock().expect("lock");
    assert!(seen.iter().any(|line| line == "Lucy\n"));
    assert!(registry.is_empty());
}

#[test]
fn test_types_scenario_prints_lyric() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = plugin_file(dir.path(), "bananas.so");
    let loader = PluginLoader::with_opener(
        StaticOpener::new().with_unit(StaticUnit::new(&path).with_export(TYPES_SYMBOL, &TYPES)),
    );
    let registry = ModuleRegistry::new();

    let handle = loader.open(&path, &registry).expect("open");
    let table = handle
        .lookup(TYPES_SYMBOL)
        .expect("lookup")
        .assert_shape::<TypesShape>()
        .expect("shape");
    assert_eq!(registry.register_table(table), 2);

    let (output, captured) = Output::capture();
    let ctx = Context::with_output(output);
    let config = StaticConfig::with_defaults();

    let mut instance = registry.instantiate("mod_go").expect("instantiate");
    assert_eq!(instance.state(), LifecycleState::Uninitialized);
    instance.init(&ctx, Config::V1(&config)).expect("init");

    assert_eq!(instance.state(), LifecycleState::Initialized);
    assert_eq!(captured.contents(), format!("{BANANAS_LYRIC}\n"));
}

#[test]
fn test_missing_exports_scenario_is_symbol_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = plugin_file(dir.path(), "empty.so");
    let loader =
        PluginLoader::with_opener(StaticOpener::new().with_unit(StaticUnit::new(&path)));
    let registry = ModuleRegistry::new();

    let handle = loader.open(&path, &registry).expect("open");
    for symbol in [COMMAND_SYMBOL, TYPES_SYMBOL] {
        let err = handle.lookup(symbol).expect_err("not exported");
        assert_eq!(err.kind, ErrorKind::SymbolNotFound);
        assert_eq!(err.exit_code(), 1);
    }
}

#[test]
fn test_push_and_pull_registration_converge() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pull_path = plugin_file(dir.path(), "pull.so");
    let push_path = plugin_file(dir.path(), "push.so");
    let loader = PluginLoader::with_opener(
        StaticOpener::new()
            .with_unit(StaticUnit::new(&pull_path).with_export(TYPES_SYMBOL, &TYPES))
            .with_unit(StaticUnit::new(&push_path).with_export(ON_LOAD_SYMBOL, &ON_LOAD)),
    );

    let pulled = ModuleRegistry::new();
    let table = loader
        .open(&pull_path, &pulled)
        .expect("open pull")
        .lookup(TYPES_SYMBOL)
        .expect("lookup")
        .assert_shape::<TypesShape>()
        .expect("shape");
    pulled.register_table(table);

    let pushed = ModuleRegistry::new();
    loader.open(&push_path, &pushed).expect("open push");

    assert_eq!(pulled.names(), pushed.names());
    assert_eq!(pushed.names(), vec!["mod_go".to_string(), "mod_go_v2".to_string()]);
}

#[test]
fn test_v2_module_rejects_v1_config_before_running() {
    let registry = ModuleRegistry::new();
    registry.register_table(&MODULES);

    let (output, captured) = Output::capture();
    let ctx = Context::with_output(output);
    let config = StaticConfig::with_defaults();

    let mut instance = registry.instantiate("mod_go_v2").expect("instantiate");
    let err = instance
        .init(&ctx, Config::V1(&config))
        .expect_err("v1 is not enough");

    assert_eq!(err.kind, ErrorKind::UnsupportedConfig);
    assert_eq!(instance.state(), LifecycleState::Uninitialized);
    assert!(captured.contents().is_empty());
}

#[test]
fn test_v2_module_round_trips_through_single_slot() {
    let registry = ModuleRegistry::new();
    registry.register_table(&MODULES);

    let (output, captured) = Output::capture();
    let ctx = Context::with_output(output);
    let config = SingleSlotConfig::new();

    let mut instance = registry.instantiate("mod_go_v2").expect("instantiate");
    instance.init(&ctx, Config::V2(&config)).expect("init");

    assert_eq!(captured.contents(), "no bananas\n");
}

#[test]
fn test_v1_module_accepts_v2_config() {
    let registry = ModuleRegistry::new();
    registry.register_table(&MODULES);

    let (output, captured) = Output::capture();
    let ctx = Context::with_output(output);
    let config = SingleSlotConfig::new();

    let mut instance = registry.instantiate("mod_go").expect("instantiate");
    instance.init(&ctx, Config::V2(&config)).expect("first init");
    instance.init(&ctx, Config::V2(&config)).expect("second init");

    assert_eq!(instance.init_count(), 2);
    assert_eq!(captured.contents(), format!("{BANANAS_LYRIC}\n{BANANAS_LYRIC}\n"));
}

#[test]
fn test_cancelled_context_stops_init() {
    let registry = ModuleRegistry::new();
    registry.register_table(&MODULES);

    let ctx = Context::background();
    ctx.cancel();
    let config = StaticConfig::with_defaults();

    let mut instance = registry.instantiate("mod_go").expect("instantiate");
    let err = instance
        .init(&ctx, Config::V1(&config))
        .expect_err("cancelled");
    assert_eq!(err.kind, ErrorKind::Cancelled);
}
