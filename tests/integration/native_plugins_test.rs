//! Runs the `gpd` binary against the example plugins built as real shared
//! libraries.

mod helpers;

use std::path::Path;

use gpd_plugin::config::defaults::BANANAS_LYRIC;

use helpers::{plugin_artifacts, run_gpd, stderr, stdout};

#[test]
fn test_dog_command_prints_subject() {
    let plugins = plugin_artifacts();

    let output = run_gpd(&[&plugins.dog], &[("GPD__HOST__CONVENTION", "command")]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Lucy\n");
}

#[test]
fn test_dog_command_uses_configured_subject() {
    let plugins = plugin_artifacts();

    let output = run_gpd(
        &[&plugins.dog],
        &[
            ("GPD__HOST__CONVENTION", "command"),
            ("GPD__HOST__SUBJECT", "Rex"),
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Rex\n");
}

#[test]
fn test_bananas_types_prints_default_lyric() {
    let plugins = plugin_artifacts();

    let output = run_gpd(&[&plugins.bananas], &[]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), format!("{BANANAS_LYRIC}\n"));
}

#[test]
fn test_bananas_on_load_self_registers() {
    let plugins = plugin_artifacts();

    let output = run_gpd(&[&plugins.bananas], &[("GPD__HOST__CONVENTION", "on_load")]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), format!("{BANANAS_LYRIC}\n"));
}

#[test]
fn test_bananas_v2_module_reads_back_writes() {
    let plugins = plugin_artifacts();

    let output = run_gpd(
        &[&plugins.bananas],
        &[
            ("GPD__HOST__MODULE", "mod_go_v2"),
            ("GPD__HOST__CONFIG_VERSION", "v2"),
            ("GPD__HOST__INIT_PASSES", "2"),
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Yes, we have no bananas,\nWe have no bananas today.\n"
    );
}

#[test]
fn test_dog_under_types_fails_lookup() {
    let plugins = plugin_artifacts();

    let output = run_gpd(&[&plugins.dog], &[("GPD__HOST__CONVENTION", "types")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(
        stderr(&output).starts_with("error: failed to lookup symbol"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn test_bananas_under_command_fails_lookup() {
    let plugins = plugin_artifacts();

    let output = run_gpd(&[&plugins.bananas], &[("GPD__HOST__CONVENTION", "command")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: failed to lookup symbol"));
}

#[test]
fn test_missing_plugin_exits_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nowhere.so");

    let output = run_gpd(&[&missing], &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).starts_with("error: invalid plugin file"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn test_non_library_fails_to_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let garbage = dir.path().join("garbage.so");
    std::fs::write(&garbage, b"not a shared library").expect("write");

    let output = run_gpd(&[&garbage], &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: failed to load plugin"));
}

#[test]
fn test_no_plugin_prints_placeholder() {
    let output = run_gpd(&[], &[]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Yes, we have no bananas,\nWe have no bananas today.\n"
    );
}

#[test]
fn test_extra_argument_exits_one() {
    let output = run_gpd(&[Path::new("one.so"), Path::new("two.so")], &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: invalid args"));
}
