//! Shared helpers for tests that drive the `gpd` binary.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

/// Plugin libraries built for the binary under test.
pub struct PluginArtifacts {
    /// `plugin-dog` shared library.
    pub dog: PathBuf,
    /// `plugin-bananas` shared library.
    pub bananas: PathBuf,
}

static ARTIFACTS: OnceLock<PluginArtifacts> = OnceLock::new();

/// Locates the example plugins built alongside the binary under test.
///
/// The plugins are dev-dependencies of the `gpd` package, so cargo has
/// already compiled their shared libraries against the same `gpd-plugin`
/// build as the binary. When they are missing (a custom runner, or a
/// profile that skipped them) they are built into a scratch target dir.
pub fn plugin_artifacts() -> &'static PluginArtifacts {
    ARTIFACTS.get_or_init(|| {
        let bin_dir = Path::new(env!("CARGO_BIN_EXE_gpd"))
            .parent()
            .expect("binary has a parent dir")
            .to_path_buf();
        let search = [bin_dir.clone(), bin_dir.join("deps")];

        if let (Some(dog), Some(bananas)) = (
            find_library(&search, "plugin-dog"),
            find_library(&search, "plugin-bananas"),
        ) {
            return PluginArtifacts { dog, bananas };
        }

        let target_dir = build_plugins();
        let search = [target_dir.join("debug"), target_dir.join("debug").join("deps")];
        PluginArtifacts {
            dog: find_library(&search, "plugin-dog").expect("plugin-dog library"),
            bananas: find_library(&search, "plugin-bananas").expect("plugin-bananas library"),
        }
    })
}

/// Runs `gpd` with `args` from an empty directory, with every `GPD_*`
/// variable cleared and `env` applied on top.
pub fn run_gpd(args: &[&Path], env: &[(&str, &str)]) -> Output {
    let cwd = tempfile::tempdir().expect("tempdir");
    let mut command = Command::new(env!("CARGO_BIN_EXE_gpd"));
    command.current_dir(cwd.path()).env_remove("RUST_LOG");

    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("GPD") {
            command.env_remove(key);
        }
    }

    command
        .args(args)
        .envs(env.iter().copied())
        .output()
        .expect("spawn gpd")
}

/// Stdout of a finished run as UTF-8.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished run as UTF-8.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn build_plugins() -> PathBuf {
    let workspace = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let target_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("plugins");

    let status = Command::new(cargo_bin())
        .arg("build")
        .arg("--manifest-path")
        .arg(workspace.join("Cargo.toml"))
        .arg("--target-dir")
        .arg(&target_dir)
        .args(["-p", "gpd", "-p", "plugin-dog", "-p", "plugin-bananas"])
        .current_dir(&workspace)
        .status()
        .expect("spawn cargo build for example plugins");
    assert!(status.success(), "example plugin build failed");

    target_dir
}

fn cargo_bin() -> String {
    std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string())
}

/// Newest `lib<crate>[-hash].<ext>` shared library in `dirs`.
fn find_library(dirs: &[PathBuf], crate_name: &str) -> Option<PathBuf> {
    let stem = format!("{DLL_PREFIX}{}", crate_name.replace('-', "_"));

    dirs.iter()
        .filter_map(|dir| std::fs::read_dir(dir).ok())
        .flatten()
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.strip_prefix(&stem)
                .and_then(|rest| rest.strip_suffix(DLL_SUFFIX))
                .is_some_and(|hash| hash.is_empty() || hash.starts_with('-'))
        })
        .filter_map(|entry| {
            let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, entry.path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}
