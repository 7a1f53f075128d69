use std::env;
use std::process::Command;

fn main() {
    // Every field of the build tag that is not a crate version comes from
    // here, so host and plugins built by different toolchains never match.
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let verbose = Command::new(&rustc)
        .arg("-vV")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).into_owned())
        .unwrap_or_default();

    let release = field(&verbose, "release").unwrap_or("unknown");
    let commit = field(&verbose, "commit-hash").unwrap_or("unknown");

    println!("cargo:rustc-env=GPD_RUSTC={release} ({commit})");
    println!(
        "cargo:rustc-env=GPD_TARGET={}",
        env::var("TARGET").unwrap_or_default()
    );
    println!(
        "cargo:rustc-env=GPD_PANIC={}",
        env::var("CARGO_CFG_PANIC").unwrap_or_default()
    );
    println!("cargo:rerun-if-env-changed=RUSTC");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Value of a `key: value` line in `rustc -vV` output.
fn field<'a>(verbose: &'a str, key: &str) -> Option<&'a str> {
    verbose.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        (name.trim() == key).then(|| value.trim())
    })
}
