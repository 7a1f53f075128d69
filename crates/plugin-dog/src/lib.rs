//! Example plugin exporting a `Command` that prints the dog's name.

use std::io::{self, Write};

use gpd_plugin_sdk::prelude::*;

declare_plugin!();
export_command!(speak);

/// Prints the name of `dog` followed by a newline on stdout.
pub fn speak(dog: &dyn Named) {
    let stdout = io::stdout();
    if let Err(e) = write_name(&mut stdout.lock(), dog) {
        tracing::warn!(error = %e, "Failed to write the dog's name");
    }
}

fn write_name(out: &mut impl Write, dog: &dyn Named) -> io::Result<()> {
    writeln!(out, "{}", dog.name())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpd_plugin::CommandShape;
    use gpd_plugin::PluginLoader;
    use gpd_plugin::abi::{BUILD_TAG_SYMBOL, COMMAND_SYMBOL};
    use gpd_plugin::loader::{StaticOpener, StaticUnit};

    struct Dog;

    impl Named for Dog {
        fn name(&self) -> String {
            "Lucy".to_string()
        }
    }

    #[test]
    fn test_write_name_appends_newline() {
        let mut buf = Vec::new();
        write_name(&mut buf, &Dog).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "Lucy\n");
    }

    #[test]
    fn test_exports_satisfy_command_contract() {
        assert!(gpd_build_tag.is_compatible(), "{BUILD_TAG_SYMBOL} must match the host");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("libplugin_dog.so");
        std::fs::write(&path, b"plugin").expect("write");

        let unit = StaticUnit::new(&path)
            .with_build_tag(Some(gpd_build_tag))
            .with_export(COMMAND_SYMBOL, &Command);
        let loader = PluginLoader::with_opener(StaticOpener::new().with_unit(unit));

        let handle = loader.open(&path, &ModuleRegistry::new()).expect("open");
        let command = handle
            .lookup(COMMAND_SYMBOL)
            .expect("lookup")
            .assert_shape::<CommandShape>()
            .expect("shape");
        command(&Dog);
    }
}
