//! Command-line definition.

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;

use gpd_core::error::{AppError, ErrorKind};

/// Load a GPD plugin unit and drive its exported modules
#[derive(Debug, Parser)]
#[command(name = "gpd", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "GPD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Plugin unit to load. Without it nothing is loaded.
    pub plugin: Option<PathBuf>,
}

/// Outcome of parsing the command line.
#[derive(Debug)]
pub enum Parsed {
    /// Arguments are valid.
    Run(Cli),
    /// Help or version was requested and has been printed.
    Exit,
}

impl Cli {
    /// Parses `args`, mapping every usage error to `InvalidArgs`.
    pub fn parse_args<I, T>(args: I) -> Result<Parsed, AppError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Ok(Parsed::Run(cli)),
            Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => {
                e.print()
                    .map_err(|io| AppError::with_source(ErrorKind::Internal, "failed to print usage", io))?;
                Ok(Parsed::Exit)
            }
            Err(e) => Err(AppError::invalid_args(usage_detail(&e))),
        }
    }
}

/// First line of a clap error, without its `error: ` prefix.
fn usage_detail(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Cli {
        match Cli::parse_args(args.iter().copied()).expect("valid args") {
            Parsed::Run(cli) => cli,
            Parsed::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn test_no_plugin_path() {
        let cli = run(&["gpd"]);
        assert!(cli.plugin.is_none());
    }

    #[test]
    fn test_plugin_path_and_config() {
        let cli = run(&["gpd", "--config", "host.toml", "plugin.so"]);
        assert_eq!(cli.plugin, Some(PathBuf::from("plugin.so")));
        assert_eq!(cli.config, Some(PathBuf::from("host.toml")));
    }

    #[test]
    fn test_extra_argument_is_invalid() {
        let err = Cli::parse_args(["gpd", "one.so", "two.so"]).expect_err("two paths");
        assert_eq!(err.kind, ErrorKind::InvalidArgs);
        assert!(!err.message.starts_with("error:"));
    }

    #[test]
    fn test_help_and_version_exit_cleanly() {
        for flag in ["--help", "--version"] {
            let parsed = Cli::parse_args(["gpd", flag]).expect("printing usage succeeds");
            assert!(matches!(parsed, Parsed::Exit), "{flag}");
        }
    }

    #[test]
    fn test_unknown_flag_is_invalid() {
        let err = Cli::parse_args(["gpd", "--bogus"]).expect_err("unknown flag");
        assert_eq!(err.kind, ErrorKind::InvalidArgs);
    }
}
