//! GPD host: loads a plugin unit at runtime and drives its exports.
//!
//! Main entry point: parses arguments, loads configuration, initializes
//! logging, then runs the host on a blocking thread with Ctrl-C wired to
//! the root context.

mod cli;
mod host;

use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, fmt};

use gpd_core::config::AppConfig;
use gpd_core::config::logging::LoggingConfig;
use gpd_core::error::AppError;
use gpd_plugin::Context;

use cli::{Cli, Parsed};
use host::Host;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(Parsed::Run(cli)) => cli,
        Ok(Parsed::Exit) => return ExitCode::SUCCESS,
        Err(e) => return fail(&e),
    };

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    init_logging(&config.logging);

    match run(config, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

/// Initialize tracing/logging. Logs go to stderr; stdout belongs to
/// plugin output.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

async fn run(config: AppConfig, cli: Cli) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        convention = %config.host.convention,
        "Starting gpd host"
    );

    let ctx = Context::background();
    let token = ctx.token().clone();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling host run");
            token.cancel();
        }
    });

    let host = Host::new(config);
    let plugin = cli.plugin;
    let result = tokio::task::spawn_blocking(move || host.run(&ctx, plugin.as_deref()))
        .await
        .map_err(|e| AppError::internal(format!("host task failed: {e}")))?;

    signal.abort();
    result
}

fn fail(error: &AppError) -> ExitCode {
    tracing::debug!(kind = %error.kind, "Host run failed");
    eprintln!("error: {}", error.diagnostic());
    ExitCode::from(error.exit_code())
}
