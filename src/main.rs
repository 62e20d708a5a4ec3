//! Flask Forge
//!
//! Backend generator for Flask, SQLAlchemy and Marshmallow applications.
//!
//! This is the main entry point: it installs logging and hands the command
//! line to `forge_cli`.

use forge_cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> ExitCode {
    let cli = Cli::from_env();

    // Initialize logging; RUST_LOG wins over the -v flag
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = forge_cli::VERSION, "flask-forge starting");

    match forge_cli::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
