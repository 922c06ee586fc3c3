//! env-typed-checker CLI
//!
//! Checks the process environment (plus an optional `.env` overlay) against a
//! JSON schema and exits 0, 1 or 2.

use std::process::ExitCode;

use env_typed_checker::{cli, RealEnv};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let outcome = cli::run(
        std::env::args_os(),
        &RealEnv::new(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    outcome.into()
}
