//! grafana-sync - Command-line shim for the dashboard sync handler.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Drive one lifecycle event end to end (`invoke`) via the handler crate.
//! - Offer operational probes: `check` (connectivity/credentials) and
//!   `render` (offline normalize + fingerprint).
//!
//! Does NOT handle:
//! - Lifecycle semantics or the orchestrator contract (see `crates/handler`).
//! - Grafana HTTP specifics (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide
//!   clap env defaults.
//! - Every failure path exits through `ExitCode` so scripts can branch on
//!   the failure class.

mod args;
mod commands;
mod error;

use args::Cli;
use clap::Parser;
use commands::run_command;
use error::{ExitCode, ExitCodeExt};
use grafana_sync_config::ConfigLoader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Load .env BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let exit_code = match run_command(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
