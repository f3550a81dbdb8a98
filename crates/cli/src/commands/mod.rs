//! CLI command implementations.

pub mod check;
pub mod invoke;
pub mod render;

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::error::ExitCode;

/// Dispatch the parsed CLI to its command implementation.
pub async fn run_command(cli: Cli) -> Result<ExitCode> {
    let Cli {
        connection,
        command,
    } = cli;

    match command {
        Commands::Invoke { event } => invoke::run(event.as_deref()).await,
        Commands::Check => check::run(&connection).await,
        Commands::Render {
            file,
            name,
            document,
        } => render::run(&file, &name, document).await,
    }
}
