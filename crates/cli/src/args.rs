//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see the `commands` module).
//! - Does not build configuration (see `grafana-sync-config`).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grafana-sync")]
#[command(about = "Synchronize Grafana dashboards from orchestrator lifecycle events", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  grafana-sync invoke --event event.json\n  cat event.json | grafana-sync invoke\n  grafana-sync check -b https://grafana.example.org -a $GRAFANA_API_TOKEN\n  grafana-sync render dashboard.json --name 'Team Latency'\n"
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection overrides for the operational commands.
///
/// `invoke` ignores these: a lifecycle event carries its own connection
/// properties and is processed exactly as the orchestrator sent it.
#[derive(Args)]
pub struct ConnectionArgs {
    /// Base URL of the Grafana instance (e.g., https://grafana.example.org)
    #[arg(short = 'b', long, global = true, env = "GRAFANA_URL")]
    pub base_url: Option<String>,

    /// Username for HTTP Basic authentication
    #[arg(short, long, global = true, env = "GRAFANA_USERNAME")]
    pub username: Option<String>,

    /// Password for HTTP Basic authentication
    #[arg(short, long, global = true, env = "GRAFANA_PASSWORD")]
    pub password: Option<String>,

    /// Service account token for authentication (preferred over username/password)
    #[arg(short, long, global = true, env = "GRAFANA_API_TOKEN")]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "GRAFANA_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    /// Maximum number of retries for failed requests
    #[arg(long, global = true, env = "GRAFANA_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// Skip TLS certificate verification (for self-hosted Grafana)
    #[arg(long, global = true, env = "GRAFANA_SKIP_VERIFY")]
    pub skip_verify: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one lifecycle event end to end
    ///
    /// Reads the orchestrator event document, runs the dashboard lifecycle
    /// against the Grafana instance named in the event properties, and
    /// delivers the outcome to the pre-signed callback URL. Events without
    /// a callback URL run in direct mode: the response body is printed to
    /// stdout instead.
    Invoke {
        /// Path to the event JSON document (reads stdin when omitted or "-")
        #[arg(long, value_name = "FILE")]
        event: Option<PathBuf>,
    },

    /// Verify Grafana connectivity and credentials
    ///
    /// Probes the health endpoint with the configured credentials and
    /// reports the instance version and database state.
    Check,

    /// Normalize and fingerprint a dashboard file without touching Grafana
    ///
    /// Shows the uid, title, and content hash the sync would apply for the
    /// given logical name. Useful for previewing identity changes before
    /// an orchestrator rollout.
    Render {
        /// Path to the exported dashboard JSON
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Logical dashboard name the identity is derived from
        #[arg(long, value_name = "NAME")]
        name: String,

        /// Print the normalized document instead of the identity summary
        #[arg(long)]
        document: bool,
    },
}
