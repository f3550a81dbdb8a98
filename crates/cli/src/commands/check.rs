//! Check command: verify Grafana connectivity and credentials.

use std::time::Duration;

use anyhow::{Result, bail};
use grafana_sync_client::GrafanaClient;
use grafana_sync_config::ConfigLoader;
use tracing::info;

use crate::args::ConnectionArgs;
use crate::error::ExitCode;

/// Probe the health endpoint with the resolved configuration.
///
/// CLI flags are applied first so the environment only fills what the
/// operator left unspecified, mirroring how event properties take
/// precedence during an invocation.
pub async fn run(connection: &ConnectionArgs) -> Result<ExitCode> {
    let mut loader = ConfigLoader::new();

    if let Some(ref url) = connection.base_url {
        loader = loader.with_base_url(url.clone());
    }
    if let Some(ref username) = connection.username {
        loader = loader.with_username(username.clone());
    }
    if let Some(ref password) = connection.password {
        loader = loader.with_password(password.clone());
    }
    if let Some(ref token) = connection.api_token {
        loader = loader.with_api_token(token.clone());
    }
    if let Some(timeout) = connection.timeout {
        loader = loader.with_timeout(Duration::from_secs(timeout));
    }
    if let Some(retries) = connection.max_retries {
        loader = loader.with_max_retries(retries);
    }
    if connection.skip_verify {
        loader = loader.with_skip_verify(true);
    }

    let config = loader.from_env()?.build()?;
    let client = GrafanaClient::builder().from_config(&config).build()?;

    info!(url = client.base_url(), "Probing Grafana health");
    let health = client.health().await?;

    let version = health.version.as_deref().unwrap_or("unknown");
    if !health.is_healthy() {
        bail!(
            "Grafana at {} is reachable but unhealthy: database is {:?} (version {})",
            client.base_url(),
            health.database,
            version
        );
    }

    println!(
        "Grafana at {} is healthy (version {}, database {})",
        client.base_url(),
        version,
        health.database
    );
    Ok(ExitCode::Success)
}
