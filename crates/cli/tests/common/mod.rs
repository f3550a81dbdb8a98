//! Shared test utilities for grafana-sync integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Build lifecycle event documents pointed at a mock Grafana.
//!
//! Invariants / Assumptions:
//! - All integration tests using these helpers are hermetic by default:
//!   no host `GRAFANA_*` or AWS credentials leak into the binary.

use assert_cmd::Command;
use serde_json::{Value, json};

/// Token used by mock-backed tests.
pub const TEST_TOKEN: &str = "glsa_cli_test_token_0123456789abcdef";

/// Returns a hermetic `grafana-sync` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Connection and credential env vars are cleared so nothing leaks
///   from the host environment.
pub fn sync_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("grafana-sync");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    // Clear potential host leakage
    cmd.env_remove("GRAFANA_URL")
        .env_remove("GRAFANA_API_TOKEN")
        .env_remove("GRAFANA_USERNAME")
        .env_remove("GRAFANA_PASSWORD")
        .env_remove("GRAFANA_TIMEOUT_SECS")
        .env_remove("GRAFANA_MAX_RETRIES")
        .env_remove("GRAFANA_SKIP_VERIFY")
        .env_remove("AWS_ACCESS_KEY_ID")
        .env_remove("AWS_SECRET_ACCESS_KEY")
        .env_remove("AWS_DEFAULT_REGION")
        .env_remove("RUST_LOG");

    cmd
}

/// Resource properties for an inline-source event against `grafana_url`.
///
/// `max_retries` is pinned to 1 so failure tests finish in one backoff
/// cycle instead of the default three.
#[allow(dead_code)]
pub fn base_properties(grafana_url: &str) -> Value {
    json!({
        "dashboard_app_name": "Team Latency",
        "grafana_url": grafana_url,
        "grafana_pw": TEST_TOKEN,
        "max_retries": "1",
        "dashboard_json": sample_dashboard().to_string(),
    })
}

/// A small exported dashboard whose identity fields the sync rewrites.
#[allow(dead_code)]
pub fn sample_dashboard() -> Value {
    json!({
        "uid": "exported-uid",
        "title": "Exported Title",
        "id": 42,
        "version": 7,
        "panels": [{"type": "graph", "title": "p99 latency"}],
        "tags": ["latency"],
    })
}

/// A direct-mode Create event (no ResponseURL).
#[allow(dead_code)]
pub fn direct_event(grafana_url: &str) -> Value {
    json!({
        "RequestType": "Create",
        "StackId": "arn:aws:cloudformation:eu-west-1:123456789012:stack/observability/guid",
        "RequestId": "6b9c7f00-4242-4242-4242-6f3c4d5e6f70",
        "LogicalResourceId": "TeamLatencyDashboard",
        "ResourceProperties": base_properties(grafana_url),
    })
}

/// A Create event that reports back to `callback_url`.
#[allow(dead_code)]
pub fn callback_event(grafana_url: &str, callback_url: &str) -> Value {
    let mut event = direct_event(grafana_url);
    event["ResponseURL"] = json!(callback_url);
    event
}

/// The upsert response Grafana sends on success.
#[allow(dead_code)]
pub fn upsert_success(uid: &str) -> Value {
    json!({
        "id": 17,
        "uid": uid,
        "url": format!("/d/{uid}/team-latency"),
        "status": "success",
        "version": 1,
        "slug": "team-latency",
    })
}
