//! Secret protection tests for the Grafana client.
//!
//! This module verifies that credentials are properly protected from
//! accidental exposure through Debug output or error messages. Failure
//! reasons produced from these errors end up in orchestrator consoles
//! and logs, so nothing secret may leak through them.
//!
//! What this module does NOT handle:
//! - Network-level secret transmission security (TLS handles this)
//! - Secret storage at rest (environment and secret managers handle this)

mod common;

use common::*;
use serde_json::json;
use wiremock::matchers::{method, path};

use grafana_sync_client::ClientError;

/// Test that the API token is not exposed in the client's Debug output.
#[test]
fn test_token_not_in_client_debug_output() {
    let client = test_client("https://grafana.example.org", 0);
    let debug_output = format!("{:?}", client);

    assert!(
        !debug_output.contains(TEST_TOKEN),
        "Debug output should not contain the API token. Output: {}",
        debug_output
    );
}

/// Test that a 401 error formatted for reporting never carries the token.
///
/// The Authorization header value must not round-trip into the error even
/// when the server echoes request details back.
#[tokio::test]
async fn test_auth_failure_error_does_not_leak_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "invalid API key"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 0);
    let err = client.health().await.unwrap_err();

    let display = err.to_string();
    let debug = format!("{:?}", err);
    assert!(!display.contains(TEST_TOKEN));
    assert!(!debug.contains(TEST_TOKEN));
    assert!(display.contains("401"));
}

/// Test that basic-auth passwords never appear in errors.
#[tokio::test]
async fn test_basic_auth_error_does_not_leak_password() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/x"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "permission denied"
        })))
        .mount(&mock_server)
        .await;

    let password = "extremely-secret-password";
    let client = test_basic_client(&mock_server.uri(), "admin", password);
    let err = client.dashboard_by_uid("x").await.unwrap_err();

    assert!(!err.to_string().contains(password));
    assert!(!format!("{:?}", err).contains(password));
}

/// Test that error body passthrough does not invent content: the message
/// in the error is exactly what Grafana sent.
#[tokio::test]
async fn test_error_message_is_server_provided() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "permission denied"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 0);
    let err = client.health().await.unwrap_err();

    match err {
        ClientError::ApiError { message, .. } => assert_eq!(message, "permission denied"),
        other => panic!("expected ApiError, got {:?}", other),
    }
}
