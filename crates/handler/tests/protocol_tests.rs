//! Callback delivery tests against a mock pre-signed endpoint.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use grafana_sync_handler::{
    CallbackContext, LifecycleResponse, ProtocolError, ResponseBody, deliver_response,
};

/// The pre-signed URL is signed without a Content-Type header; sending
/// one invalidates the signature, so its absence is part of the contract.
struct NoContentType;

impl Match for NoContentType {
    fn matches(&self, request: &Request) -> bool {
        request.headers.get("content-type").is_none()
    }
}

fn sample_body() -> ResponseBody {
    let callback = CallbackContext {
        response_url: None,
        stack_id: Some("arn:aws:cloudformation:eu-west-1:123456789012:stack/obs/guid".to_string()),
        request_id: Some("req-42".to_string()),
        logical_resource_id: Some("TeamLatencyDashboard".to_string()),
    };
    ResponseBody::assemble(
        &callback,
        LifecycleResponse::success("team-latency").with_data("dashboard_uid", "team-latency"),
    )
}

#[tokio::test]
async fn test_delivery_put_contract() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/callback/signed"))
        .and(NoContentType)
        .and(body_partial_json(json!({
            "Status": "SUCCESS",
            "PhysicalResourceId": "team-latency",
            "RequestId": "req-42",
            "LogicalResourceId": "TeamLatencyDashboard",
            "Data": {"dashboard_uid": "team-latency"}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let url = format!("{}/callback/signed", server.uri());
    deliver_response(&http, &url, &sample_body()).await.unwrap();
}

#[tokio::test]
async fn test_delivery_retries_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/callback/signed"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/callback/signed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let url = format!("{}/callback/signed", server.uri());

    let started = Instant::now();
    deliver_response(&http, &url, &sample_body()).await.unwrap();
    // One backoff period passed before the retry.
    assert!(started.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_delivery_failure_surfaces_error() {
    let server = MockServer::start().await;
    // An expired signature fails with 403, which is not retryable.
    Mock::given(method("PUT"))
        .and(path("/callback/signed"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<Error><Code>AccessDenied</Code><Message>Request has expired</Message></Error>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let url = format!("{}/callback/signed", server.uri());

    let err = deliver_response(&http, &url, &sample_body())
        .await
        .unwrap_err();
    match err {
        ProtocolError::Delivery(inner) => {
            assert!(inner.to_string().contains("403"), "error: {inner}");
        }
        other => panic!("expected Delivery, got {:?}", other),
    }
}
