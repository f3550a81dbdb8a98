//! Common test utilities for handler integration tests.
//!
//! Provides event builders wired for a wiremock Grafana and an in-memory
//! source store, so every test constructs lifecycle events the same way.

#[allow(unused_imports)]
pub use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

use serde_json::json;

use grafana_sync_config::ResourceProperties;
use grafana_sync_handler::{HandlerContext, LifecycleEvent, RequestType, SourceStore};

/// Token the test events authenticate with.
pub const TEST_TOKEN: &str = "glsa_test_token_0123456789abcdef";

/// Logical name used by most tests; derives the uid `team-latency`.
#[allow(dead_code)]
pub const TEST_NAME: &str = "Team Latency";

/// An exported dashboard definition with stale identity fields.
#[allow(dead_code)]
pub fn sample_dashboard() -> serde_json::Value {
    json!({
        "uid": "exported-uid",
        "title": "Exported Title",
        "id": 42,
        "version": 7,
        "panels": [{"type": "timeseries", "title": "p95 latency"}],
        "tags": ["latency"]
    })
}

/// Context backed by an in-memory source store.
pub fn test_context() -> HandlerContext {
    HandlerContext::with_source(SourceStore::in_memory())
}

/// Base properties all events share: where Grafana is and how to
/// authenticate. `max_retries` is pinned so tests never wait on backoff.
pub fn base_properties(grafana_url: &str) -> Vec<(String, String)> {
    vec![
        ("grafana_url".to_string(), grafana_url.to_string()),
        ("grafana_pw".to_string(), TEST_TOKEN.to_string()),
        ("max_retries".to_string(), "1".to_string()),
    ]
}

/// Event whose dashboard definition is carried inline.
#[allow(dead_code)]
pub fn inline_event(
    request_type: RequestType,
    grafana_url: &str,
    name: &str,
    document: &serde_json::Value,
) -> LifecycleEvent {
    let mut pairs = base_properties(grafana_url);
    pairs.push(("dashboard_app_name".to_string(), name.to_string()));
    pairs.push(("dashboard_json".to_string(), document.to_string()));
    LifecycleEvent::new(request_type, ResourceProperties::from_pairs(pairs))
}

/// Event that points at an object in the (in-memory) store.
#[allow(dead_code)]
pub fn object_event(
    request_type: RequestType,
    grafana_url: &str,
    name: &str,
    bucket: &str,
    key: &str,
) -> LifecycleEvent {
    let mut pairs = base_properties(grafana_url);
    pairs.push(("dashboard_app_name".to_string(), name.to_string()));
    pairs.push(("bucket_name".to_string(), bucket.to_string()));
    pairs.push(("object_key".to_string(), key.to_string()));
    LifecycleEvent::new(request_type, ResourceProperties::from_pairs(pairs))
}

/// Canned success body for `POST /api/dashboards/db`.
#[allow(dead_code)]
pub fn upsert_success(uid: &str) -> serde_json::Value {
    json!({
        "id": 17,
        "uid": uid,
        "url": format!("/d/{uid}/slug"),
        "status": "success",
        "version": 2,
        "slug": "slug"
    })
}
