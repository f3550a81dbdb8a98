//! Lifecycle event and response types.
//!
//! These mirror the custom-resource wire shape the orchestrator sends and
//! expects back. Field names on the wire are PascalCase; everything here
//! stays snake_case in Rust and relies on serde renames.
//!
//! **Responsibilities:**
//! - Deserialize the event payload handed to one invocation
//! - Serialize the terminal response (status, physical id, reason, data)
//!
//! **Does NOT handle:**
//! - The outer request envelope and callback delivery (see `protocol`)
//! - Deciding what the response should say (see `lifecycle`)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use grafana_sync_config::ResourceProperties;

/// Which lifecycle transition the orchestrator is requesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl RequestType {
    /// Lowercase label used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Create => "create",
            RequestType::Update => "update",
            RequestType::Delete => "delete",
        }
    }
}

/// One lifecycle event, as seen by the handler after the transport
/// envelope has been peeled off.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: RequestType,

    /// Identity assigned by a previous Create/Update. Absent on Create.
    #[serde(default)]
    pub physical_resource_id: Option<String>,

    /// Desired state for this transition.
    #[serde(default)]
    pub resource_properties: ResourceProperties,

    /// Previous desired state. Only populated on Update.
    #[serde(default)]
    pub old_resource_properties: Option<ResourceProperties>,
}

impl LifecycleEvent {
    /// Convenience constructor used heavily in tests.
    pub fn new(request_type: RequestType, properties: ResourceProperties) -> Self {
        Self {
            request_type,
            physical_resource_id: None,
            resource_properties: properties,
            old_resource_properties: None,
        }
    }

    pub fn with_physical_id(mut self, id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(id.into());
        self
    }

    pub fn with_old_properties(mut self, old: ResourceProperties) -> Self {
        self.old_resource_properties = Some(old);
        self
    }
}

/// Terminal outcome of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// What the handler reports back for one event.
///
/// `data` keys surface as resource attributes on the orchestrator side;
/// the stable keys are `dashboard_uid`, `dashboard_url` and `content_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleResponse {
    pub status: ResponseStatus,

    /// Stable identity of the managed dashboard. Never empty, even on
    /// failure, so the orchestrator can track and later delete it.
    pub physical_resource_id: String,

    /// Operator-facing explanation. Required on failure, optional on
    /// success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl LifecycleResponse {
    pub fn success(physical_resource_id: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            physical_resource_id: physical_resource_id.into(),
            reason: None,
            data: BTreeMap::new(),
        }
    }

    pub fn failed(physical_resource_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Failed,
            physical_resource_id: physical_resource_id.into(),
            reason: Some(reason.into()),
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserializes_pascal_case() {
        let event: LifecycleEvent = serde_json::from_value(serde_json::json!({
            "RequestType": "Update",
            "PhysicalResourceId": "team-latency",
            "ResourceProperties": {
                "dashboard_app_name": "Team Latency"
            },
            "OldResourceProperties": {
                "dashboard_app_name": "Team Latency",
                "content_hash": "abc123"
            }
        }))
        .unwrap();

        assert_eq!(event.request_type, RequestType::Update);
        assert_eq!(event.physical_resource_id.as_deref(), Some("team-latency"));
        assert_eq!(
            event.resource_properties.logical_name().unwrap(),
            "Team Latency"
        );
        let old = event.old_resource_properties.unwrap();
        assert_eq!(old.get_str("content_hash"), Some("abc123"));
    }

    #[test]
    fn test_event_minimal_delete() {
        let event: LifecycleEvent = serde_json::from_value(serde_json::json!({
            "RequestType": "Delete",
            "PhysicalResourceId": "team-latency"
        }))
        .unwrap();

        assert_eq!(event.request_type, RequestType::Delete);
        assert!(event.old_resource_properties.is_none());
    }

    #[test]
    fn test_status_serializes_screaming() {
        let success = serde_json::to_value(ResponseStatus::Success).unwrap();
        assert_eq!(success, serde_json::json!("SUCCESS"));
        let failed = serde_json::to_value(ResponseStatus::Failed).unwrap();
        assert_eq!(failed, serde_json::json!("FAILED"));
    }

    #[test]
    fn test_response_omits_empty_fields() {
        let response = LifecycleResponse::success("team-latency");
        let value = serde_json::to_value(&response).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("reason"));
        assert!(!obj.contains_key("data"));

        let response = LifecycleResponse::failed("team-latency", "boom")
            .with_data("dashboard_uid", "team-latency");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["reason"], "boom");
        assert_eq!(value["data"]["dashboard_uid"], "team-latency");
    }
}
