//! Orchestrator wire protocol: envelope parsing and response delivery.
//!
//! **Responsibilities:**
//! - Parse the raw event document into the lifecycle event plus the
//!   callback identifiers that must be echoed back
//! - Assemble and deliver the response document to the pre-signed
//!   callback URL
//! - Contain handler panics so an event with a response channel is
//!   always answered
//!
//! **Does NOT handle:**
//! - Deciding what the response says (see `lifecycle`)
//!
//! **Invariants:**
//! - The delivery PUT never sets a Content-Type header; the callback URL
//!   is signed without one
//! - `StackId`, `RequestId`, and `LogicalResourceId` are echoed back
//!   exactly as received

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::event::{LifecycleEvent, LifecycleResponse, RequestType, ResponseStatus};
use crate::lifecycle::{HandlerContext, fallback_physical_id, handle};
use grafana_sync_client::ClientError;
use grafana_sync_client::request::send_request_with_retry;
use grafana_sync_config::ResourceProperties;

/// Retry budget for the callback PUT.
const DELIVERY_MAX_RETRIES: usize = 3;

/// Errors at the protocol boundary.
///
/// These are distinct from lifecycle failures: a lifecycle failure still
/// produces a deliverable Failed response, while a protocol error means
/// the event could not be understood or the response could not be
/// handed back.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The event payload could not be parsed, or the response document
    /// could not be serialized.
    #[error("Invalid event payload: {0}")]
    Envelope(#[from] serde_json::Error),

    /// The callback PUT failed after retries.
    #[error("Failed to deliver lifecycle response: {0}")]
    Delivery(#[from] ClientError),
}

/// The raw orchestrator event, as handed to the process.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestEnvelope {
    pub request_type: RequestType,

    /// Pre-signed callback URL. Absent in direct invocations, which
    /// print the response instead.
    #[serde(default, rename = "ResponseURL")]
    pub response_url: Option<String>,

    #[serde(default)]
    pub stack_id: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub logical_resource_id: Option<String>,
    #[serde(default)]
    pub physical_resource_id: Option<String>,

    #[serde(default)]
    pub resource_properties: ResourceProperties,
    #[serde(default)]
    pub old_resource_properties: Option<ResourceProperties>,
}

impl RequestEnvelope {
    /// Parse an envelope from its JSON form.
    pub fn from_json(payload: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Split into what the lifecycle consumes and what delivery needs.
    pub fn into_parts(self) -> (LifecycleEvent, CallbackContext) {
        let event = LifecycleEvent {
            request_type: self.request_type,
            physical_resource_id: self.physical_resource_id,
            resource_properties: self.resource_properties,
            old_resource_properties: self.old_resource_properties,
        };
        let callback = CallbackContext {
            response_url: self.response_url,
            stack_id: self.stack_id,
            request_id: self.request_id,
            logical_resource_id: self.logical_resource_id,
        };
        (event, callback)
    }
}

/// Identifiers needed to answer the orchestrator after processing.
#[derive(Debug, Clone)]
pub struct CallbackContext {
    pub response_url: Option<String>,
    pub stack_id: Option<String>,
    pub request_id: Option<String>,
    pub logical_resource_id: Option<String>,
}

impl CallbackContext {
    /// Whether the event carried a callback URL.
    pub fn has_callback(&self) -> bool {
        self.response_url.is_some()
    }
}

/// The response document PUT back to the callback URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseBody {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub physical_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl ResponseBody {
    /// Build the wire document from the processing outcome plus the
    /// identifiers the orchestrator expects echoed back.
    pub fn assemble(callback: &CallbackContext, response: LifecycleResponse) -> Self {
        Self {
            status: response.status,
            reason: response.reason,
            physical_resource_id: response.physical_resource_id,
            stack_id: callback.stack_id.clone(),
            request_id: callback.request_id.clone(),
            logical_resource_id: callback.logical_resource_id.clone(),
            data: response.data,
        }
    }
}

/// Run the lifecycle in a separate task so a panic becomes a Failed
/// response instead of tearing down the invocation unanswered.
pub async fn handle_contained(event: LifecycleEvent, ctx: HandlerContext) -> LifecycleResponse {
    let fallback = fallback_physical_id(&event);
    let task = tokio::spawn(async move { handle(event, &ctx).await });
    contain(fallback, task).await
}

async fn contain(fallback: String, task: JoinHandle<LifecycleResponse>) -> LifecycleResponse {
    match task.await {
        Ok(response) => response,
        Err(join_err) => {
            error!(error = %join_err, "Lifecycle task aborted");
            LifecycleResponse::failed(
                fallback,
                "Internal error: lifecycle processing aborted unexpectedly",
            )
        }
    }
}

/// PUT the response document to the pre-signed callback URL.
///
/// The body is sent raw: the URL signature covers the absence of a
/// Content-Type header, so `body(...)` is used instead of `json(...)`.
pub async fn deliver_response(
    http: &reqwest::Client,
    url: &str,
    body: &ResponseBody,
) -> Result<(), ProtocolError> {
    let payload = serde_json::to_string(body)?;
    debug!(size = payload.len(), "Delivering lifecycle response");

    let builder = http.put(url).body(payload);
    send_request_with_retry(builder, DELIVERY_MAX_RETRIES).await?;

    info!(status = ?body.status, "Lifecycle response delivered");
    Ok(())
}
