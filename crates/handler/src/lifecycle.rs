//! Lifecycle event processing.
//!
//! **Responsibilities:**
//! - Drive one event through fetch, normalize, compare, and apply
//! - Map lifecycle semantics onto the Grafana API (Create/Update upsert,
//!   Delete removes, renames replace)
//! - Absorb every failure into a Failed response with a usable reason
//!
//! **Does NOT handle:**
//! - The callback envelope and response delivery (see `protocol`)
//! - Property parsing and credential resolution (config crate)
//!
//! **Invariants:**
//! - [`handle`] never panics out and never errors; one event in, one
//!   response out
//! - The response's `physical_resource_id` is never empty, so failed
//!   Creates can still be rolled back by the orchestrator
//! - Reason text is scrubbed against the event credential before it
//!   leaves this module

use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::error::HandlerError;
use crate::event::{LifecycleEvent, LifecycleResponse, RequestType};
use crate::fingerprint::fingerprint_document;
use crate::normalize::{derive_uid, normalize, normalize_slice};
use crate::source::SourceStore;
use grafana_sync_client::{GrafanaClient, UpsertDashboardRequest};
use grafana_sync_config::constants::{
    DEFAULT_INVOCATION_BUDGET_SECS, MAX_INVOCATION_BUDGET_SECS, MIN_SOFT_DEADLINE_SECS,
    RESPONSE_DELIVERY_RESERVE_SECS,
};
use grafana_sync_config::{ConfigError, ConfigLoader, ResourceProperties, keys};

/// Physical id reported when an event fails before any identity can be
/// derived. Keeps rollback Deletes routable; deleting it is a no-op.
const UNRESOLVED_PHYSICAL_ID: &str = "grafana-dashboard-unresolved";

/// Response data keys surfaced as resource attributes.
const DATA_DASHBOARD_UID: &str = "dashboard_uid";
const DATA_DASHBOARD_URL: &str = "dashboard_url";
const DATA_CONTENT_HASH: &str = "content_hash";

/// Per-process plumbing shared across invocations.
///
/// Everything correctness-relevant comes from the event itself; the
/// context only carries the source store and an HTTP connection pool for
/// response delivery. Cloning shares both.
#[derive(Clone)]
pub struct HandlerContext {
    source: SourceStore,
    http: reqwest::Client,
}

impl HandlerContext {
    /// Context for production use: sources resolve against Amazon S3.
    pub fn new() -> Self {
        Self::with_source(SourceStore::amazon())
    }

    /// Context with an explicit source store. Tests use this with
    /// [`SourceStore::in_memory`].
    pub fn with_source(source: SourceStore) -> Self {
        Self {
            source,
            http: reqwest::Client::new(),
        }
    }

    pub fn source(&self) -> &SourceStore {
        &self.source
    }

    /// Shared pool for callback delivery.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

impl Default for HandlerContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Process one lifecycle event to completion.
///
/// Runs the pipeline under a soft deadline derived from the event's
/// `timeout_seconds` budget, leaving room to deliver the response. Every
/// outcome, including timeout, becomes a [`LifecycleResponse`].
pub async fn handle(event: LifecycleEvent, ctx: &HandlerContext) -> LifecycleResponse {
    let physical_id = fallback_physical_id(&event);
    let deadline = soft_deadline(&event.resource_properties);

    info!(
        request_type = event.request_type.as_str(),
        physical_id = %physical_id,
        "Processing lifecycle event"
    );

    let response = match tokio::time::timeout(deadline, run(&event, ctx)).await {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            warn!(
                request_type = event.request_type.as_str(),
                error = %err,
                "Lifecycle event failed"
            );
            LifecycleResponse::failed(physical_id, err.to_string())
        }
        Err(_) => {
            let err = HandlerError::Timeout(deadline);
            warn!(request_type = event.request_type.as_str(), error = %err, "Lifecycle event timed out");
            LifecycleResponse::failed(physical_id, err.to_string())
        }
    };

    scrub_response(response, &event.resource_properties)
}

/// Physical id to report when the pipeline fails before resolving one.
///
/// The inbound id is preserved so a failed Update or Delete never
/// confuses the orchestrator's identity tracking; a failed Create falls
/// back to the uid the dashboard would have had.
pub fn fallback_physical_id(event: &LifecycleEvent) -> String {
    if let Some(id) = inbound_physical_id(event) {
        return id.to_string();
    }
    if let Some(name) = event.resource_properties.logical_name()
        && let Ok(uid) = derive_uid(name)
    {
        return uid;
    }
    UNRESOLVED_PHYSICAL_ID.to_string()
}

async fn run(
    event: &LifecycleEvent,
    ctx: &HandlerContext,
) -> Result<LifecycleResponse, HandlerError> {
    match event.request_type {
        RequestType::Create | RequestType::Update => apply(event, ctx).await,
        RequestType::Delete => delete(event).await,
    }
}

/// Create and Update share one path: fetch, normalize, compare, upsert.
async fn apply(
    event: &LifecycleEvent,
    ctx: &HandlerContext,
) -> Result<LifecycleResponse, HandlerError> {
    let props = &event.resource_properties;
    let dashboard = props.dashboard_config()?;
    let source = dashboard.source.as_ref().ok_or(HandlerError::MissingSource)?;

    let bytes = ctx.source().fetch(source).await?;
    let normalized = normalize_slice(&bytes, &dashboard.logical_name)?;
    let content_hash = fingerprint_document(&normalized.document)
        .map_err(|e| HandlerError::MalformedDocument(e.to_string()))?;

    // Fingerprints detect change, they do not enforce integrity; a pinned
    // hash that disagrees with the fetched content is worth a warning but
    // the fetched content wins.
    if let Some(expected) = &dashboard.content_hash
        && expected != &content_hash
    {
        warn!(
            expected = %expected,
            computed = %content_hash,
            source = %source.describe(),
            "Pinned content_hash does not match fetched content"
        );
    }

    let client = client_for_event(props)?;

    // A changed logical name derives a new uid: that is a replacement,
    // not an update in place. Returning the new uid makes the
    // orchestrator clean up the old dashboard with its own Delete.
    let replacement = event.request_type == RequestType::Update
        && inbound_physical_id(event).is_some_and(|id| id != normalized.uid);
    if replacement {
        info!(
            old_uid = ?event.physical_resource_id,
            new_uid = %normalized.uid,
            "Logical name changed; creating replacement dashboard"
        );
    }

    if event.request_type == RequestType::Update && !replacement {
        let last = last_applied_fingerprint(
            event.old_resource_properties.as_ref(),
            &client,
            &dashboard.logical_name,
            &normalized.uid,
        )
        .await;
        if last.as_deref() == Some(content_hash.as_str()) {
            info!(uid = %normalized.uid, "Dashboard content unchanged; skipping upsert");
            return Ok(success_response(
                &normalized.uid,
                &content_hash,
                client.base_url(),
            ));
        }
    }

    let request =
        UpsertDashboardRequest::new(normalized.document.clone(), dashboard.folder_uid.clone());
    let result = client.upsert_dashboard(&request).await?;

    info!(
        uid = %result.uid,
        version = ?result.version,
        "Dashboard upserted"
    );

    Ok(success_response(&normalized.uid, &content_hash, client.base_url()))
}

async fn delete(event: &LifecycleEvent) -> Result<LifecycleResponse, HandlerError> {
    let uid = delete_uid(event)?;
    let client = client_for_event(&event.resource_properties)?;

    match client.delete_dashboard(&uid).await {
        Ok(_) => {
            info!(uid = %uid, "Dashboard deleted");
        }
        // Already gone. Deletion is idempotent so rollbacks and stack
        // teardowns never fail on a missing dashboard.
        Err(err) if err.is_not_found() => {
            info!(uid = %uid, "Dashboard already absent");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(LifecycleResponse::success(uid))
}

/// Resolve the fingerprint of the content last applied for this uid.
///
/// Prefers the `content_hash` the previous properties pinned; otherwise
/// re-derives it from the live dashboard. `None` means unknown, which
/// callers treat as changed. Change detection is an optimization and
/// must never fail the deployment.
async fn last_applied_fingerprint(
    old_properties: Option<&ResourceProperties>,
    client: &GrafanaClient,
    logical_name: &str,
    uid: &str,
) -> Option<String> {
    if let Some(old) = old_properties
        && let Some(hash) = old.get_str(keys::CONTENT_HASH)
    {
        return Some(hash.to_string());
    }

    match client.dashboard_by_uid(uid).await {
        Ok(envelope) => match normalize(envelope.dashboard, logical_name) {
            Ok(normalized) => fingerprint_document(&normalized.document).ok(),
            Err(_) => None,
        },
        Err(err) if err.is_not_found() => None,
        Err(err) => {
            warn!(uid, error = %err, "Could not read current dashboard for change detection");
            None
        }
    }
}

fn client_for_event(props: &ResourceProperties) -> Result<GrafanaClient, HandlerError> {
    let config = ConfigLoader::new()
        .from_properties(props)?
        .from_env()?
        .build()?;
    Ok(GrafanaClient::builder().from_config(&config).build()?)
}

fn inbound_physical_id(event: &LifecycleEvent) -> Option<&str> {
    event
        .physical_resource_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn delete_uid(event: &LifecycleEvent) -> Result<String, HandlerError> {
    if let Some(id) = inbound_physical_id(event) {
        return Ok(id.to_string());
    }
    let Some(name) = event.resource_properties.logical_name() else {
        return Err(ConfigError::MissingProperty(keys::DASHBOARD_APP_NAME).into());
    };
    derive_uid(name)
}

fn success_response(uid: &str, content_hash: &str, base_url: &str) -> LifecycleResponse {
    LifecycleResponse::success(uid)
        .with_data(DATA_DASHBOARD_UID, uid)
        .with_data(DATA_CONTENT_HASH, content_hash)
        .with_data(DATA_DASHBOARD_URL, format!("{base_url}/d/{uid}"))
}

/// Budget for the whole pipeline, leaving time to deliver the response.
fn soft_deadline(props: &ResourceProperties) -> Duration {
    let budget = props
        .get_u64(keys::TIMEOUT_SECONDS)
        .ok()
        .flatten()
        .unwrap_or(DEFAULT_INVOCATION_BUDGET_SECS)
        .min(MAX_INVOCATION_BUDGET_SECS);
    let soft = budget
        .saturating_sub(RESPONSE_DELIVERY_RESERVE_SECS)
        .max(MIN_SOFT_DEADLINE_SECS);
    Duration::from_secs(soft)
}

fn scrub_response(
    mut response: LifecycleResponse,
    props: &ResourceProperties,
) -> LifecycleResponse {
    if let Some(reason) = response.reason.take() {
        response.reason = Some(scrub_reason(reason, props));
    }
    response
}

/// Replace any occurrence of the event credential in `reason`.
///
/// Both the raw `grafana_pw` value and the plucked secret are covered.
/// Values shorter than four bytes are left alone; replacing them would
/// mangle unrelated text.
fn scrub_reason(reason: String, props: &ResourceProperties) -> String {
    let raw = props.get_str(keys::GRAFANA_PW).map(str::to_string);
    let plucked = props
        .credential()
        .ok()
        .flatten()
        .map(|secret| secret.expose_secret().to_string());

    let mut scrubbed = reason;
    for secret in [raw, plucked].into_iter().flatten() {
        if secret.len() >= 4 {
            scrubbed = scrubbed.replace(&secret, "[REDACTED]");
        }
    }
    scrubbed
}
