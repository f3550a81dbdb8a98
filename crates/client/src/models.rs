//! Request and response payloads for the Grafana HTTP API.
//!
//! Dashboard definitions themselves are carried as raw `serde_json::Value`
//! trees. Grafana's dashboard schema is large and versioned; the sync
//! pipeline only rewrites identity fields and otherwise passes panels,
//! templating, and everything else through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/dashboards/db`.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertDashboardRequest {
    /// The full dashboard definition.
    pub dashboard: Value,
    /// Replace an existing dashboard with the same uid instead of failing.
    pub overwrite: bool,
    /// Folder to place the dashboard in; omitted means the General folder.
    #[serde(rename = "folderUid", skip_serializing_if = "Option::is_none")]
    pub folder_uid: Option<String>,
    /// Commit message shown in the dashboard's version history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpsertDashboardRequest {
    /// Builds the standard overwrite-by-uid payload the sync pipeline sends.
    pub fn new(dashboard: Value, folder_uid: Option<String>) -> Self {
        Self {
            dashboard,
            overwrite: true,
            folder_uid,
            message: None,
        }
    }
}

/// Response of `POST /api/dashboards/db`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertDashboardResponse {
    /// Server-assigned numeric id.
    pub id: Option<i64>,
    /// The uid the dashboard is now stored under.
    pub uid: String,
    /// Path of the dashboard in the Grafana UI.
    #[serde(default)]
    pub url: Option<String>,
    /// "success" on the happy path.
    #[serde(default)]
    pub status: Option<String>,
    /// Version after the write.
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Response of `GET /api/dashboards/uid/{uid}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardEnvelope {
    /// The stored dashboard definition.
    pub dashboard: Value,
    /// Placement and bookkeeping data maintained by Grafana.
    #[serde(default)]
    pub meta: DashboardMeta,
}

/// The `meta` object Grafana attaches to a fetched dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardMeta {
    #[serde(default, rename = "folderUid")]
    pub folder_uid: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
}

/// Response of `DELETE /api/dashboards/uid/{uid}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteDashboardResponse {
    /// Title of the dashboard that was removed.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// "ok" when the backing database is reachable.
    pub database: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
}

impl HealthResponse {
    /// Whether the instance reports itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.database.eq_ignore_ascii_case("ok")
    }
}

/// Error body Grafana attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GrafanaErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "traceID")]
    pub trace_id: Option<String>,
}
