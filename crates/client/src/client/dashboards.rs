//! Dashboard read/write methods.

use reqwest::Method;
use tracing::debug;

use crate::client::GrafanaClient;
use crate::error::{ClientError, Result};
use crate::models::{
    DashboardEnvelope, DeleteDashboardResponse, UpsertDashboardRequest, UpsertDashboardResponse,
};
use crate::request::{encode_path_segment, send_request_with_retry};

impl GrafanaClient {
    /// Create or replace a dashboard.
    ///
    /// The request carries `overwrite: true`, so an existing dashboard
    /// under the same uid is replaced and a missing one is created; the
    /// caller never needs to know which case applied.
    pub async fn upsert_dashboard(
        &self,
        request: &UpsertDashboardRequest,
    ) -> Result<UpsertDashboardResponse> {
        let builder = self.request(Method::POST, "/api/dashboards/db").json(request);
        let response = send_request_with_retry(builder, self.max_retries).await?;
        let parsed: UpsertDashboardResponse = response.json().await?;
        debug!(uid = %parsed.uid, version = ?parsed.version, "Dashboard stored");
        Ok(parsed)
    }

    /// Fetch the dashboard stored under `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no dashboard exists under
    /// the uid, so callers can branch on absence without status matching.
    pub async fn dashboard_by_uid(&self, uid: &str) -> Result<DashboardEnvelope> {
        let path = format!("/api/dashboards/uid/{}", encode_path_segment(uid));
        let builder = self.request(Method::GET, &path);
        match send_request_with_retry(builder, self.max_retries).await {
            Ok(response) => Ok(response.json().await?),
            Err(ClientError::ApiError { status: 404, .. }) => {
                Err(ClientError::NotFound(uid.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the dashboard stored under `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no dashboard exists under
    /// the uid. Callers treating deletion as idempotent can map that to
    /// success.
    pub async fn delete_dashboard(&self, uid: &str) -> Result<DeleteDashboardResponse> {
        let path = format!("/api/dashboards/uid/{}", encode_path_segment(uid));
        let builder = self.request(Method::DELETE, &path);
        match send_request_with_retry(builder, self.max_retries).await {
            Ok(response) => Ok(response.json().await?),
            Err(ClientError::ApiError { status: 404, .. }) => {
                Err(ClientError::NotFound(uid.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
