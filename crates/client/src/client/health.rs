//! Instance health probe.

use reqwest::Method;

use crate::client::GrafanaClient;
use crate::error::Result;
use crate::models::HealthResponse;
use crate::request::send_request_with_retry;

impl GrafanaClient {
    /// Probe `GET /api/health`.
    ///
    /// Grafana answers this endpoint without authentication, but the
    /// credentials are sent anyway so a 401 here surfaces a bad token
    /// before any dashboard write is attempted.
    pub async fn health(&self) -> Result<HealthResponse> {
        let builder = self.request(Method::GET, "/api/health");
        let response = send_request_with_retry(builder, self.max_retries).await?;
        Ok(response.json().await?)
    }
}
