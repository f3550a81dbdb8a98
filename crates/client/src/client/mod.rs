//! Main Grafana HTTP API client and API methods.
//!
//! This module provides the primary [`GrafanaClient`] for the small slice
//! of the Grafana HTTP API the sync pipeline needs: dashboard upsert,
//! lookup, delete, and the health probe.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `dashboards`: Dashboard read/write methods
//! - `health`: Instance health probe
//!
//! # What this module does NOT handle:
//! - Retry and backoff mechanics (delegated to [`crate::request`])
//! - Dashboard identity normalization (lives in the handler crate; the
//!   client sends whatever definition it is given)
//!
//! # Invariants
//! - Every request carries the configured credentials; there is no
//!   unauthenticated code path.
//! - `base_url` never ends with a slash, so path concatenation is safe.

pub mod builder;

mod dashboards;
mod health;

use reqwest::Method;

use crate::auth::AuthStrategy;

/// Grafana HTTP API client.
///
/// # Creating a Client
///
/// Use [`GrafanaClient::builder()`] to create a new client:
///
/// ```rust,ignore
/// use grafana_sync_client::{AuthStrategy, GrafanaClient};
/// use secrecy::SecretString;
///
/// let client = GrafanaClient::builder()
///     .base_url("https://grafana.example.org".to_string())
///     .auth_strategy(AuthStrategy::ApiToken {
///         token: SecretString::new("glsa_token".to_string().into()),
///     })
///     .build()?;
/// ```
///
/// # Authentication
///
/// The client supports two authentication strategies:
/// - `AuthStrategy::ApiToken`: Service-account/API token (bearer)
/// - `AuthStrategy::Basic`: Username and password
#[derive(Debug)]
pub struct GrafanaClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) auth: AuthStrategy,
    pub(crate) max_retries: usize,
}

impl GrafanaClient {
    /// Create a new client builder.
    ///
    /// This is the entry point for constructing a [`GrafanaClient`].
    pub fn builder() -> builder::GrafanaClientBuilder {
        builder::GrafanaClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if we're using API token auth.
    pub fn is_api_token_auth(&self) -> bool {
        self.auth.is_api_token()
    }

    /// Build an authenticated request for an API path under the base URL.
    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.auth.apply(self.http.request(method, url))
    }
}
