//! Grafana HTTP API client.
//!
//! This crate provides a type-safe client for the slice of the Grafana
//! HTTP API that dashboard synchronization needs: upsert, lookup by uid,
//! delete, and the health probe. It supports API token and basic
//! authentication with automatic retry of transient failures.

mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod request;

pub use auth::AuthStrategy;
pub use client::GrafanaClient;
pub use client::builder::GrafanaClientBuilder;
pub use error::{ClientError, Result};
pub use models::{
    DashboardEnvelope, DashboardMeta, DeleteDashboardResponse, HealthResponse,
    UpsertDashboardRequest, UpsertDashboardResponse,
};
