//! Configuration management for grafana-sync.
//!
//! This crate provides types and loaders for resolving Grafana connection
//! settings and per-dashboard options from lifecycle-event properties and
//! environment variables.

pub mod constants;
mod error;
mod loader;
pub mod properties;
pub mod types;

pub use error::ConfigError;
pub use loader::{ConfigLoader, env_var_or_none};
pub use properties::{ResourceProperties, keys};
pub use types::{
    AuthConfig, AuthStrategy, Config, ConnectionConfig, DashboardConfig, SourceSpec,
};
