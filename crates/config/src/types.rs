//! Configuration types for grafana-sync.
//!
//! Responsibilities:
//! - Define connection settings (URL, TLS verification, timeout, retries).
//! - Define authentication strategies (API token, basic credentials).
//! - Define the dashboard source location variants.
//!
//! Does NOT handle:
//! - Configuration loading from env (see `loader` module).
//! - Resource-property parsing (see `properties` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - All secret values use `secrecy::SecretString` to prevent accidental
//!   logging; `Debug` output never contains them.
//! - Duration fields are serialized as whole seconds.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};

/// Module for serializing Duration as seconds (integer).
pub(crate) mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Module for serializing SecretString as plain strings.
///
/// Serialization exposes the secret; this exists for wire contracts that
/// must round-trip the value. Secrecy is a runtime-logging safeguard.
pub mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Connection configuration for the Grafana instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the Grafana instance (e.g. https://grafana.example.org)
    pub base_url: String,
    /// Whether to skip TLS verification (for self-signed certificates)
    pub skip_verify: bool,
    /// Per-request timeout (serialized as seconds)
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
    /// Maximum number of retries for failed requests
    pub max_retries: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Strategy for authenticating with Grafana.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthStrategy {
    /// Static API token (bearer authentication).
    #[serde(rename = "token")]
    ApiToken {
        #[serde(with = "secret_string")]
        token: SecretString,
    },
    /// Username and password (HTTP basic authentication).
    #[serde(rename = "basic")]
    Basic {
        username: String,
        #[serde(with = "secret_string")]
        password: SecretString,
    },
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The authentication strategy to use.
    #[serde(flatten)]
    pub strategy: AuthStrategy,
}

/// Main configuration structure for talking to one Grafana instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Authentication settings
    pub auth: AuthConfig,
}

/// Where the dashboard definition bytes live.
///
/// Exactly one variant is populated per managed dashboard; the property
/// parser rejects partial or conflicting combinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSpec {
    /// An object in a bucket-style store.
    ObjectStore { bucket: String, key: String },
    /// A file on the local filesystem.
    LocalFile { path: PathBuf },
    /// The definition content carried inline in the properties.
    Inline { content: String },
}

impl SourceSpec {
    /// Human-readable location for log lines and failure reasons.
    pub fn describe(&self) -> String {
        match self {
            Self::ObjectStore { bucket, key } => format!("s3://{}/{}", bucket, key),
            Self::LocalFile { path } => path.display().to_string(),
            Self::Inline { .. } => "inline dashboard_json".to_string(),
        }
    }
}

/// Per-dashboard settings carried by one lifecycle event.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Caller-chosen stable identifier; source of all derived identity fields.
    pub logical_name: String,
    /// Definition location; absent on Delete events.
    pub source: Option<SourceSpec>,
    /// Expected fingerprint of the source content, when the wiring layer pins one.
    pub content_hash: Option<String>,
    /// Grafana folder to import into.
    pub folder_uid: Option<String>,
}
