//! Resource-property parsing for lifecycle events.
//!
//! Responsibilities:
//! - Wrap the raw property map carried by a lifecycle event.
//! - Extract typed values (strings, integers, booleans) with coercion from
//!   the string forms the orchestrator commonly sends.
//! - Resolve the credential, including the keyed-JSON secret form.
//! - Resolve the dashboard source location, enforcing the one-source rule.
//!
//! Does NOT handle:
//! - Environment fallbacks or validation of the merged result (see `loader`).
//!
//! Invariants:
//! - `Debug` output never contains the credential value.
//! - Blank property values (empty or whitespace-only strings) are treated
//!   as absent.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::types::{DashboardConfig, SourceSpec};

/// Well-known property names.
pub mod keys {
    /// Base URL of the target Grafana instance.
    pub const GRAFANA_URL: &str = "grafana_url";
    /// API token, or the password when `grafana_user` is set. May hold a
    /// JSON object when `grafana_pw_key` is also set.
    pub const GRAFANA_PW: &str = "grafana_pw";
    /// Key to pluck from `grafana_pw` when it carries a JSON object.
    pub const GRAFANA_PW_KEY: &str = "grafana_pw_key";
    /// Username; presence switches authentication to basic.
    pub const GRAFANA_USER: &str = "grafana_user";
    /// Caller-chosen dashboard name; source of all derived identity fields.
    pub const DASHBOARD_APP_NAME: &str = "dashboard_app_name";
    /// Bucket holding the dashboard definition (paired with `object_key`).
    pub const BUCKET_NAME: &str = "bucket_name";
    /// Object key of the dashboard definition (paired with `bucket_name`).
    pub const OBJECT_KEY: &str = "object_key";
    /// Local filesystem path to the dashboard definition.
    pub const PATH_TO_FILE: &str = "path_to_file";
    /// Dashboard definition carried inline.
    pub const DASHBOARD_JSON: &str = "dashboard_json";
    /// Expected content fingerprint pinned by the wiring layer.
    pub const CONTENT_HASH: &str = "content_hash";
    /// Grafana folder to import the dashboard into.
    pub const FOLDER_UID: &str = "folder_uid";
    /// Per-request timeout override, in seconds.
    pub const TIMEOUT_SECONDS: &str = "timeout_seconds";
    /// Retry-count override for Grafana calls.
    pub const MAX_RETRIES: &str = "max_retries";
    /// Skip TLS verification (self-signed Grafana).
    pub const SKIP_VERIFY: &str = "skip_verify";
    /// Reserved for envelope-encrypted credentials; accepted and ignored.
    pub const KMS_KEY: &str = "kms_key";
    /// Injected by the orchestrator; not a user property.
    pub const SERVICE_TOKEN: &str = "ServiceToken";
}

/// Property names whose values are redacted from `Debug` output.
const SENSITIVE_KEYS: &[&str] = &[keys::GRAFANA_PW];

/// The raw property map of one lifecycle event.
///
/// Values arrive as JSON and are usually strings; typed accessors coerce
/// the common string spellings of numbers and booleans.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceProperties(BTreeMap<String, Value>);

impl ResourceProperties {
    /// Creates an empty property map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a property map from string pairs. Test and CLI convenience.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    /// Returns the raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a trimmed, non-empty string value for `key`.
    ///
    /// Blank values count as absent so that templating layers which render
    /// unset parameters as empty strings do not produce phantom settings.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Returns a non-negative integer value for `key`, coercing from the
    /// string form if necessary.
    pub fn get_u64(&self, key: &'static str) -> Result<Option<u64>, ConfigError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or(ConfigError::InvalidProperty {
                property: key,
                message: "must be a non-negative integer".to_string(),
            }),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<u64>()
                    .map(Some)
                    .map_err(|_| ConfigError::InvalidProperty {
                        property: key,
                        message: format!("expected a non-negative integer, got {trimmed:?}"),
                    })
            }
            Some(other) => Err(ConfigError::InvalidProperty {
                property: key,
                message: format!("expected a number, got {other}"),
            }),
        }
    }

    /// Returns a boolean value for `key`, coercing from the string form.
    ///
    /// Accepts `true`/`false`, `1`/`0`, `yes`/`no`, and `on`/`off`,
    /// case-insensitively.
    pub fn get_bool(&self, key: &'static str) -> Result<Option<bool>, ConfigError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                match trimmed.to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" | "on" => Ok(Some(true)),
                    "false" | "0" | "no" | "off" => Ok(Some(false)),
                    _ => Err(ConfigError::InvalidProperty {
                        property: key,
                        message: format!("expected a boolean, got {trimmed:?}"),
                    }),
                }
            }
            Some(other) => Err(ConfigError::InvalidProperty {
                property: key,
                message: format!("expected a boolean, got {other}"),
            }),
        }
    }

    /// Caller-chosen dashboard name, if present.
    pub fn logical_name(&self) -> Option<&str> {
        self.get_str(keys::DASHBOARD_APP_NAME)
    }

    /// Username for basic authentication, if present.
    pub fn username(&self) -> Option<&str> {
        self.get_str(keys::GRAFANA_USER)
    }

    /// Base URL override, if present.
    pub fn base_url(&self) -> Option<&str> {
        self.get_str(keys::GRAFANA_URL)
    }

    /// Resolves the credential carried in `grafana_pw`.
    ///
    /// When `grafana_pw_key` is set, `grafana_pw` must hold a JSON object
    /// (the shape secret managers hand out) and the named key is plucked
    /// from it. Otherwise the raw value is the credential.
    pub fn credential(&self) -> Result<Option<SecretString>, ConfigError> {
        let Some(raw) = self.get_str(keys::GRAFANA_PW) else {
            return Ok(None);
        };
        match self.get_str(keys::GRAFANA_PW_KEY) {
            None => Ok(Some(SecretString::new(raw.to_string().into()))),
            Some(pluck_key) => {
                let parsed: Value =
                    serde_json::from_str(raw).map_err(|_| ConfigError::SecretNotJson)?;
                let object = parsed.as_object().ok_or(ConfigError::SecretNotJson)?;
                let value = object
                    .get(pluck_key)
                    .ok_or_else(|| ConfigError::SecretKeyMissing(pluck_key.to_string()))?;
                let secret = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Ok(Some(SecretString::new(secret.into())))
            }
        }
    }

    /// Resolves the dashboard source location.
    ///
    /// Exactly one of the object-store pair, the local path, or the inline
    /// content may be populated. Returns `Ok(None)` when no source is
    /// present, which is legal for Delete events.
    pub fn source_spec(&self) -> Result<Option<SourceSpec>, ConfigError> {
        let bucket = self.get_str(keys::BUCKET_NAME);
        let key = self.get_str(keys::OBJECT_KEY);
        let path = self.get_str(keys::PATH_TO_FILE);
        let inline = self.get_str(keys::DASHBOARD_JSON);

        let object = match (bucket, key) {
            (Some(bucket), Some(key)) => Some(SourceSpec::ObjectStore {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteObjectSource),
        };
        let local = path.map(|p| SourceSpec::LocalFile {
            path: PathBuf::from(p),
        });
        let inline = inline.map(|c| SourceSpec::Inline {
            content: c.to_string(),
        });

        let mut candidates = [object, local, inline].into_iter().flatten();
        let spec = candidates.next();
        if candidates.next().is_some() {
            return Err(ConfigError::AmbiguousSource);
        }
        Ok(spec)
    }

    /// Builds the per-dashboard settings for a Create or Update event.
    ///
    /// Requires `dashboard_app_name`; the source may still be absent here
    /// (the lifecycle layer rejects that for events that need content).
    pub fn dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let logical_name = self
            .logical_name()
            .ok_or(ConfigError::MissingProperty(keys::DASHBOARD_APP_NAME))?
            .to_string();
        Ok(DashboardConfig {
            logical_name,
            source: self.source_spec()?,
            content_hash: self.get_str(keys::CONTENT_HASH).map(str::to_string),
            folder_uid: self.get_str(keys::FOLDER_UID).map(str::to_string),
        })
    }
}

impl fmt::Debug for ResourceProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.0 {
            if SENSITIVE_KEYS.contains(&key.as_str()) {
                map.entry(key, &"[REDACTED]");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}
