//! Error types for configuration loading and property parsing.
//!
//! Responsibilities:
//! - Define error variants for lifecycle-event property failures.
//! - Define error variants for environment and .env loading failures.
//!
//! Does NOT handle:
//! - Grafana API errors (see the client crate).
//! - Lifecycle outcome reporting (see the handler crate).
//!
//! Invariants:
//! - No variant ever embeds a credential value; messages carry property
//!   and variable NAMES only.
//! - Dotenv errors never include raw .env line contents.

use std::io::ErrorKind;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required property: {0}")]
    MissingProperty(&'static str),

    #[error("Invalid value for property {property}: {message}")]
    InvalidProperty {
        property: &'static str,
        message: String,
    },

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Grafana URL is required. Set the grafana_url property or GRAFANA_URL.")]
    MissingBaseUrl,

    #[error(
        "Authentication is required (grafana_pw property, or GRAFANA_API_TOKEN / GRAFANA_USERNAME + GRAFANA_PASSWORD)"
    )]
    MissingAuth,

    #[error(
        "Conflicting dashboard sources: set exactly one of bucket_name/object_key, path_to_file, or dashboard_json"
    )]
    AmbiguousSource,

    #[error("Incomplete object-store source: bucket_name and object_key must both be set")]
    IncompleteObjectSource,

    #[error("grafana_pw_key is set but grafana_pw does not hold a JSON object")]
    SecretNotJson,

    #[error("grafana_pw_key names field '{0}' which is absent from the grafana_pw object")]
    SecretKeyMissing(String),

    #[error("invalid timeout: {message}")]
    InvalidTimeout { message: String },

    #[error("invalid max retries: {message}")]
    InvalidMaxRetries { message: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file")]
    DotenvUnknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_properties_not_values() {
        let err = ConfigError::MissingProperty("dashboard_app_name");
        assert_eq!(
            err.to_string(),
            "Missing required property: dashboard_app_name"
        );

        let err = ConfigError::SecretKeyMissing("admin_password".to_string());
        assert!(err.to_string().contains("admin_password"));
    }

    #[test]
    fn test_dotenv_parse_reports_position_only() {
        let err = ConfigError::DotenvParse { error_index: 42 };
        let msg = err.to_string();
        assert!(msg.contains("position 42"));
        assert!(msg.contains("DOTENV_DISABLED"));
    }
}
