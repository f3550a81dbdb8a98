//! Error types for lifecycle processing.
//!
//! Every variant here is eventually absorbed at the handler boundary into
//! a Failed response; the Display text therefore doubles as the failure
//! reason shown in the orchestrator console and is written for operators,
//! not for code. None of it ever carries a credential value.

use std::time::Duration;
use thiserror::Error;

use crate::source::FetchError;
use grafana_sync_client::ClientError;
use grafana_sync_config::ConfigError;

/// Errors that can occur while processing one lifecycle event.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The event properties or environment were unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The dashboard source could not be read.
    #[error("Failed to fetch dashboard source: {0}")]
    Fetch(#[from] FetchError),

    /// Create and Update events need a populated source.
    #[error(
        "Missing dashboard source: set one of bucket_name/object_key, path_to_file, or dashboard_json"
    )]
    MissingSource,

    /// The fetched bytes were not a JSON object.
    #[error("Malformed dashboard document: {0}")]
    MalformedDocument(String),

    /// The logical name maps to an empty uid.
    #[error("Logical name {0:?} contains no characters usable in a dashboard uid")]
    InvalidLogicalName(String),

    /// The Grafana API call failed. Classification (auth, not-found,
    /// transient) survives through the wrapped error.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The pipeline did not finish inside the invocation budget.
    #[error("Lifecycle processing did not finish within {0:?}; the dashboard may be partially applied")]
    Timeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_text_is_operator_readable() {
        let err = HandlerError::MissingSource;
        assert!(err.to_string().contains("bucket_name/object_key"));

        let err = HandlerError::InvalidLogicalName("***".to_string());
        assert!(err.to_string().contains("***"));

        let err = HandlerError::Timeout(Duration::from_secs(55));
        assert!(err.to_string().contains("55s"));
    }

    #[test]
    fn test_client_classification_survives_wrapping() {
        let err: HandlerError = ClientError::NotFound("team-dash".to_string()).into();
        match err {
            HandlerError::Client(inner) => assert!(inner.is_not_found()),
            other => panic!("expected Client, got {:?}", other),
        }
    }
}
