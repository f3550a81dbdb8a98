//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish
//!   failure classes.
//! - Map the library error types to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-8 are reserved for specific error categories.
//! - Delivery failures get their own code: the orchestrator never saw the
//!   outcome, which is a different situation than the lifecycle failing.

use grafana_sync_client::ClientError;
use grafana_sync_config::ConfigError;
use grafana_sync_handler::{FetchError, HandlerError, ProtocolError};

/// Structured exit codes for grafana-sync.
///
/// These codes let wrapper scripts (and the orchestrator's retry policy)
/// distinguish between failure modes and react accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Authentication failure - rejected token or credentials (401/403).
    ///
    /// Scripts should rotate or re-provision the credential.
    AuthenticationFailed = 2,

    /// Connection error - network, timeout, or DNS failure.
    ///
    /// Scripts may retry with backoff.
    ConnectionError = 3,

    /// Resource not found - missing source object or dashboard uid.
    ///
    /// Scripts should verify the source location or dashboard identity.
    NotFound = 4,

    /// Validation error - malformed event, properties, or dashboard JSON.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Service unavailable - rate limiting or 5xx after retries exhausted.
    ///
    /// Scripts should back off and retry later.
    ServiceUnavailable = 6,

    /// Lifecycle failed - direct-mode invocation produced a FAILED response.
    ///
    /// The response body on stdout carries the reason.
    LifecycleFailed = 7,

    /// Delivery failed - the response could not be PUT to the callback URL.
    ///
    /// The lifecycle outcome is unknown to the orchestrator; the stack
    /// operation will hang until its own timeout. Needs operator attention.
    DeliveryFailed = 8,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }

    /// Returns true if this exit code indicates a retryable condition.
    #[allow(dead_code)]
    pub const fn is_retryable(self) -> bool {
        matches!(self, ExitCode::ConnectionError | ExitCode::ServiceUnavailable)
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        if err.is_auth_error() {
            return ExitCode::AuthenticationFailed;
        }
        if err.is_not_found() {
            return ExitCode::NotFound;
        }
        match err {
            ClientError::Timeout(_) | ClientError::InvalidUrl(_) => ExitCode::ConnectionError,
            ClientError::HttpError(e) if e.is_connect() || e.is_timeout() => {
                ExitCode::ConnectionError
            }
            ClientError::ApiError { status: 400, .. } => ExitCode::ValidationError,
            ClientError::ApiError {
                status: 429 | 502 | 503 | 504,
                ..
            } => ExitCode::ServiceUnavailable,
            ClientError::InvalidResponse(_) => ExitCode::ValidationError,
            _ => ExitCode::GeneralError,
        }
    }
}

impl From<&HandlerError> for ExitCode {
    fn from(err: &HandlerError) -> Self {
        match err {
            HandlerError::Config(_)
            | HandlerError::MissingSource
            | HandlerError::MalformedDocument(_)
            | HandlerError::InvalidLogicalName(_) => ExitCode::ValidationError,
            HandlerError::Fetch(FetchError::Missing(_)) => ExitCode::NotFound,
            HandlerError::Fetch(_) => ExitCode::GeneralError,
            HandlerError::Client(inner) => ExitCode::from(inner),
            HandlerError::Timeout(_) => ExitCode::ConnectionError,
        }
    }
}

impl From<&ProtocolError> for ExitCode {
    fn from(err: &ProtocolError) -> Self {
        match err {
            ProtocolError::Envelope(_) => ExitCode::ValidationError,
            ProtocolError::Delivery(_) => ExitCode::DeliveryFailed,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError when no known error type is found
    /// in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        // Outermost cause wins: a delivery error that wraps a transport
        // error must report as DeliveryFailed, not ConnectionError.
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<ProtocolError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<HandlerError>() {
                return ExitCode::from(err);
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return ExitCode::ValidationError;
            }
            if let Some(err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(err);
            }
        }
        ExitCode::GeneralError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn api_error(status: u16) -> ClientError {
        ClientError::ApiError {
            status,
            url: "https://grafana.example.org/api/dashboards/db".to_string(),
            message: "error".to_string(),
            trace_id: None,
        }
    }

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::AuthenticationFailed.as_i32(), 2);
        assert_eq!(ExitCode::LifecycleFailed.as_i32(), 7);
        assert_eq!(ExitCode::DeliveryFailed.as_i32(), 8);
    }

    #[test]
    fn test_is_retryable() {
        assert!(ExitCode::ConnectionError.is_retryable());
        assert!(ExitCode::ServiceUnavailable.is_retryable());
        assert!(!ExitCode::Success.is_retryable());
        assert!(!ExitCode::AuthenticationFailed.is_retryable());
        assert!(!ExitCode::ValidationError.is_retryable());
        assert!(!ExitCode::DeliveryFailed.is_retryable());
    }

    #[test]
    fn test_client_error_auth_statuses() {
        assert_eq!(ExitCode::from(&api_error(401)), ExitCode::AuthenticationFailed);
        assert_eq!(ExitCode::from(&api_error(403)), ExitCode::AuthenticationFailed);
    }

    #[test]
    fn test_client_error_not_found() {
        assert_eq!(ExitCode::from(&api_error(404)), ExitCode::NotFound);
        let err = ClientError::NotFound("team-latency".to_string());
        assert_eq!(ExitCode::from(&err), ExitCode::NotFound);
    }

    #[test]
    fn test_client_error_unavailable_statuses() {
        assert_eq!(ExitCode::from(&api_error(429)), ExitCode::ServiceUnavailable);
        assert_eq!(ExitCode::from(&api_error(503)), ExitCode::ServiceUnavailable);
        assert_eq!(ExitCode::from(&api_error(500)), ExitCode::GeneralError);
    }

    #[test]
    fn test_client_error_timeout() {
        let err = ClientError::Timeout(Duration::from_secs(30));
        assert_eq!(ExitCode::from(&err), ExitCode::ConnectionError);
    }

    #[test]
    fn test_handler_error_validation_family() {
        let err = HandlerError::MalformedDocument("expected an object".to_string());
        assert_eq!(ExitCode::from(&err), ExitCode::ValidationError);

        let err = HandlerError::InvalidLogicalName("***".to_string());
        assert_eq!(ExitCode::from(&err), ExitCode::ValidationError);

        let err = HandlerError::MissingSource;
        assert_eq!(ExitCode::from(&err), ExitCode::ValidationError);
    }

    #[test]
    fn test_handler_error_missing_source_object() {
        let err = HandlerError::Fetch(FetchError::Missing(
            "s3://dashboards/missing.json".to_string(),
        ));
        assert_eq!(ExitCode::from(&err), ExitCode::NotFound);
    }

    #[test]
    fn test_handler_error_client_classification_survives() {
        let err = HandlerError::Client(api_error(401));
        assert_eq!(ExitCode::from(&err), ExitCode::AuthenticationFailed);
    }

    #[test]
    fn test_protocol_error_mapping() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ProtocolError::Envelope(bad_json);
        assert_eq!(ExitCode::from(&err), ExitCode::ValidationError);

        let err = ProtocolError::Delivery(api_error(403));
        assert_eq!(ExitCode::from(&err), ExitCode::DeliveryFailed);
    }

    #[test]
    fn test_anyhow_chain_prefers_outermost_cause() {
        // Delivery wraps an auth error; the delivery classification wins.
        let err = anyhow::Error::from(ProtocolError::Delivery(api_error(403)));
        assert_eq!(err.exit_code(), ExitCode::DeliveryFailed);

        let err = anyhow::Error::from(api_error(403)).context("health probe failed");
        assert_eq!(err.exit_code(), ExitCode::AuthenticationFailed);

        let err = anyhow::anyhow!("no typed cause");
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
    }
}
