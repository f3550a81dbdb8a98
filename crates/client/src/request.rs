//! Retry helper for HTTP requests with exponential backoff.
//!
//! This module wraps outgoing requests with retry logic that:
//! - Retries transient HTTP statuses (429, 502, 503, 504) and version
//!   conflicts (409, 412), which converge under overwrite-by-uid payloads
//! - Retries connect and timeout transport failures
//! - Implements exponential backoff (1s, 2s, 4s = 2^attempt)
//! - Fails other statuses immediately with the parsed Grafana error body
//!
//! Credential material never appears in errors produced here; only the
//! request URL, status, and Grafana's own error message are carried.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::{RequestBuilder, Response};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::models::GrafanaErrorBody;

/// Maximum number of retry attempts when the caller passes 0.
const DEFAULT_MAX_RETRIES: usize = 3;

/// Characters percent-encoded when a uid is spliced into an API path.
///
/// Uids derived by this crate are already slug-safe, but Delete events can
/// carry uids minted by earlier revisions or foreign tooling, so anything
/// that could terminate or restructure the path gets encoded.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'%')
    .add(b'/')
    .add(b'\\')
    .add(b'?')
    .add(b'#');

/// Percent-encode a value for safe use as a URL path segment.
pub(crate) fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Check whether a transport-level error is worth retrying.
fn is_retryable_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// Sends an HTTP request with automatic retry logic.
///
/// # Arguments
///
/// * `builder` - The `reqwest::RequestBuilder` to execute
/// * `max_retries` - Maximum number of retry attempts (defaults to 3 if 0)
///
/// # Errors
///
/// Returns `ClientError::ApiError` for non-success statuses (including
/// retryable statuses once attempts are exhausted), the underlying
/// `ClientError::HttpError` for exhausted transport failures, and
/// `ClientError::MaxRetriesExceeded` when a retry is needed but the
/// request body cannot be cloned.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
) -> Result<Response> {
    let max_retries = if max_retries == 0 {
        DEFAULT_MAX_RETRIES
    } else {
        max_retries
    };

    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None => {
                // Streaming bodies cannot be replayed. Single attempt only.
                if attempt == 0 {
                    debug!("Request builder cannot be cloned, single attempt only");
                    let response = builder.send().await.map_err(ClientError::from)?;
                    if response.status().is_success() {
                        return Ok(response);
                    }
                    return Err(error_from_response(response).await);
                } else {
                    debug!("Cannot clone request builder for retry");
                    return Err(ClientError::MaxRetriesExceeded(attempt));
                }
            }
        };

        match attempt_builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if response.status().is_success() {
                    if attempt > 0 {
                        debug!(attempt = attempt + 1, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                if ClientError::is_retryable_status(status) && attempt < max_retries {
                    let backoff_secs = 2u64.pow(attempt as u32);
                    debug!(
                        attempt = attempt + 1,
                        max_retries = max_retries + 1,
                        status = status,
                        backoff_secs = backoff_secs,
                        "Transient status, retrying with exponential backoff"
                    );
                    tokio::time::sleep(tokio::time::Duration::from_secs(backoff_secs)).await;
                    continue;
                }
                // Non-retryable, or retryable but exhausted. Either way the
                // final response carries the most useful diagnostics.
                return Err(error_from_response(response).await);
            }
            Err(e) => {
                if is_retryable_transport(&e) && attempt < max_retries {
                    let backoff_secs = 2u64.pow(attempt as u32);
                    debug!(
                        attempt = attempt + 1,
                        max_retries = max_retries + 1,
                        backoff_secs = backoff_secs,
                        "Transport error, retrying with exponential backoff"
                    );
                    tokio::time::sleep(tokio::time::Duration::from_secs(backoff_secs)).await;
                    continue;
                }
                return Err(ClientError::from(e));
            }
        }
    }

    // Unreachable: every loop arm returns or continues, and the final
    // attempt always returns.
    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

/// Turn a non-success response into an `ApiError` with Grafana's message.
async fn error_from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let (message, trace_id) = match serde_json::from_str::<GrafanaErrorBody>(&body) {
        Ok(parsed) => (
            parsed.message.unwrap_or_else(|| body.clone()),
            parsed.trace_id,
        ),
        Err(_) => (body, None),
    };

    ClientError::ApiError {
        status,
        url,
        message,
        trace_id,
    }
}
