//! Invoke command: process one lifecycle event end to end.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use grafana_sync_handler::{
    HandlerContext, RequestEnvelope, ResponseBody, deliver_response, handle_contained,
};
use tracing::{debug, info};

use crate::error::ExitCode;

/// Run one lifecycle invocation from the given event document.
///
/// The event is processed exactly as the orchestrator sent it: connection
/// details, credentials, and the dashboard source all come from the event
/// properties. With a callback URL present the outcome is PUT back to the
/// orchestrator; in direct mode it is printed to stdout.
pub async fn run(event_path: Option<&Path>) -> Result<ExitCode> {
    let raw = read_event(event_path)?;
    let envelope = RequestEnvelope::from_json(&raw)?;
    let (event, callback) = envelope.into_parts();

    debug!(
        request_type = event.request_type.as_str(),
        has_callback = callback.has_callback(),
        "Processing lifecycle event"
    );

    let ctx = HandlerContext::new();
    let response = handle_contained(event, ctx.clone()).await;
    let succeeded = response.is_success();
    let body = ResponseBody::assemble(&callback, response);

    match callback.response_url.as_deref() {
        Some(url) => {
            deliver_response(ctx.http(), url, &body).await?;
            Ok(ExitCode::Success)
        }
        None => {
            info!("No callback URL in event, printing response");
            println!("{}", serde_json::to_string_pretty(&body)?);
            if succeeded {
                Ok(ExitCode::Success)
            } else {
                Ok(ExitCode::LifecycleFailed)
            }
        }
    }
}

fn read_event(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read event from {}", p.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read event from stdin")?;
            Ok(raw)
        }
    }
}
