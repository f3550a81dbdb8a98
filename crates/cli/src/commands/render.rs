//! Render command: offline normalize and fingerprint dry run.

use std::path::Path;

use anyhow::{Context, Result};
use grafana_sync_handler::{fingerprint_document, normalize_slice};

use crate::error::ExitCode;

/// Normalize a local dashboard file and report the identity the sync
/// would apply. Nothing is sent to Grafana.
pub async fn run(file: &Path, name: &str, document: bool) -> Result<ExitCode> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read dashboard from {}", file.display()))?;

    let normalized = normalize_slice(&bytes, name)?;
    let content_hash = fingerprint_document(&normalized.document)?;

    if document {
        println!("{}", serde_json::to_string_pretty(&normalized.document)?);
    } else {
        println!("uid:          {}", normalized.uid);
        println!("title:        {}", normalized.title);
        println!("content_hash: {content_hash}");
    }

    Ok(ExitCode::Success)
}
