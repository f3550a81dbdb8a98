//! Dashboard identity normalization.
//!
//! Source documents are treated as templates: whatever `uid`, `title`,
//! `id`, or `version` they carry is replaced with values derived from the
//! resource's logical name. That keeps one exported JSON file reusable
//! across many managed dashboards and makes the upsert idempotent.
//!
//! **Responsibilities:**
//! - Derive a stable, Grafana-safe uid from the logical name
//! - Rewrite the identity fields of a parsed document
//!
//! **Invariants:**
//! - `derive_uid` is deterministic and pure
//! - Normalized documents never carry `id` or `version` values that
//!   could bind them to a specific Grafana instance

use serde_json::Value;

use crate::error::HandlerError;
use grafana_sync_config::constants::MAX_UID_LENGTH;

/// A document whose identity fields have been rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDashboard {
    /// Uid derived from the logical name; doubles as the physical
    /// resource id.
    pub uid: String,
    /// Title shown in Grafana; the logical name verbatim.
    pub title: String,
    /// The full rewritten document, ready for upsert.
    pub document: Value,
}

/// Derive a Grafana-safe uid from a logical dashboard name.
///
/// Lowercases, maps anything outside `[a-z0-9_-]` to `-`, collapses
/// runs of `-`, trims `-` from both ends, and truncates to the uid
/// length Grafana accepts. Errors when nothing usable remains.
pub fn derive_uid(logical_name: &str) -> Result<String, HandlerError> {
    let mut uid = String::with_capacity(logical_name.len());
    for ch in logical_name.chars() {
        let mapped = match ch.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '_' | '-') => c,
            _ => '-',
        };
        if mapped == '-' && uid.ends_with('-') {
            continue;
        }
        uid.push(mapped);
    }

    let uid = uid.trim_matches('-');
    if uid.is_empty() {
        return Err(HandlerError::InvalidLogicalName(logical_name.to_string()));
    }

    let mut uid = uid.to_string();
    if uid.len() > MAX_UID_LENGTH {
        uid.truncate(MAX_UID_LENGTH);
        // Truncation can leave a trailing separator behind.
        while uid.ends_with('-') {
            uid.pop();
        }
    }
    Ok(uid)
}

/// Rewrite the identity fields of a parsed dashboard document.
///
/// Sets `uid` and `title` from the logical name, nulls `id` so Grafana
/// resolves the dashboard by uid alone, and drops `version` so the
/// overwrite upsert never trips optimistic locking.
pub fn normalize(document: Value, logical_name: &str) -> Result<NormalizedDashboard, HandlerError> {
    let Value::Object(mut fields) = document else {
        return Err(HandlerError::MalformedDocument(
            "top-level value is not a JSON object".to_string(),
        ));
    };

    let uid = derive_uid(logical_name)?;
    let title = logical_name.to_string();

    fields.insert("uid".to_string(), Value::String(uid.clone()));
    fields.insert("title".to_string(), Value::String(title.clone()));
    fields.insert("id".to_string(), Value::Null);
    fields.remove("version");

    Ok(NormalizedDashboard {
        uid,
        title,
        document: Value::Object(fields),
    })
}

/// Parse raw source bytes and normalize the resulting document.
pub fn normalize_slice(bytes: &[u8], logical_name: &str) -> Result<NormalizedDashboard, HandlerError> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| HandlerError::MalformedDocument(e.to_string()))?;
    normalize(document, logical_name)
}
