//! Content fingerprinting for change detection.
//!
//! A fingerprint is the lowercase hex SHA-256 of a canonical byte
//! rendering of the dashboard document. Two documents that differ only
//! in JSON key order or insignificant whitespace produce the same
//! fingerprint, so serialization happens through `serde_json::Value`
//! (whose object type keeps keys sorted) rather than over raw input
//! bytes.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Fingerprint raw bytes as-is.
///
/// Used for opaque payloads where no canonical form exists. Dashboard
/// documents go through [`fingerprint_document`] instead.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Fingerprint a JSON document in canonical form.
///
/// The only error path is a serialization failure, which for an
/// in-memory `Value` does not happen in practice; the `Result` exists so
/// callers decide how to report it.
pub fn fingerprint_document(document: &Value) -> serde_json::Result<String> {
    let canonical = serde_json::to_vec(document)?;
    Ok(fingerprint(&canonical))
}
