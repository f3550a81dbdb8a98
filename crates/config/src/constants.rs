//! Centralized constants for the grafana-sync workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed HTTP request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of retries for failed requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Maximum allowed retry count for a single API call.
pub const MAX_MAX_RETRIES: usize = 10;

// =============================================================================
// Invocation Budget
// =============================================================================

/// Default wall-clock budget for one lifecycle invocation in seconds.
///
/// Matches the deployment-side default the handler is provisioned with;
/// overridable per event via the `timeout_seconds` resource property.
pub const DEFAULT_INVOCATION_BUDGET_SECS: u64 = 60;

/// Maximum allowed invocation budget in seconds (15 minutes, the upper
/// bound any serverless platform grants a single invocation).
pub const MAX_INVOCATION_BUDGET_SECS: u64 = 900;

/// Seconds reserved out of the invocation budget for serializing and
/// delivering the response after the pipeline finishes or is cut off.
pub const RESPONSE_DELIVERY_RESERVE_SECS: u64 = 5;

/// Lower clamp for the soft deadline so tiny budgets still run the pipeline.
pub const MIN_SOFT_DEADLINE_SECS: u64 = 5;

// =============================================================================
// Platform Constraints
// =============================================================================

/// Maximum length of a Grafana dashboard uid.
pub const MAX_UID_LENGTH: usize = 40;

// =============================================================================
// Environment Variables (operational path: `check`, `render`, live tests)
// =============================================================================

/// Base URL of the Grafana instance.
pub const ENV_BASE_URL: &str = "GRAFANA_URL";

/// API token for bearer authentication.
pub const ENV_API_TOKEN: &str = "GRAFANA_API_TOKEN";

/// Username for basic authentication.
pub const ENV_USERNAME: &str = "GRAFANA_USERNAME";

/// Password for basic authentication.
pub const ENV_PASSWORD: &str = "GRAFANA_PASSWORD";

/// HTTP request timeout override in seconds.
pub const ENV_TIMEOUT_SECS: &str = "GRAFANA_TIMEOUT_SECS";

/// Retry count override.
pub const ENV_MAX_RETRIES: &str = "GRAFANA_MAX_RETRIES";

/// Accept invalid TLS certificates ("true"/"false").
pub const ENV_SKIP_VERIFY: &str = "GRAFANA_SKIP_VERIFY";
