//! Configuration loading with layered precedence.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` that merges lifecycle-event
//!   properties, environment variables, and defaults into a `Config`.
//! - Load `.env` files unless disabled.
//! - Validate and normalize the merged result.
//!
//! Does NOT handle:
//! - Property parsing semantics (see `properties` module).
//! - Actual network connections (see the client crate).
//!
//! Invariants / Assumptions:
//! - Event properties take precedence over environment variables; the
//!   environment only fills gaps the event left open.
//! - Builder methods take precedence over both (CLI flags use them).
//! - Empty or whitespace-only environment variables are treated as unset.
//! - `load_dotenv()` must be called explicitly; the `DOTENV_DISABLED`
//!   variable is checked before `dotenvy::dotenv()` is called.

use secrecy::SecretString;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, ENV_API_TOKEN, ENV_BASE_URL, ENV_MAX_RETRIES,
    ENV_PASSWORD, ENV_SKIP_VERIFY, ENV_TIMEOUT_SECS, ENV_USERNAME, MAX_MAX_RETRIES,
    MAX_TIMEOUT_SECS,
};
use crate::error::ConfigError;
use crate::properties::{ResourceProperties, keys};
use crate::types::{AuthConfig, AuthStrategy, Config, ConnectionConfig};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            // Trimming was needed, allocate new String
            Some(trimmed.to_string())
        }
    })
}

/// Configuration loader that builds config from event properties and
/// environment variables.
pub struct ConfigLoader {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    api_token: Option<SecretString>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self {
            base_url: None,
            username: None,
            password: None,
            api_token: None,
            skip_verify: None,
            timeout: None,
            max_retries: None,
        }
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read connection and auth settings from lifecycle-event properties.
    ///
    /// Property values land in the slots that are still unset, so builder
    /// methods called earlier keep precedence.
    pub fn from_properties(mut self, props: &ResourceProperties) -> Result<Self, ConfigError> {
        if self.base_url.is_none() {
            self.base_url = props.base_url().map(str::to_string);
        }
        if self.username.is_none() {
            self.username = props.username().map(str::to_string);
        }
        if props.get_str(keys::KMS_KEY).is_some() {
            tracing::warn!(
                "kms_key is reserved and not yet supported; using the credential as provided"
            );
        }
        // The credential slot depends on the auth mode the event selected:
        // with grafana_user it is a password, without it is an API token.
        if let Some(credential) = props.credential()? {
            if props.username().is_some() {
                if self.password.is_none() {
                    self.password = Some(credential);
                }
            } else if self.api_token.is_none() {
                self.api_token = Some(credential);
            }
        }
        if self.timeout.is_none()
            && let Some(secs) = props.get_u64(keys::TIMEOUT_SECONDS)?
        {
            self.timeout = Some(Duration::from_secs(secs));
        }
        if self.max_retries.is_none()
            && let Some(retries) = props.get_u64(keys::MAX_RETRIES)?
        {
            self.max_retries = Some(usize::try_from(retries).map_err(|_| {
                ConfigError::InvalidMaxRetries {
                    message: format!("value {retries} is out of range"),
                }
            })?);
        }
        if self.skip_verify.is_none() {
            self.skip_verify = props.get_bool(keys::SKIP_VERIFY)?;
        }
        Ok(self)
    }

    /// Read configuration from environment variables.
    ///
    /// Only fills slots that are still unset; event properties and builder
    /// methods keep precedence. Credentials resolve from one layer: once an
    /// earlier layer provided a password or token, the environment's auth
    /// variables are ignored entirely, so an ambient basic pair can never
    /// displace an event-supplied token.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        if self.base_url.is_none() {
            self.base_url = env_var_or_none(ENV_BASE_URL);
        }
        if self.password.is_none() && self.api_token.is_none() {
            if self.username.is_none() {
                self.username = env_var_or_none(ENV_USERNAME);
            }
            self.password = env_var_or_none(ENV_PASSWORD).map(|p| SecretString::new(p.into()));
            self.api_token = env_var_or_none(ENV_API_TOKEN).map(|t| SecretString::new(t.into()));
        }
        if self.skip_verify.is_none()
            && let Some(skip) = env_var_or_none(ENV_SKIP_VERIFY)
        {
            self.skip_verify = Some(skip.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_SKIP_VERIFY.to_string(),
                message: "must be true or false".to_string(),
            })?);
        }
        if self.timeout.is_none()
            && let Some(timeout) = env_var_or_none(ENV_TIMEOUT_SECS)
        {
            let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_TIMEOUT_SECS.to_string(),
                message: "must be a number".to_string(),
            })?;
            self.timeout = Some(Duration::from_secs(secs));
        }
        if self.max_retries.is_none()
            && let Some(retries) = env_var_or_none(ENV_MAX_RETRIES)
        {
            let value: usize = retries.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_MAX_RETRIES.to_string(),
                message: "must be a non-negative integer".to_string(),
            })?;
            self.max_retries = Some(value);
        }
        Ok(self)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the API token.
    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Set the connection timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let base_url = self
            .base_url
            .as_deref()
            .map(validate_and_normalize_base_url)
            .transpose()?
            .ok_or(ConfigError::MissingBaseUrl)?;

        // Determine auth strategy. An explicit username opts into basic
        // auth; a complete basic pair wins over a leftover env token.
        let strategy = match (self.username, self.password, self.api_token) {
            (Some(username), Some(password), _) => AuthStrategy::Basic { username, password },
            (_, _, Some(token)) => AuthStrategy::ApiToken { token },
            _ => return Err(ConfigError::MissingAuth),
        };

        let connection = ConnectionConfig {
            base_url,
            skip_verify: self.skip_verify.unwrap_or(false),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        };

        Self::validate_connection(&connection)?;

        Ok(Config {
            connection,
            auth: AuthConfig { strategy },
        })
    }

    /// Validates bounds on the merged connection values.
    fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        let timeout_secs = connection.timeout.as_secs();

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }
        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "timeout exceeds maximum allowed value of {} seconds",
                    MAX_TIMEOUT_SECS
                ),
            });
        }
        if connection.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!(
                    "must be between 0 and {} (got {})",
                    MAX_MAX_RETRIES, connection.max_retries
                ),
            });
        }

        Ok(())
    }
}

/// Validates and normalizes a base URL string.
///
/// Validation rules:
/// - Trim surrounding whitespace
/// - Treat blank/whitespace-only as missing (returns Err(ConfigError::MissingBaseUrl))
/// - Parse as an absolute URL
/// - Require scheme is http or https
/// - Require host is present
/// - Normalize by stripping trailing slash
fn validate_and_normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: "grafana_url".into(),
        message: format!(
            "must be an absolute http(s) URL with a host (e.g. https://grafana.example.org): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: "grafana_url".into(),
            message: format!(
                "scheme must be http or https (e.g. https://grafana.example.org), got: {scheme}"
            ),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: "grafana_url".into(),
            message: "host is required (e.g. https://grafana.example.org)".into(),
        });
    }

    // Normalize: strip trailing slash
    let normalized = parsed.as_str().trim_end_matches('/').to_string();

    Ok(normalized)
}
