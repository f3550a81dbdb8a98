//! Authentication strategies for Grafana requests.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

/// Strategy for authenticating with Grafana.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Service-account or API token (bearer authentication).
    /// Preferred for automation; tokens are static and need no renewal.
    ApiToken { token: SecretString },
    /// Username and password (HTTP basic authentication).
    /// Used against instances without service accounts provisioned.
    Basic {
        username: String,
        password: SecretString,
    },
}

impl AuthStrategy {
    /// Attach the credentials to an outgoing request.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiToken { token } => builder.bearer_auth(token.expose_secret()),
            Self::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
        }
    }

    /// Check if we're using API token auth.
    pub fn is_api_token(&self) -> bool {
        matches!(self, Self::ApiToken { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_exposes_secrets() {
        let strategy = AuthStrategy::ApiToken {
            token: SecretString::new("glsa_super_secret".to_string().into()),
        };
        let debug = format!("{:?}", strategy);
        assert!(!debug.contains("glsa_super_secret"));

        let strategy = AuthStrategy::Basic {
            username: "admin".to_string(),
            password: SecretString::new("hunter2".to_string().into()),
        };
        let debug = format!("{:?}", strategy);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn test_is_api_token() {
        let strategy = AuthStrategy::ApiToken {
            token: SecretString::new("t".to_string().into()),
        };
        assert!(strategy.is_api_token());

        let strategy = AuthStrategy::Basic {
            username: "admin".to_string(),
            password: SecretString::new("p".to_string().into()),
        };
        assert!(!strategy.is_api_token());
    }
}
