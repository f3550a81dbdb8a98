//! Common test utilities for client integration tests.
//!
//! Provides a client factory wired for a wiremock server so every test
//! builds clients the same way.
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)
//! - Test-specific assertions or test logic

#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use secrecy::SecretString;

use grafana_sync_client::{AuthStrategy, GrafanaClient};

/// Token value used by the default test client.
#[allow(dead_code)]
pub const TEST_TOKEN: &str = "glsa_test_token_0123456789abcdef";

/// Build a client pointed at a mock server with token auth.
pub fn test_client(base_url: &str, max_retries: usize) -> GrafanaClient {
    GrafanaClient::builder()
        .base_url(base_url.to_string())
        .auth_strategy(AuthStrategy::ApiToken {
            token: SecretString::new(TEST_TOKEN.to_string().into()),
        })
        .max_retries(max_retries)
        .build()
        .expect("test client should build")
}

/// Build a client that authenticates with username and password.
#[allow(dead_code)]
pub fn test_basic_client(base_url: &str, username: &str, password: &str) -> GrafanaClient {
    GrafanaClient::builder()
        .base_url(base_url.to_string())
        .auth_strategy(AuthStrategy::Basic {
            username: username.to_string(),
            password: SecretString::new(password.to_string().into()),
        })
        .build()
        .expect("test client should build")
}
