//! Client configuration and credentials

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PublishError, PublishResult};

/// Base URL of the production API.
pub const DEFAULT_ENDPOINT: &str = "https://api.sofodata.com";

/// OAuth audience the access token is issued for.
pub const DEFAULT_AUDIENCE: &str = "https://api.sofodata.com/";

/// Environment variable holding the OAuth client id.
pub const CLIENT_ID_ENV: &str = "SOFODATA_CLIENT_ID";

/// Environment variable holding the OAuth client secret.
pub const CLIENT_SECRET_ENV: &str = "SOFODATA_CLIENT_SECRET";

/// Environment variable overriding [`DEFAULT_ENDPOINT`].
pub const ENDPOINT_ENV: &str = "SOFODATA_API_ENDPOINT";

/// OAuth client credentials. Held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read credentials from `SOFODATA_CLIENT_ID` and `SOFODATA_CLIENT_SECRET`.
    ///
    /// # Errors
    /// Returns error if either variable is unset or empty
    pub fn from_env() -> PublishResult<Self> {
        Ok(Self::new(required_env(CLIENT_ID_ENV)?, required_env(CLIENT_SECRET_ENV)?))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

fn required_env(key: &str) -> PublishResult<String> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(PublishError::Config(format!(
            "environment variable {key} is not set"
        ))),
    }
}

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the token, policy and dataset endpoints.
    pub endpoint: String,
    /// Audience sent with the token request.
    pub audience: String,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
    /// Directory the CSV is staged in before upload.
    pub temp_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            user_agent: format!("sofodata/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            temp_dir: std::env::temp_dir(),
        }
    }
}

impl ClientConfig {
    /// Default configuration, with the endpoint taken from
    /// `SOFODATA_API_ENDPOINT` when set.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        config
    }

    /// Join an API path onto the endpoint.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "https://api.sofodata.com");
        assert_eq!(config.audience, "https://api.sofodata.com/");
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("sofodata/"));
    }

    #[test]
    fn test_url_join() {
        let mut config = ClientConfig::default();
        assert_eq!(
            config.url("/v8/oauth/token"),
            "https://api.sofodata.com/v8/oauth/token"
        );
        config.endpoint = "http://localhost:8080/".to_string();
        assert_eq!(config.url("/v8/dataSets"), "http://localhost:8080/v8/dataSets");
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("my-client", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("my-client"));
        assert!(!debug.contains("hunter2"));
    }
}
