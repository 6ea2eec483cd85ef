use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default whole-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings the storage API client is constructed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root of the storage API, without a trailing slash
    pub base_url: String,
    /// Timeout applied to every request
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a config for `base_url` with the default timeout
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Overrides the request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Checks the base URL and returns it without trailing slashes
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the base URL is not an absolute
    /// `http`/`https` URL, or carries a query string or fragment
    pub fn normalized_base_url(&self) -> ClientResult<String> {
        let trimmed = self.base_url.trim().trim_end_matches('/');

        let parsed = Url::parse(trimmed).map_err(|e| {
            ClientError::Config(format!("Invalid base URL {:?}: {e}", self.base_url))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "Unsupported base URL scheme: {}",
                parsed.scheme()
            )));
        }

        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ClientError::Config(format!(
                "Base URL must not carry a query or fragment: {}",
                self.base_url
            )));
        }

        Ok(trimmed.to_string())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
