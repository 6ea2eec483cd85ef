//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use tracing::Level;

use super::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::error::{ClientError, ClientResult};

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (storage API on localhost)
    Development {
        /// Optional override for the request timeout in seconds
        timeout_override_secs: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if `APP_ENV` contains an invalid value
    pub fn from_env() -> ClientResult<Self> {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => {
                let timeout_override_secs = env::var("STORAGE_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|val| val.parse::<u64>().ok())
                    .filter(|secs| *secs > 0);

                Ok(Self::Development {
                    timeout_override_secs,
                })
            }
            _ => Err(ClientError::Config(format!("Invalid environment: {env}"))),
        }
    }

    /// Returns the storage API base URL for the environment
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if `STORAGE_API_URL` is not set in
    /// production or staging
    pub fn storage_api_url(&self) -> ClientResult<String> {
        match self {
            Self::Production | Self::Staging => env::var("STORAGE_API_URL").map_err(|_| {
                ClientError::Config("STORAGE_API_URL environment variable is not set".to_string())
            }),
            Self::Development { .. } => {
                Ok(env::var("STORAGE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()))
            }
        }
    }

    /// Request timeout for storage API calls
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        match self {
            Self::Production | Self::Staging => DEFAULT_REQUEST_TIMEOUT,
            Self::Development {
                timeout_override_secs,
            } => timeout_override_secs.map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
        }
    }

    /// Client configuration resolved from the environment
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the base URL cannot be resolved
    pub fn client_config(&self) -> ClientResult<ClientConfig> {
        Ok(ClientConfig::new(self.storage_api_url()?).with_request_timeout(self.request_timeout()))
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development { .. } => Level::DEBUG,
            })
    }
}
