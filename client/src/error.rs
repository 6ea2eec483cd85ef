//! Error types for storage API calls

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for storage API calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the storage API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection failure, timeout or an interrupted body
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// The service answered with a non-success status
    #[error(
        "Unexpected status {status}: {}",
        .detail.as_deref().unwrap_or("no detail")
    )]
    Status {
        /// HTTP status returned by the service
        status: StatusCode,
        /// `detail` field of the service's error envelope, when present
        detail: Option<String>,
    },

    /// The response body did not match the expected payload
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Arguments that cannot be turned into a request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.into())
    }
}

impl ClientError {
    /// Whether the failure happened on the wire or was reported by the service
    /// through its HTTP status, as opposed to a decoding or setup problem
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// HTTP status of a [`ClientError::Status`] error
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
