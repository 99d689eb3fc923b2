//! Service error types.

use thiserror::Error;

/// Errors returned by [`crate::PlatformService`] operations.
///
/// The state machines treat every variant the same way (fail soft, keep the
/// last known state). The distinction exists for logging and for callers that
/// want to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No response was received (connect, TLS, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The client could not be built from its configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ServiceError {
    /// Returns true if the same request may succeed if issued again.
    ///
    /// Transport failures, server-side errors, request timeouts and rate
    /// limiting are transient. Other client errors and decode failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Decode(_) | Self::InvalidConfig(_) => false,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status { status: status.as_u16(), body: String::new() }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_failures_are_transient() {
        assert!(ServiceError::Transport("reset".into()).is_transient());
        assert!(ServiceError::Status { status: 503, body: String::new() }.is_transient());
        assert!(ServiceError::Status { status: 429, body: String::new() }.is_transient());
    }

    #[test]
    fn client_failures_are_fatal() {
        assert!(!ServiceError::Status { status: 404, body: String::new() }.is_transient());
        assert!(!ServiceError::Decode("missing field".into()).is_transient());
        assert!(!ServiceError::InvalidConfig("bad url".into()).is_transient());
    }
}
