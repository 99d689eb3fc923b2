//! HTTP client configuration.

use std::time::Duration;

use reqwest::Url;

use crate::ServiceError;

/// Default backend address for local development.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for [`crate::HttpService`].
///
/// Passed explicitly at construction; there is no ambient base URL or token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Backend origin, e.g. `https://api.example.org`. A path prefix is kept.
    pub base_url: String,
    /// Bearer token sent on every request. `None` for unauthenticated calls.
    pub token: Option<String>,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), token: None, request_timeout: None }
    }
}

impl ServiceConfig {
    /// Configuration for the given backend origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Parse and check the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidConfig`] if the URL does not parse, is not
    /// `http`/`https`, or cannot carry path segments.
    pub fn base(&self) -> Result<Url, ServiceError> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| ServiceError::InvalidConfig(format!("base url: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ServiceError::InvalidConfig(format!(
                "base url: unsupported scheme {:?}",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ServiceError::InvalidConfig("base url: cannot be a base".into()));
        }
        if self.token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ServiceError::InvalidConfig("token: empty".into()));
        }

        Ok(url)
    }
}
