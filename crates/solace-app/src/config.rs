//! Session context and tunables injected at construction.

use std::time::Duration;

use solace_proto::UserId;

use crate::Tab;

/// Typing delay before an assistant reply is revealed.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(600);

/// Identity of the signed-in user.
///
/// Provided by the surrounding application after authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Current user's id.
    pub self_id: UserId,
}

impl SessionContext {
    /// Context for the given user.
    pub fn new(self_id: impl Into<UserId>) -> Self {
        Self { self_id: self_id.into() }
    }
}

/// App configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Presentational delay before revealing an assistant reply. Zero reveals
    /// immediately.
    pub reveal_delay: Duration,
    /// Tab shown, and loaded, on start.
    pub initial_tab: Tab,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { reveal_delay: DEFAULT_REVEAL_DELAY, initial_tab: Tab::Discover }
    }
}
