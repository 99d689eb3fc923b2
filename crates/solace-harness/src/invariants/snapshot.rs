//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the App at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use std::collections::BTreeSet;

use solace_app::{App, Author};
use solace_proto::{ConnectionId, UserId};

/// Snapshot of one App's observable state.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Signed-in user.
    pub self_id: Option<UserId>,
    /// Discover list as `(id, requested)` in display order.
    pub discover: Vec<(UserId, bool)>,
    /// Connection peer ids in display order.
    pub connections: Vec<UserId>,
    /// Pending connection ids in display order.
    pub pending: Vec<ConnectionId>,
    /// Session ledger of successful requests.
    pub requested: BTreeSet<UserId>,
    /// Ledger observed after each earlier step, oldest first.
    pub requested_history: Vec<BTreeSet<UserId>>,
    /// Open thread's peer. `None` if no thread is open.
    pub open_peer: Option<UserId>,
    /// Open thread's messages as `(sender, receiver)`.
    pub thread: Vec<(UserId, UserId)>,
    /// Assistant transcript authors in order.
    pub transcript: Vec<Author>,
    /// Typing indicator.
    pub typing: bool,
}

impl SystemSnapshot {
    /// Create an empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the observable state of `app`.
    pub fn from_app(app: &App) -> Self {
        let tracker = app.tracker();
        let thread = app.thread();
        let assistant = app.assistant();

        Self {
            self_id: Some(app.context().self_id.clone()),
            discover: tracker.discover().iter().map(|u| (u.id.clone(), u.requested)).collect(),
            connections: tracker.connections().iter().map(|c| c.id().clone()).collect(),
            pending: tracker.pending().iter().map(|p| p.connection_id.clone()).collect(),
            requested: tracker.requested_ids().iter().cloned().collect(),
            requested_history: Vec::new(),
            open_peer: thread.peer_id().cloned(),
            thread: thread
                .messages()
                .iter()
                .map(|m| (m.sender_id.clone(), m.receiver_id.clone()))
                .collect(),
            transcript: assistant.entries().iter().map(|e| e.author).collect(),
            typing: assistant.is_typing(),
        }
    }

    /// Attach the ledger history observed before this snapshot.
    #[must_use]
    pub fn with_history(mut self, history: Vec<BTreeSet<UserId>>) -> Self {
        self.requested_history = history;
        self
    }
}

#[cfg(test)]
mod tests {
    use solace_app::{AppConfig, SessionContext};

    use super::*;

    #[test]
    fn fresh_app_snapshot() {
        let app = App::new(SessionContext::new("me"), AppConfig::default());
        let snapshot = SystemSnapshot::from_app(&app);

        assert_eq!(snapshot.self_id, Some(UserId::new("me")));
        assert!(snapshot.discover.is_empty());
        assert!(snapshot.open_peer.is_none());
        assert_eq!(snapshot.transcript, [Author::Bot]);
        assert!(!snapshot.typing);
    }
}
