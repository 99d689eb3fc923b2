//! Relationship state tracker.
//!
//! Holds the three relationship views (discoverable users, accepted
//! connections, pending incoming requests), the current tab and the mood
//! filter, and reconciles optimistic local edits with server responses.
//!
//! # Responsibilities
//!
//! - Issues a fresh load whenever a tab is selected, and a discover load when
//!   the mood filter changes while discovery is shown.
//! - Replaces each list wholesale on a successful load. Failures keep the last
//!   known list ([`crate::error::absorb`]).
//! - Patches `requested` on the discover entry after a successful connect
//!   request and records the id in a session ledger that is never cleared.
//! - Discards responses whose generation is older than the latest load issued
//!   for that list.

use std::{
    collections::HashSet,
    hash::Hash,
};

use solace_client::ServiceError;
use solace_proto::{Connection, ConnectionId, Mood, PendingRequest, UserId, UserSummary};

use crate::{AppAction, Generation, IntentError, Tab, error::absorb};

/// Relationship state machine.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    tab: Tab,
    mood_filter: Option<Mood>,
    discover: Vec<UserSummary>,
    connections: Vec<Connection>,
    pending: Vec<PendingRequest>,
    /// Users a request was sent to this session. Only grows.
    requested: HashSet<UserId>,
    discover_generation: Generation,
    connections_generation: Generation,
    pending_generation: Generation,
}

impl Tracker {
    /// Create a tracker showing `tab`, with empty lists.
    pub fn new(tab: Tab) -> Self {
        Self { tab, ..Self::default() }
    }

    /// Select a tab and load it.
    ///
    /// Other tabs' cached lists and all `requested` state are kept.
    pub fn set_tab(&mut self, tab: Tab) -> Vec<AppAction> {
        self.tab = tab;
        self.refresh()
    }

    /// Load the current tab.
    pub fn refresh(&mut self) -> Vec<AppAction> {
        let action = match self.tab {
            Tab::Discover => self.load_discover(),
            Tab::Connections => self.load_connections(),
            Tab::Pending => self.load_pending(),
        };
        vec![action]
    }

    /// Change the mood filter. `None` shows all moods.
    ///
    /// Reloads discovery only when it is the current tab; other tabs pick the
    /// filter up when discovery is next selected.
    pub fn set_mood_filter(&mut self, mood: Option<Mood>) -> Vec<AppAction> {
        self.mood_filter = mood;
        if self.tab == Tab::Discover { vec![self.load_discover()] } else { vec![] }
    }

    /// Issue a discover load with the current filter.
    pub fn load_discover(&mut self) -> AppAction {
        let generation = self.discover_generation.advance();
        AppAction::LoadDiscover { generation, mood: self.mood_filter }
    }

    /// Issue a connections load.
    pub fn load_connections(&mut self) -> AppAction {
        AppAction::LoadConnections { generation: self.connections_generation.advance() }
    }

    /// Issue a pending load.
    pub fn load_pending(&mut self) -> AppAction {
        AppAction::LoadPending { generation: self.pending_generation.advance() }
    }

    /// Send a connect request to a user in the discover list.
    pub fn send_request(&self, user_id: &UserId) -> Result<Vec<AppAction>, IntentError> {
        let user = self
            .discover
            .iter()
            .find(|u| &u.id == user_id)
            .ok_or_else(|| IntentError::UnknownUser(user_id.clone()))?;

        if user.requested {
            return Err(IntentError::AlreadyRequested(user_id.clone()));
        }

        Ok(vec![AppAction::SendRequest { user_id: user_id.clone() }])
    }

    /// Accept a pending request.
    pub fn accept_request(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Vec<AppAction>, IntentError> {
        if !self.pending.iter().any(|p| &p.connection_id == connection_id) {
            return Err(IntentError::UnknownConnection(connection_id.clone()));
        }
        Ok(vec![AppAction::AcceptRequest { connection_id: connection_id.clone() }])
    }

    /// Apply a discover load result.
    ///
    /// The list is replaced by identity: entries carry no `requested` patch
    /// from before the load. The session ledger still answers
    /// [`Self::has_requested`].
    pub fn apply_discover(
        &mut self,
        generation: Generation,
        result: Result<Vec<UserSummary>, ServiceError>,
    ) {
        if !generation.is_current(self.discover_generation) {
            tracing::debug!(%generation, latest = %self.discover_generation, "stale discover load");
            return;
        }
        match result {
            Ok(users) => self.discover = unique_by("discover", users, |u| &u.id),
            Err(e) => absorb("discover", &e),
        }
    }

    /// Apply a connections load result.
    pub fn apply_connections(
        &mut self,
        generation: Generation,
        result: Result<Vec<Connection>, ServiceError>,
    ) {
        if !generation.is_current(self.connections_generation) {
            tracing::debug!(%generation, latest = %self.connections_generation, "stale connections load");
            return;
        }
        match result {
            Ok(connections) => {
                self.connections = unique_by("connections", connections, |c| &c.user.id);
            },
            Err(e) => absorb("connections", &e),
        }
    }

    /// Apply a pending load result.
    pub fn apply_pending(
        &mut self,
        generation: Generation,
        result: Result<Vec<PendingRequest>, ServiceError>,
    ) {
        if !generation.is_current(self.pending_generation) {
            tracing::debug!(%generation, latest = %self.pending_generation, "stale pending load");
            return;
        }
        match result {
            Ok(pending) => self.pending = unique_by("pending", pending, |p| &p.connection_id),
            Err(e) => absorb("pending", &e),
        }
    }

    /// Apply a connect request result.
    ///
    /// On success the matching discover entry, if still listed, is patched in
    /// place. No other entry changes.
    pub fn apply_request_sent(&mut self, user_id: &UserId, result: Result<(), ServiceError>) {
        match result {
            Ok(()) => {
                self.requested.insert(user_id.clone());
                if let Some(user) = self.discover.iter_mut().find(|u| &u.id == user_id) {
                    user.requested = true;
                }
            },
            Err(e) => absorb("send_request", &e),
        }
    }

    /// Apply an accept result.
    ///
    /// On success the pending list is reloaded; the accepted user reaches the
    /// connections list only on the next connections load.
    pub fn apply_request_accepted(
        &mut self,
        connection_id: &ConnectionId,
        result: Result<(), ServiceError>,
    ) -> Vec<AppAction> {
        match result {
            Ok(()) => {
                tracing::debug!(%connection_id, "request accepted");
                vec![self.load_pending()]
            },
            Err(e) => {
                absorb("accept_request", &e);
                vec![]
            },
        }
    }

    /// Current tab.
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Current mood filter. `None` means all moods.
    pub fn mood_filter(&self) -> Option<Mood> {
        self.mood_filter
    }

    /// Discoverable users in server order.
    pub fn discover(&self) -> &[UserSummary] {
        &self.discover
    }

    /// Accepted connections in server order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Pending incoming requests in server order.
    pub fn pending(&self) -> &[PendingRequest] {
        &self.pending
    }

    /// Number of pending requests, for the tab badge.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// True if a request to `user_id` succeeded this session.
    pub fn has_requested(&self, user_id: &UserId) -> bool {
        self.requested.contains(user_id)
    }

    /// Users a request succeeded for this session.
    pub fn requested_ids(&self) -> &HashSet<UserId> {
        &self.requested
    }

    /// Latest generation issued for discovery.
    pub fn discover_generation(&self) -> Generation {
        self.discover_generation
    }

    /// Latest generation issued for connections.
    pub fn connections_generation(&self) -> Generation {
        self.connections_generation
    }

    /// Latest generation issued for pending requests.
    pub fn pending_generation(&self) -> Generation {
        self.pending_generation
    }
}

/// Drop repeated keys, keeping the first occurrence and the server order.
fn unique_by<T, K, F>(list: &'static str, items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> &K,
{
    let total = items.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<T> = items.into_iter().filter(|item| seen.insert(key(item).clone())).collect();

    if unique.len() != total {
        tracing::warn!(list, dropped = total - unique.len(), "duplicate entries in response");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserSummary {
        UserSummary::new(id, format!("user-{id}"))
    }

    fn pending(conn: &str, id: &str) -> PendingRequest {
        PendingRequest { connection_id: ConnectionId::new(conn), user: user(id), matched_on: None }
    }

    fn unavailable() -> ServiceError {
        ServiceError::Status { status: 503, body: String::new() }
    }

    /// Tracker on the discover tab with `ids` loaded.
    fn loaded(ids: &[&str]) -> Tracker {
        let mut tracker = Tracker::new(Tab::Discover);
        let Some(AppAction::LoadDiscover { generation, .. }) = tracker.refresh().pop() else {
            unreachable!()
        };
        tracker.apply_discover(generation, Ok(ids.iter().map(|id| user(id)).collect()));
        tracker
    }

    #[test]
    fn set_tab_loads_that_tab() {
        let mut tracker = Tracker::new(Tab::Discover);

        assert!(matches!(tracker.set_tab(Tab::Pending).as_slice(), [AppAction::LoadPending { .. }]));
        assert!(matches!(
            tracker.set_tab(Tab::Connections).as_slice(),
            [AppAction::LoadConnections { .. }]
        ));
        assert_eq!(tracker.tab(), Tab::Connections);
    }

    #[test]
    fn mood_filter_reloads_only_on_discover() {
        let mut tracker = Tracker::new(Tab::Discover);
        let actions = tracker.set_mood_filter(Some(Mood::Sad));
        assert!(matches!(actions.as_slice(), [AppAction::LoadDiscover { mood: Some(Mood::Sad), .. }]));

        let _ = tracker.set_tab(Tab::Pending);
        assert!(tracker.set_mood_filter(Some(Mood::Happy)).is_empty());

        let actions = tracker.set_tab(Tab::Discover);
        assert!(matches!(
            actions.as_slice(),
            [AppAction::LoadDiscover { mood: Some(Mood::Happy), .. }]
        ));
    }

    #[test]
    fn latest_discover_generation_wins() {
        let mut tracker = Tracker::new(Tab::Discover);
        let Some(AppAction::LoadDiscover { generation: first, .. }) =
            tracker.set_mood_filter(Some(Mood::Sad)).pop()
        else {
            unreachable!()
        };
        let Some(AppAction::LoadDiscover { generation: second, .. }) =
            tracker.set_mood_filter(Some(Mood::Angry)).pop()
        else {
            unreachable!()
        };

        tracker.apply_discover(second, Ok(vec![user("angry")]));
        tracker.apply_discover(first, Ok(vec![user("sad")]));

        assert_eq!(tracker.discover().len(), 1);
        assert_eq!(tracker.discover()[0].id.as_str(), "angry");
    }

    #[test]
    fn failed_load_keeps_previous_list() {
        let mut tracker = loaded(&["a", "b"]);
        let before = tracker.discover().to_vec();

        let AppAction::LoadDiscover { generation, .. } = tracker.load_discover() else {
            unreachable!()
        };
        tracker.apply_discover(generation, Err(unavailable()));

        assert_eq!(tracker.discover(), before.as_slice());
    }

    #[test]
    fn duplicate_ids_are_dropped_at_load() {
        let tracker = loaded(&["a", "b", "a"]);
        let ids: Vec<_> = tracker.discover().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn send_request_requires_listed_user() {
        let tracker = loaded(&["a"]);
        assert_eq!(
            tracker.send_request(&UserId::new("zz")),
            Err(IntentError::UnknownUser(UserId::new("zz")))
        );
        assert!(tracker.send_request(&UserId::new("a")).is_ok());
    }

    #[test]
    fn request_success_patches_only_target() {
        let mut tracker = loaded(&["a", "b", "c"]);
        tracker.apply_request_sent(&UserId::new("b"), Ok(()));

        let flags: Vec<_> = tracker.discover().iter().map(|u| u.requested).collect();
        assert_eq!(flags, [false, true, false]);
        assert!(tracker.has_requested(&UserId::new("b")));
        assert_eq!(
            tracker.send_request(&UserId::new("b")),
            Err(IntentError::AlreadyRequested(UserId::new("b")))
        );
    }

    #[test]
    fn request_failure_changes_nothing() {
        let mut tracker = loaded(&["a", "b"]);
        let before = tracker.discover().to_vec();

        tracker.apply_request_sent(&UserId::new("a"), Err(unavailable()));

        assert_eq!(tracker.discover(), before.as_slice());
        assert!(tracker.requested_ids().is_empty());
    }

    #[test]
    fn reload_replaces_flags_but_ledger_survives() {
        let mut tracker = loaded(&["a", "b"]);
        tracker.apply_request_sent(&UserId::new("a"), Ok(()));

        let _ = tracker.set_tab(Tab::Pending);
        let Some(AppAction::LoadDiscover { generation, .. }) = tracker.set_tab(Tab::Discover).pop()
        else {
            unreachable!()
        };
        tracker.apply_discover(generation, Ok(vec![user("a"), user("b")]));

        assert!(tracker.discover().iter().all(|u| !u.requested));
        assert!(tracker.has_requested(&UserId::new("a")));
    }

    #[test]
    fn accept_reloads_pending_without_touching_connections() {
        let mut tracker = Tracker::new(Tab::Pending);
        let Some(AppAction::LoadPending { generation }) = tracker.refresh().pop() else {
            unreachable!()
        };
        tracker.apply_pending(generation, Ok(vec![pending("c1", "a"), pending("c2", "b")]));

        let conn = ConnectionId::new("c1");
        assert!(tracker.accept_request(&conn).is_ok());
        assert_eq!(
            tracker.accept_request(&ConnectionId::new("nope")),
            Err(IntentError::UnknownConnection(ConnectionId::new("nope")))
        );

        let actions = tracker.apply_request_accepted(&conn, Ok(()));
        assert!(matches!(actions.as_slice(), [AppAction::LoadPending { .. }]));
        assert!(tracker.connections().is_empty());
        assert_eq!(tracker.pending_count(), 2);
    }

    #[test]
    fn failed_accept_issues_nothing() {
        let mut tracker = Tracker::new(Tab::Pending);
        let actions = tracker.apply_request_accepted(&ConnectionId::new("c1"), Err(unavailable()));
        assert!(actions.is_empty());
    }

    #[test]
    fn responses_before_any_load_are_ignored() {
        let mut tracker = Tracker::new(Tab::Connections);
        tracker.apply_connections(Generation::default(), Ok(vec![Connection::new(user("a"))]));
        assert!(tracker.connections().is_empty());
    }
}
