//! Relationship records: discoverable users, accepted connections and pending
//! incoming requests.

use serde::{Deserialize, Serialize};

use crate::{ConnectionId, Mood, UserId, mood};

/// A user as shown in discovery, connection and pending lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Backend user id.
    pub id: UserId,
    /// Unique login name. Used as the label when no display name is set.
    pub username: String,
    /// Optional display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Optional free-text bio.
    #[serde(default)]
    pub bio: Option<String>,
    /// Current mood. `None` if unset or outside the vocabulary.
    #[serde(default, deserialize_with = "mood::lenient")]
    pub current_mood: Option<Mood>,
    /// Online flag as last reported by the server.
    #[serde(default)]
    pub is_online: bool,
    /// Set locally once a connect request was sent this session. Never on the
    /// wire.
    #[serde(skip)]
    pub requested: bool,
}

impl UserSummary {
    /// Create a summary with only the required fields.
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            display_name: None,
            bio: None,
            current_mood: None,
            is_online: false,
            requested: false,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the current mood.
    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.current_mood = Some(mood);
        self
    }

    /// Set the online flag.
    pub fn with_online(mut self, online: bool) -> Self {
        self.is_online = online;
        self
    }

    /// Name to show: display name when present and non-blank, else username.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().filter(|name| !name.trim().is_empty()).unwrap_or(&self.username)
    }

    /// Avatar initial derived from [`Self::label`].
    pub fn initial(&self) -> Option<char> {
        self.label().chars().next()
    }
}

/// An accepted connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The connected peer.
    #[serde(flatten)]
    pub user: UserSummary,
    /// What the match was based on (shared mood or interest), when reported.
    #[serde(default)]
    pub matched_on: Option<String>,
}

impl Connection {
    /// Wrap a peer as an accepted connection.
    pub fn new(user: UserSummary) -> Self {
        Self { user, matched_on: None }
    }

    /// Peer id.
    pub fn id(&self) -> &UserId {
        &self.user.id
    }

    /// Peer online flag.
    pub fn is_online(&self) -> bool {
        self.user.is_online
    }
}

/// An incoming connection request awaiting acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    /// Relationship id used to accept the request.
    pub connection_id: ConnectionId,
    /// The requesting user.
    pub user: UserSummary,
    /// What the match was based on.
    #[serde(default)]
    pub matched_on: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_to_username() {
        let user = UserSummary::new("u1", "quietfox");
        assert_eq!(user.label(), "quietfox");
        assert_eq!(user.initial(), Some('q'));

        let named = user.clone().with_display_name("Robin");
        assert_eq!(named.label(), "Robin");

        let blank = user.with_display_name("   ");
        assert_eq!(blank.label(), "quietfox");
    }

    #[test]
    fn decodes_sparse_user_and_drops_unknown_mood() {
        let json = r#"{"id":"u1","username":"quietfox","current_mood":"elated"}"#;
        let user: UserSummary = serde_json::from_str(json).unwrap();

        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.current_mood, None);
        assert!(!user.is_online);
        assert!(!user.requested);
    }

    #[test]
    fn requested_flag_never_reaches_the_wire() {
        let mut user = UserSummary::new("u1", "quietfox").with_mood(Mood::Sad);
        user.requested = true;

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("requested"));
        assert!(json.contains("\"sad\""));
    }

    #[test]
    fn connection_flattens_user_fields() {
        let json = r#"{"id":"u2","username":"ember","is_online":true,"matched_on":"anxious"}"#;
        let conn: Connection = serde_json::from_str(json).unwrap();

        assert_eq!(conn.id().as_str(), "u2");
        assert!(conn.is_online());
        assert_eq!(conn.matched_on.as_deref(), Some("anxious"));
    }

    #[test]
    fn pending_request_decodes_nested_user() {
        let json = r#"{"connection_id":"c9","user":{"id":"u3","username":"tide"},"matched_on":"sad"}"#;
        let pending: PendingRequest = serde_json::from_str(json).unwrap();

        assert_eq!(pending.connection_id.as_str(), "c9");
        assert_eq!(pending.user.label(), "tide");
    }
}
