//! Direct messages between two users.

use serde::{Deserialize, Serialize};

use crate::{MessageId, UserId};

/// Message content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text.
    #[default]
    Text,
    /// Image reference.
    Image,
    /// Sticker reference.
    Sticker,
    /// Voice note reference.
    Voice,
}

/// A message as stored by the backend.
///
/// Append order is display order. The backend assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned id.
    pub id: MessageId,
    /// Author.
    pub sender_id: UserId,
    /// Recipient.
    pub receiver_id: UserId,
    /// Free-text content.
    pub content: String,
    /// Content type.
    #[serde(default, rename = "message_type")]
    pub kind: MessageKind,
    /// Read receipt as reported by the server.
    #[serde(default)]
    pub is_read: bool,
    /// Server timestamp, kept verbatim.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Message {
    /// True if `self_id` wrote this message.
    pub fn is_outgoing(&self, self_id: &UserId) -> bool {
        &self.sender_id == self_id
    }

    /// True if this message belongs to the thread between `a` and `b`.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender_id == a && &self.receiver_id == b)
            || (&self.sender_id == b && &self.receiver_id == a)
    }

    /// True if `peer` is either side of this message.
    pub fn involves(&self, peer: &UserId) -> bool {
        &self.sender_id == peer || &self.receiver_id == peer
    }
}

/// Body for creating a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Recipient.
    pub receiver_id: UserId,
    /// Content exactly as typed.
    pub content: String,
    /// Content type.
    pub message_type: MessageKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults_to_text_when_absent() {
        let json = r#"{"id":"m1","sender_id":"a","receiver_id":"b","content":"hi"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();

        assert_eq!(msg.kind, MessageKind::Text);
        assert!(!msg.is_read);
    }

    #[test]
    fn direction_helpers() {
        let msg = Message {
            id: MessageId::new("m1"),
            sender_id: UserId::new("a"),
            receiver_id: UserId::new("b"),
            content: "hi".into(),
            kind: MessageKind::Voice,
            is_read: false,
            created_at: None,
        };

        assert!(msg.is_outgoing(&UserId::new("a")));
        assert!(!msg.is_outgoing(&UserId::new("b")));
        assert!(msg.is_between(&UserId::new("b"), &UserId::new("a")));
        assert!(!msg.involves(&UserId::new("c")));
    }

    #[test]
    fn new_message_uses_wire_field_names() {
        let body = NewMessage {
            receiver_id: UserId::new("b"),
            content: "hello".into(),
            message_type: MessageKind::Sticker,
        };
        let json = serde_json::to_string(&body).unwrap();

        assert!(json.contains("\"receiver_id\":\"b\""));
        assert!(json.contains("\"message_type\":\"sticker\""));
    }
}
