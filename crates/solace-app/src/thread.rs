//! Thread selector and message buffer.
//!
//! Tracks which peer's thread is open, the ordered message list for that
//! thread and the draft input.
//!
//! Opening a peer is synchronous: the previous buffer is discarded before the
//! history fetch is issued, so the previous peer's messages are never shown
//! under the new peer. The thread generation advances on every open and close;
//! fetch and send completions stamped with an older generation are dropped.
//!
//! Sends can complete before the history fetch does. Messages appended by a
//! send are kept for the current generation and re-appended after the fetched
//! list, skipping any id the server already returned.

use solace_client::ServiceError;
use solace_proto::{Message, MessageKind, NewMessage, UserId, UserSummary};

use crate::{AppAction, Generation, IntentError, error::absorb};

/// Open thread state machine.
#[derive(Debug, Clone, Default)]
pub struct ThreadBuffer {
    peer: Option<UserSummary>,
    messages: Vec<Message>,
    /// Messages appended by sends during the current generation.
    sent: Vec<Message>,
    draft: String,
    generation: Generation,
    loading: bool,
}

impl ThreadBuffer {
    /// Create a buffer with no open thread.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the thread with `user` and fetch its history.
    pub fn open(&mut self, user: UserSummary) -> Vec<AppAction> {
        let generation = self.generation.advance();
        let peer_id = user.id.clone();

        self.peer = Some(user);
        self.messages.clear();
        self.sent.clear();
        self.loading = true;

        vec![AppAction::FetchThread { peer_id, generation }]
    }

    /// Close the open thread and discard its buffer.
    pub fn close(&mut self) {
        self.generation.advance();
        self.peer = None;
        self.messages.clear();
        self.sent.clear();
        self.loading = false;
    }

    /// Replace the draft input.
    pub fn compose(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Send `content` to the open thread's peer.
    ///
    /// Content is sent as typed; only the emptiness check trims.
    pub fn send_message(
        &self,
        peer_id: &UserId,
        content: &str,
        kind: MessageKind,
    ) -> Result<Vec<AppAction>, IntentError> {
        if content.trim().is_empty() {
            return Err(IntentError::EmptyContent);
        }
        let open = self.peer_id().ok_or(IntentError::NoOpenThread)?;
        if open != peer_id {
            return Err(IntentError::PeerMismatch { open: open.clone(), requested: peer_id.clone() });
        }

        let message =
            NewMessage { receiver_id: peer_id.clone(), content: content.to_owned(), message_type: kind };
        Ok(vec![AppAction::SendMessage { generation: self.generation, message }])
    }

    /// Send the draft as a text message to the open peer.
    pub fn submit_draft(&self) -> Result<Vec<AppAction>, IntentError> {
        if self.draft.trim().is_empty() {
            return Err(IntentError::EmptyContent);
        }
        let peer_id = self.peer_id().ok_or(IntentError::NoOpenThread)?;
        self.send_message(peer_id, &self.draft, MessageKind::Text)
    }

    /// Apply a history fetch result.
    pub fn apply_thread(
        &mut self,
        peer_id: &UserId,
        generation: Generation,
        result: Result<Vec<Message>, ServiceError>,
    ) {
        if !generation.is_current(self.generation) || self.peer_id() != Some(peer_id) {
            tracing::debug!(%peer_id, %generation, latest = %self.generation, "stale thread fetch");
            return;
        }

        self.loading = false;
        match result {
            Ok(messages) => {
                self.messages = messages;
                for message in &self.sent {
                    if !self.messages.iter().any(|m| m.id == message.id) {
                        self.messages.push(message.clone());
                    }
                }
            },
            Err(e) => absorb("thread", &e),
        }
    }

    /// Apply a send result.
    ///
    /// On success the server's copy is appended, unless the buffer already
    /// holds that id, and the draft cleared. A result for a thread that has
    /// since been closed or switched is dropped and leaves the draft alone. On
    /// failure nothing is appended and the draft is kept for the user to retry.
    pub fn apply_sent(&mut self, generation: Generation, result: Result<Message, ServiceError>) {
        match result {
            Ok(message) if generation.is_current(self.generation) && self.peer.is_some() => {
                if !self.messages.iter().any(|m| m.id == message.id) {
                    self.messages.push(message.clone());
                }
                self.sent.push(message);
                self.draft.clear();
            },
            Ok(message) => {
                tracing::debug!(message_id = %message.id, %generation, "send landed on a closed thread");
            },
            Err(e) => absorb("send_message", &e),
        }
    }

    /// Open thread's peer.
    pub fn peer(&self) -> Option<&UserSummary> {
        self.peer.as_ref()
    }

    /// Open thread's peer id.
    pub fn peer_id(&self) -> Option<&UserId> {
        self.peer.as_ref().map(|p| &p.id)
    }

    /// True if a thread is open.
    pub fn is_open(&self) -> bool {
        self.peer.is_some()
    }

    /// True while the history fetch for the open thread is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Messages in append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Draft input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Current thread generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }
}
