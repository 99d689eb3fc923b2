//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the state machines for the runtime to execute. Every action
//! maps to exactly one service call or timer, and its completion comes back as
//! one [`crate::AppEvent`].

use std::time::Duration;

use solace_proto::{ConnectionId, Mood, NewMessage, UserId};

use crate::{Generation, RequestId};

/// Actions produced by the App state machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Fetch discoverable users.
    LoadDiscover {
        /// Stamp echoed back in [`crate::AppEvent::DiscoverLoaded`].
        generation: Generation,
        /// Mood filter. `None` for all moods.
        mood: Option<Mood>,
    },

    /// Fetch accepted connections.
    LoadConnections {
        /// Stamp echoed back in [`crate::AppEvent::ConnectionsLoaded`].
        generation: Generation,
    },

    /// Fetch incoming pending requests.
    LoadPending {
        /// Stamp echoed back in [`crate::AppEvent::PendingLoaded`].
        generation: Generation,
    },

    /// Send a connect request.
    SendRequest {
        /// Target user.
        user_id: UserId,
    },

    /// Accept a pending request.
    AcceptRequest {
        /// Pending relationship.
        connection_id: ConnectionId,
    },

    /// Fetch the message history with a peer.
    FetchThread {
        /// Peer whose thread was opened.
        peer_id: UserId,
        /// Thread generation at the time of opening.
        generation: Generation,
    },

    /// Create a direct message.
    SendMessage {
        /// Thread generation at the time of sending.
        generation: Generation,
        /// Message body.
        message: NewMessage,
    },

    /// Ask the assistant.
    AskAssistant {
        /// In-flight request identity.
        request_id: RequestId,
        /// Trimmed prompt.
        prompt: String,
    },

    /// Reveal a held assistant reply after a presentational delay.
    RevealAfter {
        /// Request whose reply is held.
        request_id: RequestId,
        /// Typing delay.
        delay: Duration,
    },
}
