//! Application input events.
//!
//! This module defines [`AppEvent`], the completions that drive the state
//! machines after an [`crate::AppAction`] has been executed. User intents do
//! not travel as events; they are method calls on [`crate::App`] that validate
//! before producing actions.

use solace_client::ServiceError;
use solace_proto::{
    Connection, ConnectionId, Message, PendingRequest, UserId, UserSummary,
    payloads::AssistantReply,
};

use crate::{Generation, RequestId};

/// Events processed by the App state machines.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Discover load completed.
    DiscoverLoaded {
        /// Generation of the load.
        generation: Generation,
        /// Users or the failure.
        result: Result<Vec<UserSummary>, ServiceError>,
    },

    /// Connections load completed.
    ConnectionsLoaded {
        /// Generation of the load.
        generation: Generation,
        /// Connections or the failure.
        result: Result<Vec<Connection>, ServiceError>,
    },

    /// Pending load completed.
    PendingLoaded {
        /// Generation of the load.
        generation: Generation,
        /// Pending requests or the failure.
        result: Result<Vec<PendingRequest>, ServiceError>,
    },

    /// Connect request completed.
    RequestSent {
        /// Target user.
        user_id: UserId,
        /// Acknowledgement or the failure.
        result: Result<(), ServiceError>,
    },

    /// Accept completed.
    RequestAccepted {
        /// Accepted relationship.
        connection_id: ConnectionId,
        /// Acknowledgement or the failure.
        result: Result<(), ServiceError>,
    },

    /// Thread history fetch completed.
    ThreadLoaded {
        /// Peer the history was fetched for.
        peer_id: UserId,
        /// Thread generation of the fetch.
        generation: Generation,
        /// Ordered messages or the failure.
        result: Result<Vec<Message>, ServiceError>,
    },

    /// Message send completed.
    MessageSent {
        /// Thread generation at the time of sending.
        generation: Generation,
        /// Server copy of the message or the failure.
        result: Result<Message, ServiceError>,
    },

    /// Assistant answered.
    AssistantReplied {
        /// Request being answered.
        request_id: RequestId,
        /// Reply or the failure.
        result: Result<AssistantReply, ServiceError>,
    },

    /// Typing delay for a held reply elapsed.
    AssistantRevealDue {
        /// Request whose reply is due.
        request_id: RequestId,
    },
}
