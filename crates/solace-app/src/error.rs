//! Intent validation errors and the fail-soft policy.

use solace_client::ServiceError;
use solace_proto::{ConnectionId, UserId};
use thiserror::Error;

/// A user intent rejected before any request was issued.
///
/// Rejection never mutates state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    /// Message or prompt is empty after trimming whitespace.
    #[error("content is empty")]
    EmptyContent,

    /// Sending requires an open thread.
    #[error("no thread is open")]
    NoOpenThread,

    /// Sending to a peer other than the open thread's peer.
    #[error("thread is open with {open}, not {requested}")]
    PeerMismatch {
        /// Peer of the open thread.
        open: UserId,
        /// Peer named by the intent.
        requested: UserId,
    },

    /// Connect request for a user not in the discover list.
    #[error("user {0} is not in the discover list")]
    UnknownUser(UserId),

    /// Connect request already sent to this user.
    #[error("request already sent to {0}")]
    AlreadyRequested(UserId),

    /// Accept for a connection not in the pending list.
    #[error("connection {0} is not pending")]
    UnknownConnection(ConnectionId),

    /// Assistant is still answering the previous prompt.
    #[error("assistant is busy")]
    AssistantBusy,
}

/// Fail-soft policy for list loads and relationship calls.
///
/// The failure is logged and the caller keeps its last known state. Nothing is
/// surfaced to the user and nothing is retried.
pub(crate) fn absorb(op: &'static str, error: &ServiceError) {
    tracing::warn!(op, %error, transient = error.is_transient(), "keeping last known state");
}
