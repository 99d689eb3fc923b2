//! Wire types for Solace
//!
//! Request and response shapes for the remote connection service and the
//! assistant backend. These are the records the state machines in
//! `solace-app` hold and the HTTP client in `solace-client` decodes.
//!
//! # Boundary validation
//!
//! Responses from the backend are loosely shaped. Optional fields default when
//! absent, unknown mood tags degrade to `None` instead of failing a whole list,
//! and the local-only `requested` flag is never read from or written to the
//! wire.
//!
//! # Components
//!
//! - [`UserSummary`], [`Connection`], [`PendingRequest`]: relationship records
//! - [`Message`], [`MessageKind`], [`NewMessage`]: direct-message records
//! - [`Mood`]: fixed mood vocabulary used for discovery filtering
//! - [`payloads`]: small request bodies and extras responses

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod ids;
mod message;
mod mood;
pub mod payloads;
mod user;

pub use ids::{ConnectionId, MessageId, UserId};
pub use message::{Message, MessageKind, NewMessage};
pub use mood::{Mood, UnknownMood};
pub use user::{Connection, PendingRequest, UserSummary};
