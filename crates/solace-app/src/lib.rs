//! Application layer for Solace
//!
//! Pure state machines and a generic runtime for the connections panel and the
//! assistant widget, enabling deterministic tests with the same code that runs
//! in production.
//!
//! # Components
//!
//! - [`Tracker`]: relationship views (discover, connections, pending) and the
//!   mood filter
//! - [`ThreadBuffer`]: open peer, message buffer and draft input
//! - [`AssistantSession`]: assistant transcript with one in-flight request
//! - [`App`]: aggregate that routes [`AppEvent`]s to the components
//! - [`Runtime`]: executes [`AppAction`]s concurrently against a
//!   [`solace_client::PlatformService`]
//!
//! # Stale responses
//!
//! Every list load and thread fetch is stamped with a [`Generation`]. Only the
//! response carrying the latest generation for its list or thread is applied,
//! so a slow response can never overwrite newer state after a rapid switch.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod assistant;
mod config;
mod env;
mod error;
mod event;
mod runtime;
mod state;
mod thread;
mod tracker;

pub use action::AppAction;
pub use app::App;
pub use assistant::{AssistantSession, FALLBACK_REPLY, GREETING, QUICK_QUESTIONS};
pub use config::{AppConfig, DEFAULT_REVEAL_DELAY, SessionContext};
pub use env::{Environment, SystemEnv};
pub use error::IntentError;
pub use event::AppEvent;
pub use runtime::Runtime;
pub use state::{AssistantEntry, AssistantPhase, Author, Generation, RequestId, Tab};
pub use thread::ThreadBuffer;
pub use tracker::Tracker;
