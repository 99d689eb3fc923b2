//! Async service over the in-memory backend.
//!
//! `SimService` implements [`PlatformService`] so the same
//! [`solace_app::Runtime`] that drives [`solace_client::HttpService`] in
//! production runs against [`SimBackend`] in tests. Each call waits out the
//! backend's configured latency on tokio's timer before touching state, so
//! with paused time the completion order is fully determined by the latencies.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use solace_client::{PlatformService, ServiceError};
use solace_proto::{
    Connection, ConnectionId, Message, Mood, NewMessage, PendingRequest, UserId, UserSummary,
    payloads::{AssistantReply, DailyQuote, EmergencyResource},
};

use crate::{Op, SimBackend};

/// Shared handle to a [`SimBackend`].
///
/// Clones share the backend, so a test can keep one handle to inject failures
/// and inspect calls while the runtime owns another.
#[derive(Debug, Clone)]
pub struct SimService {
    backend: Arc<Mutex<SimBackend>>,
}

impl SimService {
    /// Wrap a backend.
    pub fn new(backend: SimBackend) -> Self {
        Self { backend: Arc::new(Mutex::new(backend)) }
    }

    /// Lock the backend.
    ///
    /// A test that panicked while holding the lock leaves the state usable.
    pub fn backend(&self) -> MutexGuard<'_, SimBackend> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn pause(&self, op: Op, peer: Option<&UserId>) {
        let delay = self.backend().latency_for(op, peer);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl PlatformService for SimService {
    async fn discover(&self, mood: Option<Mood>) -> Result<Vec<UserSummary>, ServiceError> {
        self.pause(Op::Discover, None).await;
        self.backend().discover(mood)
    }

    async fn connections(&self) -> Result<Vec<Connection>, ServiceError> {
        self.pause(Op::Connections, None).await;
        self.backend().connections()
    }

    async fn pending(&self) -> Result<Vec<PendingRequest>, ServiceError> {
        self.pause(Op::Pending, None).await;
        self.backend().pending()
    }

    async fn send_request(&self, target: &UserId) -> Result<(), ServiceError> {
        self.pause(Op::SendRequest, None).await;
        self.backend().send_request(target)
    }

    async fn accept_request(&self, connection: &ConnectionId) -> Result<(), ServiceError> {
        self.pause(Op::AcceptRequest, None).await;
        self.backend().accept_request(connection)
    }

    async fn thread(&self, peer: &UserId) -> Result<Vec<Message>, ServiceError> {
        self.pause(Op::Thread, Some(peer)).await;
        self.backend().thread(peer)
    }

    async fn send_message(&self, message: &NewMessage) -> Result<Message, ServiceError> {
        self.pause(Op::SendMessage, None).await;
        self.backend().send_message(message)
    }

    async fn ask_assistant(&self, prompt: &str) -> Result<AssistantReply, ServiceError> {
        self.pause(Op::Assistant, None).await;
        self.backend().ask_assistant(prompt)
    }

    async fn daily_quote(&self) -> Result<DailyQuote, ServiceError> {
        self.pause(Op::Quote, None).await;
        self.backend().daily_quote()
    }

    async fn emergency_resources(&self) -> Result<Vec<EmergencyResource>, ServiceError> {
        self.pause(Op::Resources, None).await;
        self.backend().emergency_resources()
    }
}
