//! In-memory backend for deterministic testing.
//!
//! `SimBackend` holds the relationship graph, message threads and canned
//! assistant replies for one signed-in user. Every operation is synchronous so
//! it can drive the sans-IO [`App`](solace_app::App) directly through
//! [`SimBackend::resolve`], or sit behind the async
//! [`SimService`](crate::SimService) for runtime tests.
//!
//! Failures are injected per operation and persist until cleared.

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use solace_app::{AppAction, AppEvent};
use solace_client::ServiceError;
use solace_proto::{
    Connection, ConnectionId, Message, MessageId, MessageKind, Mood, NewMessage, PendingRequest,
    UserId, UserSummary,
    payloads::{AssistantReply, DailyQuote, EmergencyResource},
};

/// Backend operation, used for failure injection, latency and the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `GET /api/connections/discover`
    Discover,
    /// `GET /api/connections/my`
    Connections,
    /// `GET /api/connections/pending`
    Pending,
    /// `POST /api/connections/request`
    SendRequest,
    /// `POST /api/connections/accept/{id}`
    AcceptRequest,
    /// `GET /api/connections/messages/{peer}`
    Thread,
    /// `POST /api/connections/messages`
    SendMessage,
    /// `POST /api/extras/sal`
    Assistant,
    /// `GET /api/extras/quote`
    Quote,
    /// `GET /api/extras/emergency-resources`
    Resources,
}

/// In-memory backend state.
#[derive(Debug, Clone)]
pub struct SimBackend {
    self_id: UserId,
    discoverable: Vec<UserSummary>,
    connections: Vec<Connection>,
    pending: Vec<PendingRequest>,
    threads: HashMap<UserId, Vec<Message>>,
    requests: Vec<UserId>,
    failures: HashSet<Op>,
    latency: HashMap<Op, Duration>,
    thread_latency: HashMap<UserId, Duration>,
    calls: Vec<Op>,
    next_message: u64,
}

impl SimBackend {
    /// Empty backend for the signed-in user `self_id`.
    pub fn new(self_id: impl Into<UserId>) -> Self {
        Self {
            self_id: self_id.into(),
            discoverable: Vec::new(),
            connections: Vec::new(),
            pending: Vec::new(),
            threads: HashMap::new(),
            requests: Vec::new(),
            failures: HashSet::new(),
            latency: HashMap::new(),
            thread_latency: HashMap::new(),
            calls: Vec::new(),
            next_message: 0,
        }
    }

    /// Add a discoverable user.
    #[must_use]
    pub fn with_user(mut self, user: UserSummary) -> Self {
        self.discoverable.push(user);
        self
    }

    /// Add an accepted connection.
    #[must_use]
    pub fn with_connection(mut self, user: UserSummary) -> Self {
        self.connections.push(Connection::new(user));
        self
    }

    /// Add an incoming pending request.
    #[must_use]
    pub fn with_pending(mut self, connection_id: impl Into<ConnectionId>, user: UserSummary) -> Self {
        self.pending.push(PendingRequest {
            connection_id: connection_id.into(),
            user,
            matched_on: None,
        });
        self
    }

    /// Seed the thread with `peer` with one message per entry, alternating
    /// sender starting with the peer.
    #[must_use]
    pub fn with_thread(mut self, peer: impl Into<UserId>, contents: &[&str]) -> Self {
        let peer = peer.into();
        for (i, content) in contents.iter().enumerate() {
            let (from, to) = if i % 2 == 0 {
                (peer.clone(), self.self_id.clone())
            } else {
                (self.self_id.clone(), peer.clone())
            };
            let message = self.mint(from, to, (*content).to_owned(), MessageKind::Text);
            self.threads.entry(peer.clone()).or_default().push(message);
        }
        self
    }

    /// Make `op` fail with a 503 until cleared.
    pub fn fail(&mut self, op: Op) {
        self.failures.insert(op);
    }

    /// Stop failing `op`.
    pub fn recover(&mut self, op: Op) {
        self.failures.remove(&op);
    }

    /// Stop failing every operation.
    pub fn recover_all(&mut self) {
        self.failures.clear();
    }

    /// Simulated latency for `op`.
    pub fn set_latency(&mut self, op: Op, delay: Duration) {
        self.latency.insert(op, delay);
    }

    /// Simulated latency for thread fetches with `peer`, overriding the
    /// per-operation latency.
    pub fn set_thread_latency(&mut self, peer: impl Into<UserId>, delay: Duration) {
        self.thread_latency.insert(peer.into(), delay);
    }

    /// Latency to apply before answering `op`.
    pub fn latency_for(&self, op: Op, peer: Option<&UserId>) -> Duration {
        peer.and_then(|p| self.thread_latency.get(p))
            .or_else(|| self.latency.get(&op))
            .copied()
            .unwrap_or_default()
    }

    /// Operations called so far, in call order.
    pub fn calls(&self) -> &[Op] {
        &self.calls
    }

    /// Number of calls made to `op`.
    pub fn call_count(&self, op: Op) -> usize {
        self.calls.iter().filter(|c| **c == op).count()
    }

    /// Users a connect request was accepted for, in order.
    pub fn requests(&self) -> &[UserId] {
        &self.requests
    }

    /// Stored thread with `peer`.
    pub fn thread_with(&self, peer: &UserId) -> &[Message] {
        self.threads.get(peer).map_or(&[], Vec::as_slice)
    }

    /// Discoverable users, optionally filtered by mood.
    pub fn discover(&mut self, mood: Option<Mood>) -> Result<Vec<UserSummary>, ServiceError> {
        self.enter(Op::Discover)?;
        Ok(self
            .discoverable
            .iter()
            .filter(|u| mood.is_none_or(|m| u.current_mood == Some(m)))
            .cloned()
            .collect())
    }

    /// Accepted connections.
    pub fn connections(&mut self) -> Result<Vec<Connection>, ServiceError> {
        self.enter(Op::Connections)?;
        Ok(self.connections.clone())
    }

    /// Pending incoming requests.
    pub fn pending(&mut self) -> Result<Vec<PendingRequest>, ServiceError> {
        self.enter(Op::Pending)?;
        Ok(self.pending.clone())
    }

    /// Record a connect request.
    pub fn send_request(&mut self, target: &UserId) -> Result<(), ServiceError> {
        self.enter(Op::SendRequest)?;
        if !self.discoverable.iter().any(|u| &u.id == target) {
            return Err(not_found(format!("user {target}")));
        }
        self.requests.push(target.clone());
        Ok(())
    }

    /// Move a pending request into the connections.
    pub fn accept_request(&mut self, connection: &ConnectionId) -> Result<(), ServiceError> {
        self.enter(Op::AcceptRequest)?;
        let index = self
            .pending
            .iter()
            .position(|p| &p.connection_id == connection)
            .ok_or_else(|| not_found(format!("connection {connection}")))?;

        let request = self.pending.remove(index);
        self.connections.push(Connection { user: request.user, matched_on: request.matched_on });
        Ok(())
    }

    /// Messages between the signed-in user and `peer`.
    pub fn thread(&mut self, peer: &UserId) -> Result<Vec<Message>, ServiceError> {
        self.enter(Op::Thread)?;
        Ok(self.thread_with(peer).to_vec())
    }

    /// Store a message from the signed-in user.
    pub fn send_message(&mut self, message: &NewMessage) -> Result<Message, ServiceError> {
        self.enter(Op::SendMessage)?;
        let stored = self.mint(
            self.self_id.clone(),
            message.receiver_id.clone(),
            message.content.clone(),
            message.message_type,
        );
        self.threads.entry(message.receiver_id.clone()).or_default().push(stored.clone());
        Ok(stored)
    }

    /// Canned assistant answer echoing the prompt.
    pub fn ask_assistant(&mut self, prompt: &str) -> Result<AssistantReply, ServiceError> {
        self.enter(Op::Assistant)?;
        Ok(AssistantReply { response: format!("You asked: {prompt}") })
    }

    /// Fixed quote.
    pub fn daily_quote(&mut self) -> Result<DailyQuote, ServiceError> {
        self.enter(Op::Quote)?;
        Ok(DailyQuote {
            quote: "You are not alone.".into(),
            author: Some("AI Listener".into()),
        })
    }

    /// Fixed crisis contacts.
    pub fn emergency_resources(&mut self) -> Result<Vec<EmergencyResource>, ServiceError> {
        self.enter(Op::Resources)?;
        Ok(vec![EmergencyResource {
            name: "Crisis Line".into(),
            contact: "988".into(),
            description: "24/7 support".into(),
            url: None,
        }])
    }

    /// Execute a service action synchronously and produce its completion.
    ///
    /// Returns `None` for timer actions, which have no backend counterpart;
    /// the caller decides when the delay has elapsed.
    pub fn resolve(&mut self, action: &AppAction) -> Option<AppEvent> {
        let event = match action {
            AppAction::LoadDiscover { generation, mood } => {
                AppEvent::DiscoverLoaded { generation: *generation, result: self.discover(*mood) }
            },
            AppAction::LoadConnections { generation } => {
                AppEvent::ConnectionsLoaded { generation: *generation, result: self.connections() }
            },
            AppAction::LoadPending { generation } => {
                AppEvent::PendingLoaded { generation: *generation, result: self.pending() }
            },
            AppAction::SendRequest { user_id } => AppEvent::RequestSent {
                user_id: user_id.clone(),
                result: self.send_request(user_id),
            },
            AppAction::AcceptRequest { connection_id } => AppEvent::RequestAccepted {
                connection_id: connection_id.clone(),
                result: self.accept_request(connection_id),
            },
            AppAction::FetchThread { peer_id, generation } => AppEvent::ThreadLoaded {
                peer_id: peer_id.clone(),
                generation: *generation,
                result: self.thread(peer_id),
            },
            AppAction::SendMessage { generation, message } => AppEvent::MessageSent {
                generation: *generation,
                result: self.send_message(message),
            },
            AppAction::AskAssistant { request_id, prompt } => AppEvent::AssistantReplied {
                request_id: *request_id,
                result: self.ask_assistant(prompt),
            },
            AppAction::RevealAfter { .. } => return None,
        };
        Some(event)
    }

    fn enter(&mut self, op: Op) -> Result<(), ServiceError> {
        self.calls.push(op);
        if self.failures.contains(&op) {
            tracing::debug!(?op, "injected failure");
            return Err(ServiceError::Status { status: 503, body: "injected".into() });
        }
        Ok(())
    }

    fn mint(
        &mut self,
        sender_id: UserId,
        receiver_id: UserId,
        content: String,
        kind: MessageKind,
    ) -> Message {
        self.next_message += 1;
        Message {
            id: MessageId::new(format!("m{}", self.next_message)),
            sender_id,
            receiver_id,
            content,
            kind,
            is_read: false,
            created_at: None,
        }
    }
}

fn not_found(what: String) -> ServiceError {
    ServiceError::Status { status: 404, body: format!("{what} not found") }
}
