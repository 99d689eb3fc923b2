//! Application state machine.
//!
//! This module defines the [`App`] aggregate, which owns the relationship
//! tracker, the open thread and the assistant session, completely decoupled
//! from I/O.
//!
//! This is a pure state machine: intents are validated method calls that
//! return [`AppAction`]s, and completions come back through [`App::handle`].
//! The three components are independent; opening a thread never changes the
//! tab, and the assistant never touches relationship state.

use solace_proto::{ConnectionId, Message, MessageKind, Mood, UserId, UserSummary};

use crate::{
    AppAction, AppConfig, AppEvent, AssistantSession, IntentError, SessionContext, Tab,
    ThreadBuffer, Tracker,
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Signed-in user.
    context: SessionContext,
    /// Relationship views.
    tracker: Tracker,
    /// Open thread.
    thread: ThreadBuffer,
    /// Assistant widget.
    assistant: AssistantSession,
}

impl App {
    /// Create an App for the signed-in user.
    pub fn new(context: SessionContext, config: AppConfig) -> Self {
        Self {
            context,
            tracker: Tracker::new(config.initial_tab),
            thread: ThreadBuffer::new(),
            assistant: AssistantSession::new(config.reveal_delay),
        }
    }

    /// Initial load of the starting tab.
    pub fn start(&mut self) -> Vec<AppAction> {
        self.tracker.refresh()
    }

    /// Process a completion and return follow-up actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::DiscoverLoaded { generation, result } => {
                self.tracker.apply_discover(generation, result);
                vec![]
            },
            AppEvent::ConnectionsLoaded { generation, result } => {
                self.tracker.apply_connections(generation, result);
                vec![]
            },
            AppEvent::PendingLoaded { generation, result } => {
                self.tracker.apply_pending(generation, result);
                vec![]
            },
            AppEvent::RequestSent { user_id, result } => {
                self.tracker.apply_request_sent(&user_id, result);
                vec![]
            },
            AppEvent::RequestAccepted { connection_id, result } => {
                self.tracker.apply_request_accepted(&connection_id, result)
            },
            AppEvent::ThreadLoaded { peer_id, generation, result } => {
                self.thread.apply_thread(&peer_id, generation, result);
                vec![]
            },
            AppEvent::MessageSent { generation, result } => {
                self.thread.apply_sent(generation, result);
                vec![]
            },
            AppEvent::AssistantReplied { request_id, result } => {
                self.assistant.apply_reply(request_id, result)
            },
            AppEvent::AssistantRevealDue { request_id } => {
                self.assistant.reveal(request_id);
                vec![]
            },
        }
    }

    /// Select a relationship tab and load it.
    pub fn set_tab(&mut self, tab: Tab) -> Vec<AppAction> {
        self.tracker.set_tab(tab)
    }

    /// Change the discovery mood filter.
    pub fn set_mood_filter(&mut self, mood: Option<Mood>) -> Vec<AppAction> {
        self.tracker.set_mood_filter(mood)
    }

    /// Reload the current tab.
    pub fn refresh(&mut self) -> Vec<AppAction> {
        self.tracker.refresh()
    }

    /// Send a connect request to a discoverable user.
    pub fn send_request(&self, user_id: &UserId) -> Result<Vec<AppAction>, IntentError> {
        self.tracker.send_request(user_id)
    }

    /// Accept a pending request.
    pub fn accept_request(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Vec<AppAction>, IntentError> {
        self.tracker.accept_request(connection_id)
    }

    /// Open the thread with `user`.
    pub fn open_thread(&mut self, user: UserSummary) -> Vec<AppAction> {
        self.thread.open(user)
    }

    /// Open the thread with an accepted connection.
    pub fn open_connection(&mut self, user_id: &UserId) -> Result<Vec<AppAction>, IntentError> {
        let user = self
            .tracker
            .connections()
            .iter()
            .find(|c| c.id() == user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| IntentError::UnknownUser(user_id.clone()))?;
        Ok(self.thread.open(user))
    }

    /// Close the open thread.
    pub fn close_thread(&mut self) {
        self.thread.close();
    }

    /// Replace the message draft.
    pub fn compose(&mut self, text: impl Into<String>) {
        self.thread.compose(text);
    }

    /// Send a message to the open thread's peer.
    pub fn send_message(
        &self,
        peer_id: &UserId,
        content: &str,
        kind: MessageKind,
    ) -> Result<Vec<AppAction>, IntentError> {
        self.thread.send_message(peer_id, content, kind)
    }

    /// Send the message draft.
    pub fn submit_draft(&self) -> Result<Vec<AppAction>, IntentError> {
        self.thread.submit_draft()
    }

    /// Ask the assistant.
    pub fn ask_assistant(&mut self, text: &str) -> Result<Vec<AppAction>, IntentError> {
        self.assistant.send(text)
    }

    /// Replace the assistant input box.
    pub fn compose_prompt(&mut self, text: impl Into<String>) {
        self.assistant.compose(text);
    }

    /// Send the assistant input box.
    pub fn submit_prompt(&mut self) -> Result<Vec<AppAction>, IntentError> {
        self.assistant.submit()
    }

    /// Put a quick question in the assistant input box.
    pub fn choose_quick_question(&mut self, index: usize) -> Result<(), IntentError> {
        self.assistant.choose_quick_question(index)
    }

    /// Start a fresh assistant transcript.
    pub fn reset_assistant(&mut self) {
        self.assistant.reset();
    }

    /// True if the signed-in user sent `message`.
    pub fn is_outgoing(&self, message: &Message) -> bool {
        message.is_outgoing(&self.context.self_id)
    }

    /// Signed-in user.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Relationship views.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Open thread.
    pub fn thread(&self) -> &ThreadBuffer {
        &self.thread
    }

    /// Assistant session.
    pub fn assistant(&self) -> &AssistantSession {
        &self.assistant
    }
}
