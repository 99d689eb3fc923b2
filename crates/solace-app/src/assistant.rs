//! Assistant session.
//!
//! A linear transcript with at most one request in flight. A reply is held in
//! [`AssistantPhase::Pacing`] until the runtime reports that the typing delay
//! has elapsed, then appended. Any failure appends [`FALLBACK_REPLY`].

use std::time::Duration;

use solace_client::ServiceError;
use solace_proto::payloads::AssistantReply;

use crate::{AppAction, AssistantEntry, AssistantPhase, Author, IntentError, RequestId};

/// First entry of every transcript.
pub const GREETING: &str =
    "Hi, this is SAL! I'm here to help you navigate AI Listener. Ask me anything about the platform!";

/// Shown in place of a reply whenever the assistant call fails.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble right now. Please try again!";

/// Canned prompts offered on a fresh transcript.
pub const QUICK_QUESTIONS: [&str; 4] =
    ["How do I use this?", "Voice features", "Mood tracking", "Emergency help"];

/// Quick questions are offered while the transcript is at most this long.
const QUICK_QUESTION_LIMIT: usize = 2;

/// Assistant transcript state machine.
#[derive(Debug, Clone)]
pub struct AssistantSession {
    entries: Vec<AssistantEntry>,
    phase: AssistantPhase,
    input: String,
    reveal_delay: Duration,
    next_entry: u64,
    next_request: u64,
}

impl AssistantSession {
    /// Fresh session holding only the greeting.
    pub fn new(reveal_delay: Duration) -> Self {
        let mut session = Self {
            entries: Vec::new(),
            phase: AssistantPhase::Idle,
            input: String::new(),
            reveal_delay,
            next_entry: 0,
            next_request: 0,
        };
        session.push(Author::Bot, GREETING);
        session
    }

    /// Send `text` to the assistant.
    pub fn send(&mut self, text: &str) -> Result<Vec<AppAction>, IntentError> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(IntentError::EmptyContent);
        }
        if self.phase != AssistantPhase::Idle {
            return Err(IntentError::AssistantBusy);
        }

        self.next_request += 1;
        let request_id = RequestId(self.next_request);

        self.push(Author::User, prompt);
        self.phase = AssistantPhase::AwaitingResponse { request_id };

        Ok(vec![AppAction::AskAssistant { request_id, prompt: prompt.to_owned() }])
    }

    /// Replace the input box contents.
    pub fn compose(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send the input box contents, clearing it if the send is accepted.
    pub fn submit(&mut self) -> Result<Vec<AppAction>, IntentError> {
        let input = std::mem::take(&mut self.input);
        let result = self.send(&input);
        if result.is_err() {
            self.input = input;
        }
        result
    }

    /// Fill the input box with a quick question by its index in
    /// [`QUICK_QUESTIONS`]. Nothing is sent until [`Self::submit`].
    ///
    /// Rejected as empty content when the index is out of range.
    pub fn choose_quick_question(&mut self, index: usize) -> Result<(), IntentError> {
        let question = QUICK_QUESTIONS.get(index).ok_or(IntentError::EmptyContent)?;
        self.compose(*question);
        Ok(())
    }

    /// Apply an assistant call result.
    pub fn apply_reply(
        &mut self,
        request_id: RequestId,
        result: Result<AssistantReply, ServiceError>,
    ) -> Vec<AppAction> {
        if self.phase != (AssistantPhase::AwaitingResponse { request_id }) {
            tracing::debug!(%request_id, "discarding reply for a forgotten request");
            return vec![];
        }

        match result {
            Ok(reply) if self.reveal_delay.is_zero() => {
                self.push(Author::Bot, reply.response);
                self.phase = AssistantPhase::Idle;
                vec![]
            },
            Ok(reply) => {
                self.phase = AssistantPhase::Pacing { request_id, reply: reply.response };
                vec![AppAction::RevealAfter { request_id, delay: self.reveal_delay }]
            },
            Err(e) => {
                tracing::warn!(%request_id, error = %e, "assistant call failed");
                self.push(Author::Bot, FALLBACK_REPLY);
                self.phase = AssistantPhase::Idle;
                vec![]
            },
        }
    }

    /// Reveal a paced reply once its delay has elapsed.
    pub fn reveal(&mut self, request_id: RequestId) {
        let phase = std::mem::replace(&mut self.phase, AssistantPhase::Idle);
        match phase {
            AssistantPhase::Pacing { request_id: pacing, reply } if pacing == request_id => {
                self.push(Author::Bot, reply);
            },
            other => {
                tracing::debug!(%request_id, "reveal for a request that is not pacing");
                self.phase = other;
            },
        }
    }

    /// Start a fresh transcript.
    ///
    /// Any in-flight request is forgotten, so its eventual reply is dropped.
    /// Request ids keep counting so an old reply can never match a new request.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.phase = AssistantPhase::Idle;
        self.input.clear();
        self.push(Author::Bot, GREETING);
    }

    /// Transcript in append order.
    pub fn entries(&self) -> &[AssistantEntry] {
        &self.entries
    }

    /// Current request phase.
    pub fn phase(&self) -> &AssistantPhase {
        &self.phase
    }

    /// True while the typing indicator should be shown.
    pub fn is_typing(&self) -> bool {
        self.phase != AssistantPhase::Idle
    }

    /// Input box contents.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Quick questions to offer, empty once the conversation is under way.
    pub fn quick_questions(&self) -> &'static [&'static str] {
        if self.entries.len() <= QUICK_QUESTION_LIMIT { &QUICK_QUESTIONS } else { &[] }
    }

    fn push(&mut self, author: Author, text: impl Into<String>) {
        self.next_entry += 1;
        self.entries.push(AssistantEntry { id: self.next_entry, author, text: text.into() });
    }
}
