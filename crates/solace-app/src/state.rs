//! Observable application state types.
//!
//! Small value types shared by the state machines: the relationship tab,
//! generation and request tokens, and assistant transcript entries. These are
//! the "View Model" a renderer reads.

use std::fmt;

/// Relationship view selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Discoverable users.
    #[default]
    Discover,
    /// Accepted connections.
    Connections,
    /// Incoming requests awaiting acceptance.
    Pending,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Self; 3] = [Self::Discover, Self::Connections, Self::Pending];
}

/// Monotonic token stamped on a load so stale responses can be recognised.
///
/// Each list and the thread own an independent counter. The zero value is
/// never issued and is never [current](Self::is_current), so a fresh component
/// rejects every response until it has requested something.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Advance to the next generation and return it.
    pub fn advance(&mut self) -> Self {
        self.0 += 1;
        *self
    }

    /// True if `self` was issued and is still the latest issued by `latest`.
    pub fn is_current(self, latest: Self) -> bool {
        self.0 != 0 && self == latest
    }

    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Identity of one assistant request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Who wrote an assistant transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    /// The assistant.
    Bot,
    /// The local user.
    User,
}

/// One line of the assistant transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantEntry {
    /// Position-independent id, unique within a session.
    pub id: u64,
    /// Author.
    pub author: Author,
    /// Text.
    pub text: String,
}

impl AssistantEntry {
    /// True if the assistant wrote this entry.
    pub fn is_bot(&self) -> bool {
        self.author == Author::Bot
    }
}

/// Assistant request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantPhase {
    /// No request in flight. `send` is accepted.
    Idle,
    /// Request issued, waiting for the backend.
    AwaitingResponse {
        /// In-flight request.
        request_id: RequestId,
    },
    /// Reply received, held back until the typing delay elapses.
    Pacing {
        /// Request the reply answers.
        request_id: RequestId,
        /// Reply text to reveal.
        reply: String,
    },
}

impl AssistantPhase {
    /// In-flight request, if any.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::Idle => None,
            Self::AwaitingResponse { request_id } | Self::Pacing { request_id, .. } => {
                Some(*request_id)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_advances_monotonically() {
        let mut generation = Generation::default();
        let first = generation.advance();
        let second = generation.advance();

        assert!(first < second);
        assert_eq!(second, generation);
        assert_ne!(first, Generation::default());
    }

    #[test]
    fn unissued_generation_is_never_current() {
        let mut generation = Generation::default();
        assert!(!Generation::default().is_current(generation));

        let issued = generation.advance();
        assert!(issued.is_current(generation));
        generation.advance();
        assert!(!issued.is_current(generation));
    }

    #[test]
    fn phase_exposes_request_id() {
        assert_eq!(AssistantPhase::Idle.request_id(), None);
        let pacing = AssistantPhase::Pacing { request_id: RequestId(3), reply: "hi".into() };
        assert_eq!(pacing.request_id(), Some(RequestId(3)));
    }
}
