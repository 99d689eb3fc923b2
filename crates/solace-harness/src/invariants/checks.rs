//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::{collections::HashSet, fmt::Display, hash::Hash};

use solace_app::Author;

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// Each list holds an id at most once.
///
/// Discover and connections are keyed by user id, pending by connection id.
pub struct UniqueIds;

impl Invariant for UniqueIds {
    fn name(&self) -> &'static str {
        "unique_ids"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        first_duplicate(state.discover.iter().map(|(id, _)| id))
            .or_else(|| first_duplicate(state.connections.iter()))
            .or_else(|| first_duplicate(state.pending.iter()))
            .map_or(Ok(()), |id| {
                Err(Violation { invariant: self.name(), message: format!("{id} listed twice") })
            })
    }
}

fn first_duplicate<'a, T>(ids: impl Iterator<Item = &'a T>) -> Option<String>
where
    T: Eq + Hash + Display + 'a,
{
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id)).map(ToString::to_string)
}

/// A discover entry is flagged only if a request to it succeeded.
pub struct RequestedInLedger;

impl Invariant for RequestedInLedger {
    fn name(&self) -> &'static str {
        "requested_in_ledger"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (id, requested) in &state.discover {
            if *requested && !state.requested.contains(id) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("{id} flagged requested but absent from ledger"),
                });
            }
        }
        Ok(())
    }
}

/// The requested ledger never loses an id.
pub struct LedgerMonotonic;

impl Invariant for LedgerMonotonic {
    fn name(&self) -> &'static str {
        "ledger_monotonic"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let mut history = state.requested_history.iter().chain(std::iter::once(&state.requested));
        let Some(mut previous) = history.next() else {
            return Ok(());
        };
        for current in history {
            if let Some(lost) = previous.difference(current).next() {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("{lost} dropped from ledger"),
                });
            }
            previous = current;
        }
        Ok(())
    }
}

/// The thread buffer only holds messages between the user and the open peer,
/// and is empty when no thread is open.
pub struct ThreadScopedToPeer;

impl Invariant for ThreadScopedToPeer {
    fn name(&self) -> &'static str {
        "thread_scoped_to_peer"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let Some(peer) = &state.open_peer else {
            if state.thread.is_empty() {
                return Ok(());
            }
            return Err(Violation {
                invariant: self.name(),
                message: format!("{} messages buffered with no open thread", state.thread.len()),
            });
        };

        for (sender, receiver) in &state.thread {
            let with_peer = (sender == peer && state.self_id.as_ref() == Some(receiver))
                || (receiver == peer && state.self_id.as_ref() == Some(sender));
            if !with_peer {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("message {sender} -> {receiver} in thread with {peer}"),
                });
            }
        }
        Ok(())
    }
}

/// The transcript opens with the assistant and then alternates user prompt,
/// assistant answer. A trailing prompt without an answer means the assistant
/// is typing, and typing never shows otherwise.
pub struct AssistantTurnTaking;

impl Invariant for AssistantTurnTaking {
    fn name(&self) -> &'static str {
        "assistant_turn_taking"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let violation = |message: String| Err(Violation { invariant: self.name(), message });

        if state.transcript.first().is_some_and(|first| *first != Author::Bot) {
            return violation("transcript does not open with the assistant".into());
        }
        for (i, author) in state.transcript.iter().enumerate().skip(1) {
            let expected = if i % 2 == 1 { Author::User } else { Author::Bot };
            if *author != expected {
                return violation(format!("entry {i} by {author:?}, expected {expected:?}"));
            }
        }

        let awaiting = state.transcript.last() == Some(&Author::User);
        if awaiting != state.typing {
            return violation(format!(
                "typing is {} with last entry by {:?}",
                state.typing,
                state.transcript.last()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use solace_proto::UserId;

    use super::*;

    fn ids(raw: &[&str]) -> Vec<UserId> {
        raw.iter().map(|s| UserId::new(*s)).collect()
    }

    #[test]
    fn duplicate_connection_detected() {
        let state = SystemSnapshot { connections: ids(&["a", "a"]), ..SystemSnapshot::empty() };
        assert!(UniqueIds.check(&state).is_err());
    }

    #[test]
    fn flag_outside_ledger_detected() {
        let state = SystemSnapshot {
            discover: vec![(UserId::new("a"), true)],
            ..SystemSnapshot::empty()
        };
        assert!(RequestedInLedger.check(&state).is_err());
    }

    #[test]
    fn shrinking_ledger_detected() {
        let state = SystemSnapshot {
            requested_history: vec![ids(&["a", "b"]).into_iter().collect()],
            requested: ids(&["a"]).into_iter().collect(),
            ..SystemSnapshot::empty()
        };
        let violation = LedgerMonotonic.check(&state).unwrap_err();
        assert!(violation.message.contains('b'));
    }

    #[test]
    fn foreign_message_in_thread_detected() {
        let state = SystemSnapshot {
            self_id: Some(UserId::new("me")),
            open_peer: Some(UserId::new("a")),
            thread: vec![(UserId::new("b"), UserId::new("me"))],
            ..SystemSnapshot::empty()
        };
        assert!(ThreadScopedToPeer.check(&state).is_err());
    }

    #[test]
    fn buffer_without_peer_detected() {
        let state = SystemSnapshot {
            thread: vec![(UserId::new("a"), UserId::new("me"))],
            ..SystemSnapshot::empty()
        };
        assert!(ThreadScopedToPeer.check(&state).is_err());
    }

    #[test]
    fn typing_must_match_transcript() {
        let state = SystemSnapshot {
            transcript: vec![Author::Bot, Author::User, Author::Bot],
            typing: true,
            ..SystemSnapshot::empty()
        };
        assert!(AssistantTurnTaking.check(&state).is_err());

        let state = SystemSnapshot {
            transcript: vec![Author::Bot, Author::User],
            typing: true,
            ..SystemSnapshot::empty()
        };
        assert!(AssistantTurnTaking.check(&state).is_ok());
    }
}
