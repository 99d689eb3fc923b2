//! Relationship, thread and assistant invariants.
//!
//! [`SimWorld`](crate::SimWorld) snapshots the App after every queued intent
//! or delivered response and runs the registry over it: lists stay free of
//! duplicate ids, `requested` flags are backed by the session ledger, the
//! open thread only holds messages with its peer, and the assistant
//! transcript alternates prompts and replies.

mod checks;
mod snapshot;

pub use checks::{
    AssistantTurnTaking, LedgerMonotonic, RequestedInLedger, ThreadScopedToPeer, UniqueIds,
};
pub use snapshot::SystemSnapshot;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// A failed check.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Check name, as returned by [`Invariant::name`].
    pub invariant: &'static str,
    /// Offending ids or entries.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// One property of a [`SystemSnapshot`].
pub trait Invariant: Send + Sync {
    /// Snake-case name used in [`Violation`].
    fn name(&self) -> &'static str;

    /// Check `state`.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Ordered set of checks run together.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Registry used by [`SimWorld`](crate::SimWorld):
    /// - [`UniqueIds`]: no list holds an id twice
    /// - [`RequestedInLedger`]: requested flags are backed by the ledger
    /// - [`LedgerMonotonic`]: the ledger never shrinks
    /// - [`ThreadScopedToPeer`]: the buffer belongs to the open peer
    /// - [`AssistantTurnTaking`]: one prompt in flight at a time
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(UniqueIds);
        registry.add(RequestedInLedger);
        registry.add(LedgerMonotonic);
        registry.add(ThreadScopedToPeer);
        registry.add(AssistantTurnTaking);
        registry
    }

    /// Register a check.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every check, collecting all violations rather than stopping at
    /// the first.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|check| check.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// True if no check is registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
