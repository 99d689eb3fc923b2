//! Sans-IO simulation world.
//!
//! `SimWorld` pairs an [`App`] with a [`SimBackend`] and keeps every action
//! the App has issued in an outstanding queue. Tests choose which action
//! completes next with [`SimWorld::deliver`], so any interleaving of responses
//! can be reproduced without timers or an async runtime.

use std::collections::BTreeSet;

use solace_app::{App, AppAction, AppEvent, IntentError};
use solace_proto::UserId;

use crate::{InvariantRegistry, SimBackend, SystemSnapshot, Violation};

/// App plus backend with manually ordered completions.
pub struct SimWorld {
    app: App,
    backend: SimBackend,
    outstanding: Vec<AppAction>,
    invariants: InvariantRegistry,
    ledger_history: Vec<BTreeSet<UserId>>,
}

impl SimWorld {
    /// Create a world with the standard invariants.
    pub fn new(app: App, backend: SimBackend) -> Self {
        Self {
            app,
            backend,
            outstanding: Vec::new(),
            invariants: InvariantRegistry::standard(),
            ledger_history: Vec::new(),
        }
    }

    /// Queue the initial load.
    pub fn start(&mut self) {
        let actions = self.app.start();
        self.queue(actions);
    }

    /// Run a fallible intent and queue its actions.
    ///
    /// # Errors
    ///
    /// Returns the intent's rejection; nothing is queued in that case.
    pub fn intent<F>(&mut self, intent: F) -> Result<(), IntentError>
    where
        F: FnOnce(&mut App) -> Result<Vec<AppAction>, IntentError>,
    {
        let actions = intent(&mut self.app)?;
        self.queue(actions);
        Ok(())
    }

    /// Run an intent that cannot be rejected and queue its actions.
    pub fn dispatch<F>(&mut self, intent: F)
    where
        F: FnOnce(&mut App) -> Vec<AppAction>,
    {
        let actions = intent(&mut self.app);
        self.queue(actions);
    }

    /// Complete the outstanding action at `index` and apply its event.
    ///
    /// Service actions are answered by the backend at this moment; a
    /// `RevealAfter` completes as if its delay had elapsed. Returns `false` if
    /// no action is outstanding at `index`.
    pub fn deliver(&mut self, index: usize) -> bool {
        if index >= self.outstanding.len() {
            return false;
        }
        let action = self.outstanding.remove(index);
        let event = match self.backend.resolve(&action) {
            Some(event) => event,
            None => match action {
                AppAction::RevealAfter { request_id, .. } => {
                    AppEvent::AssistantRevealDue { request_id }
                },
                other => {
                    tracing::warn!(?other, "backend produced no completion");
                    return true;
                },
            },
        };

        let actions = self.app.handle(event);
        self.queue(actions);
        true
    }

    /// Complete outstanding actions in issue order until none remain.
    pub fn deliver_all(&mut self) {
        while self.deliver(0) {}
    }

    /// Check the standard invariants against the current state.
    ///
    /// # Errors
    ///
    /// Returns every violated invariant.
    pub fn check(&self) -> Result<(), Vec<Violation>> {
        let snapshot =
            SystemSnapshot::from_app(&self.app).with_history(self.ledger_history.clone());
        self.invariants.check_all(&snapshot)
    }

    /// Actions issued and not yet completed, in issue order.
    pub fn outstanding(&self) -> &[AppAction] {
        &self.outstanding
    }

    /// Application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Backend state.
    pub fn backend(&self) -> &SimBackend {
        &self.backend
    }

    /// Backend state, for failure injection between steps.
    pub fn backend_mut(&mut self) -> &mut SimBackend {
        &mut self.backend
    }

    fn queue(&mut self, actions: Vec<AppAction>) {
        self.outstanding.extend(actions);
        self.ledger_history.push(self.app.tracker().requested_ids().iter().cloned().collect());
    }
}
