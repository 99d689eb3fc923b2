//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: state machines
//! - [`PlatformService`]: remote calls
//! - [`Environment`]: timers for paced assistant replies
//!
//! Every [`AppAction`] becomes one future in a [`FuturesUnordered`] set, so
//! independent calls are in flight together and complete in whatever order the
//! backend answers. Completions are applied to the [`App`] one at a time.
//! Nothing is cancelled; stale completions are fenced by the state machines.

use std::sync::Arc;

use futures::{
    FutureExt, StreamExt,
    future::BoxFuture,
    stream::FuturesUnordered,
};
use solace_client::PlatformService;

use crate::{App, AppAction, AppEvent, Environment, IntentError};

/// Generic runtime that executes App actions against a service.
///
/// # Type Parameters
///
/// - `S`: Remote service implementation
/// - `E`: Environment providing timers
pub struct Runtime<S, E>
where
    S: PlatformService + 'static,
    E: Environment,
{
    app: App,
    service: Arc<S>,
    env: E,
    in_flight: FuturesUnordered<BoxFuture<'static, AppEvent>>,
}

impl<S, E> Runtime<S, E>
where
    S: PlatformService + 'static,
    E: Environment,
{
    /// Create a runtime owning `service`.
    pub fn new(app: App, service: S, env: E) -> Self {
        Self::with_shared_service(app, Arc::new(service), env)
    }

    /// Create a runtime over a service shared with the caller.
    pub fn with_shared_service(app: App, service: Arc<S>, env: E) -> Self {
        Self { app, service, env, in_flight: FuturesUnordered::new() }
    }

    /// Issue the initial load.
    pub fn start(&mut self) {
        let actions = self.app.start();
        self.execute(actions);
    }

    /// Run an intent against the App and execute the resulting actions.
    ///
    /// # Errors
    ///
    /// Returns the intent's [`IntentError`]; nothing is executed in that case.
    pub fn intent<F>(&mut self, intent: F) -> Result<(), IntentError>
    where
        F: FnOnce(&mut App) -> Result<Vec<AppAction>, IntentError>,
    {
        let actions = intent(&mut self.app)?;
        self.execute(actions);
        Ok(())
    }

    /// Run an intent that cannot be rejected.
    pub fn dispatch<F>(&mut self, intent: F)
    where
        F: FnOnce(&mut App) -> Vec<AppAction>,
    {
        let actions = intent(&mut self.app);
        self.execute(actions);
    }

    /// Start executing `actions`.
    pub fn execute(&mut self, actions: Vec<AppAction>) {
        for action in actions {
            tracing::trace!(?action, "executing");
            let future = self.perform(action);
            self.in_flight.push(future);
        }
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn step(&mut self) -> bool {
        let Some(event) = self.in_flight.next().await else {
            return false;
        };
        let actions = self.app.handle(event);
        self.execute(actions);
        true
    }

    /// Apply completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Number of actions still executing.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Underlying service, for calls outside the state machines.
    pub fn service(&self) -> &S {
        &self.service
    }

    fn perform(&self, action: AppAction) -> BoxFuture<'static, AppEvent> {
        let service = Arc::clone(&self.service);
        match action {
            AppAction::LoadDiscover { generation, mood } => async move {
                AppEvent::DiscoverLoaded { generation, result: service.discover(mood).await }
            }
            .boxed(),
            AppAction::LoadConnections { generation } => async move {
                AppEvent::ConnectionsLoaded { generation, result: service.connections().await }
            }
            .boxed(),
            AppAction::LoadPending { generation } => async move {
                AppEvent::PendingLoaded { generation, result: service.pending().await }
            }
            .boxed(),
            AppAction::SendRequest { user_id } => async move {
                let result = service.send_request(&user_id).await;
                AppEvent::RequestSent { user_id, result }
            }
            .boxed(),
            AppAction::AcceptRequest { connection_id } => async move {
                let result = service.accept_request(&connection_id).await;
                AppEvent::RequestAccepted { connection_id, result }
            }
            .boxed(),
            AppAction::FetchThread { peer_id, generation } => async move {
                let result = service.thread(&peer_id).await;
                AppEvent::ThreadLoaded { peer_id, generation, result }
            }
            .boxed(),
            AppAction::SendMessage { generation, message } => async move {
                AppEvent::MessageSent { generation, result: service.send_message(&message).await }
            }
            .boxed(),
            AppAction::AskAssistant { request_id, prompt } => async move {
                AppEvent::AssistantReplied { request_id, result: service.ask_assistant(&prompt).await }
            }
            .boxed(),
            AppAction::RevealAfter { request_id, delay } => {
                let env = self.env.clone();
                async move {
                    env.sleep(delay).await;
                    AppEvent::AssistantRevealDue { request_id }
                }
                .boxed()
            },
        }
    }
}
