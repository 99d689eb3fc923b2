//! Simulated environment.

use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use solace_app::Environment;

/// Environment that records every requested delay.
///
/// Sleeps run on tokio's timer, so under paused time they complete as soon as
/// the runtime is otherwise idle.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl SimEnv {
    /// Environment with no recorded sleeps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in request order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Environment for SimEnv {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).push(duration);
        tokio::time::sleep(duration)
    }
}
