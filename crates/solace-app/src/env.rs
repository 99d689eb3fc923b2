//! Environment abstraction for deterministic testing.
//!
//! Decouples the runtime from wall-clock timers. Production uses tokio's timer;
//! tests can record requested delays or run under paused time.

use std::{future::Future, time::Duration};

/// Abstract environment providing async timers.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Sleeps for the specified duration.
    ///
    /// Only the runtime calls this; the state machines never wait.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production environment backed by tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
