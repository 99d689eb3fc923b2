//! Deterministic simulation harness for Solace
//!
//! In-memory implementations of the service contract and the environment so
//! the same state machines and runtime that run in production can be tested
//! with scripted failures, controlled latency and arbitrary completion order.
//!
//! # Sans-IO testing
//!
//! [`SimWorld`] drives an [`solace_app::App`] directly, holding issued actions
//! until a test delivers them in any order it chooses.
//!
//! # Runtime testing
//!
//! [`SimService`] and [`SimEnv`] plug into [`solace_app::Runtime`]. Under
//! tokio's paused time, per-operation latencies decide completion order.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Use [`InvariantRegistry::standard()`] for the App invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_backend;
pub mod sim_env;
pub mod sim_service;
pub mod world;

pub use invariants::{
    AssistantTurnTaking, Invariant, InvariantRegistry, InvariantResult, LedgerMonotonic,
    RequestedInLedger, SystemSnapshot, ThreadScopedToPeer, UniqueIds, Violation,
};
pub use sim_backend::{Op, SimBackend};
pub use sim_env::SimEnv;
pub use sim_service::SimService;
pub use world::SimWorld;
