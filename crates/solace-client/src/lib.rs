//! Client
//!
//! The request/response contract of the remote connection service and
//! assistant backend, plus an HTTP implementation of it.
//!
//! # Architecture
//!
//! The state machines in `solace-app` never perform I/O. They emit actions
//! that a runtime executes against a [`PlatformService`]. Production uses
//! [`HttpService`]; tests substitute an in-memory service with scripted
//! failures and latency.
//!
//! # Components
//!
//! - [`PlatformService`]: the consumed REST operations
//! - [`HttpService`]: `reqwest`-backed implementation
//! - [`ServiceConfig`]: base URL, bearer token, optional request timeout
//! - [`ServiceError`]: transport, status and decode failures

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod http;
mod service;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use http::HttpService;
pub use service::PlatformService;
