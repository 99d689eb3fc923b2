//! The consumed service contract.

use std::future::Future;

use solace_proto::{
    Connection, ConnectionId, Message, Mood, NewMessage, PendingRequest, UserId, UserSummary,
    payloads::{AssistantReply, DailyQuote, EmergencyResource},
};

use crate::ServiceError;

/// Request/response operations of the remote connection service and the
/// assistant backend.
///
/// The service is the source of truth for relationship and message state.
/// Implementations perform exactly one remote call per method and never retry.
///
/// # Implementations
///
/// - **HTTP**: [`crate::HttpService`] over `reqwest`
/// - **Simulation**: in-memory service with failure injection and latency
pub trait PlatformService: Send + Sync {
    /// Discoverable users, optionally filtered by mood.
    fn discover(
        &self,
        mood: Option<Mood>,
    ) -> impl Future<Output = Result<Vec<UserSummary>, ServiceError>> + Send;

    /// Accepted connections of the current user.
    fn connections(&self) -> impl Future<Output = Result<Vec<Connection>, ServiceError>> + Send;

    /// Incoming requests awaiting the current user's acceptance.
    fn pending(&self) -> impl Future<Output = Result<Vec<PendingRequest>, ServiceError>> + Send;

    /// Send a connect request to `target`.
    fn send_request(
        &self,
        target: &UserId,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// Accept a pending request.
    fn accept_request(
        &self,
        connection: &ConnectionId,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// Ordered message history with `peer`.
    fn thread(
        &self,
        peer: &UserId,
    ) -> impl Future<Output = Result<Vec<Message>, ServiceError>> + Send;

    /// Create a message. Returns the stored message with its server id.
    fn send_message(
        &self,
        message: &NewMessage,
    ) -> impl Future<Output = Result<Message, ServiceError>> + Send;

    /// Ask the assistant a free-text question.
    fn ask_assistant(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<AssistantReply, ServiceError>> + Send;

    /// Quote of the day.
    fn daily_quote(&self) -> impl Future<Output = Result<DailyQuote, ServiceError>> + Send;

    /// Crisis support contacts.
    fn emergency_resources(
        &self,
    ) -> impl Future<Output = Result<Vec<EmergencyResource>, ServiceError>> + Send;
}
