//! Small request bodies and the extras endpoints' responses.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Body for sending a connect request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectRequest {
    /// User to connect with.
    pub target_user_id: UserId,
}

/// Body for the assistant chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantPrompt {
    /// Free-text prompt.
    pub message: String,
}

/// Assistant chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Reply text.
    pub response: String,
}

/// Motivational quote of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuote {
    /// Quote text.
    pub quote: String,
    /// Attribution.
    #[serde(default)]
    pub author: Option<String>,
}

/// Crisis support contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyResource {
    /// Organisation name.
    pub name: String,
    /// Phone number or contact instruction.
    pub contact: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Website.
    #[serde(default)]
    pub url: Option<String>,
}
