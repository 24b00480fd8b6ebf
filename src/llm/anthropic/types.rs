//! Anthropic Messages API request and response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for `POST /messages`
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    /// Model identifier
    pub model: String,
    /// Array of messages in the conversation
    pub messages: Vec<ClaudeMessage>,
    /// Normalized generation parameters (`max_tokens` is always present)
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// A single message in the Claude conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaudeMessage {
    /// Role: "user" or "assistant"
    pub role: String,
    /// Text content
    pub content: String,
}

/// Response body from `POST /messages`
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    /// Message ID
    #[serde(default)]
    pub id: Option<String>,
    /// Model identifier
    #[serde(default)]
    pub model: Option<String>,
    /// Content blocks
    #[serde(default)]
    pub content: Vec<ClaudeContentBlock>,
    /// Why generation stopped ("end_turn", "max_tokens", ...)
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<ClaudeUsage>,
}

/// A content block within a Claude response
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaudeContentBlock {
    /// Text content
    Text { text: String },
    /// Extended thinking output; never part of the answer text
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    /// Any block type this client does not interpret
    #[serde(other)]
    Other,
}

/// Usage metadata
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeUsage {
    /// Input tokens consumed
    #[serde(default)]
    pub input_tokens: u32,
    /// Output tokens generated
    #[serde(default)]
    pub output_tokens: u32,
}

/// Error envelope: `{"type": "error", "error": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeErrorResponse {
    pub error: ClaudeErrorData,
}

/// Error data
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeErrorData {
    /// Error type (`authentication_error`, `not_found_error`, ...)
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message
    pub message: String,
}
