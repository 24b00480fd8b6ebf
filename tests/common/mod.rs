//! Shared fixtures for provider tests backed by a wiremock server
#![allow(dead_code)]

use secrecy::SecretString;
use serde_json::{json, Value};
use wiremock::MockServer;

use llmgate::llm::anthropic::{AnthropicClient, AnthropicConfig};
use llmgate::llm::openai::{OpenAiClient, OpenAiConfig};

pub const TEST_KEY: &str = "sk-test";

pub fn key() -> SecretString {
    SecretString::from(TEST_KEY.to_string())
}

/// Base URL of the mock server including the version segment
pub fn base_url(server: &MockServer) -> String {
    format!("{}/v1", server.uri())
}

pub fn openai_client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(
        "openai",
        OpenAiConfig::default().with_base_url(base_url(server)),
    )
    .expect("Failed to create OpenAI client")
}

pub fn anthropic_client(server: &MockServer) -> AnthropicClient {
    AnthropicClient::new(
        "anthropic",
        AnthropicConfig::default().with_base_url(base_url(server)),
    )
    .expect("Failed to create Anthropic client")
}

/// Chat completion body in the official OpenAI format
pub fn chat_completion(model: &str, content: &str, finish_reason: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": finish_reason
        }],
        "usage": {
            "prompt_tokens": 9,
            "completion_tokens": 12,
            "total_tokens": 21
        }
    })
}

/// OpenAI error body
pub fn openai_error(kind: &str, message: &str, code: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "type": kind,
            "param": null,
            "code": code
        }
    })
}

/// Anthropic Messages API body
pub fn claude_message(text: &str, stop_reason: &str) -> Value {
    json!({
        "id": "msg_01XFDUDYJgAACzvnptvVoYEL",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-haiku-20241022",
        "content": [{"type": "text", "text": text}],
        "stop_reason": stop_reason,
        "stop_sequence": null,
        "usage": {"input_tokens": 10, "output_tokens": 3}
    })
}

/// Anthropic error body
pub fn claude_error(kind: &str, message: &str) -> Value {
    json!({"type": "error", "error": {"type": kind, "message": message}})
}
