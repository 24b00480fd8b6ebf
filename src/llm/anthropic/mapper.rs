//! Mapping between abstraction types and Anthropic Messages API types

use crate::llm::core::{
    error::LlmError,
    types::{GenerationResult, NormalizedRequest, UsageMetadata},
};

use super::types::{ClaudeContentBlock, ClaudeErrorResponse, ClaudeMessage, MessagesRequest, MessagesResponse};

/// Convert a normalized request to Claude's request format
pub fn to_messages_request(request: &NormalizedRequest, prompt: &str) -> MessagesRequest {
    MessagesRequest {
        model: request.model.clone(),
        messages: vec![ClaudeMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        params: request.params.clone(),
    }
}

/// Concatenate the text blocks of a Claude response into a [`GenerationResult`]
pub fn from_messages_response(
    provider: &str,
    request: NormalizedRequest,
    response: MessagesResponse,
) -> Result<GenerationResult, LlmError> {
    let text: String = response
        .content
        .iter()
        .filter_map(|block| match block {
            ClaudeContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    if text.is_empty() && response.stop_reason.as_deref() == Some("max_tokens") {
        let budget = request.max_output_tokens().unwrap_or_default();
        return Err(LlmError::CapabilityError {
            provider: provider.to_string(),
            model: request.model,
            status: None,
            message: format!(
                "output budget of {budget} tokens was exhausted before any text was produced"
            ),
        });
    }

    Ok(GenerationResult {
        text,
        provider: provider.to_string(),
        model: request.model,
        response_model: response.model,
        finish_reason: response.stop_reason,
        usage: response
            .usage
            .map(|usage| UsageMetadata::new(usage.input_tokens, usage.output_tokens)),
        adjustments: request.adjustments,
    })
}

/// Decode `{"type": "error", "error": {...}}` into `(code, kind, message)`
pub fn decode_error(body: &str) -> Option<(Option<String>, Option<String>, String)> {
    let parsed: ClaudeErrorResponse = serde_json::from_str(body).ok()?;
    Some((None, Some(parsed.error.error_type), parsed.error.message))
}
