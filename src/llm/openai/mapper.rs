//! Mapping between abstraction types and OpenAI chat-completions types

use crate::llm::core::{
    error::LlmError,
    types::{GenerationResult, NormalizedRequest, UsageMetadata},
};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenAiErrorResponse, OpenAiUsage,
};

/// Build the wire request: one user message plus the normalized parameters
pub fn to_chat_request(request: &NormalizedRequest, prompt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: request.model.clone(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        params: request.params.clone(),
    }
}

/// Extract the first completion into a [`GenerationResult`]
///
/// Empty text with a `length` finish reason means the output budget was used
/// up before anything visible was produced; that is a capability problem, not
/// a success. A choice with no text at all is never a success either.
pub fn from_chat_response(
    provider: &str,
    request: NormalizedRequest,
    response: ChatCompletionResponse,
) -> Result<GenerationResult, LlmError> {
    let ChatCompletionResponse {
        model: response_model,
        choices,
        usage,
        ..
    } = response;

    let choice = choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse {
            provider: provider.to_string(),
            model: request.model.clone(),
            message: "response contained no choices".to_string(),
        })?;

    let budget = request.max_output_tokens().unwrap_or_default();
    let exhausted = choice.finish_reason.as_deref() == Some("length");
    let text = match choice.message.content.or(choice.message.refusal) {
        Some(text) => text,
        None if exhausted => String::new(),
        None if choice.finish_reason.as_deref() == Some("content_filter") => {
            return Err(LlmError::CapabilityError {
                provider: provider.to_string(),
                model: request.model,
                status: None,
                message: "completion was withheld by the provider's content filter".to_string(),
            });
        }
        None => {
            return Err(LlmError::InvalidResponse {
                provider: provider.to_string(),
                model: request.model,
                message: format!(
                    "choice carried no text content (finish_reason: {})",
                    choice.finish_reason.as_deref().unwrap_or("none")
                ),
            });
        }
    };

    if text.is_empty() && exhausted {
        return Err(LlmError::CapabilityError {
            provider: provider.to_string(),
            model: request.model,
            status: None,
            message: format!(
                "output budget of {budget} tokens was exhausted before any content was produced"
            ),
        });
    }

    Ok(GenerationResult {
        text,
        provider: provider.to_string(),
        model: request.model,
        response_model,
        finish_reason: choice.finish_reason,
        usage: usage.map(to_usage),
        adjustments: request.adjustments,
    })
}

fn to_usage(usage: OpenAiUsage) -> UsageMetadata {
    UsageMetadata {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
        reasoning_tokens: usage
            .completion_tokens_details
            .and_then(|details| details.reasoning_tokens),
    }
}

/// Decode `{"error": {...}}` into `(code, kind, message)`
pub fn decode_error(body: &str) -> Option<(Option<String>, Option<String>, String)> {
    let parsed: OpenAiErrorResponse = serde_json::from_str(body).ok()?;
    let code = parsed.error.code.map(|code| match code {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    });
    Some((code, parsed.error.kind, parsed.error.message))
}
