//! Core types for the LLM abstraction layer

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use super::capability::TokenLimitField;
use super::error::LlmError;

/// A change the parameter adapter made to what the caller asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterAdjustment {
    /// The model family only accepts a fixed temperature
    TemperatureOverridden { requested: f64, applied: f64 },
    /// The requested temperature was outside the family's range
    TemperatureClamped { requested: f64, applied: f64 },
    /// A named option was not forwarded
    OptionDropped { name: String, reason: String },
}

/// Provider-ready parameters produced by the parameter adapter
///
/// Holds everything except the model and the messages. Exactly one of
/// `max_tokens` / `max_completion_tokens` is present.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    /// Model identifier as supplied by the caller
    pub model: String,
    /// Name of the capability-table row that matched
    pub family: &'static str,
    /// Parameter name to value, valid for the resolved model family
    pub params: Map<String, Value>,
    /// Changes made to the caller's options
    pub adjustments: Vec<ParameterAdjustment>,
}

impl NormalizedRequest {
    /// Look up a parameter
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Which token-limit key this request carries
    pub fn token_limit_field(&self) -> Option<TokenLimitField> {
        [TokenLimitField::MaxTokens, TokenLimitField::MaxCompletionTokens]
            .into_iter()
            .find(|field| self.params.contains_key(field.as_str()))
    }

    /// The output-length limit, whichever key carries it
    pub fn max_output_tokens(&self) -> Option<u64> {
        self.token_limit_field()
            .and_then(|field| self.params.get(field.as_str()))
            .and_then(Value::as_u64)
    }

    /// The temperature that will be sent
    pub fn temperature(&self) -> Option<f64> {
        self.params.get("temperature").and_then(Value::as_f64)
    }

    /// Serialized parameters
    pub fn to_json(&self) -> Value {
        Value::Object(self.params.clone())
    }
}

/// Token counts reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Prompt tokens consumed
    pub input_tokens: u32,
    /// Response tokens generated
    pub output_tokens: u32,
    /// Sum of input and output
    pub total_tokens: u32,
    /// Hidden chain-of-thought tokens, for families that report them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u32>,
}

impl UsageMetadata {
    /// Create usage metadata from input and output counts
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
            reasoning_tokens: None,
        }
    }
}

/// Normalized output of a successful generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Text of the first completion
    pub text: String,
    /// Provider name the call was routed to
    pub provider: String,
    /// Model identifier the caller asked for
    pub model: String,
    /// Model identifier the provider reported, if any
    pub response_model: Option<String>,
    /// Why the provider stopped generating
    pub finish_reason: Option<String>,
    /// Token usage, if reported
    pub usage: Option<UsageMetadata>,
    /// Changes the adapter made to the requested options
    pub adjustments: Vec<ParameterAdjustment>,
}

impl GenerationResult {
    /// Whether any requested option was changed before sending
    pub fn was_adjusted(&self) -> bool {
        !self.adjustments.is_empty()
    }
}

/// Terminal state of a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Success,
    AuthError,
    NotFound,
    CapabilityRejected,
    RateLimited,
    TransportFailure,
    Cancelled,
    Unknown,
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CallOutcome::Success => "reachable",
            CallOutcome::AuthError => "authentication failed",
            CallOutcome::NotFound => "model not found",
            CallOutcome::CapabilityRejected => "request rejected",
            CallOutcome::RateLimited => "rate limited",
            CallOutcome::TransportFailure => "network failure",
            CallOutcome::Cancelled => "cancelled",
            CallOutcome::Unknown => "unknown failure",
        };
        f.write_str(label)
    }
}

/// Outcome of a connectivity probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub provider: String,
    pub model: String,
    pub outcome: CallOutcome,
    /// Diagnostic detail for failures
    pub message: Option<String>,
    /// HTTP status, when the provider answered
    pub status: Option<u16>,
    pub latency_ms: u64,
    pub checked_at: DateTime<Utc>,
}

impl ProbeResult {
    /// A successful probe
    pub fn reachable(provider: impl Into<String>, model: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            outcome: CallOutcome::Success,
            message: None,
            status: None,
            latency_ms,
            checked_at: Utc::now(),
        }
    }

    /// A failed probe, classified from the error that ended it
    pub fn from_error(
        provider: impl Into<String>,
        model: impl Into<String>,
        error: &LlmError,
        latency_ms: u64,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            outcome: error.outcome(),
            message: Some(error.to_string()),
            status: error.status(),
            latency_ms,
            checked_at: Utc::now(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.outcome == CallOutcome::Success
    }
}

/// Per-call secrets, keyed by provider name
#[derive(Debug, Default)]
pub struct Credentials {
    keys: HashMap<String, SecretString>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the secret for a provider
    pub fn with(mut self, provider: impl Into<String>, secret: impl Into<String>) -> Self {
        self.insert(provider, secret);
        self
    }

    pub fn insert(&mut self, provider: impl Into<String>, secret: impl Into<String>) {
        self.keys
            .insert(provider.into(), SecretString::from(secret.into()));
    }

    pub fn get(&self, provider: &str) -> Option<&SecretString> {
        self.keys.get(provider)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
