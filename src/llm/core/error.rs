//! Error types for the LLM layer

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::types::CallOutcome;

/// Why a call stopped before the provider answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller triggered the cancellation token
    Requested,
    /// The call's deadline elapsed
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Requested => f.write_str("cancelled by caller"),
            CancelReason::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Errors that can occur when using LLM providers
///
/// Every variant that comes out of a provider call names the provider and
/// the model so the caller's retry policy can act without extra context.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Credential missing, rejected, or not permitted for the model
    #[error("Authentication error ({provider}/{model}): {message}")]
    AuthenticationError {
        provider: String,
        model: String,
        status: Option<u16>,
        message: String,
    },

    /// The provider does not know the model
    #[error("Model not found ({provider}/{model}): {message}")]
    ModelNotFound {
        provider: String,
        model: String,
        status: u16,
        message: String,
    },

    /// Request shape rejected by the provider (parameter name, value, size)
    #[error("Capability error ({provider}/{model}): {message}")]
    CapabilityError {
        provider: String,
        model: String,
        status: Option<u16>,
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded ({provider}/{model}, retry after {retry_after:?}): {message}")]
    RateLimitExceeded {
        provider: String,
        model: String,
        status: u16,
        retry_after: Option<Duration>,
        message: String,
    },

    /// Network failure, timeout, or transient server error
    #[error("Transport error ({provider}/{model}, status {status:?}): {message}")]
    TransportError {
        provider: String,
        model: String,
        status: Option<u16>,
        message: String,
    },

    /// The call was aborted before a response arrived
    #[error("Request cancelled ({provider}/{model}): {reason}")]
    Cancelled {
        provider: String,
        model: String,
        reason: CancelReason,
    },

    /// No client is registered under this provider name
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The provider answered with a body we could not interpret
    #[error("Invalid response ({provider}/{model}): {message}")]
    InvalidResponse {
        provider: String,
        model: String,
        message: String,
    },

    /// Any other provider-reported failure
    #[error("Provider error ({provider}/{model}, status {status}, code {code:?}): {message}")]
    ProviderError {
        provider: String,
        model: String,
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Invalid client or registry configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Whether the orchestrator may retry the same call
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimitExceeded { .. }
                | LlmError::TransportError { .. }
                | LlmError::Cancelled { .. }
        )
    }

    /// HTTP status reported by the provider, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::AuthenticationError { status, .. }
            | LlmError::CapabilityError { status, .. }
            | LlmError::TransportError { status, .. } => *status,
            LlmError::ModelNotFound { status, .. }
            | LlmError::RateLimitExceeded { status, .. }
            | LlmError::ProviderError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Provider name attached to the error, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            LlmError::AuthenticationError { provider, .. }
            | LlmError::ModelNotFound { provider, .. }
            | LlmError::CapabilityError { provider, .. }
            | LlmError::RateLimitExceeded { provider, .. }
            | LlmError::TransportError { provider, .. }
            | LlmError::Cancelled { provider, .. }
            | LlmError::InvalidResponse { provider, .. }
            | LlmError::ProviderError { provider, .. } => Some(provider),
            LlmError::UnsupportedProvider(name) => Some(name),
            LlmError::ConfigError(_) => None,
        }
    }

    /// Terminal state of the call this error ended
    pub fn outcome(&self) -> CallOutcome {
        match self {
            LlmError::AuthenticationError { .. } => CallOutcome::AuthError,
            LlmError::ModelNotFound { .. } => CallOutcome::NotFound,
            LlmError::CapabilityError { .. } => CallOutcome::CapabilityRejected,
            LlmError::RateLimitExceeded { .. } => CallOutcome::RateLimited,
            LlmError::TransportError { .. } => CallOutcome::TransportFailure,
            LlmError::Cancelled { .. } => CallOutcome::Cancelled,
            LlmError::UnsupportedProvider(_)
            | LlmError::InvalidResponse { .. }
            | LlmError::ProviderError { .. }
            | LlmError::ConfigError(_) => CallOutcome::Unknown,
        }
    }
}
