//! HTTP plumbing shared by provider clients
//!
//! Builds the `reqwest` client and turns non-success responses and
//! transport failures into [`LlmError`] variants with a stable mapping.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response};
use std::time::Duration;

use crate::llm::core::error::LlmError;

/// Timeouts applied to every request a client makes
#[derive(Debug, Clone, Copy)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Build an HTTP client with the given timeouts
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, LlmError> {
    Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}

/// A non-success response, decoded as far as the provider's error body allows
#[derive(Debug, Clone, Default)]
pub struct ApiFailure {
    pub status: u16,
    /// Machine-readable code (`invalid_api_key`, `model_not_found`, ...)
    pub code: Option<String>,
    /// Error class (`invalid_request_error`, `rate_limit_error`, ...)
    pub kind: Option<String>,
    pub message: String,
    pub retry_after: Option<Duration>,
}

impl ApiFailure {
    fn mentions(&self, needle: &str) -> bool {
        self.code.as_deref() == Some(needle) || self.kind.as_deref() == Some(needle)
    }
}

/// Map a provider failure onto the error taxonomy
pub fn classify_failure(provider: &str, model: &str, failure: ApiFailure) -> LlmError {
    let unknown_model = failure.mentions("model_not_found");
    let out_of_quota = failure.mentions("insufficient_quota");
    let provider = provider.to_string();
    let model = model.to_string();
    let ApiFailure {
        status,
        code,
        message,
        retry_after,
        ..
    } = failure;

    match status {
        400 if unknown_model => LlmError::ModelNotFound {
            provider,
            model,
            status,
            message,
        },
        400 | 413 | 422 => LlmError::CapabilityError {
            provider,
            model,
            status: Some(status),
            message,
        },
        401 | 403 => LlmError::AuthenticationError {
            provider,
            model,
            status: Some(status),
            message,
        },
        404 => LlmError::ModelNotFound {
            provider,
            model,
            status,
            message,
        },
        408 => LlmError::TransportError {
            provider,
            model,
            status: Some(status),
            message,
        },
        429 if out_of_quota => LlmError::ProviderError {
            provider,
            model,
            status,
            code,
            message,
        },
        429 | 529 => LlmError::RateLimitExceeded {
            provider,
            model,
            status,
            retry_after,
            message,
        },
        500..=599 => LlmError::TransportError {
            provider,
            model,
            status: Some(status),
            message,
        },
        _ => LlmError::ProviderError {
            provider,
            model,
            status,
            code,
            message,
        },
    }
}

/// Map a `reqwest` failure (connect, timeout, body read) onto the taxonomy
pub fn classify_transport(provider: &str, model: &str, err: reqwest::Error) -> LlmError {
    if err.is_decode() {
        return LlmError::InvalidResponse {
            provider: provider.to_string(),
            model: model.to_string(),
            message: err.to_string(),
        };
    }
    LlmError::TransportError {
        provider: provider.to_string(),
        model: model.to_string(),
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

/// Read a non-success response and hand its body to `decode`
///
/// `decode` extracts `(code, kind, message)` from the provider's error body;
/// when it returns `None` the raw body becomes the message.
pub async fn read_failure<F>(response: Response, decode: F) -> ApiFailure
where
    F: FnOnce(&str) -> Option<(Option<String>, Option<String>, String)>,
{
    let status = response.status().as_u16();
    let retry_after = parse_retry_after(response.headers());
    let body = response.text().await.unwrap_or_default();

    let (code, kind, message) = decode(&body).unwrap_or_else(|| {
        let message = if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };
        (None, None, message)
    });

    ApiFailure {
        status,
        code,
        kind,
        message,
        retry_after,
    }
}

/// Parse a `Retry-After` header given in seconds
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}
