//! Anthropic client implementation

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::llm::core::{
    capability::{CapabilityTable, ANTHROPIC_CAPABILITIES},
    error::LlmError,
    provider::GenerationExecutor,
    types::{GenerationResult, NormalizedRequest},
};
use crate::llm::http::{build_http_client, classify_failure, classify_transport, read_failure, HttpSettings};

use super::mapper::{decode_error, from_messages_response, to_messages_request};
use super::types::MessagesResponse;

/// Base URL of the public Anthropic API
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Required API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Connection settings for the Anthropic API
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub base_url: String,
    pub http: HttpSettings,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: ANTHROPIC_BASE_URL.to_string(),
            http: HttpSettings::default(),
        }
    }
}

impl AnthropicConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_http(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }
}

/// Client for Claude models on the Anthropic Messages API
pub struct AnthropicClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Name this client is registered under
    provider: String,
    config: AnthropicConfig,
}

impl AnthropicClient {
    /// Create a new Anthropic client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(provider: impl Into<String>, config: AnthropicConfig) -> Result<Self, LlmError> {
        let http_client = build_http_client(&config.http)?;
        Ok(Self {
            http_client,
            provider: provider.into(),
            config,
        })
    }

    /// Build the endpoint URL for messages
    fn build_endpoint_url(&self) -> String {
        format!("{}/messages", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl GenerationExecutor for AnthropicClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn capabilities(&self) -> &'static CapabilityTable {
        &ANTHROPIC_CAPABILITIES
    }

    async fn execute(
        &self,
        request: NormalizedRequest,
        prompt: &str,
        credential: &SecretString,
    ) -> Result<GenerationResult, LlmError> {
        let model = request.model.clone();
        let body = to_messages_request(&request, prompt);
        let url = self.build_endpoint_url();

        tracing::debug!(target: "llmgate::anthropic", provider = %self.provider, model = %model, "POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", credential.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(&self.provider, &model, e))?;

        let status = response.status();
        if !status.is_success() {
            let failure = read_failure(response, decode_error).await;
            tracing::warn!(
                target: "llmgate::anthropic",
                provider = %self.provider,
                model = %model,
                status = failure.status,
                kind = ?failure.kind,
                "request rejected"
            );
            return Err(classify_failure(&self.provider, &model, failure));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| classify_transport(&self.provider, &model, e))?;

        from_messages_response(&self.provider, request, parsed)
    }
}
