//! OpenAI-compatible client implementation

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::llm::core::{
    capability::{CapabilityTable, OPENAI_CAPABILITIES},
    error::LlmError,
    provider::GenerationExecutor,
    types::{GenerationResult, NormalizedRequest},
};
use crate::llm::http::{build_http_client, classify_failure, classify_transport, read_failure, HttpSettings};

use super::mapper::{decode_error, from_chat_response, to_chat_request};
use super::types::ChatCompletionResponse;

/// Base URL of the public OpenAI API
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL up to and including the version segment (`.../v1`)
    pub base_url: String,
    /// Sent as `OpenAI-Organization` when set
    pub organization: Option<String>,
    pub http: HttpSettings,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_BASE_URL.to_string(),
            organization: None,
            http: HttpSettings::default(),
        }
    }
}

impl OpenAiConfig {
    /// Point the client at another OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_http(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }
}

/// Client for OpenAI and OpenAI-compatible chat completion APIs
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Name this client is registered under
    provider: String,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `provider` - Name the client is registered under (e.g. "openai")
    /// * `config` - Endpoint and timeout settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(provider: impl Into<String>, config: OpenAiConfig) -> Result<Self, LlmError> {
        let http_client = build_http_client(&config.http)?;
        Ok(Self {
            http_client,
            provider: provider.into(),
            config,
        })
    }

    /// Build the endpoint URL for chat completions
    fn build_endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl GenerationExecutor for OpenAiClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn capabilities(&self) -> &'static CapabilityTable {
        &OPENAI_CAPABILITIES
    }

    async fn execute(
        &self,
        request: NormalizedRequest,
        prompt: &str,
        credential: &SecretString,
    ) -> Result<GenerationResult, LlmError> {
        let model = request.model.clone();
        let body = to_chat_request(&request, prompt);
        let url = self.build_endpoint_url();

        tracing::debug!(
            target: "llmgate::openai",
            provider = %self.provider,
            model = %model,
            family = request.family,
            "POST {}", url
        );

        let mut builder = self
            .http_client
            .post(&url)
            .bearer_auth(credential.expose_secret())
            .json(&body);
        if let Some(org) = &self.config.organization {
            builder = builder.header("OpenAI-Organization", org);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_transport(&self.provider, &model, e))?;

        // Check status
        let status = response.status();
        if !status.is_success() {
            let failure = read_failure(response, decode_error).await;
            tracing::warn!(
                target: "llmgate::openai",
                provider = %self.provider,
                model = %model,
                status = failure.status,
                code = ?failure.code,
                "request rejected"
            );
            return Err(classify_failure(&self.provider, &model, failure));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| classify_transport(&self.provider, &model, e))?;

        from_chat_response(&self.provider, request, parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_format() {
        let client = OpenAiClient::new(
            "local",
            OpenAiConfig::default().with_base_url("http://localhost:8000/v1/"),
        )
        .unwrap();
        assert_eq!(
            client.build_endpoint_url(),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_config_targets_openai() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, OPENAI_BASE_URL);
        assert!(config.organization.is_none());
    }

    #[test]
    fn test_client_reports_provider_name() {
        let client = OpenAiClient::new("deepseek", OpenAiConfig::default()).unwrap();
        assert_eq!(client.provider(), "deepseek");
        assert_eq!(client.capabilities().family_for("o3").name, "reasoning");
    }
}
