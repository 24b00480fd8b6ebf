//! Provider client registry
//!
//! The registry is built once at startup from [`ProviderSettings`] (or by
//! hand through [`RegistryBuilder`]) and is read-only afterwards. Share it by
//! reference or behind an `Arc`; it holds no locks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::llm::anthropic::{AnthropicClient, AnthropicConfig};
use crate::llm::core::{
    config::GenerationOptions,
    context::CallContext,
    error::LlmError,
    provider::{ConnectivityProber, GenerationExecutor, MinimalProber},
    types::{Credentials, GenerationResult, ProbeResult},
};
use crate::llm::http::HttpSettings;
use crate::llm::openai::{OpenAiClient, OpenAiConfig};

/// Wire protocol a provider speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// `/chat/completions`, OpenAI or any compatible server
    #[serde(rename = "openai", alias = "openai_compatible")]
    OpenAiCompatible,
    /// Anthropic Messages API
    #[serde(rename = "anthropic")]
    Anthropic,
}

/// Static configuration for one registered provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Name callers use to select the provider
    pub name: String,
    pub kind: ProviderKind,
    /// Overrides the protocol's public base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
}

impl ProviderSettings {
    pub fn new(name: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base_url: None,
            request_timeout_secs: None,
            connect_timeout_secs: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn http_settings(&self) -> HttpSettings {
        let defaults = HttpSettings::default();
        HttpSettings {
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

/// The executor/prober pair responsible for one provider
#[derive(Clone)]
pub struct ProviderClients {
    pub executor: Arc<dyn GenerationExecutor>,
    pub prober: Arc<dyn ConnectivityProber>,
}

impl ProviderClients {
    /// Pair an executor with a prober that sends minimal requests through it
    pub fn from_executor(executor: Arc<dyn GenerationExecutor>) -> Self {
        let prober = Arc::new(MinimalProber::new(executor.clone()));
        Self { executor, prober }
    }
}

/// Create the clients for a provider from its settings
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn create_provider(settings: &ProviderSettings) -> Result<ProviderClients, LlmError> {
    let http = settings.http_settings();
    let executor: Arc<dyn GenerationExecutor> = match settings.kind {
        ProviderKind::OpenAiCompatible => {
            let mut config = OpenAiConfig::default().with_http(http);
            if let Some(base_url) = &settings.base_url {
                config = config.with_base_url(base_url.clone());
            }
            Arc::new(OpenAiClient::new(settings.name.clone(), config)?)
        }
        ProviderKind::Anthropic => {
            let mut config = AnthropicConfig::default().with_http(http);
            if let Some(base_url) = &settings.base_url {
                config = config.with_base_url(base_url.clone());
            }
            Arc::new(AnthropicClient::new(settings.name.clone(), config)?)
        }
    };
    Ok(ProviderClients::from_executor(executor))
}

/// Accumulates registrations before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    providers: BTreeMap<String, ProviderClients>,
}

impl RegistryBuilder {
    /// Register clients under `name`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `name` is already registered.
    pub fn register(
        mut self,
        name: impl Into<String>,
        clients: ProviderClients,
    ) -> Result<Self, LlmError> {
        let name = name.into();
        if self.providers.contains_key(&name) {
            return Err(LlmError::ConfigError(format!(
                "provider '{}' is registered twice",
                name
            )));
        }
        self.providers.insert(name, clients);
        Ok(self)
    }

    pub fn build(self) -> ProviderRegistry {
        ProviderRegistry {
            providers: self.providers,
        }
    }
}

/// Read-only map from provider name to its clients
pub struct ProviderRegistry {
    providers: BTreeMap<String, ProviderClients>,
}

impl ProviderRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build a registry with one client pair per settings entry
    pub fn from_settings(settings: &[ProviderSettings]) -> Result<Self, LlmError> {
        let mut builder = Self::builder();
        for entry in settings {
            builder = builder.register(entry.name.clone(), create_provider(entry)?)?;
            tracing::info!(
                target: "llmgate::registry",
                provider = %entry.name,
                kind = ?entry.kind,
                "provider registered"
            );
        }
        Ok(builder.build())
    }

    /// Look up the clients for a provider
    pub fn resolve(&self, provider: &str) -> Result<&ProviderClients, LlmError> {
        self.providers
            .get(provider)
            .ok_or_else(|| LlmError::UnsupportedProvider(provider.to_string()))
    }

    /// Registered provider names, sorted
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Generate a completion through the named provider
    pub async fn generate(
        &self,
        provider: &str,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
        credentials: &Credentials,
        ctx: &CallContext,
    ) -> Result<GenerationResult, LlmError> {
        let clients = self.resolve(provider)?;
        let credential = credentials
            .get(provider)
            .ok_or_else(|| missing_credential(provider, model))?;
        clients
            .executor
            .generate(model, prompt, options, credential, ctx)
            .await
    }

    /// Check that the named provider accepts the model with the caller's credential
    ///
    /// Only an unknown provider name is an error; every other failure is
    /// reported inside the [`ProbeResult`].
    pub async fn probe(
        &self,
        provider: &str,
        model: &str,
        credentials: &Credentials,
        ctx: &CallContext,
    ) -> Result<ProbeResult, LlmError> {
        let clients = self.resolve(provider)?;
        let Some(credential) = credentials.get(provider) else {
            let err = missing_credential(provider, model);
            return Ok(ProbeResult::from_error(provider, model, &err, 0));
        };
        Ok(clients.prober.probe(model, credential, ctx).await)
    }
}

fn missing_credential(provider: &str, model: &str) -> LlmError {
    LlmError::AuthenticationError {
        provider: provider.to_string(),
        model: model.to_string(),
        status: None,
        message: "no credential supplied for this provider".to_string(),
    }
}
