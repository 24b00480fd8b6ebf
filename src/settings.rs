//! Environment-driven settings for the `llmgate` binary
//!
//! The library never reads the environment itself. This module turns
//! variables (optionally loaded from `.env` by the binary) into registry
//! settings, credentials and the list of models to probe.

use std::str::FromStr;
use std::time::Duration;

use crate::llm::{Credentials, LlmError, ProviderKind, ProviderSettings};

/// Model probed for a provider when `LLMGATE_PROBE_TARGETS` is unset
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// One provider/model pair to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub provider: String,
    pub model: String,
}

impl FromStr for ProbeTarget {
    type Err = LlmError;

    /// Parse `provider:model`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model) = s
            .trim()
            .split_once(':')
            .filter(|(provider, model)| !provider.is_empty() && !model.is_empty())
            .ok_or_else(|| {
                LlmError::ConfigError(format!("probe target '{}' is not provider:model", s.trim()))
            })?;
        Ok(Self {
            provider: provider.to_string(),
            model: model.to_string(),
        })
    }
}

/// Everything the binary needs to build a registry and run probes
#[derive(Debug)]
pub struct Settings {
    pub providers: Vec<ProviderSettings>,
    pub credentials: Credentials,
    pub targets: Vec<ProbeTarget>,
    /// Deadline applied to each probe
    pub probe_timeout: Duration,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let request_timeout_secs = parse_secs(&var, "LLMGATE_REQUEST_TIMEOUT_SECS")?;
        let connect_timeout_secs = parse_secs(&var, "LLMGATE_CONNECT_TIMEOUT_SECS")?;
        let probe_timeout = parse_secs(&var, "LLMGATE_PROBE_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT);

        let mut providers = Vec::new();
        let mut credentials = Credentials::new();
        let mut default_targets = Vec::new();

        let known = [
            ("openai", ProviderKind::OpenAiCompatible, "OPENAI", DEFAULT_OPENAI_MODEL),
            ("anthropic", ProviderKind::Anthropic, "ANTHROPIC", DEFAULT_ANTHROPIC_MODEL),
        ];
        for (name, kind, prefix, default_model) in known {
            let Some(api_key) = var(&format!("{prefix}_API_KEY")) else {
                continue;
            };
            credentials.insert(name, api_key);
            providers.push(ProviderSettings {
                name: name.to_string(),
                kind,
                base_url: var(&format!("{prefix}_BASE_URL")),
                request_timeout_secs,
                connect_timeout_secs,
            });
            default_targets.push(ProbeTarget {
                provider: name.to_string(),
                model: default_model.to_string(),
            });
        }

        let targets = match var("LLMGATE_PROBE_TARGETS") {
            Some(raw) => raw
                .split(',')
                .filter(|entry| !entry.trim().is_empty())
                .map(ProbeTarget::from_str)
                .collect::<Result<Vec<_>, _>>()?,
            None => default_targets,
        };

        if let Some(target) = targets
            .iter()
            .find(|target| !providers.iter().any(|p| p.name == target.provider))
        {
            return Err(LlmError::ConfigError(format!(
                "probe target '{}:{}' names a provider without an API key",
                target.provider, target.model
            )));
        }

        Ok(Self {
            providers,
            credentials,
            targets,
            probe_timeout,
        })
    }
}

fn parse_secs<F>(var: &F, key: &str) -> Result<Option<u64>, LlmError>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| LlmError::ConfigError(format!("{key}={raw}: {e}")))
        })
        .transpose()
}
