//! Model-family capability tables and the parameter adapter
//!
//! Provider quirks live here as data. Each provider owns a
//! [`CapabilityTable`] whose rows describe a model family: which prefixes
//! select it, which key carries the output-length limit, which temperatures
//! it accepts and which options it refuses. [`CapabilityTable::adapt`] turns
//! a caller's [`GenerationOptions`] into a [`NormalizedRequest`] by reading
//! the matching row, never by branching on model names.

use serde_json::{Map, Value};
use std::fmt;

use super::config::GenerationOptions;
use super::types::{NormalizedRequest, ParameterAdjustment};

/// Output length used when the caller does not supply one
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Temperature used for adjustable families when the caller does not supply one
pub const DEFAULT_TEMPERATURE: f64 = 0.9;

/// Keys the adapter owns; callers cannot set them through `extra`
const RESERVED_OPTIONS: &[&str] = &[
    "model",
    "messages",
    "stream",
    "temperature",
    "max_tokens",
    "max_completion_tokens",
];

/// Name of the request key that carries the output-length limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimitField {
    MaxTokens,
    MaxCompletionTokens,
}

impl TokenLimitField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenLimitField::MaxTokens => "max_tokens",
            TokenLimitField::MaxCompletionTokens => "max_completion_tokens",
        }
    }
}

impl fmt::Display for TokenLimitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which temperatures a model family accepts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperaturePolicy {
    /// Only this value is accepted; requests are overridden
    Fixed(f64),
    /// Any value in `[min, max]`; requests outside are clamped
    Adjustable { min: f64, max: f64, default: f64 },
}

/// One row of a capability table
#[derive(Debug, Clone, Copy)]
pub struct ModelFamily {
    pub name: &'static str,
    /// Model-id prefixes (lowercase) that select this family
    pub prefixes: &'static [&'static str],
    pub token_field: TokenLimitField,
    pub temperature: TemperaturePolicy,
    /// Smallest output budget that reliably yields at least one visible token
    pub probe_min_tokens: u32,
    /// Option names the family rejects
    pub unsupported_options: &'static [&'static str],
}

impl ModelFamily {
    fn matches(&self, model: &str) -> bool {
        self.prefixes.iter().any(|prefix| model.starts_with(prefix))
    }

    /// Whether an output budget is enough for a probe on this family
    pub fn is_sufficient_probe_budget(&self, max_tokens: u32) -> bool {
        max_tokens >= self.probe_min_tokens
    }
}

/// Data-driven rules for one provider's model families
#[derive(Debug)]
pub struct CapabilityTable {
    families: &'static [ModelFamily],
    /// Row used when no prefix matches
    fallback: &'static ModelFamily,
}

const OPENAI_CHAT: ModelFamily = ModelFamily {
    name: "chat",
    prefixes: &[],
    token_field: TokenLimitField::MaxTokens,
    temperature: TemperaturePolicy::Adjustable {
        min: 0.0,
        max: 2.0,
        default: DEFAULT_TEMPERATURE,
    },
    probe_min_tokens: 1,
    unsupported_options: &[],
};

const OPENAI_REASONING: ModelFamily = ModelFamily {
    name: "reasoning",
    prefixes: &["o1", "o3", "o4"],
    token_field: TokenLimitField::MaxCompletionTokens,
    temperature: TemperaturePolicy::Fixed(1.0),
    probe_min_tokens: 16,
    unsupported_options: &[
        "top_p",
        "presence_penalty",
        "frequency_penalty",
        "logprobs",
        "top_logprobs",
        "logit_bias",
    ],
};

const CLAUDE: ModelFamily = ModelFamily {
    name: "claude",
    prefixes: &["claude"],
    token_field: TokenLimitField::MaxTokens,
    temperature: TemperaturePolicy::Adjustable {
        min: 0.0,
        max: 1.0,
        default: DEFAULT_TEMPERATURE,
    },
    probe_min_tokens: 1,
    unsupported_options: &["presence_penalty", "frequency_penalty", "logit_bias"],
};

/// OpenAI and OpenAI-compatible chat completion endpoints
pub static OPENAI_CAPABILITIES: CapabilityTable = CapabilityTable {
    families: &[OPENAI_REASONING, OPENAI_CHAT],
    fallback: &OPENAI_CHAT,
};

/// Anthropic Messages API
pub static ANTHROPIC_CAPABILITIES: CapabilityTable = CapabilityTable {
    families: &[CLAUDE],
    fallback: &CLAUDE,
};

impl CapabilityTable {
    /// Resolve the family row for a model identifier
    ///
    /// Matching ignores case and any routing namespace (`openai/o3-mini`
    /// matches like `o3-mini`). Unknown models get the fallback row.
    pub fn family_for(&self, model: &str) -> &'static ModelFamily {
        let bare = model.rsplit('/').next().unwrap_or(model).to_ascii_lowercase();
        self.families
            .iter()
            .find(|family| family.matches(&bare))
            .unwrap_or(self.fallback)
    }

    /// Output budget a connectivity probe should request for this model
    pub fn probe_max_tokens(&self, model: &str) -> u32 {
        self.family_for(model).probe_min_tokens
    }

    /// Build provider-ready parameters for `model` from the caller's options
    ///
    /// Pure: no I/O, and identical inputs give identical output.
    pub fn adapt(&self, model: &str, options: &GenerationOptions) -> NormalizedRequest {
        let family = self.family_for(model);
        let mut params = Map::new();
        let mut adjustments = Vec::new();

        for (name, value) in &options.extra {
            if RESERVED_OPTIONS.contains(&name.as_str()) {
                adjustments.push(ParameterAdjustment::OptionDropped {
                    name: name.clone(),
                    reason: "set by the adapter".to_string(),
                });
            } else if family.unsupported_options.contains(&name.as_str()) {
                adjustments.push(ParameterAdjustment::OptionDropped {
                    name: name.clone(),
                    reason: format!("not supported by the {} family", family.name),
                });
            } else {
                params.insert(name.clone(), value.clone());
            }
        }

        let max_tokens = options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        params.insert(family.token_field.as_str().to_string(), Value::from(max_tokens));

        let (temperature, adjustment) = resolve_temperature(family.temperature, options.temperature);
        params.insert("temperature".to_string(), Value::from(temperature));
        adjustments.extend(adjustment);

        NormalizedRequest {
            model: model.to_string(),
            family: family.name,
            params,
            adjustments,
        }
    }
}

/// Parameter adapter for OpenAI-compatible providers
pub fn adapt(model: &str, options: &GenerationOptions) -> NormalizedRequest {
    OPENAI_CAPABILITIES.adapt(model, options)
}

fn resolve_temperature(
    policy: TemperaturePolicy,
    requested: Option<f64>,
) -> (f64, Option<ParameterAdjustment>) {
    match policy {
        TemperaturePolicy::Fixed(applied) => {
            let adjustment = requested
                .filter(|requested| *requested != applied)
                .map(|requested| ParameterAdjustment::TemperatureOverridden { requested, applied });
            (applied, adjustment)
        }
        TemperaturePolicy::Adjustable { min, max, default } => match requested {
            None => (default, None),
            Some(requested) if requested.is_nan() => (
                default,
                Some(ParameterAdjustment::TemperatureOverridden {
                    requested,
                    applied: default,
                }),
            ),
            Some(requested) => {
                let applied = requested.clamp(min, max);
                if applied == requested {
                    (requested, None)
                } else {
                    (
                        applied,
                        Some(ParameterAdjustment::TemperatureClamped { requested, applied }),
                    )
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reasoning_model_uses_completion_tokens_and_fixed_temperature() {
        let options = GenerationOptions::new().with_temperature(0.3).with_max_tokens(500);
        let req = adapt("o4-mini", &options);

        assert_eq!(
            req.to_json(),
            json!({"max_completion_tokens": 500, "temperature": 1.0})
        );
        assert_eq!(req.family, "reasoning");
        assert_eq!(
            req.adjustments,
            vec![ParameterAdjustment::TemperatureOverridden {
                requested: 0.3,
                applied: 1.0
            }]
        );
    }

    #[test]
    fn test_standard_model_passes_temperature_through() {
        let options = GenerationOptions::new().with_temperature(0.3).with_max_tokens(500);
        let req = adapt("gpt-4o", &options);

        assert_eq!(req.to_json(), json!({"max_tokens": 500, "temperature": 0.3}));
        assert!(req.adjustments.is_empty());
    }

    #[test]
    fn test_standard_model_defaults() {
        let req = adapt("gpt-4o", &GenerationOptions::new());
        assert_eq!(
            req.to_json(),
            json!({"max_tokens": DEFAULT_MAX_TOKENS, "temperature": 0.9})
        );
    }

    #[test]
    fn test_reasoning_prefixes_never_emit_max_tokens() {
        let requested = [None, Some(0.0), Some(0.3), Some(1.0), Some(1.7), Some(2.0)];
        for model in ["o1", "o1-preview", "o3", "o3-mini", "o4-mini", "O3-MINI", "openai/o3-mini"] {
            for temperature in requested {
                let options = GenerationOptions {
                    temperature,
                    max_tokens: Some(64),
                    ..Default::default()
                };
                let req = adapt(model, &options);
                assert!(req.get("max_tokens").is_none(), "{model} produced max_tokens");
                assert_eq!(req.max_output_tokens(), Some(64));
                assert_eq!(req.temperature(), Some(1.0), "{model} temperature");
            }
        }
    }

    #[test]
    fn test_standard_models_never_emit_completion_tokens() {
        for model in ["gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo", "llama-3.1-70b", "my-finetune", ""] {
            for temperature in [0.0, 0.25, 1.5, 2.0] {
                let options = GenerationOptions::new().with_temperature(temperature);
                let req = adapt(model, &options);
                assert!(req.get("max_completion_tokens").is_none());
                assert_eq!(req.token_limit_field(), Some(TokenLimitField::MaxTokens));
                assert_eq!(req.temperature(), Some(temperature));
                assert!(req.adjustments.is_empty());
            }
        }
    }

    #[test]
    fn test_unknown_family_falls_back_to_standard() {
        let family = OPENAI_CAPABILITIES.family_for("future-model-x");
        assert_eq!(family.name, "chat");
        assert_eq!(family.token_field, TokenLimitField::MaxTokens);
    }

    #[test]
    fn test_out_of_range_temperature_is_clamped() {
        let req = adapt("gpt-4o", &GenerationOptions::new().with_temperature(3.5));
        assert_eq!(req.temperature(), Some(2.0));
        assert_eq!(
            req.adjustments,
            vec![ParameterAdjustment::TemperatureClamped {
                requested: 3.5,
                applied: 2.0
            }]
        );

        let req = ANTHROPIC_CAPABILITIES.adapt(
            "claude-3-5-haiku-latest",
            &GenerationOptions::new().with_temperature(1.4),
        );
        assert_eq!(req.temperature(), Some(1.0));
    }

    #[test]
    fn test_nan_temperature_uses_default() {
        let req = adapt("gpt-4o", &GenerationOptions::new().with_temperature(f64::NAN));
        assert_eq!(req.temperature(), Some(DEFAULT_TEMPERATURE));
        assert_eq!(req.adjustments.len(), 1);
    }

    #[test]
    fn test_matching_fixed_temperature_is_not_an_adjustment() {
        let req = adapt("o3", &GenerationOptions::new().with_temperature(1.0));
        assert!(req.adjustments.is_empty());
    }

    #[test]
    fn test_extra_options_pass_through() {
        let options = GenerationOptions::new()
            .with_option("top_p", 0.5)
            .with_option("seed", 7);
        let req = adapt("gpt-4o", &options);
        assert_eq!(req.get("top_p"), Some(&json!(0.5)));
        assert_eq!(req.get("seed"), Some(&json!(7)));
    }

    #[test]
    fn test_reserved_and_unsupported_options_are_dropped() {
        let options = GenerationOptions::new()
            .with_max_tokens(100)
            .with_option("max_tokens", 5000)
            .with_option("top_p", 0.5)
            .with_option("seed", 7);
        let req = adapt("o3-mini", &options);

        assert!(req.get("max_tokens").is_none());
        assert!(req.get("top_p").is_none());
        assert_eq!(req.get("seed"), Some(&json!(7)));
        assert_eq!(req.max_output_tokens(), Some(100));

        let dropped: Vec<&str> = req
            .adjustments
            .iter()
            .filter_map(|adj| match adj {
                ParameterAdjustment::OptionDropped { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(dropped, vec!["max_tokens", "top_p"]);
    }

    #[test]
    fn test_adapt_is_deterministic() {
        let options = GenerationOptions::new()
            .with_temperature(0.4)
            .with_max_tokens(256)
            .with_option("stop", vec!["END"])
            .with_option("seed", 1);
        let first = serde_json::to_vec(&adapt("gpt-4o", &options).to_json()).unwrap();
        let second = serde_json::to_vec(&adapt("gpt-4o", &options).to_json()).unwrap();
        assert_eq!(first, second);
        assert_eq!(adapt("o4-mini", &options), adapt("o4-mini", &options));
    }

    #[test]
    fn test_probe_budget_is_family_aware() {
        let reasoning = OPENAI_CAPABILITIES.family_for("o3-mini");
        assert!(OPENAI_CAPABILITIES.probe_max_tokens("o3-mini") >= 10);
        assert!(!reasoning.is_sufficient_probe_budget(1));
        assert!(reasoning.is_sufficient_probe_budget(OPENAI_CAPABILITIES.probe_max_tokens("o3-mini")));

        let chat = OPENAI_CAPABILITIES.family_for("gpt-4o");
        assert!(chat.is_sufficient_probe_budget(1));
    }

    #[test]
    fn test_anthropic_table_always_uses_max_tokens() {
        let req = ANTHROPIC_CAPABILITIES.adapt("claude-sonnet-4-5", &GenerationOptions::new());
        assert_eq!(req.token_limit_field(), Some(TokenLimitField::MaxTokens));
        assert_eq!(req.temperature(), Some(DEFAULT_TEMPERATURE));

        let req = ANTHROPIC_CAPABILITIES.adapt("o3", &GenerationOptions::new());
        assert!(req.get("max_completion_tokens").is_none());
    }
}
