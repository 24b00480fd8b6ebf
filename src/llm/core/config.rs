//! Generation options supplied per call

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optional parameters for controlling text generation
///
/// These are the caller's *requested* values. The parameter adapter decides
/// what is actually sent for a given model family and reports every change
/// it makes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Randomness (0.0-2.0, clamped to what the model family allows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Additional provider parameters passed through by name (e.g. `top_p`, `stop`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl GenerationOptions {
    /// Create an empty set of options; every value falls back to its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum output length
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Add a named provider parameter
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = GenerationOptions::new();
        assert!(options.temperature.is_none());
        assert!(options.max_tokens.is_none());
        assert!(options.extra.is_empty());
    }

    #[test]
    fn test_options_builder() {
        let options = GenerationOptions::new()
            .with_temperature(0.7)
            .with_max_tokens(2048)
            .with_option("top_p", 0.9)
            .with_option("stop", vec!["STOP"]);

        assert_eq!(options.temperature, Some(0.7));
        assert_eq!(options.max_tokens, Some(2048));
        assert_eq!(options.extra["top_p"], serde_json::json!(0.9));
        assert_eq!(options.extra["stop"], serde_json::json!(["STOP"]));
    }

    #[test]
    fn test_options_serialization() {
        let options = GenerationOptions::new().with_temperature(0.5);
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"temperature\":0.5"));
        // Optional fields that are None should not be in the JSON
        assert!(!json.contains("\"max_tokens\""));
        assert!(!json.contains("\"extra\""));
    }

    #[test]
    fn test_options_deserialization() {
        let json = r#"{"max_tokens":2048,"temperature":0.8}"#;
        let options: GenerationOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.max_tokens, Some(2048));
        assert_eq!(options.temperature, Some(0.8));
        assert!(options.extra.is_empty());
    }
}
