//! LLM Abstraction Layer
//!
//! This module provides a uniform generate/probe interface over several LLM
//! providers. Provider and model-family quirks in request shape are absorbed
//! by capability tables so callers never see them.

pub mod core;
pub mod anthropic;
pub mod http;
pub mod openai;
pub mod registry;

// Re-export commonly used types
pub use self::core::{
    capability::{adapt, CapabilityTable, ModelFamily, TemperaturePolicy, TokenLimitField},
    config::GenerationOptions,
    context::CallContext,
    error::{CancelReason, LlmError},
    provider::{ConnectivityProber, GenerationExecutor, MinimalProber},
    types::{
        CallOutcome, Credentials, GenerationResult, NormalizedRequest, ParameterAdjustment,
        ProbeResult, UsageMetadata,
    },
};

pub use registry::{create_provider, ProviderClients, ProviderKind, ProviderRegistry, ProviderSettings};
