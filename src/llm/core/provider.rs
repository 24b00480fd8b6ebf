//! Executor and prober traits for LLM provider implementations

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Instant;

use super::{
    capability::CapabilityTable,
    config::GenerationOptions,
    context::CallContext,
    error::LlmError,
    types::{GenerationResult, NormalizedRequest, ProbeResult},
};

/// Prompt sent by connectivity probes
pub const PROBE_PROMPT: &str = "ping";

/// Issues generation requests against one provider
///
/// Implementations only have to supply the wire call in [`execute`];
/// parameter normalization and cancellation are shared by [`generate`].
///
/// [`execute`]: GenerationExecutor::execute
/// [`generate`]: GenerationExecutor::generate
#[async_trait]
pub trait GenerationExecutor: Send + Sync {
    /// Name the provider is registered under
    fn provider(&self) -> &str;

    /// Model-family rules for this provider
    fn capabilities(&self) -> &'static CapabilityTable;

    /// Send one already-normalized request and extract the first completion
    async fn execute(
        &self,
        request: NormalizedRequest,
        prompt: &str,
        credential: &SecretString,
    ) -> Result<GenerationResult, LlmError>;

    /// Generate a completion for a single user prompt
    ///
    /// No retries happen here. Errors say whether a retry may help
    /// ([`LlmError::is_retryable`]).
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
        credential: &SecretString,
        ctx: &CallContext,
    ) -> Result<GenerationResult, LlmError> {
        let request = self.capabilities().adapt(model, options);
        for adjustment in &request.adjustments {
            tracing::debug!(
                target: "llmgate::adapter",
                provider = self.provider(),
                model,
                family = request.family,
                ?adjustment,
                "requested option adjusted"
            );
        }
        ctx.run(self.provider(), model, self.execute(request, prompt, credential))
            .await
    }
}

/// Checks that a credential/model pair is accepted before real work starts
#[async_trait]
pub trait ConnectivityProber: Send + Sync {
    /// Send one minimal request; failures are classified, never raised
    async fn probe(&self, model: &str, credential: &SecretString, ctx: &CallContext) -> ProbeResult;
}

/// Prober that sends the smallest legal request through an executor
///
/// The output budget comes from the model family's probe minimum, so
/// families that spend tokens on hidden reasoning still emit content.
pub struct MinimalProber {
    executor: Arc<dyn GenerationExecutor>,
}

impl MinimalProber {
    pub fn new(executor: Arc<dyn GenerationExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ConnectivityProber for MinimalProber {
    async fn probe(&self, model: &str, credential: &SecretString, ctx: &CallContext) -> ProbeResult {
        let provider = self.executor.provider();
        let max_tokens = self.executor.capabilities().probe_max_tokens(model);
        let options = GenerationOptions::new().with_max_tokens(max_tokens);

        let started = Instant::now();
        let result = self
            .executor
            .generate(model, PROBE_PROMPT, &options, credential, ctx)
            .await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(_) => {
                tracing::info!(target: "llmgate::probe", provider, model, latency_ms, "probe succeeded");
                ProbeResult::reachable(provider, model, latency_ms)
            }
            Err(err) => {
                tracing::warn!(
                    target: "llmgate::probe",
                    provider,
                    model,
                    latency_ms,
                    outcome = %err.outcome(),
                    error = %err,
                    "probe failed"
                );
                ProbeResult::from_error(provider, model, &err, latency_ms)
            }
        }
    }
}
