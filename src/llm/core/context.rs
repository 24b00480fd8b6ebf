//! Cancellation and deadlines for in-flight calls

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::{CancelReason, LlmError};

/// Per-call cancellation signal and optional deadline
///
/// Cloning shares the token: cancelling any clone cancels every call running
/// under it.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that never cancels on its own
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe an existing token, e.g. one owned by the orchestrator
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Abort the call once `timeout` has elapsed from now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Abort the call at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Handle the caller keeps to cancel the call
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `call` until it finishes, the token fires, or the deadline passes
    ///
    /// Losing the race drops `call`, which aborts the underlying HTTP request.
    /// A token that is already cancelled wins before `call` is polled.
    pub async fn run<T, F>(&self, provider: &str, model: &str, call: F) -> Result<T, LlmError>
    where
        F: Future<Output = Result<T, LlmError>>,
    {
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        let reason = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => CancelReason::Requested,
            _ = deadline => CancelReason::DeadlineExceeded,
            result = call => return result,
        };

        tracing::debug!(target: "llmgate::context", provider, model, %reason, "call aborted");
        Err(LlmError::Cancelled {
            provider: provider.to_string(),
            model: model.to_string(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_completed_call_passes_through() {
        let ctx = CallContext::new();
        let result = ctx.run("openai", "gpt-4o", async { Ok::<_, LlmError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_never_polls_call() {
        let ctx = CallContext::new();
        ctx.cancel();
        let polled = AtomicBool::new(false);

        let result = ctx
            .run("openai", "gpt-4o", async {
                polled.store(true, Ordering::SeqCst);
                Ok::<_, LlmError>(())
            })
            .await;

        assert!(matches!(
            result,
            Err(LlmError::Cancelled {
                reason: CancelReason::Requested,
                ..
            })
        ));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_aborts_slow_call() {
        let ctx = CallContext::new().with_timeout(Duration::from_millis(100));
        let result = ctx
            .run("openai", "o3", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, LlmError>(())
            })
            .await;

        assert!(matches!(
            result,
            Err(LlmError::Cancelled {
                reason: CancelReason::DeadlineExceeded,
                ..
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_cancels_in_flight_call() {
        let ctx = CallContext::new();
        let token = ctx.token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result = ctx
            .run("anthropic", "claude-3-5-haiku-latest", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, LlmError>("late")
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, LlmError::Cancelled { .. }));
        assert!(err.is_retryable());
    }
}
