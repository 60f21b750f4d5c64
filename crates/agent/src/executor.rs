use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use sokoni_core::{BackendsExhausted, GenerationError};

use crate::llm::GenerationBackend;

/// Retry policy for the ordered fallback loop. Rate-limited failures wait
/// `backoff` before the next backend; every other failure class advances
/// immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { backoff: Duration::from_secs(1) }
    }
}

impl RetryPolicy {
    pub fn from_backoff_ms(backoff_ms: u64) -> Self {
        Self { backoff: Duration::from_millis(backoff_ms) }
    }
}

/// Tries generation backends in priority order; first success wins. The only
/// error this component propagates is [`BackendsExhausted`], raised after the
/// final backend fails. Callers must absorb it into a degraded response.
pub struct FallbackExecutor {
    backends: Vec<Arc<dyn GenerationBackend>>,
    policy: RetryPolicy,
}

impl FallbackExecutor {
    pub fn new(backends: Vec<Arc<dyn GenerationBackend>>, policy: RetryPolicy) -> Self {
        Self { backends, policy }
    }

    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, BackendsExhausted> {
        let mut last_failure: Option<(String, GenerationError)> = None;
        let total = self.backends.len();

        for (position, backend) in self.backends.iter().enumerate() {
            match backend.generate(prompt).await {
                Ok(text) => {
                    debug!(
                        event_name = "agent.executor.backend_success",
                        backend = backend.id(),
                        position,
                        "generation succeeded"
                    );
                    return Ok(text);
                }
                Err(error) => {
                    warn!(
                        event_name = "agent.executor.backend_failure",
                        backend = backend.id(),
                        position,
                        rate_limited = error.is_rate_limited(),
                        error = %error,
                        "generation backend failed"
                    );

                    let rate_limited = error.is_rate_limited();
                    last_failure = Some((backend.id().to_string(), error));

                    // Backoff only applies when another backend remains.
                    if rate_limited && position + 1 < total {
                        tokio::time::sleep(self.policy.backoff).await;
                    }
                }
            }
        }

        let (last_backend, source) = last_failure.unwrap_or((
            "none".to_string(),
            GenerationError::Provider("no generation backends configured".to_string()),
        ));

        Err(BackendsExhausted { attempts: total, last_backend, source })
    }
}
