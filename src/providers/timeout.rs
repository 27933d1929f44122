//! Per-call timeout decorator.
//!
//! An unbounded hang in one modality would stall the whole request, so the
//! pipeline wraps its provider in [`TimeoutProvider`]. The bound applies to
//! each `complete` call separately; there is no retry after it elapses.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::traits::CompletionProvider;
use crate::types::{CompletionOptions, Message};
use crate::{Result, TriageError};

/// Default bound on a single completion call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Decorator that bounds every call to the inner provider.
///
/// When the deadline passes, the inner future is dropped (cancelling the
/// HTTP request) and [`TriageError::Timeout`] is returned.
pub struct TimeoutProvider {
    inner: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl TimeoutProvider {
    /// Wrap a provider with a per-call timeout.
    pub fn new(inner: Arc<dyn CompletionProvider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl CompletionProvider for TimeoutProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, messages: &[Message], options: &CompletionOptions) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.inner.complete(messages, options)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    provider = self.inner.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "completion call timed out"
                );
                Err(TriageError::Timeout {
                    after: self.timeout,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowProvider {
        delay: Duration,
    }

    #[async_trait]
    impl CompletionProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn complete(
            &self,
            _messages: &[Message],
            _options: &CompletionOptions,
        ) -> Result<String> {
            tokio::time::sleep(self.delay).await;
            Ok("Informative".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fast_call_passes_through() {
        let provider = TimeoutProvider::new(
            Arc::new(SlowProvider {
                delay: Duration::from_millis(10),
            }),
            Duration::from_secs(1),
        );

        let reply = provider
            .complete(&[Message::user("hi")], &CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "Informative");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_times_out() {
        let provider = TimeoutProvider::new(
            Arc::new(SlowProvider {
                delay: Duration::from_secs(120),
            }),
            Duration::from_secs(5),
        );

        let err = provider
            .complete(&[Message::user("hi")], &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, TriageError::Timeout { after } if after == Duration::from_secs(5)),
            "expected Timeout, got {err:?}"
        );
    }

    #[test]
    fn name_is_delegated() {
        let provider = TimeoutProvider::new(
            Arc::new(SlowProvider {
                delay: Duration::ZERO,
            }),
            DEFAULT_CALL_TIMEOUT,
        );
        assert_eq!(provider.name(), "slow");
    }
}
