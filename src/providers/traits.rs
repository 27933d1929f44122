//! Provider trait for the completion capability.
//!
//! The classifiers only need one thing from the outside world: given an
//! ordered list of messages, return the model's free-text reply. Providers
//! implement [`CompletionProvider`]; decorators such as
//! [`TimeoutProvider`](super::TimeoutProvider) wrap another provider and
//! implement the same trait.
//!
//! Implementations must be safe for concurrent use. A single provider
//! instance is created at startup and shared by every in-flight request,
//! so it must not hold per-request mutable state.

use async_trait::async_trait;

use crate::Result;
use crate::types::{CompletionOptions, Message};

/// Provider for single-shot chat completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Return the model's reply to `messages`.
    ///
    /// The reply is returned verbatim; interpreting it is the caller's job.
    async fn complete(&self, messages: &[Message], options: &CompletionOptions) -> Result<String>;
}
