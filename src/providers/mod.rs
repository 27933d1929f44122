//! Completion provider implementations.
//!
//! [`OpenAiClient`] is the only network-facing provider. [`TimeoutProvider`]
//! wraps any provider to bound each call.

pub mod openai;
pub mod timeout;
pub mod traits;

pub use openai::OpenAiClient;
pub use timeout::{DEFAULT_CALL_TIMEOUT, TimeoutProvider};
pub use traits::CompletionProvider;
