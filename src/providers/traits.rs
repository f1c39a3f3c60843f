//! Provider trait for generative-text backends.
//!
//! The orchestrator only needs one capability: a single-turn, non-streaming
//! chat completion. Implementations map their transport failures onto
//! [`WartaError`](crate::WartaError) variants so that
//! [`is_retryable()`](crate::WartaError::is_retryable) can classify them.
//!
//! # Cancellation
//!
//! Callers bound every call with a timeout and may drop the returned future
//! at any await point. Implementations must not rely on running to
//! completion; dropping a `reqwest` future aborts the in-flight request.

use async_trait::async_trait;

use crate::Result;
use crate::types::{ChatOptions, ChatResponse, Message};

/// Provider for single-turn chat completion.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Non-streaming chat completion.
    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse>;
}
