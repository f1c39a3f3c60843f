//! Generative-text providers and the retry policy that drives them.

pub mod openrouter;
pub mod retry;
pub mod traits;

pub use openrouter::OpenRouterClient;
pub use retry::{ModelSlot, RetryConfig, RetryPolicy, Transition};
pub use traits::ChatProvider;
