//! Warta error types

use std::time::Duration;

/// Substrings (lowercase) that mark a provider failure as worth retrying.
const RETRYABLE_PATTERNS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "quota exceeded",
    "too many requests",
    "service unavailable",
    "temporary",
    "timeout",
    "timed out",
    "network",
    "connection",
    "429",
    "503",
];

/// Warta error types
#[derive(Debug, thiserror::Error)]
pub enum WartaError {
    // Input errors
    #[error("invalid {field} '{value}', expected one of: {}", allowed.join(", "))]
    Validation {
        field: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("request to {model} timed out after {after:?}")]
    Timeout { model: String, after: Duration },

    #[error("provider error: {0}")]
    Provider(String),

    #[error("empty response from model")]
    EmptyResponse,

    // Data errors
    #[error("malformed caption payload: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Every attempt and every tier failed. The engine never surfaces this to
    /// callers of [`CaptionEngine`](crate::CaptionEngine); it substitutes the
    /// template caption instead.
    #[error("caption generation exhausted after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    // Report store errors
    #[error("report not found: {0}")]
    ReportNotFound(String),

    #[error("report source error: {0}")]
    ReportSource(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl WartaError {
    /// Whether a failed model call should fall through to the next tier and
    /// be retried by the outer attempt loop.
    ///
    /// Structured transport failures are always retryable. Everything else
    /// is matched case-insensitively against the rendered message.
    pub fn is_retryable(&self) -> bool {
        match self {
            WartaError::RateLimited { .. } | WartaError::Timeout { .. } | WartaError::Http(_) => {
                true
            }
            WartaError::Api { status, .. } if matches!(status, 429 | 503) => true,
            WartaError::Validation { .. } | WartaError::Cancelled => false,
            other => is_retryable_message(&other.to_string()),
        }
    }

    /// Server-provided retry hint, if any.
    ///
    /// Diagnostic only: the orchestrator always backs off linearly
    /// (see [`RetryConfig`](crate::RetryConfig)) and ignores this value.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            WartaError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    pub(crate) fn validation(
        field: &'static str,
        value: impl Into<String>,
        allowed: &[&'static str],
    ) -> Self {
        WartaError::Validation {
            field,
            value: value.into(),
            allowed: allowed.to_vec(),
        }
    }
}

/// Case-insensitive substring match against the retryable pattern set.
pub fn is_retryable_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    RETRYABLE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Result type alias for Warta operations
pub type Result<T> = std::result::Result<T, WartaError>;
