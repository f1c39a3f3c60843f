//! Declarative retry policy for tiered caption generation.
//!
//! A generation runs up to [`RetryConfig::max_attempts`] attempts. Each
//! attempt walks an ordered list of [`ModelSlot`]s (premium first, then the
//! low-cost fallback, or the low-cost model alone when the caller forced
//! it). After every failed call [`RetryPolicy::after_failure`] decides the
//! next state:
//!
//! ```text
//!   TryModel(i) ──ok──────────────────────────────► Success
//!       │
//!       ├─retryable, slot i+1 exists──► TryModel(i+1)
//!       │
//!       └─non-retryable, or last slot─► FailAttempt ──► backoff, next attempt
//! ```
//!
//! Keeping the transitions here, away from any provider I/O, lets the
//! policy be tested on its own.

use std::time::Duration;

use serde::Deserialize;

use crate::WartaError;
use crate::cache::ModelTier;

/// Attempt and backoff settings.
///
/// ```rust
/// # use warta::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .backoff_base(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first). Default: 3.
    pub max_attempts: u32,
    /// Linear backoff unit: attempt `n` is followed by `n × backoff_base`. Default: 1s.
    #[serde(with = "duration_millis", rename = "backoff_base_ms")]
    pub backoff_base: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(1000),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the first).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the linear backoff unit.
    pub fn backoff_base(mut self, delay: Duration) -> Self {
        self.backoff_base = delay;
        self
    }

    /// Delay after the given 1-based attempt number.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// One model to try within an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSlot {
    pub tier: ModelTier,
    pub model: String,
    pub timeout: Duration,
}

impl ModelSlot {
    pub fn new(tier: ModelTier, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            tier,
            model: model.into(),
            timeout,
        }
    }
}

/// Next state after a failed model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Try the slot at this index within the same attempt.
    TryModel(usize),
    /// Give up on the current attempt.
    FailAttempt,
}

/// Ordered model slots plus attempt/backoff settings.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    premium: ModelSlot,
    free: ModelSlot,
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(premium: ModelSlot, free: ModelSlot, config: RetryConfig) -> Self {
        Self {
            premium,
            free,
            config,
        }
    }

    /// Slots tried in each attempt, in order.
    pub fn slots(&self, requested: ModelTier) -> Vec<&ModelSlot> {
        match requested {
            ModelTier::Free => vec![&self.free],
            ModelTier::Premium => vec![&self.premium, &self.free],
        }
    }

    /// Decide what follows a failure of slot `index` out of `slot_count`.
    pub fn after_failure(&self, index: usize, slot_count: usize, error: &WartaError) -> Transition {
        if error.is_retryable() && index + 1 < slot_count {
            Transition::TryModel(index + 1)
        } else {
            Transition::FailAttempt
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Backoff after the given 1-based attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.config.delay_after(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(
            ModelSlot::new(ModelTier::Premium, "paid", Duration::from_secs(45)),
            ModelSlot::new(ModelTier::Free, "free", Duration::from_secs(30)),
            RetryConfig::default(),
        )
    }

    #[test]
    fn premium_request_tries_paid_then_free() {
        let policy = policy();
        let slots = policy.slots(ModelTier::Premium);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].model, "paid");
        assert_eq!(slots[0].timeout, Duration::from_secs(45));
        assert_eq!(slots[1].model, "free");
        assert_eq!(slots[1].timeout, Duration::from_secs(30));
    }

    #[test]
    fn forced_free_request_uses_only_free() {
        let policy = policy();
        let slots = policy.slots(ModelTier::Free);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].tier, ModelTier::Free);
    }

    #[test]
    fn retryable_failure_moves_to_next_slot() {
        let err = WartaError::RateLimited { retry_after: None };
        assert_eq!(policy().after_failure(0, 2, &err), Transition::TryModel(1));
    }

    #[test]
    fn retryable_failure_on_last_slot_fails_attempt() {
        let err = WartaError::Provider("Service Unavailable".into());
        assert_eq!(policy().after_failure(1, 2, &err), Transition::FailAttempt);
        assert_eq!(policy().after_failure(0, 1, &err), Transition::FailAttempt);
    }

    #[test]
    fn non_retryable_failure_fails_attempt_immediately() {
        let err = WartaError::Parse("missing `caption`".into());
        assert_eq!(policy().after_failure(0, 2, &err), Transition::FailAttempt);
    }

    #[test]
    fn backoff_is_linear() {
        let policy = policy();
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(2), Duration::from_millis(2000));
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let policy = RetryPolicy::new(
            ModelSlot::new(ModelTier::Premium, "paid", Duration::from_secs(1)),
            ModelSlot::new(ModelTier::Free, "free", Duration::from_secs(1)),
            RetryConfig::new().max_attempts(0),
        );
        assert_eq!(policy.max_attempts(), 1);
    }
}
