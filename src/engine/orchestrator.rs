//! Tiered model orchestration.
//!
//! [`ModelOrchestrator`] runs the attempt loop described in
//! [`RetryPolicy`]: a cache lookup before the first attempt, then for each
//! attempt the policy's model slots in order, each call raced against its
//! slot timeout. The losing side of every race is dropped, which aborts the
//! in-flight HTTP request rather than leaving it running.
//!
//! The orchestrator itself can fail with
//! [`GenerationExhausted`](crate::WartaError::GenerationExhausted);
//! [`CaptionEngine`](super::CaptionEngine) turns that into a template caption.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheKey, CaptionCache, ModelTier};
use crate::caption::{build_messages, optimize, parse_caption};
use crate::providers::{ChatProvider, ModelSlot, RetryPolicy, Transition};
use crate::telemetry;
use crate::types::{
    CaptionRequest, CaptionResult, ChatOptions, Message, ResponseFormat, TokenUsage, rendered_len,
};
use crate::{Result, WartaError};

/// Per-call generation parameters shared by every slot.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Opaque provider routing hints.
    pub routing: Option<serde_json::Value>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: 300,
            temperature: 0.7,
            routing: None,
        }
    }
}

/// Coordinates provider tiers, timeouts, retries and the cache.
pub struct ModelOrchestrator {
    provider: Arc<dyn ChatProvider>,
    cache: Arc<CaptionCache>,
    policy: RetryPolicy,
    settings: GenerationSettings,
}

impl ModelOrchestrator {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        cache: Arc<CaptionCache>,
        policy: RetryPolicy,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            provider,
            cache,
            policy,
            settings,
        }
    }

    pub fn cache(&self) -> &Arc<CaptionCache> {
        &self.cache
    }

    /// Produce a model-generated caption, or fail once every attempt and
    /// every tier has been exhausted.
    ///
    /// Only a first-attempt success is cached.
    #[instrument(
        name = "orchestrator.generate",
        skip(self, request, cancel),
        fields(report_id = %request.report.id, tone = %request.tone, platform = %request.platform)
    )]
    pub async fn generate(
        &self,
        request: &CaptionRequest,
        cancel: &CancellationToken,
    ) -> Result<CaptionResult> {
        let requested = if request.use_free_model {
            ModelTier::Free
        } else {
            ModelTier::Premium
        };
        let key = CacheKey {
            report_id: request.report.id.clone(),
            tone: request.tone,
            platform: request.platform,
            tier: requested,
        };

        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let messages = build_messages(request);
        let slots = self.policy.slots(requested);
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            let mut index = 0;
            loop {
                let slot = slots[index];
                match self
                    .call_model(slot, &messages, request, attempt, cancel)
                    .await
                {
                    Ok(result) => {
                        if attempt == 1 {
                            self.cache.set(key, result.clone());
                        }
                        info!(
                            model = %result.model_used,
                            attempt,
                            optimized = result.platform_optimized,
                            "caption generated"
                        );
                        return Ok(result);
                    }
                    Err(WartaError::Cancelled) => return Err(WartaError::Cancelled),
                    Err(e) => {
                        let retryable = e.is_retryable();
                        warn!(
                            model = %slot.model,
                            tier = %slot.tier,
                            attempt,
                            max_attempts,
                            retryable,
                            error = %e,
                            "model call failed"
                        );
                        match self.policy.after_failure(index, slots.len(), &e) {
                            Transition::TryModel(next) => index = next,
                            Transition::FailAttempt => break,
                        }
                    }
                }
            }

            if attempt < max_attempts {
                metrics::counter!(telemetry::RETRIES_TOTAL).increment(1);
                let delay = self.policy.backoff(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "attempt failed, backing off"
                );
                tokio::select! {
                    _ = cancel.cancelled() => return Err(WartaError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        Err(WartaError::GenerationExhausted {
            attempts: max_attempts,
        })
    }

    /// One timed provider call plus parsing and fitting.
    async fn call_model(
        &self,
        slot: &ModelSlot,
        messages: &[Message],
        request: &CaptionRequest,
        attempt: u32,
        cancel: &CancellationToken,
    ) -> Result<CaptionResult> {
        let mut options = ChatOptions::default()
            .model(&slot.model)
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .response_format(ResponseFormat::JsonObject);
        if let Some(ref routing) = self.settings.routing {
            options = options.routing(routing.clone());
        }

        let start = Instant::now();
        let call = async {
            let response = self.provider.chat(messages, &options).await?;
            let parsed = parse_caption(&response.content)?;
            Ok::<_, WartaError>((response, parsed))
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(WartaError::Cancelled),
            timed = tokio::time::timeout(slot.timeout, call) => match timed {
                Ok(inner) => inner,
                Err(_) => Err(WartaError::Timeout {
                    model: slot.model.clone(),
                    after: slot.timeout,
                }),
            },
        };

        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "model" => slot.model.clone())
            .record(start.elapsed().as_secs_f64());
        let status = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "model" => slot.model.clone(),
            "tier" => slot.tier.as_str(),
            "status" => status,
        )
        .increment(1);

        let (response, parsed) = outcome?;
        let usage = response.usage.as_ref().map(TokenUsage::from);
        if let Some(usage) = usage {
            metrics::counter!(telemetry::TOKENS_TOTAL, "direction" => "prompt")
                .increment(u64::from(usage.prompt));
            metrics::counter!(telemetry::TOKENS_TOTAL, "direction" => "completion")
                .increment(u64::from(usage.completion));
        }

        let fitted = optimize(&parsed.caption, &parsed.hashtags, request.platform.config());
        debug!(model = %slot.model, attempt, optimized = fitted.optimized, "caption parsed");

        Ok(CaptionResult {
            character_count: rendered_len(&fitted.caption, &fitted.hashtags),
            caption: fitted.caption,
            hashtags: fitted.hashtags,
            platform_optimized: fitted.optimized,
            ai_generated: true,
            model_used: slot.model.clone(),
            token_usage: usage,
        })
    }
}
