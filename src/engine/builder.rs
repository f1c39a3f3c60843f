//! Builder for configuring engine instances

use std::sync::Arc;

use super::{CaptionEngine, GenerationSettings, ModelOrchestrator};
use crate::cache::{CaptionCache, ModelTier};
use crate::config::Config;
use crate::providers::{ChatProvider, ModelSlot, OpenRouterClient, RetryPolicy};
use crate::{Result, WartaError};

/// Builder for [`CaptionEngine`].
///
/// Without an explicit provider, an [`OpenRouterClient`] is built from the
/// configuration, which then needs an API key.
pub struct CaptionEngineBuilder {
    config: Config,
    provider: Option<Arc<dyn ChatProvider>>,
    cache: Option<Arc<CaptionCache>>,
}

impl CaptionEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            provider: None,
            cache: None,
        }
    }

    /// Use this configuration (models, timeouts, cache and retry settings).
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use a specific provider instead of the configured HTTP client.
    pub fn provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Share an existing cache between engines.
    pub fn cache(mut self, cache: Arc<CaptionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<CaptionEngine> {
        let provider_config = &self.config.provider;

        let provider: Arc<dyn ChatProvider> = match self.provider {
            Some(provider) => provider,
            None => {
                let key = provider_config.api_key.clone().ok_or_else(|| {
                    WartaError::Configuration(format!(
                        "no API key configured (set {})",
                        crate::config::API_KEY_ENV
                    ))
                })?;
                Arc::new(OpenRouterClient::with_base_url(
                    Some(key),
                    provider_config.base_url.clone(),
                )?)
            }
        };

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(CaptionCache::new(self.config.cache.clone())));

        let policy = RetryPolicy::new(
            ModelSlot::new(
                ModelTier::Premium,
                provider_config.premium_model.clone(),
                provider_config.premium_timeout(),
            ),
            ModelSlot::new(
                ModelTier::Free,
                provider_config.free_model.clone(),
                provider_config.free_timeout(),
            ),
            self.config.retry.clone(),
        );

        let settings = GenerationSettings {
            max_tokens: provider_config.max_tokens,
            temperature: provider_config.temperature,
            routing: provider_config.routing(),
        };

        Ok(CaptionEngine::new(ModelOrchestrator::new(
            provider, cache, policy, settings,
        )))
    }
}

impl Default for CaptionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
