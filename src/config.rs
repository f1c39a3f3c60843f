//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. Explicit path (e.g. a `--config` CLI flag)
//! 2. `~/.warta/config.toml` (user)
//! 3. `/etc/warta/config.toml` (system)
//! 4. Built-in defaults
//!
//! The provider API key is never read from the file; it comes from the
//! `OPENROUTER_API_KEY` environment variable.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::providers::RetryConfig;
use crate::providers::openrouter::DEFAULT_BASE_URL;
use crate::{Result, WartaError};

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Generative-text provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API base URL (default: https://openrouter.ai/api/v1).
    pub base_url: String,
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Model tried first on every attempt.
    pub premium_model: String,
    /// Low-cost model, tried after the premium one or alone on request.
    pub free_model: String,
    /// Completion token cap (default: 300).
    pub max_tokens: u32,
    /// Sampling temperature (default: 0.7).
    pub temperature: f32,
    /// Backend ordering hint forwarded as the request's `provider.order`.
    pub provider_order: Vec<String>,
    /// Premium call timeout in seconds (default: 45).
    pub premium_timeout_secs: u64,
    /// Low-cost call timeout in seconds (default: 30).
    pub free_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            premium_model: "openai/gpt-4o-mini".to_string(),
            free_model: "meta-llama/llama-3.3-70b-instruct:free".to_string(),
            max_tokens: 300,
            temperature: 0.7,
            provider_order: Vec::new(),
            premium_timeout_secs: 45,
            free_timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    pub fn premium_timeout(&self) -> Duration {
        Duration::from_secs(self.premium_timeout_secs)
    }

    pub fn free_timeout(&self) -> Duration {
        Duration::from_secs(self.free_timeout_secs)
    }

    /// Opaque routing metadata for the request body, if any was configured.
    pub fn routing(&self) -> Option<serde_json::Value> {
        (!self.provider_order.is_empty()).then(|| {
            serde_json::json!({
                "order": self.provider_order,
                "allow_fallbacks": true,
            })
        })
    }
}

impl Config {
    /// Load configuration from the standard locations and the environment.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.warta/config.toml`
    /// 3. `/etc/warta/config.toml`
    /// 4. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.provider.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Ok(config)
    }

    /// Parse a single TOML file, without consulting the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WartaError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            WartaError::Configuration(msg) => {
                WartaError::Configuration(format!("{msg} (in {path:?})"))
            }
            other => other,
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| WartaError::Configuration(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.provider.premium_model.trim().is_empty()
            || self.provider.free_model.trim().is_empty()
        {
            return Err(WartaError::Configuration(
                "premium_model and free_model must be set".to_string(),
            ));
        }
        if self.provider.premium_timeout_secs == 0 || self.provider.free_timeout_secs == 0 {
            return Err(WartaError::Configuration(
                "model timeouts must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(WartaError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".warta").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/warta/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
