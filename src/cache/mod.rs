//! Caption cache.
//!
//! [`CaptionCache`] stores successful model generations so repeated share
//! requests for the same report, tone, platform and tier do not pay for a
//! second provider call. Template captions are never cached.
//!
//! # Expiry
//!
//! Entries expire lazily: a lookup that finds an entry older than the TTL
//! removes it and reports a miss. Physical cleanup of everything else only
//! happens when an insert pushes the entry count above
//! [`CacheConfig::max_entries`], at which point a single sweep drops every
//! expired entry. Fresh entries are never evicted.
//!
//! # Concurrency
//!
//! The store is a sharded [`DashMap`], safe to share across tasks. Two
//! concurrent generations for the same key race on insert and the last
//! write wins; both values are valid captions.
//!
//! Timestamps come from [`tokio::time::Instant`], so a paused test runtime
//! can advance past the TTL without sleeping.

use std::fmt;
use std::time::Duration;

use dashmap::DashMap;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;
use crate::types::{CaptionResult, Platform, Tone};

/// Configuration for the caption cache.
///
/// ```rust
/// # use warta::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry count above which an insert triggers an expiry sweep. Default: 1,000.
    pub max_entries: usize,
    /// Time-to-live for cached entries. Default: 1 hour.
    #[serde(with = "duration_secs", rename = "ttl_secs")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep threshold.
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Which model tier a generation was requested on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    Premium,
    Free,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Premium => "premium",
            ModelTier::Free => "free",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache identity of a generation.
///
/// Custom instructions are deliberately not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub report_id: String,
    pub tone: Tone,
    pub platform: Platform,
    /// `Free` when the caller forced the low-cost tier.
    pub tier: ModelTier,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.report_id, self.tone, self.platform, self.tier
        )
    }
}

/// A stored generation.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub data: CaptionResult,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }
}

/// Process-wide store of model-generated captions.
pub struct CaptionCache {
    entries: DashMap<CacheKey, CacheEntry>,
    config: CacheConfig,
}

impl CaptionCache {
    /// Create an empty cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    /// Look up a fresh caption. Stale entries are removed and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<CaptionResult> {
        let now = Instant::now();
        // Clone out before any removal so no shard lock is held across it.
        let hit = self
            .entries
            .get(key)
            .map(|entry| (entry.is_expired(now), entry.data.clone()));

        match hit {
            Some((false, data)) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                debug!(%key, "caption cache hit");
                Some(data)
            }
            Some((true, _)) => {
                self.entries
                    .remove_if(key, |_, entry| entry.is_expired(Instant::now()));
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                debug!(%key, "caption cache entry expired");
                None
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                debug!(%key, "caption cache miss");
                None
            }
        }
    }

    /// Store (or overwrite) a caption, sweeping expired entries when the
    /// cache has grown past its threshold.
    pub fn set(&self, key: CacheKey, data: CaptionResult) {
        let entry = CacheEntry {
            key: key.clone(),
            data,
            created_at: Instant::now(),
            ttl: self.config.ttl,
        };
        self.entries.insert(key, entry);

        if self.entries.len() > self.config.max_entries {
            let removed = self.sweep_expired();
            debug!(
                removed,
                remaining = self.entries.len(),
                "caption cache sweep"
            );
        }
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of entries physically present, including stale ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl Default for CaptionCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
