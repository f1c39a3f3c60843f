//! Tests for [`CaptionCache`]: TTL lookup and the size-triggered sweep.

use std::sync::Arc;
use std::time::Duration;

use warta::cache::{CacheConfig, CacheKey, CaptionCache, ModelTier};
use warta::{CaptionResult, Platform, Tone};

fn key(report_id: &str) -> CacheKey {
    CacheKey {
        report_id: report_id.into(),
        tone: Tone::Community,
        platform: Platform::Whatsapp,
        tier: ModelTier::Premium,
    }
}

fn result(caption: &str) -> CaptionResult {
    CaptionResult {
        caption: caption.into(),
        hashtags: vec!["#JalanRusak".into()],
        character_count: caption.chars().count() + 12,
        platform_optimized: false,
        ai_generated: true,
        model_used: "test/premium".into(),
        token_usage: None,
    }
}

// =========================================================================
// CacheConfig
// =========================================================================

#[test]
fn cache_config_defaults() {
    let config = CacheConfig::default();
    assert_eq!(config.max_entries, 1_000);
    assert_eq!(config.ttl, Duration::from_secs(3600));
}

#[test]
fn cache_config_builder() {
    let config = CacheConfig::new()
        .max_entries(500)
        .ttl(Duration::from_secs(60));
    assert_eq!(config.max_entries, 500);
    assert_eq!(config.ttl, Duration::from_secs(60));
}

// =========================================================================
// Lookup and expiry
// =========================================================================

#[tokio::test(start_paused = true)]
async fn miss_then_hit() {
    let cache = CaptionCache::default();

    assert!(cache.get(&key("r-1")).is_none());

    cache.set(key("r-1"), result("Jalan retak"));
    assert_eq!(cache.get(&key("r-1")), Some(result("Jalan retak")));
}

#[tokio::test(start_paused = true)]
async fn different_tier_is_miss() {
    let cache = CaptionCache::default();
    cache.set(key("r-1"), result("premium"));

    let free = CacheKey {
        tier: ModelTier::Free,
        ..key("r-1")
    };
    assert!(cache.get(&free).is_none());
}

#[tokio::test(start_paused = true)]
async fn overwrite_replaces_entry() {
    let cache = CaptionCache::default();
    cache.set(key("r-1"), result("old"));
    cache.set(key("r-1"), result("new"));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&key("r-1")).unwrap().caption, "new");
}

#[tokio::test(start_paused = true)]
async fn entry_expires_after_ttl_and_is_removed() {
    let cache = CaptionCache::new(CacheConfig::new().ttl(Duration::from_secs(3600)));
    cache.set(key("r-1"), result("Jalan amblas"));

    tokio::time::advance(Duration::from_secs(3600)).await;
    assert!(cache.get(&key("r-1")).is_some(), "still fresh at exactly the TTL");

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(cache.get(&key("r-1")).is_none());
    assert!(cache.is_empty(), "stale entry is dropped on lookup");
}

// =========================================================================
// Size-triggered sweep
// =========================================================================

#[tokio::test(start_paused = true)]
async fn sweep_runs_only_past_threshold_and_keeps_fresh_entries() {
    let cache = CaptionCache::new(
        CacheConfig::new()
            .max_entries(3)
            .ttl(Duration::from_secs(60)),
    );
    cache.set(key("old-1"), result("a"));
    cache.set(key("old-2"), result("b"));

    tokio::time::advance(Duration::from_secs(61)).await;
    cache.set(key("fresh-1"), result("c"));
    // At the threshold: stale entries still physically present.
    assert_eq!(cache.len(), 3);

    cache.set(key("fresh-2"), result("d"));
    assert_eq!(cache.len(), 2);
    assert!(cache.get(&key("fresh-1")).is_some());
    assert!(cache.get(&key("fresh-2")).is_some());
}

#[tokio::test(start_paused = true)]
async fn fresh_entries_survive_past_threshold() {
    let cache = CaptionCache::new(CacheConfig::new().max_entries(2));
    for i in 0..5 {
        cache.set(key(&format!("r-{i}")), result("x"));
    }
    assert_eq!(cache.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn explicit_sweep_reports_removed_count() {
    let cache = CaptionCache::new(CacheConfig::new().ttl(Duration::from_secs(10)));
    cache.set(key("r-1"), result("a"));
    cache.set(key("r-2"), result("b"));
    tokio::time::advance(Duration::from_secs(11)).await;
    cache.set(key("r-3"), result("c"));

    assert_eq!(cache.sweep_expired(), 2);
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

// =========================================================================
// Shared access
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_do_not_corrupt_cache() {
    let cache = Arc::new(CaptionCache::default());

    let mut handles = Vec::new();
    for worker in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..50 {
                // Half the keys are shared between workers (last write wins).
                let id = if i % 2 == 0 {
                    format!("shared-{i}")
                } else {
                    format!("w{worker}-{i}")
                };
                cache.set(key(&id), result(&format!("w{worker}")));
                assert!(cache.get(&key(&id)).is_some());
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len(), 25 + 8 * 25);
}
