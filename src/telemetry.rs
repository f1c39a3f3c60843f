//! Telemetry metric name constants.
//!
//! Centralised metric names for caption generation. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `warta_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `model`: model identifier sent to the provider
//! - `tier`: "premium" or "free"
//! - `status`: outcome: "ok" or "error"
//! - `direction`: token direction: "prompt" or "completion"

/// Total model calls dispatched by the orchestrator.
///
/// Labels: `model`, `tier`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "warta_requests_total";

/// Model call duration in seconds, including parsing.
///
/// Labels: `model`.
pub const REQUEST_DURATION_SECONDS: &str = "warta_request_duration_seconds";

/// Total outer-loop retries (not counting the first attempt).
pub const RETRIES_TOTAL: &str = "warta_retries_total";

/// Total tokens consumed.
///
/// Labels: `direction` ("prompt" | "completion").
pub const TOKENS_TOTAL: &str = "warta_tokens_total";

/// Total caption cache hits.
pub const CACHE_HITS_TOTAL: &str = "warta_cache_hits_total";

/// Total caption cache misses (including stale entries).
pub const CACHE_MISSES_TOTAL: &str = "warta_cache_misses_total";

/// Total captions served from the deterministic template.
pub const TEMPLATE_FALLBACKS_TOTAL: &str = "warta_template_fallbacks_total";
