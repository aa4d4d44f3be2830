//! Telemetry metric name constants.
//!
//! Centralised metric names for gateway operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `vetgate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider`: provider name (e.g. "openrouter", "openai")
//! - `model`: model identifier within the provider's cascade
//! - `status`: attempt outcome: "ok" or "error"
//! - `outcome`: request outcome: "cached", "fresh" or "error"

/// Total diagnosis requests handled by the gateway.
///
/// Labels: `outcome` ("cached" | "fresh" | "error").
pub const REQUESTS_TOTAL: &str = "vetgate_requests_total";

/// Total cache hits.
pub const CACHE_HITS_TOTAL: &str = "vetgate_cache_hits_total";

/// Total cache misses (including lookups that errored).
pub const CACHE_MISSES_TOTAL: &str = "vetgate_cache_misses_total";

/// Total model attempts made by the cascade.
///
/// Labels: `provider`, `model`, `status` ("ok" | "error").
pub const MODEL_ATTEMPTS_TOTAL: &str = "vetgate_model_attempts_total";

/// Duration of a single model attempt in seconds.
///
/// Labels: `provider`, `model`.
pub const ATTEMPT_DURATION_SECONDS: &str = "vetgate_attempt_duration_seconds";

/// Total cascades in which every model failed.
///
/// Labels: `provider`.
pub const CASCADE_EXHAUSTED_TOTAL: &str = "vetgate_cascade_exhausted_total";

/// Total best-effort cache writes that failed.
pub const PERSIST_FAILURES_TOTAL: &str = "vetgate_persist_failures_total";
