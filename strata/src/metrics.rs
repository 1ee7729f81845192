//! Metrics declaration and recording helpers.
//!
//! With the `metrics` feature enabled, counters are emitted through the
//! `metrics` crate facade; without it every recorder is a no-op.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of in-process tier hits.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "strata_cache_hit_total",
            "Total number of resolutions served with a value."
        );
        "strata_cache_hit_total"
    };
    /// Track number of absent resolutions.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "strata_cache_miss_total",
            "Total number of resolutions reporting no value."
        );
        "strata_cache_miss_total"
    };
    /// Track number of shared-tier lookups.
    pub static ref REMOTE_LOOKUP_COUNTER: &'static str = {
        metrics::describe_counter!(
            "strata_remote_lookup_total",
            "Total number of shared-tier lookups (one per in-process miss)."
        );
        "strata_remote_lookup_total"
    };
    /// Track number of producer invocations.
    pub static ref PRODUCER_INVOCATION_COUNTER: &'static str = {
        metrics::describe_counter!(
            "strata_producer_invocation_total",
            "Total number of producer invocations (one per full miss)."
        );
        "strata_producer_invocation_total"
    };
}

/// Record a resolution that served a value.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_hit() {
    metrics::counter!(*CACHE_HIT_COUNTER).increment(1);
}

/// Record a resolution that served a value (no-op without `metrics`).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_hit() {}

/// Record a resolution that reported no value.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_miss() {
    metrics::counter!(*CACHE_MISS_COUNTER).increment(1);
}

/// Record a resolution that reported no value (no-op without `metrics`).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_miss() {}

/// Record a shared-tier lookup.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_remote_lookup() {
    metrics::counter!(*REMOTE_LOOKUP_COUNTER).increment(1);
}

/// Record a shared-tier lookup (no-op without `metrics`).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_remote_lookup() {}

/// Record a producer invocation.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_producer_invocation() {
    metrics::counter!(*PRODUCER_INVOCATION_COUNTER).increment(1);
}

/// Record a producer invocation (no-op without `metrics`).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_producer_invocation() {}
