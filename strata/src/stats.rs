//! Call statistics.
//!
//! Process-wide monotonically increasing counters, shared across cache
//! clones. Observability only; nothing reads them on the hot path.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic call counters.
#[derive(Debug, Default)]
pub struct CallStats {
    remote_lookups: AtomicU64,
    producer_invocations: AtomicU64,
}

impl CallStats {
    pub(crate) fn record_remote_lookup(&self) {
        self.remote_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_producer_invocation(&self) {
        self.producer_invocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads the counters at one point in time.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            remote_lookups: self.remote_lookups.load(Ordering::Relaxed),
            producer_invocations: self.producer_invocations.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the call counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Shared-tier lookups, one per in-process miss.
    pub remote_lookups: u64,
    /// Producer invocations, one per full miss.
    pub producer_invocations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_only_grow() {
        let stats = CallStats::default();
        stats.record_remote_lookup();
        stats.record_remote_lookup();
        stats.record_producer_invocation();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.remote_lookups, 2);
        assert_eq!(snapshot.producer_invocations, 1);
    }
}
