//! In-process tier implementation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use strata_core::{CacheKey, Payload};

/// In-process cache tier powered by Moka.
///
/// `MemoryTier` stores pre-serialized [`Payload`] entries keyed by
/// [`CacheKey`], keeping the engine value-type-agnostic. Its central
/// primitive is per-key coalesced resolution: when several callers miss on
/// the same key concurrently, Moka runs a single resolve future and every
/// caller shares its outcome.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use strata_moka::MemoryTier;
///
/// let tier = MemoryTier::builder(10_000)
///     .time_to_live(Duration::from_secs(300))
///     .build();
/// ```
///
/// # Caveats
///
/// - Data is not persisted and not shared across processes.
/// - Expiration is best-effort; expired entries may briefly remain readable
///   until Moka's background eviction runs.
#[derive(Clone, Debug)]
pub struct MemoryTier {
    cache: Cache<CacheKey, Payload>,
}

impl MemoryTier {
    /// Creates a builder with the given maximum entry count.
    pub fn builder(max_entries: u64) -> MemoryTierBuilder {
        MemoryTierBuilder {
            max_entries,
            time_to_live: None,
        }
    }

    /// Looks up `key`, running `resolve` under per-key coalescing on a miss.
    ///
    /// A `Some` result is stored and returned; a `None` result is returned to
    /// every coalesced waiter but stored nowhere, so a transient miss is
    /// never pinned in memory.
    pub async fn get_or_resolve<F>(&self, key: &CacheKey, resolve: F) -> Option<Payload>
    where
        F: Future<Output = Option<Payload>>,
    {
        self.cache.optionally_get_with_by_ref(key, resolve).await
    }

    /// Looks up `key`, running `resolve` under per-key coalescing on a miss.
    ///
    /// An `Ok` payload is stored and returned. An `Err` is stored nowhere and
    /// handed to every coalesced waiter behind an `Arc`.
    pub async fn get_or_try_resolve<F, E>(
        &self,
        key: &CacheKey,
        resolve: F,
    ) -> Result<Payload, Arc<E>>
    where
        F: Future<Output = Result<Payload, E>>,
        E: Send + Sync + 'static,
    {
        self.cache.try_get_with_by_ref(key, resolve).await
    }

    /// Reads the entry under `key` without resolving.
    pub async fn get(&self, key: &CacheKey) -> Option<Payload> {
        self.cache.get(key).await
    }

    /// Stores `payload` under `key`, replacing any previous entry.
    pub async fn insert(&self, key: CacheKey, payload: Payload) {
        self.cache.insert(key, payload).await;
    }

    /// Drops the entry under `key`, if any.
    pub async fn invalidate(&self, key: &CacheKey) {
        debug!(key = %key, "invalidate in-process entry");
        self.cache.invalidate(key).await;
    }

    /// Drops every entry.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Approximate number of stored entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs Moka's pending maintenance tasks.
    ///
    /// Eviction bookkeeping is deferred; tests call this before asserting on
    /// entry counts.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

/// Builder for [`MemoryTier`].
#[derive(Debug, Clone)]
pub struct MemoryTierBuilder {
    max_entries: u64,
    time_to_live: Option<Duration>,
}

impl MemoryTierBuilder {
    /// Sets a uniform time-to-live for stored entries.
    ///
    /// Without one, entries live until evicted by capacity pressure or
    /// explicit invalidation.
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    /// Builds the tier with the configured settings.
    pub fn build(self) -> MemoryTier {
        let mut builder = Cache::builder().max_capacity(self.max_entries);
        if let Some(ttl) = self.time_to_live {
            builder = builder.time_to_live(ttl);
        }
        MemoryTier {
            cache: builder.build(),
        }
    }
}
