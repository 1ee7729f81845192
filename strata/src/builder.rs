//! Builder for configuring [`Cache`].
//!
//! [`Cache`]: crate::Cache

use std::sync::Arc;
use std::time::Duration;

use strata_core::{Codec, JsonCodec, RemoteBackend};
use strata_moka::MemoryTier;

use crate::cache::Cache;
use crate::stats::CallStats;

const DEFAULT_MAX_ENTRIES: u64 = 10_000;
const DEFAULT_MEMORY_TTL: Duration = Duration::from_secs(300);
const DEFAULT_REMOTE_TTL: Duration = Duration::from_secs(60);

/// Marker type: no remote tier has been configured yet.
///
/// This is the initial state of a [`CacheBuilder`]. Call
/// [`remote()`](CacheBuilder::remote) before `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemote;

/// Builder for creating and configuring a [`Cache`].
///
/// Use [`Cache::builder`] to create a new builder instance. `build()` only
/// becomes available once a remote tier has been supplied.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use strata::Cache;
/// use strata_redis::RedisTier;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = Cache::builder()
///     .max_entries(50_000)
///     .memory_ttl(Duration::from_secs(120))
///     .remote_ttl(Duration::from_secs(60))
///     .remote(RedisTier::builder().build()?)
///     .build();
/// # let _ = cache;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CacheBuilder<R = NoRemote, S = JsonCodec> {
    remote: R,
    codec: S,
    max_entries: u64,
    memory_ttl: Option<Duration>,
    remote_ttl: Duration,
}

impl Default for CacheBuilder<NoRemote, JsonCodec> {
    fn default() -> Self {
        Self {
            remote: NoRemote,
            codec: JsonCodec,
            max_entries: DEFAULT_MAX_ENTRIES,
            memory_ttl: Some(DEFAULT_MEMORY_TTL),
            remote_ttl: DEFAULT_REMOTE_TTL,
        }
    }
}

impl<R, S> CacheBuilder<R, S> {
    /// Set the in-process tier capacity in entries.
    pub fn max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the in-process tier time-to-live.
    pub fn memory_ttl(mut self, ttl: Duration) -> Self {
        self.memory_ttl = Some(ttl);
        self
    }

    /// Set the time-to-live applied to every remote tier write.
    pub fn remote_ttl(mut self, ttl: Duration) -> Self {
        self.remote_ttl = ttl;
        self
    }

    /// Set the remote tier backend.
    pub fn remote<NewR>(self, remote: NewR) -> CacheBuilder<NewR, S>
    where
        NewR: RemoteBackend,
    {
        CacheBuilder {
            remote,
            codec: self.codec,
            max_entries: self.max_entries,
            memory_ttl: self.memory_ttl,
            remote_ttl: self.remote_ttl,
        }
    }

    /// Set the value codec.
    pub fn codec<NewS>(self, codec: NewS) -> CacheBuilder<R, NewS>
    where
        NewS: Codec,
    {
        CacheBuilder {
            remote: self.remote,
            codec,
            max_entries: self.max_entries,
            memory_ttl: self.memory_ttl,
            remote_ttl: self.remote_ttl,
        }
    }
}

impl<R, S> CacheBuilder<R, S>
where
    R: RemoteBackend,
    S: Codec,
{
    /// Create a new [`Cache`] instance with the configured settings.
    pub fn build(self) -> Cache<R, S> {
        let mut memory = MemoryTier::builder(self.max_entries);
        if let Some(ttl) = self.memory_ttl {
            memory = memory.time_to_live(ttl);
        }
        Cache::from_parts(
            memory.build(),
            self.remote,
            self.codec,
            self.remote_ttl,
            Arc::new(CallStats::default()),
        )
    }
}
