//! The cache client: read-through resolution and full-miss computation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use strata_core::{CacheKey, Codec, JsonCodec, Payload, RemoteBackend};
use strata_moka::MemoryTier;

use crate::builder::{CacheBuilder, NoRemote};
use crate::error::Error;
use crate::loader::{ArgValue, Producer, ProducerResult};
use crate::metrics;
use crate::stats::{CallStats, StatsSnapshot};

/// Two-tier cache client.
///
/// Values resolve through an in-process tier, then the remote tier, then a
/// caller-supplied producer, and are written back through both tiers on the
/// way out. Per key, concurrent misses share a single in-flight resolution;
/// the coalescing itself is delegated to the in-process engine.
///
/// Both tiers store codec-serialized bytes tagged with an explicit presence
/// marker, so "no entry", "known absent" and "legitimately empty value" are
/// three distinct states.
///
/// A remote tier that is unreachable never surfaces as an error: reads
/// degrade to misses and writes to no-ops, logged at `warn`.
///
/// `Cache` is cheap to clone; clones share the in-process tier, the remote
/// handle, and the call counters. Every operation is a plain async call on
/// the caller's task; apply deadlines by wrapping calls in
/// `tokio::time::timeout` and cancel by dropping the future.
pub struct Cache<R, S = JsonCodec> {
    memory: MemoryTier,
    remote: R,
    codec: S,
    remote_ttl: Duration,
    stats: Arc<CallStats>,
}

impl Cache<NoRemote> {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn builder() -> CacheBuilder {
        CacheBuilder::default()
    }
}

impl<R, S> Clone for Cache<R, S>
where
    R: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            memory: self.memory.clone(),
            remote: self.remote.clone(),
            codec: self.codec.clone(),
            remote_ttl: self.remote_ttl,
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<R, S> std::fmt::Debug for Cache<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("memory", &self.memory)
            .field("remote", &std::any::type_name::<R>())
            .field("codec", &std::any::type_name::<S>())
            .field("remote_ttl", &self.remote_ttl)
            .finish()
    }
}

impl<R, S> Cache<R, S>
where
    R: RemoteBackend,
    S: Codec,
{
    pub(crate) fn from_parts(
        memory: MemoryTier,
        remote: R,
        codec: S,
        remote_ttl: Duration,
        stats: Arc<CallStats>,
    ) -> Self {
        Self {
            memory,
            remote,
            codec,
            remote_ttl,
            stats,
        }
    }

    /// Resolves `key` read-through: in-process tier first, then the remote
    /// tier, filling the in-process tier on a remote hit.
    ///
    /// Returns `Ok(None)` when no tier holds a value, including when the key
    /// carries a negative marker. A transient miss is never pinned in
    /// memory. Decode failure is a hard error: the stored entry does not
    /// match the requested type.
    pub async fn resolve<T>(&self, key: impl Into<CacheKey>) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
    {
        let key = key.into();
        let outcome = self
            .memory
            .get_or_resolve(&key, self.lookup_remote(&key))
            .await;
        match outcome {
            Some(payload) => self.decode_payload(payload),
            None => {
                metrics::record_miss();
                Ok(None)
            }
        }
    }

    /// Resolves `key`, invoking `producer` with `args` on a full miss and
    /// writing the produced value through both tiers.
    ///
    /// Arguments are validated against the producer's declared signature
    /// before any tier is touched; a mismatch is a [`SignatureError`] naming
    /// the producer. The remote lookup, the producer invocation, and the
    /// write-through all run inside one per-key flight, so concurrent full
    /// misses invoke the producer exactly once and share its outcome.
    ///
    /// A producer returning `Ok(None)` stores a negative marker through both
    /// tiers and yields `Ok(None)`; until that marker is evicted the
    /// producer is not invoked again for this key. A producer error is
    /// propagated verbatim and nothing is cached.
    ///
    /// [`SignatureError`]: crate::SignatureError
    pub async fn fetch_or_compute<T>(
        &self,
        key: impl Into<CacheKey>,
        producer: &Producer<T>,
        args: Vec<ArgValue>,
    ) -> Result<Option<T>, Error>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = key.into();
        producer.check_args(&args)?;
        let payload = self
            .memory
            .get_or_try_resolve(&key, async {
                if let Some(found) = self.lookup_remote(&key).await {
                    return Ok(found);
                }
                debug!(key = %key, producer = producer.name(), "full miss, invoking producer");
                self.produce_and_store(&key, || producer.call(args)).await
            })
            .await
            .map_err(Error::from)?;
        self.decode_payload(payload)
    }

    /// Statically-typed variant of [`fetch_or_compute`]: the producer is a
    /// plain closure, so signature validation happens at compile time.
    /// Orchestration is identical.
    ///
    /// [`fetch_or_compute`]: Cache::fetch_or_compute
    pub async fn fetch_or_else<T, F, Fut>(
        &self,
        key: impl Into<CacheKey>,
        produce: F,
    ) -> Result<Option<T>, Error>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProducerResult<T>>,
    {
        let key = key.into();
        let payload = self
            .memory
            .get_or_try_resolve(&key, async {
                if let Some(found) = self.lookup_remote(&key).await {
                    return Ok(found);
                }
                debug!(key = %key, "full miss, invoking producer");
                self.produce_and_store(&key, produce).await
            })
            .await
            .map_err(Error::from)?;
        self.decode_payload(payload)
    }

    /// Writes `value` through both tiers under `key`.
    pub async fn insert<T>(&self, key: impl Into<CacheKey>, value: &T) -> Result<(), Error>
    where
        T: Serialize,
    {
        let key = key.into();
        let payload = Payload::Value(self.codec.encode(value)?);
        self.store_remote(&key, &payload).await;
        self.memory.insert(key, payload).await;
        Ok(())
    }

    /// Deletes `key` from both tiers.
    ///
    /// A remote delete failure is tolerated like any other remote
    /// unavailability; the entry then lives out its remote TTL.
    pub async fn remove(&self, key: impl Into<CacheKey>) {
        let key = key.into();
        if let Err(error) = self.remote.delete(&key).await {
            warn!(key = %key, %error, "remote tier delete failed");
        }
        self.memory.invalidate(&key).await;
    }

    /// Point-in-time call counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// The in-process tier.
    pub fn memory(&self) -> &MemoryTier {
        &self.memory
    }

    /// The remote tier backend.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Queries the remote tier, tolerating unavailability as a miss.
    ///
    /// This future only runs on an in-process miss, so the remote-lookup
    /// counter counts exactly those.
    async fn lookup_remote(&self, key: &CacheKey) -> Option<Payload> {
        self.stats.record_remote_lookup();
        metrics::record_remote_lookup();
        match self.remote.get(key).await {
            Ok(found) => found,
            Err(error) => {
                warn!(key = %key, %error, "remote tier lookup failed, treating as miss");
                None
            }
        }
    }

    /// Runs the producer and writes its outcome through the remote tier.
    ///
    /// The returned payload is stored in the in-process tier by the
    /// coalescing primitive this runs under.
    async fn produce_and_store<T, F, Fut>(&self, key: &CacheKey, produce: F) -> Result<Payload, Error>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProducerResult<T>>,
    {
        self.stats.record_producer_invocation();
        metrics::record_producer_invocation();
        let payload = match produce().await.map_err(Error::Producer)? {
            Some(value) => Payload::Value(self.codec.encode(&value)?),
            None => {
                debug!(key = %key, "producer yielded no value, storing negative marker");
                Payload::Negative
            }
        };
        self.store_remote(key, &payload).await;
        Ok(payload)
    }

    /// Writes through the remote tier, tolerating unavailability as a no-op.
    async fn store_remote(&self, key: &CacheKey, payload: &Payload) {
        if let Err(error) = self.remote.set(key, payload, self.remote_ttl).await {
            warn!(key = %key, %error, "remote tier write failed, keeping in-process copy only");
        }
    }

    fn decode_payload<T>(&self, payload: Payload) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
    {
        match payload {
            Payload::Value(data) => {
                metrics::record_hit();
                Ok(Some(self.codec.decode(&data)?))
            }
            Payload::Negative => {
                metrics::record_miss();
                Ok(None)
            }
        }
    }
}
