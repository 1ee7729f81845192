#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Builder for the cache client.
pub mod builder;

/// The cache client: read-through resolution and full-miss computation.
pub mod cache;

/// Error types for cache operations.
pub mod error;

/// Producer descriptors and argument validation for dynamic invocation.
pub mod loader;

/// Metrics collection for cache observability.
///
/// With the `metrics` feature enabled, counters for hits, misses,
/// remote-tier lookups, and producer invocations are emitted through the
/// `metrics` crate facade.
pub mod metrics;

/// Monotonic call counters for observability.
pub mod stats;

pub use builder::{CacheBuilder, NoRemote};
pub use cache::Cache;
pub use error::Error;
pub use loader::{ArgKind, ArgValue, Producer, ProducerResult, SignatureError};
pub use stats::{CallStats, StatsSnapshot};

pub use strata_core::{
    BackendError, BackendResult, BoxError, CacheKey, Codec, CodecError, DeleteStatus, FlushScope,
    JsonCodec, Payload, RemoteBackend,
};
pub use strata_moka::MemoryTier;
