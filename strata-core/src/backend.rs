//! Remote backend trait.
//!
//! The shared tier is consumed through [`RemoteBackend`]. Adapters own their
//! connection lifecycle; the orchestrator only calls these four operations
//! and tolerates [`BackendError::Connection`] failures by treating reads as
//! misses and writes as no-ops.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::entry::Payload;
use crate::error::BackendError;
use crate::key::CacheKey;

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Outcome of a delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Number of deleted entries.
    Deleted(u32),
    /// The key was not present.
    Missing,
}

/// Scope of a flush operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushScope {
    /// Flush the currently selected database/namespace.
    Current,
    /// Flush every database/namespace the store holds.
    All,
}

/// Shared-tier key-value store.
///
/// Implementations must be safe for concurrent use; the orchestrator shares
/// one handle across all in-flight operations.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Reads the entry stored under `key`, if any.
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Payload>>;

    /// Writes `payload` under `key` with the given time-to-live.
    async fn set(&self, key: &CacheKey, payload: &Payload, ttl: Duration) -> BackendResult<()>;

    /// Deletes the entry stored under `key`.
    async fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus>;

    /// Drops every entry within `scope`.
    async fn flush(&self, scope: FlushScope) -> BackendResult<()>;
}

#[async_trait]
impl<B: RemoteBackend + ?Sized> RemoteBackend for &B {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Payload>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &CacheKey, payload: &Payload, ttl: Duration) -> BackendResult<()> {
        (**self).set(key, payload, ttl).await
    }

    async fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).delete(key).await
    }

    async fn flush(&self, scope: FlushScope) -> BackendResult<()> {
        (**self).flush(scope).await
    }
}

#[async_trait]
impl<B: RemoteBackend + ?Sized> RemoteBackend for Arc<B> {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Payload>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &CacheKey, payload: &Payload, ttl: Duration) -> BackendResult<()> {
        (**self).set(key, payload, ttl).await
    }

    async fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).delete(key).await
    }

    async fn flush(&self, scope: FlushScope) -> BackendResult<()> {
        (**self).flush(scope).await
    }
}

#[async_trait]
impl<B: RemoteBackend + ?Sized> RemoteBackend for Box<B> {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Payload>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &CacheKey, payload: &Payload, ttl: Duration) -> BackendResult<()> {
        (**self).set(key, payload, ttl).await
    }

    async fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).delete(key).await
    }

    async fn flush(&self, scope: FlushScope) -> BackendResult<()> {
        (**self).flush(scope).await
    }
}
