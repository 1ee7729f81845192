#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use strata::{
    BackendError, BackendResult, Cache, CacheKey, DeleteStatus, FlushScope, Payload, RemoteBackend,
};

/// Counters for remote-tier traffic.
#[derive(Debug, Default)]
pub struct RemoteCounters {
    pub get_count: AtomicUsize,
    pub set_count: AtomicUsize,
    pub delete_count: AtomicUsize,
}

impl RemoteCounters {
    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.set_count.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_count.load(Ordering::SeqCst)
    }
}

/// In-memory stand-in for the shared tier, with traffic counters and an
/// offline toggle.
#[derive(Clone, Debug, Default)]
pub struct MockRemote {
    entries: Arc<DashMap<CacheKey, Payload>>,
    counters: Arc<RemoteCounters>,
    down: Arc<AtomicBool>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A remote whose every operation fails with a connection error.
    pub fn offline() -> Self {
        let remote = Self::default();
        remote.set_down(true);
        remote
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn seed(&self, key: impl Into<CacheKey>, payload: Payload) {
        self.entries.insert(key.into(), payload);
    }

    pub fn entry(&self, key: impl Into<CacheKey>) -> Option<Payload> {
        self.entries.get(&key.into()).map(|e| e.value().clone())
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get_count(&self) -> usize {
        self.counters.get_count()
    }

    pub fn set_count(&self) -> usize {
        self.counters.set_count()
    }

    pub fn delete_count(&self) -> usize {
        self.counters.delete_count()
    }

    fn offline_error() -> BackendError {
        BackendError::Connection("remote tier offline".into())
    }
}

#[async_trait]
impl RemoteBackend for MockRemote {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Payload>> {
        self.counters.get_count.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(Self::offline_error());
        }
        Ok(self.entries.get(key).map(|e| e.value().clone()))
    }

    async fn set(&self, key: &CacheKey, payload: &Payload, _ttl: Duration) -> BackendResult<()> {
        self.counters.set_count.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(Self::offline_error());
        }
        self.entries.insert(key.clone(), payload.clone());
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        self.counters.delete_count.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(Self::offline_error());
        }
        match self.entries.remove(key) {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    async fn flush(&self, _scope: FlushScope) -> BackendResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(Self::offline_error());
        }
        self.entries.clear();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

pub fn ada() -> User {
    User {
        id: 42,
        name: "Ada".into(),
    }
}

pub fn encoded<T: Serialize>(value: &T) -> Payload {
    Payload::Value(serde_json::to_vec(value).unwrap().into())
}

pub fn make_cache(remote: MockRemote) -> Cache<MockRemote> {
    Cache::builder().max_entries(1_000).remote(remote).build()
}
