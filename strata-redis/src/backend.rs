//! Redis tier implementation.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::{Client, aio::ConnectionManager};
use tokio::sync::OnceCell;
use tracing::trace;

use strata_core::{
    BackendResult, CacheKey, DeleteStatus, FlushScope, Payload, RemoteBackend,
};

use crate::error::Error;

const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis shared tier based on the redis-rs crate.
///
/// Uses a [`ConnectionManager`] for asynchronous network interaction. The
/// manager is created lazily on first use and supervises reconnection
/// internally, so a server that is unreachable at construction time only
/// degrades the tier: reads fail with a connection error (which the
/// orchestrator treats as a miss) until the server comes back, at which
/// point the next operation picks it up. No caller ever mutates the
/// connection handle directly.
///
/// [`ConnectionManager`]: redis::aio::ConnectionManager
#[derive(Clone)]
pub struct RedisTier {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    operation_timeout: Duration,
}

impl RedisTier {
    /// Creates a new tier builder with default settings.
    #[must_use]
    pub fn builder() -> RedisTierBuilder {
        RedisTierBuilder::default()
    }

    /// Create lazy connection to redis via [`ConnectionManager`].
    ///
    /// [`ConnectionManager`]: redis::aio::ConnectionManager
    async fn connection(&self) -> Result<&ConnectionManager, Error> {
        trace!("get connection manager");
        let manager = self
            .connection
            .get_or_try_init(|| {
                trace!("initialize new redis connection manager");
                self.client.get_connection_manager()
            })
            .await?;
        Ok(manager)
    }

    /// Bounds `op` by the configured operation timeout.
    async fn run<T, F>(&self, op: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        tokio::time::timeout(self.operation_timeout, op)
            .await
            .map_err(|_| Error::Timeout(self.operation_timeout))?
    }
}

impl std::fmt::Debug for RedisTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTier")
            .field("connected", &self.connection.initialized())
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

/// Part of builder pattern implementation for [`RedisTier`].
pub struct RedisTierBuilder {
    connection_info: String,
    operation_timeout: Duration,
}

impl Default for RedisTierBuilder {
    fn default() -> Self {
        Self {
            connection_info: "redis://127.0.0.1/".to_owned(),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

impl RedisTierBuilder {
    /// Set connection info (host, port, database, password) for the tier.
    ///
    /// Accepts any redis-rs connection URL, e.g.
    /// `redis://:secret@cache.internal:6379/2`.
    pub fn server(mut self, connection_info: impl Into<String>) -> Self {
        self.connection_info = connection_info.into();
        self
    }

    /// Set the per-operation network timeout.
    ///
    /// An elapsed timeout is reported as a connection error, which the
    /// orchestrator tolerates as a miss.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Create a new [`RedisTier`] instance with the passed settings.
    ///
    /// Only the connection URL is validated here; the network connection
    /// itself is established lazily on first use.
    pub fn build(self) -> Result<RedisTier, Error> {
        Ok(RedisTier {
            client: Client::open(self.connection_info)?,
            connection: OnceCell::new(),
            operation_timeout: self.operation_timeout,
        })
    }
}

#[async_trait]
impl RemoteBackend for RedisTier {
    async fn get(&self, key: &CacheKey) -> BackendResult<Option<Payload>> {
        let raw: Option<Vec<u8>> = self
            .run(async {
                let mut con = self.connection().await?.clone();
                let raw = redis::cmd("GET")
                    .arg(key.as_str())
                    .query_async(&mut con)
                    .await
                    .map_err(Error::from)?;
                Ok(raw)
            })
            .await?;

        raw.as_deref().map(Payload::from_wire).transpose()
    }

    async fn set(&self, key: &CacheKey, payload: &Payload, ttl: Duration) -> BackendResult<()> {
        let wire = payload.to_wire();
        let ttl_millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        self.run(async {
            let mut con = self.connection().await?.clone();
            redis::cmd("SET")
                .arg(key.as_str())
                .arg(wire.as_ref())
                .arg("PX")
                .arg(ttl_millis)
                .query_async::<()>(&mut con)
                .await
                .map_err(Error::from)
        })
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        let deleted: i64 = self
            .run(async {
                let mut con = self.connection().await?.clone();
                redis::cmd("DEL")
                    .arg(key.as_str())
                    .query_async(&mut con)
                    .await
                    .map_err(Error::from)
            })
            .await?;

        if deleted > 0 {
            Ok(DeleteStatus::Deleted(deleted as u32))
        } else {
            Ok(DeleteStatus::Missing)
        }
    }

    async fn flush(&self, scope: FlushScope) -> BackendResult<()> {
        let command = match scope {
            FlushScope::Current => "FLUSHDB",
            FlushScope::All => "FLUSHALL",
        };
        self.run(async {
            let mut con = self.connection().await?.clone();
            redis::cmd(command)
                .query_async::<()>(&mut con)
                .await
                .map_err(Error::from)
        })
        .await?;
        Ok(())
    }
}
