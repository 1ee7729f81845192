//! Error types for Redis tier operations.
//!
//! All errors convert into [`BackendError`] for uniform handling across
//! remote backends. The orchestrator treats connection-class failures as a
//! miss on reads and a no-op on writes, so a degraded Redis never surfaces
//! to cache callers.
//!
//! [`BackendError`]: strata_core::BackendError

use std::time::Duration;

use redis::RedisError;
use strata_core::BackendError;

/// Error type for Redis tier operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client.
    ///
    /// Includes connection failures, protocol errors, authentication
    /// failures, and command execution errors.
    #[error("redis tier error: {0}")]
    Redis(#[from] RedisError),

    /// The operation did not complete within the configured timeout.
    #[error("redis operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        Self::Connection(Box::new(error))
    }
}
