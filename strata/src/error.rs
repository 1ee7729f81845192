//! Error types for cache operations.

use std::sync::Arc;

use thiserror::Error;

use strata_core::{BoxError, CodecError};

use crate::loader::SignatureError;

/// Error type for cache operations.
///
/// Remote-tier unavailability is not represented here: the orchestrator
/// tolerates it by treating reads as misses and writes as no-ops. What
/// remains are caller-facing failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Value could not be encoded or decoded.
    ///
    /// A decode failure means the stored entry does not match the requested
    /// type, which is a programming error at the call site.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Producer arguments do not match the declared signature.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The producer itself failed.
    ///
    /// Surfaced verbatim; nothing was written to any tier.
    #[error(transparent)]
    Producer(BoxError),

    /// A coalesced resolution failed; every waiter shares the one error.
    #[error("{0}")]
    Shared(Arc<Error>),
}

impl From<Arc<Error>> for Error {
    fn from(error: Arc<Error>) -> Self {
        // Sole waiter: hand back the original error instead of wrapping.
        Arc::try_unwrap(error).unwrap_or_else(Error::Shared)
    }
}
