//! Error types shared across the strata crates.

use thiserror::Error;

/// Boxed error type used for opaque error sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for value encoding and decoding.
///
/// Codec failures are always surfaced to the caller and never retried: a
/// decode failure on a stored entry indicates a type mismatch between what
/// was written and what is being requested, which is a caller programming
/// error rather than a transient fault.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Value could not be serialized to its transport form.
    #[error(transparent)]
    Encode(BoxError),

    /// Stored bytes could not be deserialized into the requested type.
    #[error(transparent)]
    Decode(BoxError),
}

/// Error type for remote backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    Internal(BoxError),

    /// Network interaction error.
    ///
    /// Errors occurring during communication with the remote store. The
    /// orchestrator treats these as a miss on reads and a no-op on writes.
    #[error(transparent)]
    Connection(BoxError),

    /// Stored bytes do not carry a valid entry frame.
    #[error("malformed stored entry: {0}")]
    Malformed(String),
}
