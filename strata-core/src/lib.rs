#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Remote backend trait and operation types.
pub mod backend;

/// Value serialization trait and the JSON default.
pub mod codec;

/// Stored entry representation and wire framing.
pub mod entry;

/// Shared error types.
pub mod error;

/// Cache key type.
pub mod key;

pub use backend::{BackendResult, DeleteStatus, FlushScope, RemoteBackend};
pub use codec::{Codec, JsonCodec};
pub use entry::Payload;
pub use error::{BackendError, BoxError, CodecError};
pub use key::CacheKey;
