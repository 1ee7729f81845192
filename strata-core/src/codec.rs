//! Value serialization.
//!
//! Both tiers store pre-serialized bytes, so the engines themselves stay
//! value-type-agnostic. A [`Codec`] turns typed values into those bytes and
//! back; [`JsonCodec`] is the default.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::CodecError;

/// Serializes typed values to transport bytes and back.
///
/// The orchestrator is generic over its codec, so swapping the storage
/// format is a type parameter change rather than a runtime decision.
pub trait Codec: Send + Sync {
    /// Encodes a value into its stored byte form.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Bytes, CodecError>;

    /// Decodes stored bytes into a typed value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;
}

/// JSON codec (default), backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Bytes, CodecError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|err| CodecError::Encode(Box::new(err)))
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(data).map_err(|err| CodecError::Decode(Box::new(err)))
    }
}
