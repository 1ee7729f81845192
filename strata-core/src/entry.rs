//! Stored entry representation.
//!
//! Both tiers store a [`Payload`]: either serialized value bytes or an
//! explicit negative marker recording that a resolution ran and produced no
//! value. Absence of any entry is expressed as `Option::None` at the tier
//! boundary, so an empty serialization (`""`, `[]`, `null`) is a perfectly
//! valid present value and is never mistaken for a miss.
//!
//! For remote-tier storage the payload is framed with a single tag byte
//! (`+` for a value, `-` for the negative marker) ahead of the raw bytes.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::BackendError;

const TAG_VALUE: u8 = b'+';
const TAG_NEGATIVE: u8 = b'-';

/// A stored cache entry: serialized value bytes or a negative marker.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use strata_core::Payload;
///
/// let payload = Payload::Value(Bytes::from_static(b"{\"id\":42}"));
/// let wire = payload.to_wire();
/// assert_eq!(Payload::from_wire(&wire).unwrap(), payload);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Codec-serialized value bytes.
    Value(Bytes),
    /// Explicit marker: the key is known to have no value.
    ///
    /// Stored through both tiers so repeated lookups short-circuit to
    /// "absent" without re-running the producer until the marker is evicted.
    Negative,
}

impl Payload {
    /// Returns the serialized value bytes, or `None` for a negative marker.
    pub fn as_value(&self) -> Option<&Bytes> {
        match self {
            Payload::Value(data) => Some(data),
            Payload::Negative => None,
        }
    }

    /// True if this entry is the negative marker.
    pub fn is_negative(&self) -> bool {
        matches!(self, Payload::Negative)
    }

    /// Frames the entry for remote-tier storage.
    pub fn to_wire(&self) -> Bytes {
        match self {
            Payload::Value(data) => {
                let mut buf = BytesMut::with_capacity(1 + data.len());
                buf.put_u8(TAG_VALUE);
                buf.extend_from_slice(data);
                buf.freeze()
            }
            Payload::Negative => Bytes::from_static(&[TAG_NEGATIVE]),
        }
    }

    /// Parses an entry from its remote-tier wire form.
    ///
    /// An empty buffer or an unknown tag byte means the stored bytes were not
    /// written by this library (or were corrupted in transit) and is reported
    /// as [`BackendError::Malformed`].
    pub fn from_wire(raw: &[u8]) -> Result<Self, BackendError> {
        match raw.split_first() {
            Some((&TAG_VALUE, data)) => Ok(Payload::Value(Bytes::copy_from_slice(data))),
            Some((&TAG_NEGATIVE, [])) => Ok(Payload::Negative),
            Some((&TAG_NEGATIVE, _)) => Err(BackendError::Malformed(
                "negative marker carries trailing bytes".into(),
            )),
            Some((tag, _)) => Err(BackendError::Malformed(format!(
                "unknown entry tag byte 0x{tag:02x}"
            ))),
            None => Err(BackendError::Malformed("empty stored entry".into())),
        }
    }
}
