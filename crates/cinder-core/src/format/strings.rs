//! String record format: `value || timestamp(u32 LE)`.
//!
//! Strings are the degenerate case of the meta protocol: one physical
//! record per user key, no version (there are no sub-records to orphan),
//! and the expiration timestamp rides inline after the value bytes.

use bytes::BufMut;

use crate::error::{Error, Result};
use crate::time::{self, NO_EXPIRY};

pub(crate) const STRING_SUFFIX_LEN: usize = 4;

pub(crate) fn encode(value: &[u8], timestamp: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + STRING_SUFFIX_LEN);
    out.put_slice(value);
    out.put_u32_le(timestamp);
    out
}

/// Zero-copy view over an encoded string record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StringValue<'a> {
    pub value: &'a [u8],
    pub timestamp: u32,
}

impl<'a> StringValue<'a> {
    pub(crate) fn decode(raw: &'a [u8]) -> Result<Self> {
        if raw.len() < STRING_SUFFIX_LEN {
            return Err(Error::corruption(format!(
                "string record is {} bytes, expected at least {STRING_SUFFIX_LEN}",
                raw.len()
            )));
        }
        let (value, suffix) = raw.split_at(raw.len() - STRING_SUFFIX_LEN);
        let timestamp = u32::from_le_bytes([suffix[0], suffix[1], suffix[2], suffix[3]]);
        Ok(Self { value, timestamp })
    }

    pub(crate) fn is_stale(&self) -> bool {
        time::is_expired(self.timestamp, time::now_seconds())
    }
}

/// Re-encodes with the same value bytes and a new timestamp.
pub(crate) fn encode_with_ttl(value: &[u8], ttl: i64) -> Vec<u8> {
    encode(value, time::deadline(ttl))
}

/// Encodes with no expiry.
pub(crate) fn encode_persistent(value: &[u8]) -> Vec<u8> {
    encode(value, NO_EXPIRY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let raw = encode(b"hello", 42);
        let parsed = StringValue::decode(&raw).unwrap();
        assert_eq!(parsed.value, b"hello");
        assert_eq!(parsed.timestamp, 42);
    }

    #[test]
    fn empty_value_is_legal() {
        let raw = encode(b"", NO_EXPIRY);
        assert_eq!(raw.len(), STRING_SUFFIX_LEN);
        let parsed = StringValue::decode(&raw).unwrap();
        assert_eq!(parsed.value, b"");
        assert!(!parsed.is_stale());
    }

    #[test]
    fn short_record_is_corruption() {
        assert!(StringValue::decode(b"ab").is_err());
    }

    #[test]
    fn staleness_tracks_timestamp() {
        let live = encode_with_ttl(b"v", 100);
        assert!(!StringValue::decode(&live).unwrap().is_stale());
        let dead = encode(b"v", 1);
        assert!(StringValue::decode(&dead).unwrap().is_stale());
    }
}
