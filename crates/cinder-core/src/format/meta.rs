//! Meta record values.
//!
//! The meta record is the sole source of truth for a key's existence,
//! logical size, TTL, and version. Sub-records found without a matching
//! live meta record are stale and reclaimed by the compaction filters.

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};
use crate::format::next_version;
use crate::time::{self, NO_EXPIRY};

/// `count(u32) || version(u32) || timestamp(u32)`.
pub(crate) const COLLECTION_META_LEN: usize = 12;

/// `count(u64) || left(u64) || right(u64) || version(u32) || timestamp(u32)`.
pub(crate) const LIST_META_LEN: usize = 32;

/// Fresh lists start in the middle of the u64 index space so pushes in
/// either direction cannot run out of indices for realistic workloads.
/// The pair is adjacent (`right - left - 1 == 0`) so the count identity
/// holds from the first write.
pub(crate) const INITIAL_LEFT_INDEX: u64 = (1 << 63) - 1;
pub(crate) const INITIAL_RIGHT_INDEX: u64 = 1 << 63;

/// Meta value for hashes, sets, and sorted sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CollectionMeta {
    pub count: u32,
    pub version: u32,
    pub timestamp: u32,
}

impl CollectionMeta {
    /// Meta for a key being created by its first write.
    pub(crate) fn create(count: u32) -> Self {
        Self {
            count,
            version: next_version(0, time::now_seconds()),
            timestamp: NO_EXPIRY,
        }
    }

    pub(crate) fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() != COLLECTION_META_LEN {
            return Err(Error::corruption(format!(
                "collection meta is {} bytes, expected {COLLECTION_META_LEN}",
                raw.len()
            )));
        }
        let mut buf = raw;
        Ok(Self {
            count: buf.get_u32_le(),
            version: buf.get_u32_le(),
            timestamp: buf.get_u32_le(),
        })
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(COLLECTION_META_LEN);
        out.put_u32_le(self.count);
        out.put_u32_le(self.version);
        out.put_u32_le(self.timestamp);
        out
    }

    pub(crate) fn is_stale(&self) -> bool {
        time::is_expired(self.timestamp, time::now_seconds())
    }

    /// Logical delete / revive-after-stale: empty payload, no expiry, fresh
    /// version. The previous version's sub-records become unreachable and
    /// are reclaimed lazily by compaction.
    pub(crate) fn reinitialize(&mut self) -> u32 {
        self.count = 0;
        self.timestamp = NO_EXPIRY;
        self.version = next_version(self.version, time::now_seconds());
        self.version
    }

    pub(crate) fn expire_in(&mut self, ttl: i64) {
        self.timestamp = time::deadline(ttl);
    }
}

/// Meta value for lists. Carries the sparse index bounds: the usable node
/// range is `(left_index, right_index)`, exclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListMeta {
    pub count: u64,
    pub left_index: u64,
    pub right_index: u64,
    pub version: u32,
    pub timestamp: u32,
}

impl ListMeta {
    pub(crate) fn create() -> Self {
        Self {
            count: 0,
            left_index: INITIAL_LEFT_INDEX,
            right_index: INITIAL_RIGHT_INDEX,
            version: next_version(0, time::now_seconds()),
            timestamp: NO_EXPIRY,
        }
    }

    pub(crate) fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() != LIST_META_LEN {
            return Err(Error::corruption(format!(
                "list meta is {} bytes, expected {LIST_META_LEN}",
                raw.len()
            )));
        }
        let mut buf = raw;
        Ok(Self {
            count: buf.get_u64_le(),
            left_index: buf.get_u64_le(),
            right_index: buf.get_u64_le(),
            version: buf.get_u32_le(),
            timestamp: buf.get_u32_le(),
        })
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(LIST_META_LEN);
        out.put_u64_le(self.count);
        out.put_u64_le(self.left_index);
        out.put_u64_le(self.right_index);
        out.put_u32_le(self.version);
        out.put_u32_le(self.timestamp);
        out
    }

    /// Lists keep their index bounds across emptiness, so staleness is
    /// purely timestamp-driven.
    pub(crate) fn is_stale(&self) -> bool {
        time::is_expired(self.timestamp, time::now_seconds())
    }

    pub(crate) fn reinitialize(&mut self) -> u32 {
        self.count = 0;
        self.left_index = INITIAL_LEFT_INDEX;
        self.right_index = INITIAL_RIGHT_INDEX;
        self.timestamp = NO_EXPIRY;
        self.version = next_version(self.version, time::now_seconds());
        self.version
    }

    pub(crate) fn expire_in(&mut self, ttl: i64) {
        self.timestamp = time::deadline(ttl);
    }

    /// Index of the first element, `left_index + 1`.
    pub(crate) fn first_index(&self) -> u64 {
        self.left_index + 1
    }

    /// Index of the last element, `right_index - 1`.
    pub(crate) fn last_index(&self) -> u64 {
        self.right_index - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_meta_round_trip() {
        let meta = CollectionMeta {
            count: 7,
            version: 1234,
            timestamp: 99,
        };
        let raw = meta.encode();
        assert_eq!(raw.len(), COLLECTION_META_LEN);
        assert_eq!(CollectionMeta::decode(&raw).unwrap(), meta);
    }

    #[test]
    fn collection_meta_rejects_wrong_length() {
        assert!(CollectionMeta::decode(&[0u8; 11]).is_err());
        assert!(CollectionMeta::decode(&[0u8; 13]).is_err());
    }

    #[test]
    fn list_meta_round_trip() {
        let mut meta = ListMeta::create();
        meta.count = 3;
        meta.left_index -= 3;
        let raw = meta.encode();
        assert_eq!(raw.len(), LIST_META_LEN);
        assert_eq!(ListMeta::decode(&raw).unwrap(), meta);
    }

    #[test]
    fn fresh_list_bounds_are_adjacent() {
        let meta = ListMeta::create();
        assert_eq!(meta.right_index - meta.left_index - 1, 0);
        assert_eq!(meta.count, 0);
    }

    #[test]
    fn reinitialize_bumps_version_and_clears_payload() {
        let mut meta = CollectionMeta::create(5);
        meta.expire_in(10);
        let old_version = meta.version;
        let fresh = meta.reinitialize();
        assert!(fresh > old_version);
        assert_eq!(meta.count, 0);
        assert_eq!(meta.timestamp, NO_EXPIRY);
    }

    #[test]
    fn expired_meta_is_stale() {
        let mut meta = CollectionMeta::create(1);
        assert!(!meta.is_stale());
        meta.timestamp = 1;
        assert!(meta.is_stale());
    }
}
