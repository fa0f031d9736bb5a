//! Sub-record key formats.
//!
//! Every data-CF key starts with the same prefix,
//! `len(user_key)(u32 LE) || user_key || version(u32 LE)`, so a prefix scan
//! keyed by `(user_key, version)` reaches exactly the live generation of a
//! key, and the compaction filters can recover `(user_key, version)` from
//! any sub-record without knowing which type wrote it.

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};

const PREFIX_OVERHEAD: usize = 8; // len + version

/// `len || user_key || version` — the scan prefix for one generation.
pub(crate) fn prefix(user_key: &[u8], version: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(PREFIX_OVERHEAD + user_key.len());
    out.put_u32_le(user_key.len() as u32);
    out.put_slice(user_key);
    out.put_u32_le(version);
    out
}

/// Hash field key, set member key, and zset data key share one shape:
/// the prefix followed by the raw member bytes.
pub(crate) fn member_key(user_key: &[u8], version: u32, member: &[u8]) -> Vec<u8> {
    let mut out = prefix(user_key, version);
    out.extend_from_slice(member);
    out
}

/// List node key: prefix followed by the node index, big-endian so byte
/// order matches numeric order within a generation.
pub(crate) fn list_node_key(user_key: &[u8], version: u32, index: u64) -> Vec<u8> {
    let mut out = prefix(user_key, version);
    out.put_u64(index);
    out
}

/// Zset score key: prefix, then the score as the little-endian bit pattern
/// of an IEEE-754 double, then the member. The score column family orders
/// these with a comparator that interprets the bits as a double.
pub(crate) fn score_key(user_key: &[u8], version: u32, score: f64, member: &[u8]) -> Vec<u8> {
    let mut out = prefix(user_key, version);
    out.put_u64_le(score.to_bits());
    out.extend_from_slice(member);
    out
}

/// A sub-record key split into its generation prefix and type-specific
/// suffix, borrowed from the encoded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubKey<'a> {
    pub user_key: &'a [u8],
    pub version: u32,
    pub suffix: &'a [u8],
}

impl<'a> SubKey<'a> {
    pub(crate) fn parse(raw: &'a [u8]) -> Result<Self> {
        if raw.len() < PREFIX_OVERHEAD {
            return Err(Error::corruption("sub-record key too short"));
        }
        let mut buf = raw;
        let key_len = buf.get_u32_le() as usize;
        if buf.remaining() < key_len + 4 {
            return Err(Error::corruption("sub-record key truncated"));
        }
        let user_key = &buf[..key_len];
        buf.advance(key_len);
        let version = buf.get_u32_le();
        Ok(Self {
            user_key,
            version,
            suffix: buf,
        })
    }

    /// Member bytes for the member-key shape.
    pub(crate) fn member(&self) -> &'a [u8] {
        self.suffix
    }

    /// Node index for the list-key shape.
    pub(crate) fn list_index(&self) -> Result<u64> {
        let bytes: [u8; 8] = self
            .suffix
            .try_into()
            .map_err(|_| Error::corruption("list node key has no index"))?;
        Ok(u64::from_be_bytes(bytes))
    }

    /// `(score, member)` for the score-key shape.
    pub(crate) fn score_member(&self) -> Result<(f64, &'a [u8])> {
        if self.suffix.len() < 8 {
            return Err(Error::corruption("score key has no score"));
        }
        let (bits, member) = self.suffix.split_at(8);
        let score = f64::from_bits(u64::from_le_bytes(bits.try_into().expect("8 bytes")));
        Ok((score, member))
    }
}
