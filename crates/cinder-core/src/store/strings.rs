//! Strings handler.
//!
//! Strings live in a single column family: the value bytes with a trailing
//! 4-byte expiration timestamp (see [`crate::format::strings`]). There is
//! no version protocol because there are no sub-records to orphan; logical
//! expiry is the timestamp alone, reclaimed by [`StringsFilterFactory`].

use std::path::Path;
use std::sync::Arc;

use rocksdb::WriteBatch;
use tracing::info;

use crate::error::{Error, Result};
use crate::filter::StringsFilterFactory;
use crate::format::strings::{self as record, StringValue};
use crate::lock::LockManager;
use crate::options::StoreOptions;
use crate::store::{self, Db, ScanPage};
use crate::time::{self, NO_EXPIRY};
use crate::util::Pattern;

/// Operator for [`Strings::bitop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOperation {
    And,
    Or,
    Xor,
    Not,
}

pub(crate) struct Strings {
    db: Arc<Db>,
    lock_mgr: LockManager,
}

fn is_live(raw: &[u8]) -> bool {
    StringValue::decode(raw).map(|p| !p.is_stale()).unwrap_or(false)
}

impl Strings {
    pub(crate) fn open(options: &StoreOptions, path: &Path) -> Result<Self> {
        let mut cf_opts = options.db_options();
        cf_opts.set_compaction_filter_factory(StringsFilterFactory);
        let db = Arc::new(Db::open_cf_descriptors(
            &options.db_options(),
            path,
            vec![rocksdb::ColumnFamilyDescriptor::new(store::META_CF, cf_opts)],
        )?);
        info!(path = %path.display(), "opened strings store");
        Ok(Self {
            db,
            lock_mgr: LockManager::new(),
        })
    }

    /// Live value and its timestamp; `None` when absent or expired.
    fn live(&self, key: &[u8]) -> Result<Option<(Vec<u8>, u32)>> {
        match self.db.get(key)? {
            None => Ok(None),
            Some(raw) => {
                let parsed = StringValue::decode(&raw)?;
                if parsed.is_stale() {
                    Ok(None)
                } else {
                    Ok(Some((parsed.value.to_vec(), parsed.timestamp)))
                }
            }
        }
    }

    pub(crate) fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let _guard = self.lock_mgr.lock(key);
        self.db.put(key, record::encode_persistent(value))?;
        Ok(())
    }

    pub(crate) fn setex(&self, key: &[u8], value: &[u8], ttl: i64) -> Result<()> {
        if ttl <= 0 {
            return Err(Error::invalid_argument("invalid expire time"));
        }
        let _guard = self.lock_mgr.lock(key);
        self.db.put(key, record::encode_with_ttl(value, ttl))?;
        Ok(())
    }

    pub(crate) fn setnx(&self, key: &[u8], value: &[u8]) -> Result<bool> {
        let _guard = self.lock_mgr.lock(key);
        if self.live(key)?.is_some() {
            return Ok(false);
        }
        self.db.put(key, record::encode_persistent(value))?;
        Ok(true)
    }

    /// Compare-and-set on the value bytes: 1 on match-and-set, 0 when the
    /// key is absent or stale, -1 on mismatch. `ttl` of `None` preserves
    /// the current expiry.
    pub(crate) fn setvx(
        &self,
        key: &[u8],
        expected: &[u8],
        value: &[u8],
        ttl: Option<i64>,
    ) -> Result<i32> {
        let _guard = self.lock_mgr.lock(key);
        let Some((current, timestamp)) = self.live(key)? else {
            return Ok(0);
        };
        if current != expected {
            return Ok(-1);
        }
        let timestamp = match ttl {
            None => timestamp,
            Some(t) if t > 0 => time::deadline(t),
            Some(_) => return Err(Error::invalid_argument("invalid expire time")),
        };
        self.db.put(key, record::encode(value, timestamp))?;
        Ok(1)
    }

    /// Compare-and-delete mirror of [`Strings::setvx`].
    pub(crate) fn delvx(&self, key: &[u8], expected: &[u8]) -> Result<i32> {
        let _guard = self.lock_mgr.lock(key);
        let Some((current, _)) = self.live(key)? else {
            return Ok(0);
        };
        if current != expected {
            return Ok(-1);
        }
        self.db.delete(key)?;
        Ok(1)
    }

    pub(crate) fn mset(&self, pairs: &[(&[u8], &[u8])]) -> Result<()> {
        let keys: Vec<&[u8]> = pairs.iter().map(|(k, _)| *k).collect();
        let _guard = self.lock_mgr.multi_lock(&keys);
        let mut batch = WriteBatch::default();
        for &(key, value) in pairs {
            batch.put(key, record::encode_persistent(value));
        }
        self.db.write(batch)?;
        Ok(())
    }

    /// Atomic multi-SETNX: if any target is live, nothing is written.
    pub(crate) fn msetnx(&self, pairs: &[(&[u8], &[u8])]) -> Result<bool> {
        let keys: Vec<&[u8]> = pairs.iter().map(|(k, _)| *k).collect();
        let _guard = self.lock_mgr.multi_lock(&keys);
        for &key in &keys {
            if self.live(key)?.is_some() {
                return Ok(false);
            }
        }
        let mut batch = WriteBatch::default();
        for &(key, value) in pairs {
            batch.put(key, record::encode_persistent(value));
        }
        self.db.write(batch)?;
        Ok(true)
    }

    pub(crate) fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let raw = self.db.get(key)?.ok_or_else(Error::not_found)?;
        let parsed = StringValue::decode(&raw)?;
        if parsed.is_stale() {
            return Err(Error::stale());
        }
        Ok(parsed.value.to_vec())
    }

    pub(crate) fn mget(&self, keys: &[&[u8]]) -> Result<Vec<Option<Vec<u8>>>> {
        let snapshot = self.db.snapshot();
        keys.iter()
            .map(|key| match snapshot.get(key) {
                Ok(None) => Ok(None),
                Ok(Some(raw)) => {
                    let parsed = StringValue::decode(&raw)?;
                    Ok((!parsed.is_stale()).then(|| parsed.value.to_vec()))
                }
                Err(err) => Err(err.into()),
            })
            .collect()
    }

    /// Appends to the live value (keeping its expiry) or behaves as SET.
    /// Returns the resulting length.
    pub(crate) fn append(&self, key: &[u8], suffix: &[u8]) -> Result<i64> {
        let _guard = self.lock_mgr.lock(key);
        match self.live(key)? {
            Some((mut value, timestamp)) => {
                value.extend_from_slice(suffix);
                let len = value.len() as i64;
                self.db.put(key, record::encode(&value, timestamp))?;
                Ok(len)
            }
            None => {
                self.db.put(key, record::encode_persistent(suffix))?;
                Ok(suffix.len() as i64)
            }
        }
    }

    pub(crate) fn incrby(&self, key: &[u8], delta: i64) -> Result<i64> {
        let _guard = self.lock_mgr.lock(key);
        let (old, timestamp) = match self.live(key)? {
            Some((value, timestamp)) => (
                crate::util::parse_i64(&value)
                    .ok_or_else(|| Error::corruption("value is not an integer"))?,
                timestamp,
            ),
            None => (0, NO_EXPIRY),
        };
        let new = old
            .checked_add(delta)
            .ok_or_else(|| Error::invalid_argument("increment or decrement would overflow"))?;
        self.db
            .put(key, record::encode(new.to_string().as_bytes(), timestamp))?;
        Ok(new)
    }

    pub(crate) fn decrby(&self, key: &[u8], delta: i64) -> Result<i64> {
        let _guard = self.lock_mgr.lock(key);
        let (old, timestamp) = match self.live(key)? {
            Some((value, timestamp)) => (
                crate::util::parse_i64(&value)
                    .ok_or_else(|| Error::corruption("value is not an integer"))?,
                timestamp,
            ),
            None => (0, NO_EXPIRY),
        };
        let new = old
            .checked_sub(delta)
            .ok_or_else(|| Error::invalid_argument("increment or decrement would overflow"))?;
        self.db
            .put(key, record::encode(new.to_string().as_bytes(), timestamp))?;
        Ok(new)
    }

    /// Returns the new value in its stored textual form.
    pub(crate) fn incrbyfloat(&self, key: &[u8], delta: f64) -> Result<String> {
        if !delta.is_finite() {
            return Err(Error::invalid_argument("value is not a valid float"));
        }
        let _guard = self.lock_mgr.lock(key);
        let (old, timestamp) = match self.live(key)? {
            Some((value, timestamp)) => (
                crate::util::parse_f64(&value)
                    .ok_or_else(|| Error::corruption("value is not a valid float"))?,
                timestamp,
            ),
            None => (0.0, NO_EXPIRY),
        };
        let new = old + delta;
        if !new.is_finite() {
            return Err(Error::invalid_argument(
                "increment would produce NaN or Infinity",
            ));
        }
        let text = crate::util::format_f64(new);
        self.db.put(key, record::encode(text.as_bytes(), timestamp))?;
        Ok(text)
    }

    pub(crate) fn strlen(&self, key: &[u8]) -> Result<i64> {
        Ok(self.live(key)?.map(|(v, _)| v.len() as i64).unwrap_or(0))
    }

    pub(crate) fn getrange(&self, key: &[u8], start: i64, end: i64) -> Result<Vec<u8>> {
        let value = self.get(key)?;
        let len = value.len() as i64;
        let mut s = if start < 0 { start + len } else { start };
        let mut e = if end < 0 { end + len } else { end };
        s = s.max(0);
        e = e.min(len - 1);
        if s > e || len == 0 {
            return Ok(Vec::new());
        }
        Ok(value[s as usize..=e as usize].to_vec())
    }

    /// Overwrites bytes starting at `offset`, zero-padding any gap.
    /// Returns the resulting length.
    pub(crate) fn setrange(&self, key: &[u8], offset: i64, patch: &[u8]) -> Result<i64> {
        if offset < 0 {
            return Err(Error::invalid_argument("offset is out of range"));
        }
        let _guard = self.lock_mgr.lock(key);
        let (mut value, timestamp) = self.live(key)?.unwrap_or((Vec::new(), NO_EXPIRY));
        let needed = offset as usize + patch.len();
        if value.len() < needed {
            value.resize(needed, 0);
        }
        value[offset as usize..needed].copy_from_slice(patch);
        let len = value.len() as i64;
        self.db.put(key, record::encode(&value, timestamp))?;
        Ok(len)
    }

    pub(crate) fn bitcount(
        &self,
        key: &[u8],
        start: i64,
        end: i64,
        have_range: bool,
    ) -> Result<i64> {
        let Some((value, _)) = self.live(key)? else {
            return Ok(0);
        };
        let len = value.len() as i64;
        let (mut s, mut e) = if have_range { (start, end) } else { (0, len - 1) };
        if s < 0 {
            s += len;
        }
        if e < 0 {
            e += len;
        }
        s = s.max(0);
        e = e.min(len - 1);
        if s > e {
            return Ok(0);
        }
        Ok(value[s as usize..=e as usize]
            .iter()
            .map(|b| i64::from(b.count_ones()))
            .sum())
    }

    /// First position of `bit` within the byte range `[start, end]`
    /// (negative offsets count from the end, Redis semantics). With no
    /// explicit range and `bit == 0`, a value of all ones reports the first
    /// bit past the string.
    pub(crate) fn bitpos(
        &self,
        key: &[u8],
        bit: bool,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<i64> {
        let value = self.live(key)?.map(|(v, _)| v).unwrap_or_default();
        let len = value.len() as i64;
        let has_range = start.is_some();
        let mut s = start.unwrap_or(0);
        let mut e = end.unwrap_or(len - 1);
        if s < 0 {
            s += len;
        }
        if e < 0 {
            e += len;
        }
        s = s.max(0);
        e = e.min(len - 1);
        if s <= e {
            for byte_idx in s..=e {
                let byte = value[byte_idx as usize];
                for bit_idx in 0..8 {
                    let found = (byte >> (7 - bit_idx)) & 1 == 1;
                    if found == bit {
                        return Ok(byte_idx * 8 + bit_idx);
                    }
                }
            }
        }
        if !has_range && !bit {
            return Ok(len * 8);
        }
        Ok(-1)
    }

    pub(crate) fn getbit(&self, key: &[u8], offset: i64) -> Result<i32> {
        if offset < 0 {
            return Err(Error::invalid_argument("bit offset is not an integer or out of range"));
        }
        let Some((value, _)) = self.live(key)? else {
            return Ok(0);
        };
        let byte = (offset / 8) as usize;
        if byte >= value.len() {
            return Ok(0);
        }
        Ok(i32::from((value[byte] >> (7 - (offset % 8))) & 1))
    }

    /// Sets or clears one bit, growing the value with zero bytes as needed.
    /// Returns the previous bit.
    pub(crate) fn setbit(&self, key: &[u8], offset: i64, bit: bool) -> Result<i32> {
        if offset < 0 {
            return Err(Error::invalid_argument("bit offset is not an integer or out of range"));
        }
        let _guard = self.lock_mgr.lock(key);
        let (mut value, timestamp) = self.live(key)?.unwrap_or((Vec::new(), NO_EXPIRY));
        let byte = (offset / 8) as usize;
        if value.len() <= byte {
            value.resize(byte + 1, 0);
        }
        let shift = 7 - (offset % 8) as u32;
        let old = (value[byte] >> shift) & 1;
        if bit {
            value[byte] |= 1 << shift;
        } else {
            value[byte] &= !(1 << shift);
        }
        self.db.put(key, record::encode(&value, timestamp))?;
        Ok(i32::from(old))
    }

    /// BITOP: combines the live source values (shorter sources zero-padded)
    /// into `dest` with no expiry. Returns the destination length; an empty
    /// result deletes the destination.
    pub(crate) fn bitop(
        &self,
        op: BitOperation,
        dest: &[u8],
        sources: &[&[u8]],
    ) -> Result<i64> {
        if sources.is_empty() {
            return Err(Error::invalid_argument("BITOP requires at least one source key"));
        }
        if op == BitOperation::Not && sources.len() != 1 {
            return Err(Error::invalid_argument(
                "BITOP NOT must be called with a single source key",
            ));
        }
        let _guard = self.lock_mgr.lock(dest);
        let snapshot = self.db.snapshot();
        let mut values = Vec::with_capacity(sources.len());
        for key in sources {
            let value = match snapshot.get(key)? {
                Some(raw) => {
                    let parsed = StringValue::decode(&raw)?;
                    if parsed.is_stale() {
                        Vec::new()
                    } else {
                        parsed.value.to_vec()
                    }
                }
                None => Vec::new(),
            };
            values.push(value);
        }

        let max_len = values.iter().map(Vec::len).max().unwrap_or(0);
        let byte_at = |value: &Vec<u8>, i: usize| value.get(i).copied().unwrap_or(0);
        let mut out = vec![0u8; max_len];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = match op {
                BitOperation::Not => !byte_at(&values[0], i),
                BitOperation::And => values.iter().fold(0xff, |acc, v| acc & byte_at(v, i)),
                BitOperation::Or => values.iter().fold(0, |acc, v| acc | byte_at(v, i)),
                BitOperation::Xor => values.iter().fold(0, |acc, v| acc ^ byte_at(v, i)),
            };
        }

        if out.is_empty() {
            self.db.delete(dest)?;
            Ok(0)
        } else {
            let len = out.len() as i64;
            self.db.put(dest, record::encode_persistent(&out))?;
            Ok(len)
        }
    }

    pub(crate) fn expire(&self, key: &[u8], ttl: i64) -> Result<()> {
        let _guard = self.lock_mgr.lock(key);
        let raw = self.db.get(key)?.ok_or_else(Error::not_found)?;
        let parsed = StringValue::decode(&raw)?;
        if parsed.is_stale() {
            return Err(Error::stale());
        }
        if ttl > 0 {
            self.db.put(key, record::encode_with_ttl(parsed.value, ttl))?;
        } else {
            self.db.delete(key)?;
        }
        Ok(())
    }

    pub(crate) fn expireat(&self, key: &[u8], timestamp: i64) -> Result<()> {
        let _guard = self.lock_mgr.lock(key);
        let raw = self.db.get(key)?.ok_or_else(Error::not_found)?;
        let parsed = StringValue::decode(&raw)?;
        if parsed.is_stale() {
            return Err(Error::stale());
        }
        let deadline = timestamp.clamp(0, i64::from(u32::MAX)) as u32;
        self.db.put(key, record::encode(parsed.value, deadline))?;
        Ok(())
    }

    pub(crate) fn persist(&self, key: &[u8]) -> Result<()> {
        let _guard = self.lock_mgr.lock(key);
        let raw = self.db.get(key)?.ok_or_else(Error::not_found)?;
        let parsed = StringValue::decode(&raw)?;
        if parsed.is_stale() {
            return Err(Error::stale());
        }
        if parsed.timestamp == NO_EXPIRY {
            return Err(Error::NotFound("no associated expiry"));
        }
        self.db.put(key, record::encode_persistent(parsed.value))?;
        Ok(())
    }

    pub(crate) fn ttl(&self, key: &[u8]) -> Result<i64> {
        let raw = self.db.get(key)?.ok_or_else(Error::not_found)?;
        let parsed = StringValue::decode(&raw)?;
        if parsed.is_stale() {
            return Err(Error::stale());
        }
        Ok(time::remaining_seconds(parsed.timestamp))
    }

    pub(crate) fn del(&self, key: &[u8]) -> Result<()> {
        let _guard = self.lock_mgr.lock(key);
        let raw = self.db.get(key)?.ok_or_else(Error::not_found)?;
        let parsed = StringValue::decode(&raw)?;
        if parsed.is_stale() {
            return Err(Error::stale());
        }
        self.db.delete(key)?;
        Ok(())
    }

    pub(crate) fn scan_page(
        &self,
        start_key: &[u8],
        pattern: &Pattern,
        remaining: &mut i64,
        out: &mut Vec<Vec<u8>>,
    ) -> Result<ScanPage> {
        store::scan_keyspace_page(&self.db, start_key, pattern, remaining, out, is_live)
    }

    pub(crate) fn keys(&self, pattern: &Pattern) -> Result<Vec<Vec<u8>>> {
        store::keys_in_keyspace(&self.db, pattern, is_live)
    }

    pub(crate) fn key_count(&self) -> Result<u64> {
        store::keyspace_len(&self.db, is_live)
    }

    pub(crate) fn compact(&self) -> Result<()> {
        self.db.compact_range(None::<&[u8]>, None::<&[u8]>);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open() -> (TempDir, Strings) {
        let dir = TempDir::new().unwrap();
        let strings = Strings::open(&StoreOptions::default(), dir.path()).unwrap();
        (dir, strings)
    }

    #[test]
    fn set_get_round_trip() {
        let (_dir, db) = open();
        db.set(b"k", b"v").unwrap();
        assert_eq!(db.get(b"k").unwrap(), b"v");
        assert!(db.get(b"missing").unwrap_err().is_not_found());
    }

    #[test]
    fn setex_rejects_non_positive_ttl() {
        let (_dir, db) = open();
        assert!(matches!(
            db.setex(b"k", b"v", 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            db.setex(b"k", b"v", -1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn setnx_only_writes_once() {
        let (_dir, db) = open();
        assert!(db.setnx(b"k", b"first").unwrap());
        assert!(!db.setnx(b"k", b"second").unwrap());
        assert_eq!(db.get(b"k").unwrap(), b"first");
    }

    #[test]
    fn setvx_compare_and_set() {
        let (_dir, db) = open();
        assert_eq!(db.setvx(b"k", b"x", b"y", None).unwrap(), 0);
        db.set(b"k", b"x").unwrap();
        assert_eq!(db.setvx(b"k", b"wrong", b"y", None).unwrap(), -1);
        assert_eq!(db.setvx(b"k", b"x", b"y", None).unwrap(), 1);
        assert_eq!(db.get(b"k").unwrap(), b"y");
    }

    #[test]
    fn delvx_compare_and_delete() {
        let (_dir, db) = open();
        assert_eq!(db.delvx(b"k", b"v").unwrap(), 0);
        db.set(b"k", b"v").unwrap();
        assert_eq!(db.delvx(b"k", b"other").unwrap(), -1);
        assert_eq!(db.delvx(b"k", b"v").unwrap(), 1);
        assert!(db.get(b"k").unwrap_err().is_not_found());
    }

    #[test]
    fn msetnx_is_all_or_nothing() {
        let (_dir, db) = open();
        db.set(b"b", b"taken").unwrap();
        assert!(!db.msetnx(&[(b"a", b"1"), (b"b", b"2")]).unwrap());
        assert!(db.get(b"a").unwrap_err().is_not_found());
        assert!(db.msetnx(&[(b"a", b"1"), (b"c", b"3")]).unwrap());
        assert_eq!(db.get(b"c").unwrap(), b"3");
    }

    #[test]
    fn mget_distinguishes_missing() {
        let (_dir, db) = open();
        db.mset(&[(b"a", b"1"), (b"b", b"2")]).unwrap();
        let got = db.mget(&[b"a", b"nope", b"b"]).unwrap();
        assert_eq!(
            got,
            vec![Some(b"1".to_vec()), None, Some(b"2".to_vec())]
        );
    }

    #[test]
    fn append_concatenates_and_reports_length() {
        let (_dir, db) = open();
        assert_eq!(db.append(b"k", b"hello").unwrap(), 5);
        assert_eq!(db.append(b"k", b" world").unwrap(), 11);
        assert_eq!(db.get(b"k").unwrap(), b"hello world");
    }

    #[test]
    fn incr_family_parses_and_overflows() {
        let (_dir, db) = open();
        assert_eq!(db.incrby(b"n", 5).unwrap(), 5);
        assert_eq!(db.decrby(b"n", 2).unwrap(), 3);
        db.set(b"s", b"not a number").unwrap();
        assert!(matches!(db.incrby(b"s", 1), Err(Error::Corruption(_))));
        db.set(b"big", i64::MAX.to_string().as_bytes()).unwrap();
        assert!(matches!(
            db.incrby(b"big", 1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn incrbyfloat_formats_like_redis() {
        let (_dir, db) = open();
        assert_eq!(db.incrbyfloat(b"f", 10.5).unwrap(), "10.5");
        assert_eq!(db.incrbyfloat(b"f", 0.1).unwrap(), "10.6");
        db.set(b"s", b"abc").unwrap();
        assert!(matches!(db.incrbyfloat(b"s", 1.0), Err(Error::Corruption(_))));
    }

    #[test]
    fn strlen_zero_for_absent() {
        let (_dir, db) = open();
        assert_eq!(db.strlen(b"k").unwrap(), 0);
        db.set(b"k", b"abc").unwrap();
        assert_eq!(db.strlen(b"k").unwrap(), 3);
    }

    #[test]
    fn getrange_negative_indices() {
        let (_dir, db) = open();
        db.set(b"k", b"This is a string").unwrap();
        assert_eq!(db.getrange(b"k", 0, 3).unwrap(), b"This");
        assert_eq!(db.getrange(b"k", -3, -1).unwrap(), b"ing");
        assert_eq!(db.getrange(b"k", 0, -1).unwrap(), b"This is a string");
        assert_eq!(db.getrange(b"k", 100, 200).unwrap(), b"");
    }

    #[test]
    fn setrange_pads_with_zeros() {
        let (_dir, db) = open();
        assert_eq!(db.setrange(b"k", 5, b"hi").unwrap(), 7);
        assert_eq!(db.get(b"k").unwrap(), b"\0\0\0\0\0hi");
        assert_eq!(db.setrange(b"k", 0, b"AB").unwrap(), 7);
        assert_eq!(db.get(b"k").unwrap(), b"AB\0\0\0hi");
        assert!(matches!(
            db.setrange(b"k", -1, b"x"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn bitcount_whole_and_ranged() {
        let (_dir, db) = open();
        db.set(b"k", b"foobar").unwrap();
        assert_eq!(db.bitcount(b"k", 0, 0, false).unwrap(), 26);
        assert_eq!(db.bitcount(b"k", 0, 0, true).unwrap(), 4);
        assert_eq!(db.bitcount(b"k", 1, 1, true).unwrap(), 6);
        assert_eq!(db.bitcount(b"k", -2, -1, true).unwrap(), 7);
        assert_eq!(db.bitcount(b"missing", 0, 0, false).unwrap(), 0);
    }

    #[test]
    fn set_and_get_bits() {
        let (_dir, db) = open();
        assert_eq!(db.setbit(b"k", 7, true).unwrap(), 0);
        assert_eq!(db.get(b"k").unwrap(), b"\x01");
        assert_eq!(db.getbit(b"k", 7).unwrap(), 1);
        assert_eq!(db.getbit(b"k", 6).unwrap(), 0);
        assert_eq!(db.getbit(b"k", 1000).unwrap(), 0);
        assert_eq!(db.setbit(b"k", 7, false).unwrap(), 1);
        assert!(matches!(db.getbit(b"k", -1), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            db.setbit(b"k", -1, true),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn bitpos_follows_redis_rules() {
        let (_dir, db) = open();
        db.set(b"k", b"\xff\xf0\x00").unwrap();
        assert_eq!(db.bitpos(b"k", false, None, None).unwrap(), 12);
        assert_eq!(db.bitpos(b"k", true, None, None).unwrap(), 0);
        assert_eq!(db.bitpos(b"k", true, Some(2), None).unwrap(), -1);
        db.set(b"ones", b"\xff\xff").unwrap();
        // implicit range and bit == 0: first bit past the string
        assert_eq!(db.bitpos(b"ones", false, None, None).unwrap(), 16);
        assert_eq!(db.bitpos(b"ones", false, Some(0), None).unwrap(), -1);
        assert_eq!(db.bitpos(b"missing", false, None, None).unwrap(), 0);
        assert_eq!(db.bitpos(b"missing", true, None, None).unwrap(), -1);
    }

    #[test]
    fn bitop_combines_sources() {
        let (_dir, db) = open();
        db.set(b"a", b"\xf0\xff").unwrap();
        db.set(b"b", b"\x0f").unwrap();
        assert_eq!(db.bitop(BitOperation::And, b"d", &[b"a", b"b"]).unwrap(), 2);
        assert_eq!(db.get(b"d").unwrap(), b"\x00\x00");
        assert_eq!(db.bitop(BitOperation::Or, b"d", &[b"a", b"b"]).unwrap(), 2);
        assert_eq!(db.get(b"d").unwrap(), b"\xff\xff");
        assert_eq!(db.bitop(BitOperation::Xor, b"d", &[b"a", b"b"]).unwrap(), 2);
        assert_eq!(db.get(b"d").unwrap(), b"\xff\xff");
        assert_eq!(db.bitop(BitOperation::Not, b"d", &[b"b"]).unwrap(), 1);
        assert_eq!(db.get(b"d").unwrap(), b"\xf0");
    }

    #[test]
    fn bitop_not_requires_single_source() {
        let (_dir, db) = open();
        assert!(matches!(
            db.bitop(BitOperation::Not, b"d", &[b"a", b"b"]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn expire_and_ttl_lifecycle() {
        let (_dir, db) = open();
        db.set(b"k", b"v").unwrap();
        assert_eq!(db.ttl(b"k").unwrap(), -1);
        db.expire(b"k", 100).unwrap();
        let left = db.ttl(b"k").unwrap();
        assert!((98..=100).contains(&left));
        db.persist(b"k").unwrap();
        assert_eq!(db.ttl(b"k").unwrap(), -1);
        assert!(db.persist(b"k").unwrap_err().is_not_found());
        // non-positive ttl deletes
        db.expire(b"k", 0).unwrap();
        assert!(db.get(b"k").unwrap_err().is_not_found());
    }

    #[test]
    fn expireat_in_the_past_makes_reads_stale() {
        let (_dir, db) = open();
        db.set(b"k", b"v").unwrap();
        db.expireat(b"k", 1).unwrap();
        assert!(db.get(b"k").unwrap_err().is_stale());
        assert!(db.ttl(b"k").unwrap_err().is_stale());
        // a fresh write revives the key
        db.set(b"k", b"v2").unwrap();
        assert_eq!(db.get(b"k").unwrap(), b"v2");
    }

    #[test]
    fn del_removes_the_record() {
        let (_dir, db) = open();
        db.set(b"k", b"v").unwrap();
        db.del(b"k").unwrap();
        assert!(db.get(b"k").unwrap_err().is_not_found());
        assert!(db.del(b"k").unwrap_err().is_not_found());
    }

    #[test]
    fn keys_and_count_skip_stale() {
        let (_dir, db) = open();
        db.set(b"alpha", b"1").unwrap();
        db.set(b"beta", b"2").unwrap();
        db.expireat(b"beta", 1).unwrap();
        let keys = db.keys(&Pattern::new(b"*")).unwrap();
        assert_eq!(keys, vec![b"alpha".to_vec()]);
        assert_eq!(db.key_count().unwrap(), 1);
    }
}
