//! Type handlers.
//!
//! One handler per Redis data type, each owning an independent store
//! instance under `<root>/<type>`. The handlers share the meta-record
//! lifecycle — TTL bookkeeping, logical delete, keyspace scans — which is
//! implemented here once over the [`Meta`] trait and instantiated per meta
//! shape.

pub(crate) mod hashes;
pub(crate) mod lists;
pub(crate) mod sets;
pub(crate) mod strings;
pub(crate) mod zsets;

use std::sync::Arc;

use rocksdb::{BoundColumnFamily, DBWithThreadMode, MultiThreaded};

use crate::error::{Error, Result};
use crate::format::meta::{CollectionMeta, ListMeta};
use crate::lock::LockManager;
use crate::time;
use crate::util::Pattern;

pub(crate) type Db = DBWithThreadMode<MultiThreaded>;

/// The meta column family is the default one in every handler's store.
pub(crate) const META_CF: &str = "default";

pub(crate) fn cf_handle<'a>(db: &'a Db, name: &'static str) -> Result<Arc<BoundColumnFamily<'a>>> {
    db.cf_handle(name)
        .ok_or_else(|| Error::corruption(format!("missing column family: {name}")))
}

/// A key together with the meta version its sub-records live under.
/// Captured once per input when a multi-key read walks several sets.
pub(crate) struct KeyVersion {
    pub key: Vec<u8>,
    pub version: u32,
}

/// Outcome of one page of the cross-type keyspace scan.
pub(crate) struct ScanPage {
    /// The handler's keyspace is exhausted under the scan snapshot.
    pub finished: bool,
    /// Where to resume when not finished.
    pub next_key: Vec<u8>,
}

/// The lifecycle surface common to both meta shapes.
pub(crate) trait Meta: Sized {
    fn decode(raw: &[u8]) -> Result<Self>;
    fn encode(&self) -> Vec<u8>;
    fn is_stale(&self) -> bool;
    fn logical_len(&self) -> u64;
    fn timestamp(&self) -> u32;
    fn set_timestamp(&mut self, timestamp: u32);
    fn reinitialize(&mut self) -> u32;
    fn expire_in(&mut self, ttl: i64);
}

impl Meta for CollectionMeta {
    fn decode(raw: &[u8]) -> Result<Self> {
        CollectionMeta::decode(raw)
    }

    fn encode(&self) -> Vec<u8> {
        CollectionMeta::encode(self)
    }

    fn is_stale(&self) -> bool {
        CollectionMeta::is_stale(self)
    }

    fn logical_len(&self) -> u64 {
        u64::from(self.count)
    }

    fn timestamp(&self) -> u32 {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: u32) {
        self.timestamp = timestamp;
    }

    fn reinitialize(&mut self) -> u32 {
        CollectionMeta::reinitialize(self)
    }

    fn expire_in(&mut self, ttl: i64) {
        CollectionMeta::expire_in(self, ttl)
    }
}

impl Meta for ListMeta {
    fn decode(raw: &[u8]) -> Result<Self> {
        ListMeta::decode(raw)
    }

    fn encode(&self) -> Vec<u8> {
        ListMeta::encode(self)
    }

    fn is_stale(&self) -> bool {
        ListMeta::is_stale(self)
    }

    fn logical_len(&self) -> u64 {
        self.count
    }

    fn timestamp(&self) -> u32 {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: u32) {
        self.timestamp = timestamp;
    }

    fn reinitialize(&mut self) -> u32 {
        ListMeta::reinitialize(self)
    }

    fn expire_in(&mut self, ttl: i64) {
        ListMeta::expire_in(self, ttl)
    }
}

/// Reads and validates a key's meta for a read path: absent and stale both
/// surface as `NotFound`, with the stale detail preserved.
pub(crate) fn read_meta<M: Meta>(raw: Option<Vec<u8>>) -> Result<M> {
    let raw = raw.ok_or_else(Error::not_found)?;
    let meta = M::decode(&raw)?;
    if meta.is_stale() {
        return Err(Error::stale());
    }
    Ok(meta)
}

/// EXPIRE: positive ttl sets the deadline; everything else is a logical
/// delete (empty payload, fresh version).
pub(crate) fn expire_meta<M: Meta>(
    db: &Db,
    lock_mgr: &LockManager,
    key: &[u8],
    ttl: i64,
) -> Result<()> {
    let _guard = lock_mgr.lock(key);
    let meta_cf = cf_handle(db, META_CF)?;
    let mut meta: M = read_meta(db.get_cf(&meta_cf, key)?)?;
    if meta.logical_len() == 0 {
        return Err(Error::not_found());
    }
    if ttl > 0 {
        meta.expire_in(ttl);
    } else {
        meta.reinitialize();
    }
    db.put_cf(&meta_cf, key, meta.encode())?;
    Ok(())
}

/// EXPIREAT: stores the absolute deadline verbatim; a past deadline makes
/// the key stale on the next read.
pub(crate) fn expireat_meta<M: Meta>(
    db: &Db,
    lock_mgr: &LockManager,
    key: &[u8],
    timestamp: i64,
) -> Result<()> {
    let _guard = lock_mgr.lock(key);
    let meta_cf = cf_handle(db, META_CF)?;
    let mut meta: M = read_meta(db.get_cf(&meta_cf, key)?)?;
    if meta.logical_len() == 0 {
        return Err(Error::not_found());
    }
    meta.set_timestamp(timestamp.clamp(0, i64::from(u32::MAX)) as u32);
    db.put_cf(&meta_cf, key, meta.encode())?;
    Ok(())
}

pub(crate) fn persist_meta<M: Meta>(db: &Db, lock_mgr: &LockManager, key: &[u8]) -> Result<()> {
    let _guard = lock_mgr.lock(key);
    let meta_cf = cf_handle(db, META_CF)?;
    let mut meta: M = read_meta(db.get_cf(&meta_cf, key)?)?;
    if meta.logical_len() == 0 {
        return Err(Error::not_found());
    }
    if meta.timestamp() == 0 {
        return Err(Error::NotFound("no associated expiry"));
    }
    meta.set_timestamp(0);
    db.put_cf(&meta_cf, key, meta.encode())?;
    Ok(())
}

/// TTL in seconds: -1 when the key has no expiry; `NotFound` when the key
/// is absent, stale, or logically empty (the facade maps that to -2).
pub(crate) fn ttl_meta<M: Meta>(db: &Db, key: &[u8]) -> Result<i64> {
    let meta_cf = cf_handle(db, META_CF)?;
    let meta: M = read_meta(db.get_cf(&meta_cf, key)?)?;
    if meta.logical_len() == 0 {
        return Err(Error::not_found());
    }
    Ok(time::remaining_seconds(meta.timestamp()))
}

/// DEL: logical delete via re-initialization. The orphaned sub-records stay
/// behind for the compaction filter.
pub(crate) fn del_meta<M: Meta>(db: &Db, lock_mgr: &LockManager, key: &[u8]) -> Result<()> {
    let _guard = lock_mgr.lock(key);
    let meta_cf = cf_handle(db, META_CF)?;
    let mut meta: M = read_meta(db.get_cf(&meta_cf, key)?)?;
    if meta.logical_len() == 0 {
        return Err(Error::not_found());
    }
    meta.reinitialize();
    db.put_cf(&meta_cf, key, meta.encode())?;
    Ok(())
}

/// Liveness predicate for the meta-typed keyspace helpers below.
pub(crate) fn meta_is_live<M: Meta>(raw: &[u8]) -> bool {
    M::decode(raw)
        .map(|m| !m.is_stale() && m.logical_len() != 0)
        .unwrap_or(false)
}

/// One page of the cross-type SCAN over a handler's meta keyspace.
///
/// Visits live keys from `start_key`, appending pattern matches to `out`
/// and decrementing `remaining` per visited key (matched or not), until the
/// budget runs out or the keyspace ends. Records that fail `is_live` are
/// skipped without charge.
pub(crate) fn scan_keyspace_page(
    db: &Db,
    start_key: &[u8],
    pattern: &Pattern,
    remaining: &mut i64,
    out: &mut Vec<Vec<u8>>,
    is_live: impl Fn(&[u8]) -> bool,
) -> Result<ScanPage> {
    let meta_cf = cf_handle(db, META_CF)?;
    let snapshot = db.snapshot();
    let mut iter = snapshot.iterator_cf(
        &meta_cf,
        rocksdb::IteratorMode::From(start_key, rocksdb::Direction::Forward),
    );

    while *remaining > 0 {
        let Some(entry) = iter.next() else {
            return Ok(ScanPage {
                finished: true,
                next_key: Vec::new(),
            });
        };
        let (key, value) = entry?;
        if !is_live(&value) {
            continue;
        }
        if pattern.matches(&key) {
            out.push(key.to_vec());
        }
        *remaining -= 1;
    }

    match iter.next() {
        Some(entry) => {
            let (key, _) = entry?;
            Ok(ScanPage {
                finished: false,
                next_key: key.to_vec(),
            })
        }
        None => Ok(ScanPage {
            finished: true,
            next_key: Vec::new(),
        }),
    }
}

/// KEYS: every live key matching the pattern.
pub(crate) fn keys_in_keyspace(
    db: &Db,
    pattern: &Pattern,
    is_live: impl Fn(&[u8]) -> bool,
) -> Result<Vec<Vec<u8>>> {
    let meta_cf = cf_handle(db, META_CF)?;
    let snapshot = db.snapshot();
    let mut keys = Vec::new();
    for entry in snapshot.iterator_cf(&meta_cf, rocksdb::IteratorMode::Start) {
        let (key, value) = entry?;
        if is_live(&value) && pattern.matches(&key) {
            keys.push(key.to_vec());
        }
    }
    Ok(keys)
}

/// Number of live keys in a handler's keyspace.
pub(crate) fn keyspace_len(db: &Db, is_live: impl Fn(&[u8]) -> bool) -> Result<u64> {
    let meta_cf = cf_handle(db, META_CF)?;
    let snapshot = db.snapshot();
    let mut count = 0;
    for entry in snapshot.iterator_cf(&meta_cf, rocksdb::IteratorMode::Start) {
        let (_, value) = entry?;
        if is_live(&value) {
            count += 1;
        }
    }
    Ok(count)
}
