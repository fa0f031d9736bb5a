//! The store facade.
//!
//! Owns one handler per data type — each an independent store under
//! `<root>/<type>` — and multiplexes the flat command surface over them.
//! Cross-type concerns live here: the SCAN cursor store and the key-level
//! commands that fan out to every handler.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::info;

use crate::cursor::{CursorStore, CURSOR_STORE_CAPACITY};
use crate::error::{Error, Result};
use crate::options::StoreOptions;
use crate::store::hashes::Hashes;
use crate::store::lists::{InsertPosition, Lists};
use crate::store::sets::Sets;
use crate::store::strings::{BitOperation, Strings};
use crate::store::zsets::{Aggregate, ScoreMember, ZSets};
use crate::util::Pattern;

/// The five keyspaces a user key can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Strings,
    Hashes,
    Sets,
    Lists,
    ZSets,
}

impl DataType {
    pub const ALL: [DataType; 5] = [
        DataType::Strings,
        DataType::Hashes,
        DataType::Sets,
        DataType::Lists,
        DataType::ZSets,
    ];

    /// One-byte tag used in SCAN resume markers. The tag order is the scan
    /// order.
    fn tag(self) -> u8 {
        match self {
            DataType::Strings => b'k',
            DataType::Hashes => b'h',
            DataType::Sets => b's',
            DataType::Lists => b'l',
            DataType::ZSets => b'z',
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    fn next(self) -> Option<Self> {
        match self {
            DataType::Strings => Some(DataType::Hashes),
            DataType::Hashes => Some(DataType::Sets),
            DataType::Sets => Some(DataType::Lists),
            DataType::Lists => Some(DataType::ZSets),
            DataType::ZSets => None,
        }
    }

    fn dir(self) -> &'static str {
        match self {
            DataType::Strings => "strings",
            DataType::Hashes => "hashes",
            DataType::Sets => "sets",
            DataType::Lists => "lists",
            DataType::ZSets => "zsets",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// Per-type outcome of a cross-type key command.
pub type TypeStatus = HashMap<DataType, Result<()>>;

/// A multi-data-type store: Redis-style typed commands over five
/// independent ordered keyspaces rooted at one directory.
pub struct Store {
    strings: Strings,
    hashes: Hashes,
    sets: Sets,
    lists: Lists,
    zsets: ZSets,
    cursors: CursorStore,
}

impl Store {
    /// Opens (or, with `create_if_missing`, creates) the per-type stores
    /// under `root`.
    pub fn open(options: &StoreOptions, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if options.create_if_missing {
            std::fs::create_dir_all(root)
                .map_err(|e| Error::Io(format!("cannot create {}: {e}", root.display())))?;
        }
        let store = Self {
            strings: Strings::open(options, &root.join(DataType::Strings.dir()))?,
            hashes: Hashes::open(options, &root.join(DataType::Hashes.dir()))?,
            sets: Sets::open(options, &root.join(DataType::Sets.dir()))?,
            lists: Lists::open(options, &root.join(DataType::Lists.dir()))?,
            zsets: ZSets::open(options, &root.join(DataType::ZSets.dir()))?,
            cursors: CursorStore::new(CURSOR_STORE_CAPACITY),
        };
        info!(root = %root.display(), "store open");
        Ok(store)
    }

    // --- strings ---

    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.strings.set(key, value)
    }

    pub fn setex(&self, key: &[u8], value: &[u8], ttl: i64) -> Result<()> {
        self.strings.setex(key, value, ttl)
    }

    pub fn setnx(&self, key: &[u8], value: &[u8]) -> Result<bool> {
        self.strings.setnx(key, value)
    }

    pub fn setvx(&self, key: &[u8], expected: &[u8], value: &[u8], ttl: Option<i64>) -> Result<i32> {
        self.strings.setvx(key, expected, value, ttl)
    }

    pub fn delvx(&self, key: &[u8], expected: &[u8]) -> Result<i32> {
        self.strings.delvx(key, expected)
    }

    pub fn mset(&self, pairs: &[(&[u8], &[u8])]) -> Result<()> {
        self.strings.mset(pairs)
    }

    pub fn msetnx(&self, pairs: &[(&[u8], &[u8])]) -> Result<bool> {
        self.strings.msetnx(pairs)
    }

    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.strings.get(key)
    }

    pub fn mget(&self, keys: &[&[u8]]) -> Result<Vec<Option<Vec<u8>>>> {
        self.strings.mget(keys)
    }

    pub fn append(&self, key: &[u8], suffix: &[u8]) -> Result<i64> {
        self.strings.append(key, suffix)
    }

    pub fn incrby(&self, key: &[u8], delta: i64) -> Result<i64> {
        self.strings.incrby(key, delta)
    }

    pub fn decrby(&self, key: &[u8], delta: i64) -> Result<i64> {
        self.strings.decrby(key, delta)
    }

    pub fn incrbyfloat(&self, key: &[u8], delta: f64) -> Result<String> {
        self.strings.incrbyfloat(key, delta)
    }

    pub fn strlen(&self, key: &[u8]) -> Result<i64> {
        self.strings.strlen(key)
    }

    pub fn getrange(&self, key: &[u8], start: i64, end: i64) -> Result<Vec<u8>> {
        self.strings.getrange(key, start, end)
    }

    pub fn setrange(&self, key: &[u8], offset: i64, patch: &[u8]) -> Result<i64> {
        self.strings.setrange(key, offset, patch)
    }

    pub fn bitcount(&self, key: &[u8], start: i64, end: i64, have_range: bool) -> Result<i64> {
        self.strings.bitcount(key, start, end, have_range)
    }

    pub fn bitpos(&self, key: &[u8], bit: bool, start: Option<i64>, end: Option<i64>) -> Result<i64> {
        self.strings.bitpos(key, bit, start, end)
    }

    pub fn getbit(&self, key: &[u8], offset: i64) -> Result<i32> {
        self.strings.getbit(key, offset)
    }

    pub fn setbit(&self, key: &[u8], offset: i64, bit: bool) -> Result<i32> {
        self.strings.setbit(key, offset, bit)
    }

    pub fn bitop(&self, op: BitOperation, dest: &[u8], sources: &[&[u8]]) -> Result<i64> {
        self.strings.bitop(op, dest, sources)
    }

    // --- hashes ---

    pub fn hset(&self, key: &[u8], field: &[u8], value: &[u8]) -> Result<i32> {
        self.hashes.hset(key, field, value)
    }

    pub fn hsetnx(&self, key: &[u8], field: &[u8], value: &[u8]) -> Result<bool> {
        self.hashes.hsetnx(key, field, value)
    }

    pub fn hget(&self, key: &[u8], field: &[u8]) -> Result<Vec<u8>> {
        self.hashes.hget(key, field)
    }

    pub fn hexists(&self, key: &[u8], field: &[u8]) -> Result<bool> {
        self.hashes.hexists(key, field)
    }

    pub fn hlen(&self, key: &[u8]) -> Result<i32> {
        self.hashes.hlen(key)
    }

    pub fn hstrlen(&self, key: &[u8], field: &[u8]) -> Result<i64> {
        self.hashes.hstrlen(key, field)
    }

    pub fn hmset(&self, key: &[u8], pairs: &[(&[u8], &[u8])]) -> Result<()> {
        self.hashes.hmset(key, pairs)
    }

    pub fn hmget(&self, key: &[u8], fields: &[&[u8]]) -> Result<Vec<Option<Vec<u8>>>> {
        self.hashes.hmget(key, fields)
    }

    pub fn hgetall(&self, key: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.hashes.hgetall(key)
    }

    pub fn hkeys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.hashes.hkeys(key)
    }

    pub fn hvals(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.hashes.hvals(key)
    }

    pub fn hdel(&self, key: &[u8], fields: &[&[u8]]) -> Result<i32> {
        self.hashes.hdel(key, fields)
    }

    pub fn hincrby(&self, key: &[u8], field: &[u8], delta: i64) -> Result<i64> {
        self.hashes.hincrby(key, field, delta)
    }

    pub fn hincrbyfloat(&self, key: &[u8], field: &[u8], delta: f64) -> Result<String> {
        self.hashes.hincrbyfloat(key, field, delta)
    }

    // --- sets ---

    pub fn sadd(&self, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        self.sets.sadd(key, members)
    }

    pub fn scard(&self, key: &[u8]) -> Result<i32> {
        self.sets.scard(key)
    }

    pub fn sismember(&self, key: &[u8], member: &[u8]) -> Result<bool> {
        self.sets.sismember(key, member)
    }

    pub fn smembers(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.sets.smembers(key)
    }

    pub fn srem(&self, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        self.sets.srem(key, members)
    }

    pub fn spop(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.sets.spop(key)
    }

    pub fn srandmember(&self, key: &[u8], count: i64) -> Result<Vec<Vec<u8>>> {
        self.sets.srandmember(key, count)
    }

    pub fn smove(&self, source: &[u8], destination: &[u8], member: &[u8]) -> Result<bool> {
        self.sets.smove(source, destination, member)
    }

    pub fn sdiff(&self, keys: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
        self.sets.sdiff(keys)
    }

    pub fn sdiffstore(&self, destination: &[u8], keys: &[&[u8]]) -> Result<i32> {
        self.sets.sdiffstore(destination, keys)
    }

    pub fn sinter(&self, keys: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
        self.sets.sinter(keys)
    }

    pub fn sinterstore(&self, destination: &[u8], keys: &[&[u8]]) -> Result<i32> {
        self.sets.sinterstore(destination, keys)
    }

    pub fn sunion(&self, keys: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
        self.sets.sunion(keys)
    }

    pub fn sunionstore(&self, destination: &[u8], keys: &[&[u8]]) -> Result<i32> {
        self.sets.sunionstore(destination, keys)
    }

    pub fn sscan(
        &self,
        key: &[u8],
        cursor: u64,
        pattern: &[u8],
        count: i64,
    ) -> Result<(u64, Vec<Vec<u8>>)> {
        self.sets.sscan(key, cursor, pattern, count)
    }

    // --- lists ---

    pub fn lpush(&self, key: &[u8], values: &[&[u8]]) -> Result<u64> {
        self.lists.lpush(key, values)
    }

    pub fn rpush(&self, key: &[u8], values: &[&[u8]]) -> Result<u64> {
        self.lists.rpush(key, values)
    }

    pub fn lpushx(&self, key: &[u8], values: &[&[u8]]) -> Result<u64> {
        self.lists.lpushx(key, values)
    }

    pub fn rpushx(&self, key: &[u8], values: &[&[u8]]) -> Result<u64> {
        self.lists.rpushx(key, values)
    }

    pub fn lpop(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.lists.lpop(key)
    }

    pub fn rpop(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.lists.rpop(key)
    }

    pub fn llen(&self, key: &[u8]) -> Result<u64> {
        self.lists.llen(key)
    }

    pub fn lindex(&self, key: &[u8], index: i64) -> Result<Vec<u8>> {
        self.lists.lindex(key, index)
    }

    pub fn lrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.lists.lrange(key, start, stop)
    }

    pub fn lset(&self, key: &[u8], index: i64, value: &[u8]) -> Result<()> {
        self.lists.lset(key, index, value)
    }

    pub fn linsert(
        &self,
        key: &[u8],
        position: InsertPosition,
        pivot: &[u8],
        value: &[u8],
    ) -> Result<i64> {
        self.lists.linsert(key, position, pivot, value)
    }

    pub fn lrem(&self, key: &[u8], count: i64, value: &[u8]) -> Result<u64> {
        self.lists.lrem(key, count, value)
    }

    pub fn ltrim(&self, key: &[u8], start: i64, stop: i64) -> Result<()> {
        self.lists.ltrim(key, start, stop)
    }

    pub fn rpoplpush(&self, source: &[u8], destination: &[u8]) -> Result<Vec<u8>> {
        self.lists.rpoplpush(source, destination)
    }

    // --- zsets ---

    pub fn zadd(&self, key: &[u8], members: &[(f64, &[u8])]) -> Result<i32> {
        self.zsets.zadd(key, members)
    }

    pub fn zincrby(&self, key: &[u8], member: &[u8], delta: f64) -> Result<f64> {
        self.zsets.zincrby(key, member, delta)
    }

    pub fn zscore(&self, key: &[u8], member: &[u8]) -> Result<f64> {
        self.zsets.zscore(key, member)
    }

    pub fn zcard(&self, key: &[u8]) -> Result<i32> {
        self.zsets.zcard(key)
    }

    pub fn zcount(
        &self,
        key: &[u8],
        min: f64,
        max: f64,
        left_close: bool,
        right_close: bool,
    ) -> Result<i32> {
        self.zsets.zcount(key, min, max, left_close, right_close)
    }

    pub fn zrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<ScoreMember>> {
        self.zsets.zrange(key, start, stop)
    }

    pub fn zrevrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<ScoreMember>> {
        self.zsets.zrevrange(key, start, stop)
    }

    pub fn zrangebyscore(
        &self,
        key: &[u8],
        min: f64,
        max: f64,
        left_close: bool,
        right_close: bool,
    ) -> Result<Vec<ScoreMember>> {
        self.zsets.zrangebyscore(key, min, max, left_close, right_close)
    }

    pub fn zrevrangebyscore(
        &self,
        key: &[u8],
        min: f64,
        max: f64,
        left_close: bool,
        right_close: bool,
    ) -> Result<Vec<ScoreMember>> {
        self.zsets
            .zrevrangebyscore(key, min, max, left_close, right_close)
    }

    pub fn zrangebylex(
        &self,
        key: &[u8],
        min: &[u8],
        max: &[u8],
        left_close: bool,
        right_close: bool,
    ) -> Result<Vec<Vec<u8>>> {
        self.zsets.zrangebylex(key, min, max, left_close, right_close)
    }

    pub fn zlexcount(
        &self,
        key: &[u8],
        min: &[u8],
        max: &[u8],
        left_close: bool,
        right_close: bool,
    ) -> Result<i32> {
        self.zsets.zlexcount(key, min, max, left_close, right_close)
    }

    pub fn zremrangebylex(
        &self,
        key: &[u8],
        min: &[u8],
        max: &[u8],
        left_close: bool,
        right_close: bool,
    ) -> Result<i32> {
        self.zsets
            .zremrangebylex(key, min, max, left_close, right_close)
    }

    pub fn zrank(&self, key: &[u8], member: &[u8]) -> Result<i32> {
        self.zsets.zrank(key, member)
    }

    pub fn zrevrank(&self, key: &[u8], member: &[u8]) -> Result<i32> {
        self.zsets.zrevrank(key, member)
    }

    pub fn zrem(&self, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        self.zsets.zrem(key, members)
    }

    pub fn zremrangebyrank(&self, key: &[u8], start: i64, stop: i64) -> Result<i32> {
        self.zsets.zremrangebyrank(key, start, stop)
    }

    pub fn zremrangebyscore(
        &self,
        key: &[u8],
        min: f64,
        max: f64,
        left_close: bool,
        right_close: bool,
    ) -> Result<i32> {
        self.zsets
            .zremrangebyscore(key, min, max, left_close, right_close)
    }

    pub fn zunionstore(
        &self,
        destination: &[u8],
        keys: &[&[u8]],
        weights: &[f64],
        aggregate: Aggregate,
    ) -> Result<i32> {
        self.zsets.zunionstore(destination, keys, weights, aggregate)
    }

    pub fn zinterstore(
        &self,
        destination: &[u8],
        keys: &[&[u8]],
        weights: &[f64],
        aggregate: Aggregate,
    ) -> Result<i32> {
        self.zsets.zinterstore(destination, keys, weights, aggregate)
    }

    // --- keys commands ---

    /// Applies a TTL to the key in every keyspace it lives in. Returns the
    /// number of keyspaces that accepted it (-1 if any reported a real
    /// error) plus the per-type statuses.
    pub fn expire(&self, key: &[u8], ttl: i64) -> (i32, TypeStatus) {
        self.fan_out_write(|data_type| match data_type {
            DataType::Strings => self.strings.expire(key, ttl),
            DataType::Hashes => self.hashes.expire(key, ttl),
            DataType::Sets => self.sets.expire(key, ttl),
            DataType::Lists => self.lists.expire(key, ttl),
            DataType::ZSets => self.zsets.expire(key, ttl),
        })
    }

    /// EXPIREAT across every keyspace, like [`Store::expire`].
    pub fn expireat(&self, key: &[u8], timestamp: i64) -> (i32, TypeStatus) {
        self.fan_out_write(|data_type| match data_type {
            DataType::Strings => self.strings.expireat(key, timestamp),
            DataType::Hashes => self.hashes.expireat(key, timestamp),
            DataType::Sets => self.sets.expireat(key, timestamp),
            DataType::Lists => self.lists.expireat(key, timestamp),
            DataType::ZSets => self.zsets.expireat(key, timestamp),
        })
    }

    /// PERSIST across every keyspace, like [`Store::expire`].
    pub fn persist(&self, key: &[u8]) -> (i32, TypeStatus) {
        self.fan_out_write(|data_type| match data_type {
            DataType::Strings => self.strings.persist(key),
            DataType::Hashes => self.hashes.persist(key),
            DataType::Sets => self.sets.persist(key),
            DataType::Lists => self.lists.persist(key),
            DataType::ZSets => self.zsets.persist(key),
        })
    }

    fn fan_out_write(&self, op: impl Fn(DataType) -> Result<()>) -> (i32, TypeStatus) {
        let mut ok = 0;
        let mut corrupted = false;
        let mut statuses = TypeStatus::new();
        for data_type in DataType::ALL {
            let status = op(data_type);
            match &status {
                Ok(()) => ok += 1,
                Err(err) if err.is_not_found() => {}
                Err(_) => corrupted = true,
            }
            statuses.insert(data_type, status);
        }
        (if corrupted { -1 } else { ok }, statuses)
    }

    /// Deletes each key from every keyspace. Returns the number of keys
    /// removed from at least one keyspace (-1 if any keyspace reported a
    /// real error) plus the per-type status of the last key.
    pub fn del(&self, keys: &[&[u8]]) -> (i64, TypeStatus) {
        let mut deleted = 0;
        let mut corrupted = false;
        let mut statuses = TypeStatus::new();
        for &key in keys {
            let mut any = false;
            for data_type in DataType::ALL {
                let status = match data_type {
                    DataType::Strings => self.strings.del(key),
                    DataType::Hashes => self.hashes.del(key),
                    DataType::Sets => self.sets.del(key),
                    DataType::Lists => self.lists.del(key),
                    DataType::ZSets => self.zsets.del(key),
                };
                match &status {
                    Ok(()) => any = true,
                    Err(err) if err.is_not_found() => {}
                    Err(_) => corrupted = true,
                }
                statuses.insert(data_type, status);
            }
            if any {
                deleted += 1;
            }
        }
        (if corrupted { -1 } else { deleted }, statuses)
    }

    /// Remaining TTL per keyspace: -2 when the key is absent or stale
    /// there, -1 when it has no expiry, else seconds left.
    pub fn ttl(&self, key: &[u8]) -> Result<HashMap<DataType, i64>> {
        let mut out = HashMap::new();
        for data_type in DataType::ALL {
            let ttl = match data_type {
                DataType::Strings => self.strings.ttl(key),
                DataType::Hashes => self.hashes.ttl(key),
                DataType::Sets => self.sets.ttl(key),
                DataType::Lists => self.lists.ttl(key),
                DataType::ZSets => self.zsets.ttl(key),
            };
            let seconds = match ttl {
                Ok(seconds) => seconds,
                Err(err) if err.is_not_found() => -2,
                Err(err) => return Err(err),
            };
            out.insert(data_type, seconds);
        }
        Ok(out)
    }

    /// Every live key matching the pattern, across all keyspaces in scan
    /// order. A key of several types appears once per type.
    pub fn keys(&self, pattern: &[u8]) -> Result<Vec<Vec<u8>>> {
        let compiled = Pattern::new(pattern);
        let mut out = Vec::new();
        for data_type in DataType::ALL {
            let mut chunk = match data_type {
                DataType::Strings => self.strings.keys(&compiled)?,
                DataType::Hashes => self.hashes.keys(&compiled)?,
                DataType::Sets => self.sets.keys(&compiled)?,
                DataType::Lists => self.lists.keys(&compiled)?,
                DataType::ZSets => self.zsets.keys(&compiled)?,
            };
            out.append(&mut chunk);
        }
        Ok(out)
    }

    /// Live key count per keyspace.
    pub fn key_count(&self) -> Result<HashMap<DataType, u64>> {
        let mut out = HashMap::new();
        for data_type in DataType::ALL {
            let count = match data_type {
                DataType::Strings => self.strings.key_count()?,
                DataType::Hashes => self.hashes.key_count()?,
                DataType::Sets => self.sets.key_count()?,
                DataType::Lists => self.lists.key_count()?,
                DataType::ZSets => self.zsets.key_count()?,
            };
            out.insert(data_type, count);
        }
        Ok(out)
    }

    /// Walks the keyspaces in tag order (`k → h → s → l → z`), visiting up
    /// to `count` live keys and returning those that match `pattern`. A
    /// zero return cursor means the iteration is complete; any other value
    /// resumes it on the next call. Unknown cursors restart from the top.
    pub fn scan(&self, cursor: u64, pattern: &[u8], count: i64) -> Result<(u64, Vec<Vec<u8>>)> {
        if count <= 0 {
            return Err(Error::invalid_argument("count must be positive"));
        }

        let (mut data_type, mut start_key, cursor) = match self.cursors.start_point(cursor) {
            Some(marker) if !marker.is_empty() => {
                let data_type =
                    DataType::from_tag(marker[0]).unwrap_or(DataType::Strings);
                (data_type, marker[1..].to_vec(), cursor)
            }
            // unknown, evicted, or zero cursor: restart
            _ => (DataType::Strings, Vec::new(), 0),
        };

        let compiled = Pattern::new(pattern);
        let mut keys = Vec::new();
        let mut remaining = count;
        loop {
            let page = match data_type {
                DataType::Strings => {
                    self.strings
                        .scan_page(&start_key, &compiled, &mut remaining, &mut keys)?
                }
                DataType::Hashes => {
                    self.hashes
                        .scan_page(&start_key, &compiled, &mut remaining, &mut keys)?
                }
                DataType::Sets => {
                    self.sets
                        .scan_page(&start_key, &compiled, &mut remaining, &mut keys)?
                }
                DataType::Lists => {
                    self.lists
                        .scan_page(&start_key, &compiled, &mut remaining, &mut keys)?
                }
                DataType::ZSets => {
                    self.zsets
                        .scan_page(&start_key, &compiled, &mut remaining, &mut keys)?
                }
            };

            if page.finished {
                match data_type.next() {
                    Some(next) => {
                        data_type = next;
                        start_key.clear();
                        if remaining == 0 {
                            // budget exhausted exactly at a type boundary
                            return Ok((
                                self.store_marker(cursor, count, data_type, &[]),
                                keys,
                            ));
                        }
                    }
                    None => return Ok((0, keys)),
                }
            } else {
                return Ok((
                    self.store_marker(cursor, count, data_type, &page.next_key),
                    keys,
                ));
            }
        }
    }

    fn store_marker(&self, cursor: u64, count: i64, data_type: DataType, next_key: &[u8]) -> u64 {
        let mut marker = Vec::with_capacity(1 + next_key.len());
        marker.push(data_type.tag());
        marker.extend_from_slice(next_key);
        self.cursors.store(cursor + count as u64, marker)
    }

    /// Forces a full compaction of every keyspace, running the compaction
    /// filters over all records.
    pub fn compact(&self) -> Result<()> {
        self.strings.compact()?;
        self.hashes.compact()?;
        self.sets.compact()?;
        self.lists.compact()?;
        self.zsets.compact()
    }
}
