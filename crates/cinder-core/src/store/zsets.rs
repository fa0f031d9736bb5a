//! Sorted-sets handler.
//!
//! Two sub-CFs per the dual-index scheme: the data CF maps
//! `(user_key, version, member)` to the score bits for O(1) score lookup,
//! and the score CF holds `(user_key, version, score, member)` with empty
//! values under a comparator that orders scores as doubles. Every mutation
//! keeps the two column families in lockstep within one batch.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use rocksdb::{ColumnFamilyDescriptor, WriteBatch};
use tracing::info;

use crate::compare::{compare_zsets_score_keys, ZSETS_SCORE_COMPARATOR};
use crate::error::{Error, Result};
use crate::filter::{DbRef, MetaFilterFactory, MetaLayout, SubRecordFilterFactory};
use crate::format::keys::{self, SubKey};
use crate::format::meta::CollectionMeta;
use crate::lock::LockManager;
use crate::options::StoreOptions;
use crate::store::{self, cf_handle, read_meta, Db, ScanPage, META_CF};
use crate::util::Pattern;

const DATA_CF: &str = "data";
const SCORE_CF: &str = "score";

/// A member together with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMember {
    pub score: f64,
    pub member: Vec<u8>,
}

/// How ZUNIONSTORE / ZINTERSTORE combine scores of a shared member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Min,
    Max,
}

impl Aggregate {
    fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            Aggregate::Sum => a + b,
            Aggregate::Min => a.min(b),
            Aggregate::Max => a.max(b),
        }
    }
}

fn encode_score(score: f64) -> [u8; 8] {
    score.to_bits().to_le_bytes()
}

fn decode_score(raw: &[u8]) -> Result<f64> {
    let bits: [u8; 8] = raw
        .try_into()
        .map_err(|_| Error::corruption("zset data value is not a score"))?;
    Ok(f64::from_bits(u64::from_le_bytes(bits)))
}

pub(crate) struct ZSets {
    db: Arc<Db>,
    lock_mgr: LockManager,
}

impl ZSets {
    pub(crate) fn open(options: &StoreOptions, path: &Path) -> Result<Self> {
        let back = DbRef::unset();

        let mut meta_opts = options.db_options();
        meta_opts.set_compaction_filter_factory(MetaFilterFactory::new(
            MetaLayout::Collection,
            c"cinder.zsets-meta-filter",
            c"cinder.zsets-meta-filter-factory",
        ));
        let mut data_opts = options.db_options();
        data_opts.set_compaction_filter_factory(SubRecordFilterFactory::new(
            back.clone(),
            MetaLayout::Collection,
            c"cinder.zsets-data-filter",
            c"cinder.zsets-data-filter-factory",
        ));
        let mut score_opts = options.db_options();
        score_opts.set_comparator(ZSETS_SCORE_COMPARATOR, Box::new(compare_zsets_score_keys));
        score_opts.set_compaction_filter_factory(SubRecordFilterFactory::new(
            back.clone(),
            MetaLayout::Collection,
            c"cinder.zsets-score-filter",
            c"cinder.zsets-score-filter-factory",
        ));

        let db = Arc::new(Db::open_cf_descriptors(
            &options.db_options(),
            path,
            vec![
                ColumnFamilyDescriptor::new(META_CF, meta_opts),
                ColumnFamilyDescriptor::new(DATA_CF, data_opts),
                ColumnFamilyDescriptor::new(SCORE_CF, score_opts),
            ],
        )?);
        back.install(&db);
        info!(path = %path.display(), "opened zsets store");
        Ok(Self {
            db,
            lock_mgr: LockManager::new(),
        })
    }

    fn dedupe_members<'a>(members: &[(f64, &'a [u8])]) -> Result<Vec<(f64, &'a [u8])>> {
        let mut unique: Vec<(f64, &[u8])> = Vec::with_capacity(members.len());
        for &(score, member) in members {
            if score.is_nan() {
                return Err(Error::invalid_argument("score is not a number"));
            }
            if !unique.iter().any(|(_, m)| *m == member) {
                unique.push((score, member));
            }
        }
        Ok(unique)
    }

    /// Adds or updates members; returns the number newly added.
    pub(crate) fn zadd(&self, key: &[u8], members: &[(f64, &[u8])]) -> Result<i32> {
        let unique = Self::dedupe_members(members)?;
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let score_cf = cf_handle(&self.db, SCORE_CF)?;
        let mut batch = WriteBatch::default();

        match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                let fresh = meta.is_stale();
                let version = if fresh {
                    meta.reinitialize()
                } else {
                    meta.version
                };
                let mut added = 0;
                for &(score, member) in &unique {
                    let data_key = keys::member_key(key, version, member);
                    let mut is_new = true;
                    if !fresh {
                        match self.db.get_cf(&data_cf, &data_key)? {
                            Some(old_raw) => {
                                is_new = false;
                                let old_score = decode_score(&old_raw)?;
                                if old_score == score {
                                    continue;
                                }
                                batch.delete_cf(
                                    &score_cf,
                                    keys::score_key(key, version, old_score, member),
                                );
                            }
                            None => {}
                        }
                    }
                    batch.put_cf(&data_cf, data_key, encode_score(score));
                    batch.put_cf(&score_cf, keys::score_key(key, version, score, member), b"");
                    if is_new {
                        added += 1;
                    }
                }
                meta.count += added as u32;
                batch.put_cf(&meta_cf, key, meta.encode());
                self.db.write(batch)?;
                Ok(added)
            }
            None => {
                let meta = CollectionMeta::create(unique.len() as u32);
                batch.put_cf(&meta_cf, key, meta.encode());
                for &(score, member) in &unique {
                    batch.put_cf(
                        &data_cf,
                        keys::member_key(key, meta.version, member),
                        encode_score(score),
                    );
                    batch.put_cf(
                        &score_cf,
                        keys::score_key(key, meta.version, score, member),
                        b"",
                    );
                }
                self.db.write(batch)?;
                Ok(unique.len() as i32)
            }
        }
    }

    /// Adds `delta` to the member's score (creating it at `delta`); returns
    /// the resulting score.
    pub(crate) fn zincrby(&self, key: &[u8], member: &[u8], delta: f64) -> Result<f64> {
        if delta.is_nan() {
            return Err(Error::invalid_argument("score is not a number"));
        }
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let score_cf = cf_handle(&self.db, SCORE_CF)?;
        let mut batch = WriteBatch::default();

        match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                let fresh = meta.is_stale();
                let version = if fresh {
                    meta.reinitialize()
                } else {
                    meta.version
                };
                let data_key = keys::member_key(key, version, member);
                let mut new_score = delta;
                let existing = if fresh {
                    None
                } else {
                    self.db.get_cf(&data_cf, &data_key)?
                };
                match existing {
                    Some(old_raw) => {
                        let old_score = decode_score(&old_raw)?;
                        new_score = old_score + delta;
                        if new_score.is_nan() {
                            return Err(Error::invalid_argument(
                                "resulting score is not a number",
                            ));
                        }
                        batch.delete_cf(&score_cf, keys::score_key(key, version, old_score, member));
                    }
                    None => meta.count += 1,
                }
                batch.put_cf(&data_cf, data_key, encode_score(new_score));
                batch.put_cf(
                    &score_cf,
                    keys::score_key(key, version, new_score, member),
                    b"",
                );
                batch.put_cf(&meta_cf, key, meta.encode());
                self.db.write(batch)?;
                Ok(new_score)
            }
            None => {
                let meta = CollectionMeta::create(1);
                batch.put_cf(&meta_cf, key, meta.encode());
                batch.put_cf(
                    &data_cf,
                    keys::member_key(key, meta.version, member),
                    encode_score(delta),
                );
                batch.put_cf(
                    &score_cf,
                    keys::score_key(key, meta.version, delta, member),
                    b"",
                );
                self.db.write(batch)?;
                Ok(delta)
            }
        }
    }

    pub(crate) fn zscore(&self, key: &[u8], member: &[u8]) -> Result<f64> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }
        let raw = snapshot
            .get_cf(&data_cf, keys::member_key(key, meta.version, member))?
            .ok_or_else(Error::not_found)?;
        decode_score(&raw)
    }

    pub(crate) fn zcard(&self, key: &[u8]) -> Result<i32> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let meta: CollectionMeta = read_meta(self.db.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }
        Ok(meta.count as i32)
    }

    /// Entries of one live generation in ascending score order.
    fn ascending(
        &self,
        snapshot: &rocksdb::SnapshotWithThreadMode<'_, Db>,
        key: &[u8],
        version: u32,
    ) -> Result<Vec<ScoreMember>> {
        let score_cf = cf_handle(&self.db, SCORE_CF)?;
        let start = keys::score_key(key, version, f64::NEG_INFINITY, b"");
        let mut entries = Vec::new();
        for entry in snapshot.iterator_cf(
            &score_cf,
            rocksdb::IteratorMode::From(&start, rocksdb::Direction::Forward),
        ) {
            let (score_key, _) = entry?;
            let sub = match SubKey::parse(&score_key) {
                Ok(sub) => sub,
                Err(_) => break,
            };
            if sub.user_key != key || sub.version != version {
                break;
            }
            let (score, member) = sub.score_member()?;
            entries.push(ScoreMember {
                score,
                member: member.to_vec(),
            });
        }
        Ok(entries)
    }

    fn normalize_rank_range(count: i64, start: i64, stop: i64) -> Option<(i64, i64)> {
        let start = if start < 0 { count + start } else { start }.max(0);
        let stop = {
            let stop = if stop < 0 { count + stop } else { stop };
            stop.min(count - 1)
        };
        (start <= stop && start < count && stop >= 0).then_some((start, stop))
    }

    pub(crate) fn zrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<ScoreMember>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }
        let Some((start, stop)) = Self::normalize_rank_range(i64::from(meta.count), start, stop)
        else {
            return Ok(Vec::new());
        };
        let entries = self.ascending(&snapshot, key, meta.version)?;
        Ok(entries
            .into_iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .collect())
    }

    pub(crate) fn zrevrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<ScoreMember>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }
        let Some((start, stop)) = Self::normalize_rank_range(i64::from(meta.count), start, stop)
        else {
            return Ok(Vec::new());
        };

        let score_cf = cf_handle(&self.db, SCORE_CF)?;
        // one past the generation's last entry: versions order numerically
        // in this comparator, so (version + 1, -inf) is a tight upper bound
        let bound = keys::score_key(key, meta.version + 1, f64::NEG_INFINITY, b"");
        let mut collected = Vec::with_capacity((stop - start + 1) as usize);
        let mut rank = 0;
        for entry in snapshot.iterator_cf(
            &score_cf,
            rocksdb::IteratorMode::From(&bound, rocksdb::Direction::Reverse),
        ) {
            if rank > stop {
                break;
            }
            let (score_key, _) = entry?;
            let sub = match SubKey::parse(&score_key) {
                Ok(sub) => sub,
                Err(_) => break,
            };
            if sub.user_key != key || sub.version != meta.version {
                break;
            }
            if rank >= start {
                let (score, member) = sub.score_member()?;
                collected.push(ScoreMember {
                    score,
                    member: member.to_vec(),
                });
            }
            rank += 1;
        }
        Ok(collected)
    }

    pub(crate) fn zcount(
        &self,
        key: &[u8],
        min: f64,
        max: f64,
        left_close: bool,
        right_close: bool,
    ) -> Result<i32> {
        Ok(self
            .zrangebyscore(key, min, max, left_close, right_close)?
            .len() as i32)
    }

    pub(crate) fn zrangebyscore(
        &self,
        key: &[u8],
        min: f64,
        max: f64,
        left_close: bool,
        right_close: bool,
    ) -> Result<Vec<ScoreMember>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let score_cf = cf_handle(&self.db, SCORE_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }

        let start = keys::score_key(key, meta.version, min, b"");
        let mut collected = Vec::new();
        for entry in snapshot.iterator_cf(
            &score_cf,
            rocksdb::IteratorMode::From(&start, rocksdb::Direction::Forward),
        ) {
            let (score_key, _) = entry?;
            let sub = match SubKey::parse(&score_key) {
                Ok(sub) => sub,
                Err(_) => break,
            };
            if sub.user_key != key || sub.version != meta.version {
                break;
            }
            let (score, member) = sub.score_member()?;
            if score < min || (!left_close && score == min) {
                continue;
            }
            if score > max || (!right_close && score == max) {
                break;
            }
            collected.push(ScoreMember {
                score,
                member: member.to_vec(),
            });
        }
        Ok(collected)
    }

    pub(crate) fn zrevrangebyscore(
        &self,
        key: &[u8],
        min: f64,
        max: f64,
        left_close: bool,
        right_close: bool,
    ) -> Result<Vec<ScoreMember>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let score_cf = cf_handle(&self.db, SCORE_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }

        let bound = keys::score_key(key, meta.version + 1, f64::NEG_INFINITY, b"");
        let mut collected = Vec::new();
        for entry in snapshot.iterator_cf(
            &score_cf,
            rocksdb::IteratorMode::From(&bound, rocksdb::Direction::Reverse),
        ) {
            let (score_key, _) = entry?;
            let sub = match SubKey::parse(&score_key) {
                Ok(sub) => sub,
                Err(_) => break,
            };
            if sub.user_key != key || sub.version != meta.version {
                break;
            }
            let (score, member) = sub.score_member()?;
            if score > max || (!right_close && score == max) {
                continue;
            }
            if score < min || (!left_close && score == min) {
                break;
            }
            collected.push(ScoreMember {
                score,
                member: member.to_vec(),
            });
        }
        Ok(collected)
    }

    pub(crate) fn zrank(&self, key: &[u8], member: &[u8]) -> Result<i32> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }
        for (rank, entry) in self.ascending(&snapshot, key, meta.version)?.iter().enumerate() {
            if entry.member == member {
                return Ok(rank as i32);
            }
        }
        Err(Error::not_found())
    }

    pub(crate) fn zrevrank(&self, key: &[u8], member: &[u8]) -> Result<i32> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let count = {
            let meta: CollectionMeta = read_meta(self.db.get_cf(&meta_cf, key)?)?;
            meta.count as i32
        };
        let rank = self.zrank(key, member)?;
        Ok(count - 1 - rank)
    }

    /// Removes members from both column families; returns how many existed.
    pub(crate) fn zrem(&self, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        let mut unique: Vec<&[u8]> = Vec::with_capacity(members.len());
        for &member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }

        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let score_cf = cf_handle(&self.db, SCORE_CF)?;
        let raw = match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => raw,
            None => return Ok(0),
        };
        let mut meta = CollectionMeta::decode(&raw)?;
        if meta.is_stale() {
            return Ok(0);
        }

        let mut batch = WriteBatch::default();
        let mut removed = 0;
        for &member in &unique {
            let data_key = keys::member_key(key, meta.version, member);
            if let Some(old_raw) = self.db.get_cf(&data_cf, &data_key)? {
                let score = decode_score(&old_raw)?;
                batch.delete_cf(&data_cf, data_key);
                batch.delete_cf(&score_cf, keys::score_key(key, meta.version, score, member));
                removed += 1;
            }
        }
        if removed == 0 {
            return Ok(0);
        }
        meta.count -= removed as u32;
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(removed)
    }

    fn remove_entries(&self, key: &[u8], doomed: &[ScoreMember]) -> Result<i32> {
        if doomed.is_empty() {
            return Ok(0);
        }
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let score_cf = cf_handle(&self.db, SCORE_CF)?;
        let raw = self.db.get_cf(&meta_cf, key)?.ok_or_else(Error::not_found)?;
        let mut meta = CollectionMeta::decode(&raw)?;
        let mut batch = WriteBatch::default();
        for entry in doomed {
            batch.delete_cf(&data_cf, keys::member_key(key, meta.version, &entry.member));
            batch.delete_cf(
                &score_cf,
                keys::score_key(key, meta.version, entry.score, &entry.member),
            );
        }
        meta.count -= doomed.len() as u32;
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(doomed.len() as i32)
    }

    pub(crate) fn zremrangebyrank(&self, key: &[u8], start: i64, stop: i64) -> Result<i32> {
        let _guard = self.lock_mgr.lock(key);
        let doomed = match self.zrange(key, start, stop) {
            Ok(entries) => entries,
            Err(err) if err.is_not_found() => return Ok(0),
            Err(err) => return Err(err),
        };
        self.remove_entries(key, &doomed)
    }

    pub(crate) fn zremrangebyscore(
        &self,
        key: &[u8],
        min: f64,
        max: f64,
        left_close: bool,
        right_close: bool,
    ) -> Result<i32> {
        let _guard = self.lock_mgr.lock(key);
        let doomed = match self.zrangebyscore(key, min, max, left_close, right_close) {
            Ok(entries) => entries,
            Err(err) if err.is_not_found() => return Ok(0),
            Err(err) => return Err(err),
        };
        self.remove_entries(key, &doomed)
    }

    /// Members in `[min, max]` by lexicographic order on the data CF.
    /// `-` and `+` are the unbounded sentinels.
    pub(crate) fn zrangebylex(
        &self,
        key: &[u8],
        min: &[u8],
        max: &[u8],
        left_close: bool,
        right_close: bool,
    ) -> Result<Vec<Vec<u8>>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }

        let unbounded_low = min == b"-";
        let unbounded_high = max == b"+";
        let prefix = keys::prefix(key, meta.version);
        let mut members = Vec::new();
        for entry in snapshot.iterator_cf(
            &data_cf,
            rocksdb::IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        ) {
            let (data_key, _) = entry?;
            if !data_key.starts_with(&prefix) {
                break;
            }
            let member = SubKey::parse(&data_key)?.member();
            if !unbounded_low && (member < min || (!left_close && member == min)) {
                continue;
            }
            if !unbounded_high && (member > max || (!right_close && member == max)) {
                break;
            }
            members.push(member.to_vec());
        }
        Ok(members)
    }

    pub(crate) fn zlexcount(
        &self,
        key: &[u8],
        min: &[u8],
        max: &[u8],
        left_close: bool,
        right_close: bool,
    ) -> Result<i32> {
        Ok(self.zrangebylex(key, min, max, left_close, right_close)?.len() as i32)
    }

    pub(crate) fn zremrangebylex(
        &self,
        key: &[u8],
        min: &[u8],
        max: &[u8],
        left_close: bool,
        right_close: bool,
    ) -> Result<i32> {
        let _guard = self.lock_mgr.lock(key);
        let members = match self.zrangebylex(key, min, max, left_close, right_close) {
            Ok(members) => members,
            Err(err) if err.is_not_found() => return Ok(0),
            Err(err) => return Err(err),
        };
        let mut doomed = Vec::with_capacity(members.len());
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let raw = self.db.get_cf(&meta_cf, key)?.ok_or_else(Error::not_found)?;
        let meta = CollectionMeta::decode(&raw)?;
        for member in members {
            let raw = self
                .db
                .get_cf(&data_cf, keys::member_key(key, meta.version, &member))?
                .ok_or_else(Error::not_found)?;
            doomed.push(ScoreMember {
                score: decode_score(&raw)?,
                member,
            });
        }
        self.remove_entries(key, &doomed)
    }

    /// Union of the live inputs with per-input weights (default 1),
    /// written to `destination` under a fresh version. Returns the
    /// destination cardinality.
    pub(crate) fn zunionstore(
        &self,
        destination: &[u8],
        keys_in: &[&[u8]],
        weights: &[f64],
        aggregate: Aggregate,
    ) -> Result<i32> {
        if keys_in.is_empty() {
            return Err(Error::invalid_argument("ZUNIONSTORE requires at least one key"));
        }
        let _guard = self.lock_mgr.lock(destination);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let snapshot = self.db.snapshot();

        let mut combined: BTreeMap<Vec<u8>, f64> = BTreeMap::new();
        for (i, &key) in keys_in.iter().enumerate() {
            let weight = weights.get(i).copied().unwrap_or(1.0);
            let meta = match snapshot.get_cf(&meta_cf, key)? {
                Some(raw) => CollectionMeta::decode(&raw)?,
                None => continue,
            };
            if meta.is_stale() || meta.count == 0 {
                continue;
            }
            let prefix = keys::prefix(key, meta.version);
            for entry in snapshot.iterator_cf(
                &data_cf,
                rocksdb::IteratorMode::From(&prefix, rocksdb::Direction::Forward),
            ) {
                let (data_key, value) = entry?;
                if !data_key.starts_with(&prefix) {
                    break;
                }
                let member = SubKey::parse(&data_key)?.member().to_vec();
                let score = decode_score(&value)? * weight;
                combined
                    .entry(member)
                    .and_modify(|acc| *acc = aggregate.combine(*acc, score))
                    .or_insert(score);
            }
        }
        self.store_result(destination, &combined)
    }

    /// Intersection of the inputs; empty if any input is absent, stale, or
    /// empty.
    pub(crate) fn zinterstore(
        &self,
        destination: &[u8],
        keys_in: &[&[u8]],
        weights: &[f64],
        aggregate: Aggregate,
    ) -> Result<i32> {
        if keys_in.is_empty() {
            return Err(Error::invalid_argument("ZINTERSTORE requires at least one key"));
        }
        let _guard = self.lock_mgr.lock(destination);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let snapshot = self.db.snapshot();

        let mut inputs = Vec::with_capacity(keys_in.len());
        let mut all_live = true;
        for (i, &key) in keys_in.iter().enumerate() {
            let weight = weights.get(i).copied().unwrap_or(1.0);
            match snapshot.get_cf(&meta_cf, key)? {
                Some(raw) => {
                    let meta = CollectionMeta::decode(&raw)?;
                    if meta.is_stale() || meta.count == 0 {
                        all_live = false;
                        break;
                    }
                    inputs.push((key, meta.version, weight));
                }
                None => {
                    all_live = false;
                    break;
                }
            }
        }

        let mut combined: BTreeMap<Vec<u8>, f64> = BTreeMap::new();
        if all_live {
            let (first_key, first_version, first_weight) = inputs[0];
            let prefix = keys::prefix(first_key, first_version);
            'members: for entry in snapshot.iterator_cf(
                &data_cf,
                rocksdb::IteratorMode::From(&prefix, rocksdb::Direction::Forward),
            ) {
                let (data_key, value) = entry?;
                if !data_key.starts_with(&prefix) {
                    break;
                }
                let member = SubKey::parse(&data_key)?.member().to_vec();
                let mut score = decode_score(&value)? * first_weight;
                for &(other_key, other_version, other_weight) in &inputs[1..] {
                    let probe = keys::member_key(other_key, other_version, &member);
                    match snapshot.get_cf(&data_cf, probe)? {
                        Some(other_raw) => {
                            score = aggregate
                                .combine(score, decode_score(&other_raw)? * other_weight);
                        }
                        None => continue 'members,
                    }
                }
                combined.insert(member, score);
            }
        }
        self.store_result(destination, &combined)
    }

    /// Overwrites `destination` with the combined entries under a fresh
    /// version in one batch.
    fn store_result(&self, destination: &[u8], entries: &BTreeMap<Vec<u8>, f64>) -> Result<i32> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let data_cf = cf_handle(&self.db, DATA_CF)?;
        let score_cf = cf_handle(&self.db, SCORE_CF)?;
        let mut batch = WriteBatch::default();
        let version = match self.db.get_cf(&meta_cf, destination)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                let version = meta.reinitialize();
                meta.count = entries.len() as u32;
                batch.put_cf(&meta_cf, destination, meta.encode());
                version
            }
            None => {
                let meta = CollectionMeta::create(entries.len() as u32);
                batch.put_cf(&meta_cf, destination, meta.encode());
                meta.version
            }
        };
        for (member, &score) in entries {
            batch.put_cf(
                &data_cf,
                keys::member_key(destination, version, member),
                encode_score(score),
            );
            batch.put_cf(
                &score_cf,
                keys::score_key(destination, version, score, member),
                b"",
            );
        }
        self.db.write(batch)?;
        Ok(entries.len() as i32)
    }

    pub(crate) fn expire(&self, key: &[u8], ttl: i64) -> Result<()> {
        store::expire_meta::<CollectionMeta>(&self.db, &self.lock_mgr, key, ttl)
    }

    pub(crate) fn expireat(&self, key: &[u8], timestamp: i64) -> Result<()> {
        store::expireat_meta::<CollectionMeta>(&self.db, &self.lock_mgr, key, timestamp)
    }

    pub(crate) fn persist(&self, key: &[u8]) -> Result<()> {
        store::persist_meta::<CollectionMeta>(&self.db, &self.lock_mgr, key)
    }

    pub(crate) fn ttl(&self, key: &[u8]) -> Result<i64> {
        store::ttl_meta::<CollectionMeta>(&self.db, key)
    }

    pub(crate) fn del(&self, key: &[u8]) -> Result<()> {
        store::del_meta::<CollectionMeta>(&self.db, &self.lock_mgr, key)
    }

    pub(crate) fn scan_page(
        &self,
        start_key: &[u8],
        pattern: &Pattern,
        remaining: &mut i64,
        out: &mut Vec<Vec<u8>>,
    ) -> Result<ScanPage> {
        store::scan_keyspace_page(
            &self.db,
            start_key,
            pattern,
            remaining,
            out,
            store::meta_is_live::<CollectionMeta>,
        )
    }

    pub(crate) fn keys(&self, pattern: &Pattern) -> Result<Vec<Vec<u8>>> {
        store::keys_in_keyspace(&self.db, pattern, store::meta_is_live::<CollectionMeta>)
    }

    pub(crate) fn key_count(&self) -> Result<u64> {
        store::keyspace_len(&self.db, store::meta_is_live::<CollectionMeta>)
    }

    pub(crate) fn compact(&self) -> Result<()> {
        for name in [META_CF, DATA_CF, SCORE_CF] {
            let cf = cf_handle(&self.db, name)?;
            self.db.compact_range_cf(&cf, None::<&[u8]>, None::<&[u8]>);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open() -> (TempDir, ZSets) {
        let dir = TempDir::new().unwrap();
        let zsets = ZSets::open(&StoreOptions::default(), dir.path()).unwrap();
        (dir, zsets)
    }

    fn members(entries: &[ScoreMember]) -> Vec<Vec<u8>> {
        entries.iter().map(|e| e.member.clone()).collect()
    }

    /// Every data-CF member must resolve to the same score the score CF
    /// reports, and the counts must agree.
    fn assert_dual_index(db: &ZSets, key: &[u8]) {
        let entries = db.zrange(key, 0, -1).unwrap();
        assert_eq!(entries.len(), db.zcard(key).unwrap() as usize);
        for entry in &entries {
            assert_eq!(db.zscore(key, &entry.member).unwrap(), entry.score);
        }
    }

    #[test]
    fn zadd_and_zscore() {
        let (_dir, db) = open();
        assert_eq!(db.zadd(b"z", &[(1.0, b"x"), (2.0, b"y")]).unwrap(), 2);
        assert_eq!(db.zscore(b"z", b"x").unwrap(), 1.0);
        assert_eq!(db.zcard(b"z").unwrap(), 2);
        // re-adding the same pair is a no-op
        assert_eq!(db.zadd(b"z", &[(1.0, b"x")]).unwrap(), 0);
        assert_eq!(db.zcard(b"z").unwrap(), 2);
        // updating a score keeps cardinality and moves the entry
        assert_eq!(db.zadd(b"z", &[(9.0, b"x")]).unwrap(), 0);
        assert_eq!(db.zscore(b"z", b"x").unwrap(), 9.0);
        assert_eq!(members(&db.zrange(b"z", 0, -1).unwrap()), vec![b"y".to_vec(), b"x".to_vec()]);
        assert_dual_index(&db, b"z");
    }

    #[test]
    fn zadd_rejects_nan() {
        let (_dir, db) = open();
        assert!(matches!(
            db.zadd(b"z", &[(f64::NAN, b"m")]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn zincrby_creates_and_accumulates() {
        let (_dir, db) = open();
        assert_eq!(db.zincrby(b"z", b"m", 2.5).unwrap(), 2.5);
        assert_eq!(db.zincrby(b"z", b"m", -1.0).unwrap(), 1.5);
        assert_eq!(db.zcard(b"z").unwrap(), 1);
        assert_dual_index(&db, b"z");
    }

    #[test]
    fn zrange_and_zrevrange() {
        let (_dir, db) = open();
        db.zadd(b"z", &[(3.0, b"c"), (1.0, b"a"), (2.0, b"b")]).unwrap();
        assert_eq!(
            members(&db.zrange(b"z", 0, -1).unwrap()),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]
        );
        assert_eq!(
            members(&db.zrange(b"z", 1, 1).unwrap()),
            vec![b"b".to_vec()]
        );
        assert_eq!(
            members(&db.zrevrange(b"z", 0, -1).unwrap()),
            vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]
        );
        assert_eq!(
            members(&db.zrevrange(b"z", 0, 0).unwrap()),
            vec![b"c".to_vec()]
        );
        assert!(db.zrange(b"z", 5, 9).unwrap().is_empty());
    }

    #[test]
    fn equal_scores_order_by_member() {
        let (_dir, db) = open();
        db.zadd(b"z", &[(1.0, b"bb"), (1.0, b"aa"), (1.0, b"cc")]).unwrap();
        assert_eq!(
            members(&db.zrange(b"z", 0, -1).unwrap()),
            vec![b"aa".to_vec(), b"bb".to_vec(), b"cc".to_vec()]
        );
    }

    #[test]
    fn zrangebyscore_inclusivity() {
        let (_dir, db) = open();
        db.zadd(b"z", &[(1.0, b"a"), (2.0, b"b"), (3.0, b"c")]).unwrap();
        assert_eq!(
            members(&db.zrangebyscore(b"z", 1.0, 3.0, true, true).unwrap()),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]
        );
        // exclusive endpoints drop both
        assert_eq!(
            members(&db.zrangebyscore(b"z", 1.0, 3.0, false, false).unwrap()),
            vec![b"b".to_vec()]
        );
        assert_eq!(
            members(
                &db.zrangebyscore(b"z", f64::NEG_INFINITY, f64::INFINITY, true, true)
                    .unwrap()
            )
            .len(),
            3
        );
        assert_eq!(db.zcount(b"z", 2.0, 9.0, true, true).unwrap(), 2);
    }

    #[test]
    fn zrevrangebyscore_descends() {
        let (_dir, db) = open();
        db.zadd(b"z", &[(1.0, b"a"), (2.0, b"b"), (3.0, b"c")]).unwrap();
        assert_eq!(
            members(&db.zrevrangebyscore(b"z", 1.0, 3.0, true, true).unwrap()),
            vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]
        );
        assert_eq!(
            members(&db.zrevrangebyscore(b"z", 1.0, 3.0, false, true).unwrap()),
            vec![b"c".to_vec(), b"b".to_vec()]
        );
    }

    #[test]
    fn negative_scores_order_correctly() {
        let (_dir, db) = open();
        db.zadd(b"z", &[(-5.0, b"neg"), (0.0, b"zero"), (5.0, b"pos")]).unwrap();
        assert_eq!(
            members(&db.zrange(b"z", 0, -1).unwrap()),
            vec![b"neg".to_vec(), b"zero".to_vec(), b"pos".to_vec()]
        );
        assert_dual_index(&db, b"z");
    }

    #[test]
    fn zrank_and_zrevrank() {
        let (_dir, db) = open();
        db.zadd(b"z", &[(1.0, b"a"), (2.0, b"b"), (3.0, b"c")]).unwrap();
        assert_eq!(db.zrank(b"z", b"a").unwrap(), 0);
        assert_eq!(db.zrank(b"z", b"c").unwrap(), 2);
        assert_eq!(db.zrevrank(b"z", b"a").unwrap(), 2);
        assert_eq!(db.zrevrank(b"z", b"c").unwrap(), 0);
        assert!(db.zrank(b"z", b"ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn zrem_and_remrange() {
        let (_dir, db) = open();
        db.zadd(b"z", &[(1.0, b"a"), (2.0, b"b"), (3.0, b"c"), (4.0, b"d")])
            .unwrap();
        assert_eq!(db.zrem(b"z", &[b"a", b"ghost"]).unwrap(), 1);
        assert_eq!(db.zcard(b"z").unwrap(), 3);
        assert_dual_index(&db, b"z");

        assert_eq!(db.zremrangebyrank(b"z", 0, 0).unwrap(), 1);
        assert_eq!(members(&db.zrange(b"z", 0, -1).unwrap()), vec![b"c".to_vec(), b"d".to_vec()]);

        assert_eq!(db.zremrangebyscore(b"z", 4.0, 9.0, true, true).unwrap(), 1);
        assert_eq!(members(&db.zrange(b"z", 0, -1).unwrap()), vec![b"c".to_vec()]);
        assert_dual_index(&db, b"z");

        assert_eq!(db.zrem(b"missing", &[b"a"]).unwrap(), 0);
    }

    #[test]
    fn lex_family_with_sentinels() {
        let (_dir, db) = open();
        db.zadd(b"z", &[(0.0, b"a"), (0.0, b"b"), (0.0, b"c"), (0.0, b"d")])
            .unwrap();
        assert_eq!(
            db.zrangebylex(b"z", b"-", b"+", true, true).unwrap(),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]
        );
        assert_eq!(
            db.zrangebylex(b"z", b"b", b"c", true, true).unwrap(),
            vec![b"b".to_vec(), b"c".to_vec()]
        );
        assert_eq!(
            db.zrangebylex(b"z", b"b", b"d", false, false).unwrap(),
            vec![b"c".to_vec()]
        );
        assert_eq!(db.zlexcount(b"z", b"-", b"+", true, true).unwrap(), 4);
        assert_eq!(db.zremrangebylex(b"z", b"a", b"b", true, true).unwrap(), 2);
        assert_eq!(db.zcard(b"z").unwrap(), 2);
        assert_dual_index(&db, b"z");
    }

    #[test]
    fn zunionstore_with_weights() {
        let (_dir, db) = open();
        db.zadd(b"A", &[(1.0, b"x"), (2.0, b"y")]).unwrap();
        db.zadd(b"B", &[(10.0, b"y"), (20.0, b"z")]).unwrap();
        let n = db
            .zunionstore(b"D", &[b"A", b"B"], &[2.0, 3.0], Aggregate::Sum)
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(db.zscore(b"D", b"x").unwrap(), 2.0);
        assert_eq!(db.zscore(b"D", b"y").unwrap(), 34.0);
        assert_eq!(db.zscore(b"D", b"z").unwrap(), 60.0);
        assert_dual_index(&db, b"D");
    }

    #[test]
    fn zunionstore_defaults_weights_and_skips_dead_inputs() {
        let (_dir, db) = open();
        db.zadd(b"A", &[(1.0, b"x")]).unwrap();
        let n = db
            .zunionstore(b"D", &[b"A", b"missing"], &[], Aggregate::Sum)
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(db.zscore(b"D", b"x").unwrap(), 1.0);
    }

    #[test]
    fn zinterstore_aggregates() {
        let (_dir, db) = open();
        db.zadd(b"A", &[(1.0, b"x"), (2.0, b"y")]).unwrap();
        db.zadd(b"B", &[(10.0, b"y"), (20.0, b"z")]).unwrap();
        let n = db
            .zinterstore(b"D", &[b"A", b"B"], &[], Aggregate::Min)
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(db.zscore(b"D", b"y").unwrap(), 2.0);

        // any dead input empties the result
        let n = db
            .zinterstore(b"D", &[b"A", b"missing"], &[], Aggregate::Sum)
            .unwrap();
        assert_eq!(n, 0);
        assert!(db.zcard(b"D").unwrap_err().is_not_found());
    }

    #[test]
    fn expiration_and_revival() {
        let (_dir, db) = open();
        db.zadd(b"z", &[(1.0, b"m")]).unwrap();
        db.expireat(b"z", 1).unwrap();
        assert!(db.zscore(b"z", b"m").unwrap_err().is_stale());
        assert_eq!(db.zadd(b"z", &[(7.0, b"n")]).unwrap(), 1);
        assert_eq!(db.zcard(b"z").unwrap(), 1);
        assert!(db.zscore(b"z", b"m").unwrap_err().is_not_found());
        assert_eq!(db.zscore(b"z", b"n").unwrap(), 7.0);
    }
}
