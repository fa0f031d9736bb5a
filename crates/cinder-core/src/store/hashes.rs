//! Hashes handler.
//!
//! Meta CF carries the field count; the field CF holds one record per
//! field keyed `(user_key, version, field)`. A version bump in the meta
//! orphans every field of the previous generation in O(1).

use std::path::Path;
use std::sync::Arc;

use rocksdb::{ColumnFamilyDescriptor, WriteBatch};
use tracing::info;

use crate::error::{Error, Result};
use crate::filter::{DbRef, MetaFilterFactory, MetaLayout, SubRecordFilterFactory};
use crate::format::keys::{self, SubKey};
use crate::format::meta::CollectionMeta;
use crate::lock::LockManager;
use crate::options::StoreOptions;
use crate::store::{self, cf_handle, read_meta, Db, ScanPage, META_CF};
use crate::util::Pattern;

const FIELD_CF: &str = "field";

pub(crate) struct Hashes {
    db: Arc<Db>,
    lock_mgr: LockManager,
}

impl Hashes {
    pub(crate) fn open(options: &StoreOptions, path: &Path) -> Result<Self> {
        let back = DbRef::unset();

        let mut meta_opts = options.db_options();
        meta_opts.set_compaction_filter_factory(MetaFilterFactory::new(
            MetaLayout::Collection,
            c"cinder.hashes-meta-filter",
            c"cinder.hashes-meta-filter-factory",
        ));
        let mut field_opts = options.db_options();
        field_opts.set_compaction_filter_factory(SubRecordFilterFactory::new(
            back.clone(),
            MetaLayout::Collection,
            c"cinder.hashes-field-filter",
            c"cinder.hashes-field-filter-factory",
        ));

        let db = Arc::new(Db::open_cf_descriptors(
            &options.db_options(),
            path,
            vec![
                ColumnFamilyDescriptor::new(META_CF, meta_opts),
                ColumnFamilyDescriptor::new(FIELD_CF, field_opts),
            ],
        )?);
        back.install(&db);
        info!(path = %path.display(), "opened hashes store");
        Ok(Self {
            db,
            lock_mgr: LockManager::new(),
        })
    }

    /// Returns 1 when the field was created, 0 when it was overwritten.
    pub(crate) fn hset(&self, key: &[u8], field: &[u8], value: &[u8]) -> Result<i32> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
        let mut batch = WriteBatch::default();
        match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                if meta.is_stale() {
                    let version = meta.reinitialize();
                    meta.count = 1;
                    batch.put_cf(&meta_cf, key, meta.encode());
                    batch.put_cf(&field_cf, keys::member_key(key, version, field), value);
                    self.db.write(batch)?;
                    return Ok(1);
                }
                let data_key = keys::member_key(key, meta.version, field);
                if self.db.get_cf(&field_cf, &data_key)?.is_some() {
                    self.db.put_cf(&field_cf, data_key, value)?;
                    Ok(0)
                } else {
                    meta.count += 1;
                    batch.put_cf(&meta_cf, key, meta.encode());
                    batch.put_cf(&field_cf, data_key, value);
                    self.db.write(batch)?;
                    Ok(1)
                }
            }
            None => {
                let meta = CollectionMeta::create(1);
                batch.put_cf(&meta_cf, key, meta.encode());
                batch.put_cf(&field_cf, keys::member_key(key, meta.version, field), value);
                self.db.write(batch)?;
                Ok(1)
            }
        }
    }

    pub(crate) fn hsetnx(&self, key: &[u8], field: &[u8], value: &[u8]) -> Result<bool> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
        let mut batch = WriteBatch::default();
        match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                if meta.is_stale() {
                    let version = meta.reinitialize();
                    meta.count = 1;
                    batch.put_cf(&meta_cf, key, meta.encode());
                    batch.put_cf(&field_cf, keys::member_key(key, version, field), value);
                    self.db.write(batch)?;
                    return Ok(true);
                }
                let data_key = keys::member_key(key, meta.version, field);
                if self.db.get_cf(&field_cf, &data_key)?.is_some() {
                    return Ok(false);
                }
                meta.count += 1;
                batch.put_cf(&meta_cf, key, meta.encode());
                batch.put_cf(&field_cf, data_key, value);
                self.db.write(batch)?;
                Ok(true)
            }
            None => {
                let meta = CollectionMeta::create(1);
                batch.put_cf(&meta_cf, key, meta.encode());
                batch.put_cf(&field_cf, keys::member_key(key, meta.version, field), value);
                self.db.write(batch)?;
                Ok(true)
            }
        }
    }

    pub(crate) fn hget(&self, key: &[u8], field: &[u8]) -> Result<Vec<u8>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        snapshot
            .get_cf(&field_cf, keys::member_key(key, meta.version, field))?
            .ok_or_else(Error::not_found)
    }

    pub(crate) fn hexists(&self, key: &[u8], field: &[u8]) -> Result<bool> {
        match self.hget(key, field) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn hlen(&self, key: &[u8]) -> Result<i32> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let meta: CollectionMeta = read_meta(self.db.get_cf(&meta_cf, key)?)?;
        Ok(meta.count as i32)
    }

    pub(crate) fn hstrlen(&self, key: &[u8], field: &[u8]) -> Result<i64> {
        match self.hget(key, field) {
            Ok(value) => Ok(value.len() as i64),
            Err(err) if err.is_not_found() => Ok(0),
            Err(err) => Err(err),
        }
    }

    /// Atomic multi-field set. Repeated fields keep their last value.
    pub(crate) fn hmset(&self, key: &[u8], pairs: &[(&[u8], &[u8])]) -> Result<()> {
        let mut deduped: Vec<(&[u8], &[u8])> = Vec::with_capacity(pairs.len());
        for &(field, value) in pairs {
            if let Some(slot) = deduped.iter_mut().find(|(f, _)| *f == field) {
                slot.1 = value;
            } else {
                deduped.push((field, value));
            }
        }

        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
        let mut batch = WriteBatch::default();
        match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                if meta.is_stale() {
                    let version = meta.reinitialize();
                    meta.count = deduped.len() as u32;
                    batch.put_cf(&meta_cf, key, meta.encode());
                    for &(field, value) in &deduped {
                        batch.put_cf(&field_cf, keys::member_key(key, version, field), value);
                    }
                } else {
                    let mut added = 0;
                    for &(field, value) in &deduped {
                        let data_key = keys::member_key(key, meta.version, field);
                        if self.db.get_cf(&field_cf, &data_key)?.is_none() {
                            added += 1;
                        }
                        batch.put_cf(&field_cf, data_key, value);
                    }
                    meta.count += added;
                    batch.put_cf(&meta_cf, key, meta.encode());
                }
            }
            None => {
                let meta = CollectionMeta::create(deduped.len() as u32);
                batch.put_cf(&meta_cf, key, meta.encode());
                for &(field, value) in &deduped {
                    batch.put_cf(&field_cf, keys::member_key(key, meta.version, field), value);
                }
            }
        }
        self.db.write(batch)?;
        Ok(())
    }

    /// Per-field values; `None` for fields the hash does not have. The key
    /// itself being absent or stale is an error.
    pub(crate) fn hmget(&self, key: &[u8], fields: &[&[u8]]) -> Result<Vec<Option<Vec<u8>>>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        fields
            .iter()
            .map(|&field| {
                snapshot
                    .get_cf(&field_cf, keys::member_key(key, meta.version, field))
                    .map_err(Error::from)
            })
            .collect()
    }

    pub(crate) fn hgetall(&self, key: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        let prefix = keys::prefix(key, meta.version);
        let mut pairs = Vec::new();
        for entry in snapshot.iterator_cf(
            &field_cf,
            rocksdb::IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        ) {
            let (data_key, value) = entry?;
            if !data_key.starts_with(&prefix) {
                break;
            }
            let sub = SubKey::parse(&data_key)?;
            pairs.push((sub.member().to_vec(), value.to_vec()));
        }
        Ok(pairs)
    }

    pub(crate) fn hkeys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        Ok(self.hgetall(key)?.into_iter().map(|(f, _)| f).collect())
    }

    pub(crate) fn hvals(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        Ok(self.hgetall(key)?.into_iter().map(|(_, v)| v).collect())
    }

    /// Removes fields in one batch; returns how many actually existed.
    pub(crate) fn hdel(&self, key: &[u8], fields: &[&[u8]]) -> Result<i32> {
        let mut deduped: Vec<&[u8]> = Vec::with_capacity(fields.len());
        for &field in fields {
            if !deduped.contains(&field) {
                deduped.push(field);
            }
        }

        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
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
        for &field in &deduped {
            let data_key = keys::member_key(key, meta.version, field);
            if self.db.get_cf(&field_cf, &data_key)?.is_some() {
                removed += 1;
                batch.delete_cf(&field_cf, data_key);
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

    pub(crate) fn hincrby(&self, key: &[u8], field: &[u8], delta: i64) -> Result<i64> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
        let mut batch = WriteBatch::default();
        match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                if meta.is_stale() {
                    let version = meta.reinitialize();
                    meta.count = 1;
                    batch.put_cf(&meta_cf, key, meta.encode());
                    batch.put_cf(
                        &field_cf,
                        keys::member_key(key, version, field),
                        delta.to_string(),
                    );
                    self.db.write(batch)?;
                    return Ok(delta);
                }
                let data_key = keys::member_key(key, meta.version, field);
                match self.db.get_cf(&field_cf, &data_key)? {
                    Some(value) => {
                        let old = crate::util::parse_i64(&value)
                            .ok_or_else(|| Error::corruption("hash value is not an integer"))?;
                        let new = old.checked_add(delta).ok_or_else(|| {
                            Error::invalid_argument("increment or decrement would overflow")
                        })?;
                        self.db.put_cf(&field_cf, data_key, new.to_string())?;
                        Ok(new)
                    }
                    None => {
                        meta.count += 1;
                        batch.put_cf(&meta_cf, key, meta.encode());
                        batch.put_cf(&field_cf, data_key, delta.to_string());
                        self.db.write(batch)?;
                        Ok(delta)
                    }
                }
            }
            None => {
                let meta = CollectionMeta::create(1);
                batch.put_cf(&meta_cf, key, meta.encode());
                batch.put_cf(
                    &field_cf,
                    keys::member_key(key, meta.version, field),
                    delta.to_string(),
                );
                self.db.write(batch)?;
                Ok(delta)
            }
        }
    }

    pub(crate) fn hincrbyfloat(&self, key: &[u8], field: &[u8], delta: f64) -> Result<String> {
        if !delta.is_finite() {
            return Err(Error::invalid_argument("value is not a valid float"));
        }
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
        let mut batch = WriteBatch::default();
        match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                if meta.is_stale() {
                    let version = meta.reinitialize();
                    meta.count = 1;
                    let text = crate::util::format_f64(delta);
                    batch.put_cf(&meta_cf, key, meta.encode());
                    batch.put_cf(&field_cf, keys::member_key(key, version, field), &text);
                    self.db.write(batch)?;
                    return Ok(text);
                }
                let data_key = keys::member_key(key, meta.version, field);
                match self.db.get_cf(&field_cf, &data_key)? {
                    Some(value) => {
                        let old = crate::util::parse_f64(&value)
                            .ok_or_else(|| Error::corruption("hash value is not a valid float"))?;
                        let new = old + delta;
                        if !new.is_finite() {
                            return Err(Error::invalid_argument(
                                "increment would produce NaN or Infinity",
                            ));
                        }
                        let text = crate::util::format_f64(new);
                        self.db.put_cf(&field_cf, data_key, &text)?;
                        Ok(text)
                    }
                    None => {
                        meta.count += 1;
                        let text = crate::util::format_f64(delta);
                        batch.put_cf(&meta_cf, key, meta.encode());
                        batch.put_cf(&field_cf, data_key, &text);
                        self.db.write(batch)?;
                        Ok(text)
                    }
                }
            }
            None => {
                let meta = CollectionMeta::create(1);
                let text = crate::util::format_f64(delta);
                batch.put_cf(&meta_cf, key, meta.encode());
                batch.put_cf(&field_cf, keys::member_key(key, meta.version, field), &text);
                self.db.write(batch)?;
                Ok(text)
            }
        }
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
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let field_cf = cf_handle(&self.db, FIELD_CF)?;
        self.db
            .compact_range_cf(&meta_cf, None::<&[u8]>, None::<&[u8]>);
        self.db
            .compact_range_cf(&field_cf, None::<&[u8]>, None::<&[u8]>);
        Ok(())
    }
}
