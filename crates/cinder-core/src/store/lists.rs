//! Lists handler.
//!
//! Nodes live at sparse 64-bit indices in the node CF, keyed
//! `(user_key, version, index)` with the index big-endian. The meta record
//! carries `count` plus the exclusive index bounds: the first element sits
//! at `left_index + 1`, the last at `right_index - 1`, and every committed
//! batch maintains `count == right_index - left_index - 1`. Fresh lists
//! start in the middle of the index space so either end can grow.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{ColumnFamilyDescriptor, WriteBatch};
use tracing::info;

use crate::compare::{compare_lists_data_keys, LISTS_DATA_COMPARATOR};
use crate::error::{Error, Result};
use crate::filter::{DbRef, MetaFilterFactory, MetaLayout, SubRecordFilterFactory};
use crate::format::keys;
use crate::format::meta::ListMeta;
use crate::lock::LockManager;
use crate::options::StoreOptions;
use crate::store::{self, cf_handle, read_meta, Db, ScanPage, META_CF};
use crate::util::Pattern;

const NODE_CF: &str = "node";

/// Where LINSERT places the new element relative to the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

pub(crate) struct Lists {
    db: Arc<Db>,
    lock_mgr: LockManager,
}

impl Lists {
    pub(crate) fn open(options: &StoreOptions, path: &Path) -> Result<Self> {
        let back = DbRef::unset();

        let mut meta_opts = options.db_options();
        meta_opts.set_compaction_filter_factory(MetaFilterFactory::new(
            MetaLayout::List,
            c"cinder.lists-meta-filter",
            c"cinder.lists-meta-filter-factory",
        ));
        let mut node_opts = options.db_options();
        node_opts.set_comparator(LISTS_DATA_COMPARATOR, Box::new(compare_lists_data_keys));
        node_opts.set_compaction_filter_factory(SubRecordFilterFactory::new(
            back.clone(),
            MetaLayout::List,
            c"cinder.lists-node-filter",
            c"cinder.lists-node-filter-factory",
        ));

        let db = Arc::new(Db::open_cf_descriptors(
            &options.db_options(),
            path,
            vec![
                ColumnFamilyDescriptor::new(META_CF, meta_opts),
                ColumnFamilyDescriptor::new(NODE_CF, node_opts),
            ],
        )?);
        back.install(&db);
        info!(path = %path.display(), "opened lists store");
        Ok(Self {
            db,
            lock_mgr: LockManager::new(),
        })
    }

    /// Meta that exists, has not expired, and holds at least one element.
    fn occupied_meta(&self, raw: Option<Vec<u8>>) -> Result<ListMeta> {
        let meta: ListMeta = read_meta(raw)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }
        Ok(meta)
    }

    /// Signed position of a user-visible index within the index space.
    fn position(meta: &ListMeta, index: i64) -> i128 {
        if index >= 0 {
            i128::from(meta.first_index()) + i128::from(index)
        } else {
            i128::from(meta.last_index()) + 1 + i128::from(index)
        }
    }

    pub(crate) fn lpush(&self, key: &[u8], values: &[&[u8]]) -> Result<u64> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let mut batch = WriteBatch::default();

        let mut meta = match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = ListMeta::decode(&raw)?;
                if meta.is_stale() {
                    meta.reinitialize();
                }
                meta
            }
            None => ListMeta::create(),
        };
        for &value in values {
            let index = meta.left_index;
            meta.left_index -= 1;
            meta.count += 1;
            batch.put_cf(&node_cf, keys::list_node_key(key, meta.version, index), value);
        }
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(meta.count)
    }

    pub(crate) fn rpush(&self, key: &[u8], values: &[&[u8]]) -> Result<u64> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let mut batch = WriteBatch::default();

        let mut meta = match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = ListMeta::decode(&raw)?;
                if meta.is_stale() {
                    meta.reinitialize();
                }
                meta
            }
            None => ListMeta::create(),
        };
        for &value in values {
            let index = meta.right_index;
            meta.right_index += 1;
            meta.count += 1;
            batch.put_cf(&node_cf, keys::list_node_key(key, meta.version, index), value);
        }
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(meta.count)
    }

    pub(crate) fn lpushx(&self, key: &[u8], values: &[&[u8]]) -> Result<u64> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let mut meta = self.occupied_meta(self.db.get_cf(&meta_cf, key)?)?;
        let mut batch = WriteBatch::default();
        for &value in values {
            let index = meta.left_index;
            meta.left_index -= 1;
            meta.count += 1;
            batch.put_cf(&node_cf, keys::list_node_key(key, meta.version, index), value);
        }
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(meta.count)
    }

    pub(crate) fn rpushx(&self, key: &[u8], values: &[&[u8]]) -> Result<u64> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let mut meta = self.occupied_meta(self.db.get_cf(&meta_cf, key)?)?;
        let mut batch = WriteBatch::default();
        for &value in values {
            let index = meta.right_index;
            meta.right_index += 1;
            meta.count += 1;
            batch.put_cf(&node_cf, keys::list_node_key(key, meta.version, index), value);
        }
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(meta.count)
    }

    pub(crate) fn lpop(&self, key: &[u8]) -> Result<Vec<u8>> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let mut meta = self.occupied_meta(self.db.get_cf(&meta_cf, key)?)?;
        let node_key = keys::list_node_key(key, meta.version, meta.first_index());
        let value = self
            .db
            .get_cf(&node_cf, &node_key)?
            .ok_or_else(|| Error::corruption("list head missing"))?;
        let mut batch = WriteBatch::default();
        batch.delete_cf(&node_cf, node_key);
        meta.count -= 1;
        meta.left_index += 1;
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(value)
    }

    pub(crate) fn rpop(&self, key: &[u8]) -> Result<Vec<u8>> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let mut meta = self.occupied_meta(self.db.get_cf(&meta_cf, key)?)?;
        let node_key = keys::list_node_key(key, meta.version, meta.last_index());
        let value = self
            .db
            .get_cf(&node_cf, &node_key)?
            .ok_or_else(|| Error::corruption("list tail missing"))?;
        let mut batch = WriteBatch::default();
        batch.delete_cf(&node_cf, node_key);
        meta.count -= 1;
        meta.right_index -= 1;
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(value)
    }

    pub(crate) fn llen(&self, key: &[u8]) -> Result<u64> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        match self.db.get_cf(&meta_cf, key)? {
            None => Ok(0),
            Some(raw) => {
                let meta = ListMeta::decode(&raw)?;
                if meta.is_stale() {
                    Ok(0)
                } else {
                    Ok(meta.count)
                }
            }
        }
    }

    pub(crate) fn lindex(&self, key: &[u8], index: i64) -> Result<Vec<u8>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let snapshot = self.db.snapshot();
        let meta = self.occupied_meta(snapshot.get_cf(&meta_cf, key)?)?;
        let target = Self::position(&meta, index);
        if target < i128::from(meta.first_index()) || target > i128::from(meta.last_index()) {
            return Err(Error::not_found());
        }
        snapshot
            .get_cf(&node_cf, keys::list_node_key(key, meta.version, target as u64))?
            .ok_or_else(Error::not_found)
    }

    pub(crate) fn lrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let snapshot = self.db.snapshot();
        let meta = self.occupied_meta(snapshot.get_cf(&meta_cf, key)?)?;

        let first = i128::from(meta.first_index());
        let last = i128::from(meta.last_index());
        let start_pos = Self::position(&meta, start).max(first);
        let stop_pos = Self::position(&meta, stop).min(last);
        if start_pos > stop_pos {
            return Ok(Vec::new());
        }

        let mut values = Vec::with_capacity((stop_pos - start_pos + 1) as usize);
        let start_key = keys::list_node_key(key, meta.version, start_pos as u64);
        let mut cursor = start_pos;
        for entry in snapshot.iterator_cf(
            &node_cf,
            rocksdb::IteratorMode::From(&start_key, rocksdb::Direction::Forward),
        ) {
            if cursor > stop_pos {
                break;
            }
            let (_, value) = entry?;
            values.push(value.to_vec());
            cursor += 1;
        }
        Ok(values)
    }

    pub(crate) fn lset(&self, key: &[u8], index: i64, value: &[u8]) -> Result<()> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let meta = self.occupied_meta(self.db.get_cf(&meta_cf, key)?)?;
        let target = Self::position(&meta, index);
        if target <= i128::from(meta.left_index) || target >= i128::from(meta.right_index) {
            return Err(Error::corruption("index out of range"));
        }
        self.db.put_cf(
            &node_cf,
            keys::list_node_key(key, meta.version, target as u64),
            value,
        )?;
        Ok(())
    }

    /// Inserts `value` before or after the first occurrence of `pivot`,
    /// shifting whichever half of the list is shorter. Returns the new
    /// length, or -1 when the pivot is not present.
    pub(crate) fn linsert(
        &self,
        key: &[u8],
        position: InsertPosition,
        pivot: &[u8],
        value: &[u8],
    ) -> Result<i64> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let mut meta = self.occupied_meta(self.db.get_cf(&meta_cf, key)?)?;

        let first = meta.first_index();
        let last = meta.last_index();
        let mut pivot_index = None;
        {
            let start_key = keys::list_node_key(key, meta.version, first);
            let mut cursor = first;
            for entry in self.db.iterator_cf(
                &node_cf,
                rocksdb::IteratorMode::From(&start_key, rocksdb::Direction::Forward),
            ) {
                if cursor > last {
                    break;
                }
                let (_, node) = entry?;
                if node.as_ref() == pivot {
                    pivot_index = Some(cursor);
                    break;
                }
                cursor += 1;
            }
        }
        let Some(pivot_index) = pivot_index else {
            return Ok(-1);
        };

        let mut batch = WriteBatch::default();
        let mid = meta.left_index + (meta.right_index - meta.left_index) / 2;
        let target = if pivot_index <= mid {
            // rewrite the prefix one slot left; the copied range ends at the
            // slot the new element will occupy
            let target = match position {
                InsertPosition::Before => pivot_index - 1,
                InsertPosition::After => pivot_index,
            };
            let mut write_at = meta.left_index;
            let start_key = keys::list_node_key(key, meta.version, first);
            let mut cursor = first;
            for entry in self.db.iterator_cf(
                &node_cf,
                rocksdb::IteratorMode::From(&start_key, rocksdb::Direction::Forward),
            ) {
                if cursor > target {
                    break;
                }
                let (_, node) = entry?;
                batch.put_cf(&node_cf, keys::list_node_key(key, meta.version, write_at), node);
                write_at += 1;
                cursor += 1;
            }
            meta.left_index -= 1;
            target
        } else {
            // rewrite the suffix one slot right; the copied range starts at
            // the slot the new element will occupy
            let target = match position {
                InsertPosition::Before => pivot_index,
                InsertPosition::After => pivot_index + 1,
            };
            let mut write_at = target + 1;
            let start_key = keys::list_node_key(key, meta.version, target);
            let mut cursor = target;
            for entry in self.db.iterator_cf(
                &node_cf,
                rocksdb::IteratorMode::From(&start_key, rocksdb::Direction::Forward),
            ) {
                if cursor > last {
                    break;
                }
                let (_, node) = entry?;
                batch.put_cf(&node_cf, keys::list_node_key(key, meta.version, write_at), node);
                write_at += 1;
                cursor += 1;
            }
            meta.right_index += 1;
            target
        };

        meta.count += 1;
        batch.put_cf(&meta_cf, key, meta.encode());
        batch.put_cf(&node_cf, keys::list_node_key(key, meta.version, target), value);
        self.db.write(batch)?;
        Ok(meta.count as i64)
    }

    /// Removes up to `count` occurrences of `value` (forward for positive,
    /// backward for negative, all for zero), then collapses the surviving
    /// elements so the list stays contiguous, rewriting whichever side
    /// needs fewer moves.
    pub(crate) fn lrem(&self, key: &[u8], count: i64, value: &[u8]) -> Result<u64> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let raw = match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => raw,
            None => return Ok(0),
        };
        let mut meta = ListMeta::decode(&raw)?;
        if meta.is_stale() || meta.count == 0 {
            return Ok(0);
        }

        let first = meta.first_index();
        let last = meta.last_index();
        let mut targets = Vec::new();
        let mut rest = count.unsigned_abs();
        if count >= 0 {
            let start_key = keys::list_node_key(key, meta.version, first);
            let mut cursor = first;
            for entry in self.db.iterator_cf(
                &node_cf,
                rocksdb::IteratorMode::From(&start_key, rocksdb::Direction::Forward),
            ) {
                if cursor > last || (count != 0 && rest == 0) {
                    break;
                }
                let (_, node) = entry?;
                if node.as_ref() == value {
                    targets.push(cursor);
                    if count != 0 {
                        rest -= 1;
                    }
                }
                cursor += 1;
            }
        } else {
            let start_key = keys::list_node_key(key, meta.version, last);
            let mut cursor = last;
            for entry in self.db.iterator_cf(
                &node_cf,
                rocksdb::IteratorMode::From(&start_key, rocksdb::Direction::Reverse),
            ) {
                if cursor < first || rest == 0 {
                    break;
                }
                let (_, node) = entry?;
                if node.as_ref() == value {
                    targets.push(cursor);
                    rest -= 1;
                }
                cursor -= 1;
            }
        }
        if targets.is_empty() {
            return Ok(0);
        }

        let removed = targets.len() as u64;
        let (sublist_left, sublist_right) = if count >= 0 {
            (targets[0], targets[targets.len() - 1])
        } else {
            (targets[targets.len() - 1], targets[0])
        };

        let mut batch = WriteBatch::default();
        let left_part_len = sublist_right - first;
        let right_part_len = last - sublist_left;
        let mut rest = removed;
        if left_part_len <= right_part_len {
            // rewrite the head segment rightward, vacating the low indices
            let mut write_at = sublist_right;
            let start_key = keys::list_node_key(key, meta.version, sublist_right);
            let mut cursor = sublist_right;
            for entry in self.db.iterator_cf(
                &node_cf,
                rocksdb::IteratorMode::From(&start_key, rocksdb::Direction::Reverse),
            ) {
                if cursor < first {
                    break;
                }
                let (_, node) = entry?;
                if node.as_ref() == value && rest > 0 {
                    rest -= 1;
                } else {
                    batch.put_cf(&node_cf, keys::list_node_key(key, meta.version, write_at), node);
                    write_at -= 1;
                }
                cursor -= 1;
            }
            for offset in 0..removed {
                batch.delete_cf(
                    &node_cf,
                    keys::list_node_key(key, meta.version, first + offset),
                );
            }
            meta.left_index += removed;
        } else {
            // rewrite the tail segment leftward, vacating the high indices
            let mut write_at = sublist_left;
            let start_key = keys::list_node_key(key, meta.version, sublist_left);
            let mut cursor = sublist_left;
            for entry in self.db.iterator_cf(
                &node_cf,
                rocksdb::IteratorMode::From(&start_key, rocksdb::Direction::Forward),
            ) {
                if cursor > last {
                    break;
                }
                let (_, node) = entry?;
                if node.as_ref() == value && rest > 0 {
                    rest -= 1;
                } else {
                    batch.put_cf(&node_cf, keys::list_node_key(key, meta.version, write_at), node);
                    write_at += 1;
                }
                cursor += 1;
            }
            for offset in 0..removed {
                batch.delete_cf(
                    &node_cf,
                    keys::list_node_key(key, meta.version, last - offset),
                );
            }
            meta.right_index -= removed;
        }

        meta.count -= removed;
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(removed)
    }

    /// Keeps only the elements inside `[start, stop]`; an empty result
    /// re-initializes the key.
    pub(crate) fn ltrim(&self, key: &[u8], start: i64, stop: i64) -> Result<()> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let mut meta = self.occupied_meta(self.db.get_cf(&meta_cf, key)?)?;

        let first = i128::from(meta.first_index());
        let last = i128::from(meta.last_index());
        let keep_left = Self::position(&meta, start);
        let keep_right = Self::position(&meta, stop);

        let mut batch = WriteBatch::default();
        if keep_left > keep_right {
            meta.reinitialize();
            batch.put_cf(&meta_cf, key, meta.encode());
            self.db.write(batch)?;
            return Ok(());
        }
        let keep_left = keep_left.clamp(first, last) as u64;
        let keep_right = keep_right.clamp(first, last) as u64;
        let first = first as u64;
        let last = last as u64;

        for index in first..keep_left {
            batch.delete_cf(&node_cf, keys::list_node_key(key, meta.version, index));
        }
        for index in (keep_right + 1)..=last {
            batch.delete_cf(&node_cf, keys::list_node_key(key, meta.version, index));
        }
        let dropped = (keep_left - first) + (last - keep_right);
        meta.left_index += keep_left - first;
        meta.right_index -= last - keep_right;
        meta.count -= dropped;
        batch.put_cf(&meta_cf, key, meta.encode());
        self.db.write(batch)?;
        Ok(())
    }

    /// Pops the tail of `source` and pushes it onto the head of
    /// `destination` in one batch, creating the destination if needed.
    /// Rotating a list onto itself preserves its length.
    pub(crate) fn rpoplpush(&self, source: &[u8], destination: &[u8]) -> Result<Vec<u8>> {
        let _guard = self.lock_mgr.multi_lock(&[source, destination]);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        let mut batch = WriteBatch::default();

        if source == destination {
            let mut meta = self.occupied_meta(self.db.get_cf(&meta_cf, source)?)?;
            let tail_key = keys::list_node_key(source, meta.version, meta.last_index());
            let value = self
                .db
                .get_cf(&node_cf, &tail_key)?
                .ok_or_else(|| Error::corruption("list tail missing"))?;
            if meta.count == 1 {
                return Ok(value);
            }
            let head_index = meta.left_index;
            batch.delete_cf(&node_cf, tail_key);
            batch.put_cf(
                &node_cf,
                keys::list_node_key(source, meta.version, head_index),
                &value,
            );
            meta.left_index -= 1;
            meta.right_index -= 1;
            batch.put_cf(&meta_cf, source, meta.encode());
            self.db.write(batch)?;
            return Ok(value);
        }

        let mut src_meta = self.occupied_meta(self.db.get_cf(&meta_cf, source)?)?;
        let tail_key = keys::list_node_key(source, src_meta.version, src_meta.last_index());
        let value = self
            .db
            .get_cf(&node_cf, &tail_key)?
            .ok_or_else(|| Error::corruption("list tail missing"))?;
        batch.delete_cf(&node_cf, tail_key);
        src_meta.count -= 1;
        src_meta.right_index -= 1;
        batch.put_cf(&meta_cf, source, src_meta.encode());

        let mut dst_meta = match self.db.get_cf(&meta_cf, destination)? {
            Some(raw) => {
                let mut meta = ListMeta::decode(&raw)?;
                if meta.is_stale() {
                    meta.reinitialize();
                }
                meta
            }
            None => ListMeta::create(),
        };
        let head_index = dst_meta.left_index;
        batch.put_cf(
            &node_cf,
            keys::list_node_key(destination, dst_meta.version, head_index),
            &value,
        );
        dst_meta.left_index -= 1;
        dst_meta.count += 1;
        batch.put_cf(&meta_cf, destination, dst_meta.encode());

        self.db.write(batch)?;
        Ok(value)
    }

    pub(crate) fn expire(&self, key: &[u8], ttl: i64) -> Result<()> {
        store::expire_meta::<ListMeta>(&self.db, &self.lock_mgr, key, ttl)
    }

    pub(crate) fn expireat(&self, key: &[u8], timestamp: i64) -> Result<()> {
        store::expireat_meta::<ListMeta>(&self.db, &self.lock_mgr, key, timestamp)
    }

    pub(crate) fn persist(&self, key: &[u8]) -> Result<()> {
        store::persist_meta::<ListMeta>(&self.db, &self.lock_mgr, key)
    }

    pub(crate) fn ttl(&self, key: &[u8]) -> Result<i64> {
        store::ttl_meta::<ListMeta>(&self.db, key)
    }

    pub(crate) fn del(&self, key: &[u8]) -> Result<()> {
        store::del_meta::<ListMeta>(&self.db, &self.lock_mgr, key)
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
            store::meta_is_live::<ListMeta>,
        )
    }

    pub(crate) fn keys(&self, pattern: &Pattern) -> Result<Vec<Vec<u8>>> {
        store::keys_in_keyspace(&self.db, pattern, store::meta_is_live::<ListMeta>)
    }

    pub(crate) fn key_count(&self) -> Result<u64> {
        store::keyspace_len(&self.db, store::meta_is_live::<ListMeta>)
    }

    pub(crate) fn compact(&self) -> Result<()> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let node_cf = cf_handle(&self.db, NODE_CF)?;
        self.db
            .compact_range_cf(&meta_cf, None::<&[u8]>, None::<&[u8]>);
        self.db
            .compact_range_cf(&node_cf, None::<&[u8]>, None::<&[u8]>);
        Ok(())
    }

    #[cfg(test)]
    fn meta_of(&self, key: &[u8]) -> ListMeta {
        let meta_cf = cf_handle(&self.db, META_CF).unwrap();
        ListMeta::decode(&self.db.get_cf(&meta_cf, key).unwrap().unwrap()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open() -> (TempDir, Lists) {
        let dir = TempDir::new().unwrap();
        let lists = Lists::open(&StoreOptions::default(), dir.path()).unwrap();
        (dir, lists)
    }

    fn assert_count_identity(db: &Lists, key: &[u8]) {
        let meta = db.meta_of(key);
        assert_eq!(meta.count, meta.right_index - meta.left_index - 1);
    }

    fn contents(db: &Lists, key: &[u8]) -> Vec<Vec<u8>> {
        db.lrange(key, 0, -1).unwrap_or_default()
    }

    #[test]
    fn push_and_range() {
        let (_dir, db) = open();
        assert_eq!(db.lpush(b"L", &[b"a", b"b", b"c"]).unwrap(), 3);
        assert_eq!(contents(&db, b"L"), vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]);
        assert_eq!(db.rpush(b"L", &[b"x"]).unwrap(), 4);
        assert_eq!(
            contents(&db, b"L"),
            vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec(), b"x".to_vec()]
        );
        assert_eq!(db.llen(b"L").unwrap(), 4);
        assert_count_identity(&db, b"L");
    }

    #[test]
    fn pushx_requires_existing_list() {
        let (_dir, db) = open();
        assert!(db.lpushx(b"L", &[b"v"]).unwrap_err().is_not_found());
        assert!(db.rpushx(b"L", &[b"v"]).unwrap_err().is_not_found());
        db.rpush(b"L", &[b"a"]).unwrap();
        assert_eq!(db.lpushx(b"L", &[b"b"]).unwrap(), 2);
        assert_eq!(db.rpushx(b"L", &[b"c"]).unwrap(), 3);
        assert_eq!(
            contents(&db, b"L"),
            vec![b"b".to_vec(), b"a".to_vec(), b"c".to_vec()]
        );
    }

    #[test]
    fn pops_from_both_ends() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"a", b"b", b"c"]).unwrap();
        assert_eq!(db.lpop(b"L").unwrap(), b"a");
        assert_eq!(db.rpop(b"L").unwrap(), b"c");
        assert_eq!(db.llen(b"L").unwrap(), 1);
        assert_count_identity(&db, b"L");
        db.lpop(b"L").unwrap();
        assert!(db.lpop(b"L").unwrap_err().is_not_found());
        assert!(db.rpop(b"L").unwrap_err().is_not_found());
    }

    #[test]
    fn push_pop_round_trip_preserves_rest() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"a", b"b"]).unwrap();
        db.lpush(b"L", &[b"v"]).unwrap();
        assert_eq!(db.lpop(b"L").unwrap(), b"v");
        assert_eq!(contents(&db, b"L"), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn lindex_with_negative_offsets() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"a", b"b", b"c"]).unwrap();
        assert_eq!(db.lindex(b"L", 0).unwrap(), b"a");
        assert_eq!(db.lindex(b"L", 2).unwrap(), b"c");
        assert_eq!(db.lindex(b"L", -1).unwrap(), b"c");
        assert_eq!(db.lindex(b"L", -3).unwrap(), b"a");
        assert!(db.lindex(b"L", 3).unwrap_err().is_not_found());
        assert!(db.lindex(b"L", -4).unwrap_err().is_not_found());
    }

    #[test]
    fn lrange_clamps_endpoints() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"a", b"b", b"c", b"d"]).unwrap();
        assert_eq!(db.lrange(b"L", 1, 2).unwrap(), vec![b"b".to_vec(), b"c".to_vec()]);
        assert_eq!(db.lrange(b"L", -2, -1).unwrap(), vec![b"c".to_vec(), b"d".to_vec()]);
        assert_eq!(db.lrange(b"L", -100, 100).unwrap().len(), 4);
        assert!(db.lrange(b"L", 2, 1).unwrap().is_empty());
        assert!(db.lrange(b"missing", 0, -1).unwrap_err().is_not_found());
    }

    #[test]
    fn lset_bounds_are_corruption() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"a", b"b"]).unwrap();
        db.lset(b"L", 1, b"B").unwrap();
        assert_eq!(db.lindex(b"L", 1).unwrap(), b"B");
        assert!(matches!(db.lset(b"L", 2, b"x"), Err(Error::Corruption(_))));
        assert!(matches!(db.lset(b"L", -3, b"x"), Err(Error::Corruption(_))));
    }

    #[test]
    fn linsert_before_and_after() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"a", b"b", b"d"]).unwrap();
        assert_eq!(
            db.linsert(b"L", InsertPosition::Before, b"d", b"c").unwrap(),
            4
        );
        assert_eq!(
            contents(&db, b"L"),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]
        );
        assert_eq!(
            db.linsert(b"L", InsertPosition::After, b"a", b"a2").unwrap(),
            5
        );
        assert_eq!(
            contents(&db, b"L"),
            vec![
                b"a".to_vec(),
                b"a2".to_vec(),
                b"b".to_vec(),
                b"c".to_vec(),
                b"d".to_vec()
            ]
        );
        assert_eq!(
            db.linsert(b"L", InsertPosition::Before, b"ghost", b"x").unwrap(),
            -1
        );
        assert!(db
            .linsert(b"missing", InsertPosition::Before, b"a", b"x")
            .unwrap_err()
            .is_not_found());
        assert_count_identity(&db, b"L");
    }

    #[test]
    fn lrem_forward_backward_and_all() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"x", b"a", b"x", b"b", b"x"]).unwrap();
        assert_eq!(db.lrem(b"L", 1, b"x").unwrap(), 1);
        assert_eq!(
            contents(&db, b"L"),
            vec![b"a".to_vec(), b"x".to_vec(), b"b".to_vec(), b"x".to_vec()]
        );
        assert_count_identity(&db, b"L");

        assert_eq!(db.lrem(b"L", -1, b"x").unwrap(), 1);
        assert_eq!(
            contents(&db, b"L"),
            vec![b"a".to_vec(), b"x".to_vec(), b"b".to_vec()]
        );
        assert_count_identity(&db, b"L");

        db.rpush(b"L", &[b"x", b"x"]).unwrap();
        assert_eq!(db.lrem(b"L", 0, b"x").unwrap(), 3);
        assert_eq!(contents(&db, b"L"), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_count_identity(&db, b"L");

        assert_eq!(db.lrem(b"L", 0, b"ghost").unwrap(), 0);
        assert_eq!(db.lrem(b"missing", 0, b"x").unwrap(), 0);
    }

    #[test]
    fn lrem_can_empty_the_list() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"x", b"x"]).unwrap();
        assert_eq!(db.lrem(b"L", 0, b"x").unwrap(), 2);
        assert_eq!(db.llen(b"L").unwrap(), 0);
        assert_count_identity(&db, b"L");
        // the key revives cleanly
        db.rpush(b"L", &[b"y"]).unwrap();
        assert_eq!(contents(&db, b"L"), vec![b"y".to_vec()]);
    }

    #[test]
    fn ltrim_keeps_a_window() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"a", b"b", b"c", b"d", b"e"]).unwrap();
        db.ltrim(b"L", 1, -2).unwrap();
        assert_eq!(
            contents(&db, b"L"),
            vec![b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]
        );
        assert_count_identity(&db, b"L");
        // empty window re-initializes
        db.ltrim(b"L", 5, 3).unwrap();
        assert_eq!(db.llen(b"L").unwrap(), 0);
        assert!(db.lrange(b"L", 0, -1).unwrap_err().is_not_found());
    }

    #[test]
    fn rpoplpush_moves_and_rotates() {
        let (_dir, db) = open();
        db.rpush(b"src", &[b"a", b"b", b"c"]).unwrap();
        assert_eq!(db.rpoplpush(b"src", b"dst").unwrap(), b"c");
        assert_eq!(contents(&db, b"src"), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(contents(&db, b"dst"), vec![b"c".to_vec()]);
        assert_count_identity(&db, b"src");
        assert_count_identity(&db, b"dst");

        // rotation in place
        assert_eq!(db.rpoplpush(b"src", b"src").unwrap(), b"b");
        assert_eq!(contents(&db, b"src"), vec![b"b".to_vec(), b"a".to_vec()]);
        assert_count_identity(&db, b"src");

        // single-element rotation is a read
        assert_eq!(db.rpoplpush(b"dst", b"dst").unwrap(), b"c");
        assert_eq!(contents(&db, b"dst"), vec![b"c".to_vec()]);

        assert!(db.rpoplpush(b"missing", b"dst").unwrap_err().is_not_found());
    }

    #[test]
    fn expire_and_revive() {
        let (_dir, db) = open();
        db.rpush(b"L", &[b"a"]).unwrap();
        db.expireat(b"L", 1).unwrap();
        assert_eq!(db.llen(b"L").unwrap(), 0);
        assert!(db.lpop(b"L").unwrap_err().is_stale());
        // pushing to a stale list starts a fresh generation
        assert_eq!(db.rpush(b"L", &[b"z"]).unwrap(), 1);
        assert_eq!(contents(&db, b"L"), vec![b"z".to_vec()]);
    }
}
