//! Sets handler.
//!
//! Meta CF carries the cardinality; the member CF holds one empty-valued
//! record per member keyed `(user_key, version, member)`. Membership is a
//! point lookup; the member listing is a prefix scan in member byte order.

use std::path::Path;
use std::sync::Arc;

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;
use rocksdb::{ColumnFamilyDescriptor, WriteBatch};
use tracing::info;

use crate::cursor::{MemberCursorStore, CURSOR_STORE_CAPACITY};
use crate::error::{Error, Result};
use crate::filter::{DbRef, MetaFilterFactory, MetaLayout, SubRecordFilterFactory};
use crate::format::keys::{self, SubKey};
use crate::format::meta::CollectionMeta;
use crate::lock::LockManager;
use crate::options::StoreOptions;
use crate::store::{self, cf_handle, read_meta, Db, KeyVersion, ScanPage, META_CF};
use crate::util::Pattern;

const MEMBER_CF: &str = "member";

/// SPOP draws its victim from at most this many leading members, keeping
/// the iteration bounded on huge sets.
const SPOP_WINDOW: u32 = 50;

pub(crate) struct Sets {
    db: Arc<Db>,
    lock_mgr: LockManager,
    sscan_cursors: MemberCursorStore,
}

impl Sets {
    pub(crate) fn open(options: &StoreOptions, path: &Path) -> Result<Self> {
        let back = DbRef::unset();

        let mut meta_opts = options.db_options();
        meta_opts.set_compaction_filter_factory(MetaFilterFactory::new(
            MetaLayout::Collection,
            c"cinder.sets-meta-filter",
            c"cinder.sets-meta-filter-factory",
        ));
        let mut member_opts = options.db_options();
        member_opts.set_compaction_filter_factory(SubRecordFilterFactory::new(
            back.clone(),
            MetaLayout::Collection,
            c"cinder.sets-member-filter",
            c"cinder.sets-member-filter-factory",
        ));

        let db = Arc::new(Db::open_cf_descriptors(
            &options.db_options(),
            path,
            vec![
                ColumnFamilyDescriptor::new(META_CF, meta_opts),
                ColumnFamilyDescriptor::new(MEMBER_CF, member_opts),
            ],
        )?);
        back.install(&db);
        info!(path = %path.display(), "opened sets store");
        Ok(Self {
            db,
            lock_mgr: LockManager::new(),
            sscan_cursors: MemberCursorStore::new(CURSOR_STORE_CAPACITY),
        })
    }

    fn dedupe<'a>(members: &[&'a [u8]]) -> Vec<&'a [u8]> {
        let mut unique = Vec::with_capacity(members.len());
        for &member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        unique
    }

    /// Collects each input's `(key, version)` when its meta is live.
    fn live_inputs(
        &self,
        snapshot: &rocksdb::SnapshotWithThreadMode<'_, Db>,
        keys_in: &[&[u8]],
        require_nonempty: bool,
    ) -> Result<Option<Vec<KeyVersion>>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let mut live = Vec::with_capacity(keys_in.len());
        for &key in keys_in {
            match snapshot.get_cf(&meta_cf, key)? {
                Some(raw) => {
                    let meta = CollectionMeta::decode(&raw)?;
                    if !meta.is_stale() && meta.count != 0 {
                        live.push(KeyVersion {
                            key: key.to_vec(),
                            version: meta.version,
                        });
                    } else if require_nonempty {
                        return Ok(None);
                    }
                }
                None if require_nonempty => return Ok(None),
                None => {}
            }
        }
        Ok(Some(live))
    }

    /// Members of one live generation, in member byte order.
    fn members_of(
        &self,
        snapshot: &rocksdb::SnapshotWithThreadMode<'_, Db>,
        key: &[u8],
        version: u32,
    ) -> Result<Vec<Vec<u8>>> {
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        let prefix = keys::prefix(key, version);
        let mut members = Vec::new();
        for entry in snapshot.iterator_cf(
            &member_cf,
            rocksdb::IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        ) {
            let (member_key, _) = entry?;
            if !member_key.starts_with(&prefix) {
                break;
            }
            members.push(SubKey::parse(&member_key)?.member().to_vec());
        }
        Ok(members)
    }

    /// Inserts the members that are absent; returns how many were added.
    pub(crate) fn sadd(&self, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        let unique = Self::dedupe(members);
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        let mut batch = WriteBatch::default();
        match self.db.get_cf(&meta_cf, key)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                if meta.is_stale() {
                    let version = meta.reinitialize();
                    meta.count = unique.len() as u32;
                    batch.put_cf(&meta_cf, key, meta.encode());
                    for &member in &unique {
                        batch.put_cf(&member_cf, keys::member_key(key, version, member), b"");
                    }
                    self.db.write(batch)?;
                    return Ok(unique.len() as i32);
                }
                let mut added = 0;
                for &member in &unique {
                    let member_key = keys::member_key(key, meta.version, member);
                    if self.db.get_cf(&member_cf, &member_key)?.is_none() {
                        added += 1;
                        batch.put_cf(&member_cf, member_key, b"");
                    }
                }
                if added == 0 {
                    return Ok(0);
                }
                meta.count += added as u32;
                batch.put_cf(&meta_cf, key, meta.encode());
                self.db.write(batch)?;
                Ok(added)
            }
            None => {
                let meta = CollectionMeta::create(unique.len() as u32);
                batch.put_cf(&meta_cf, key, meta.encode());
                for &member in &unique {
                    batch.put_cf(&member_cf, keys::member_key(key, meta.version, member), b"");
                }
                self.db.write(batch)?;
                Ok(unique.len() as i32)
            }
        }
    }

    pub(crate) fn scard(&self, key: &[u8]) -> Result<i32> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let meta: CollectionMeta = read_meta(self.db.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }
        Ok(meta.count as i32)
    }

    pub(crate) fn sismember(&self, key: &[u8], member: &[u8]) -> Result<bool> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        let snapshot = self.db.snapshot();
        let meta = match snapshot.get_cf(&meta_cf, key)? {
            Some(raw) => CollectionMeta::decode(&raw)?,
            None => return Ok(false),
        };
        if meta.is_stale() {
            return Ok(false);
        }
        Ok(snapshot
            .get_cf(&member_cf, keys::member_key(key, meta.version, member))?
            .is_some())
    }

    pub(crate) fn smembers(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        self.members_of(&snapshot, key, meta.version)
    }

    /// Removes the members that exist; returns how many were removed.
    pub(crate) fn srem(&self, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        let unique = Self::dedupe(members);
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
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
            let member_key = keys::member_key(key, meta.version, member);
            if self.db.get_cf(&member_cf, &member_key)?.is_some() {
                removed += 1;
                batch.delete_cf(&member_cf, member_key);
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

    /// Removes and returns one member chosen by a uniform pseudo-random
    /// index within the leading window of the set.
    pub(crate) fn spop(&self, key: &[u8]) -> Result<Vec<u8>> {
        let _guard = self.lock_mgr.lock(key);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        let raw = self.db.get_cf(&meta_cf, key)?.ok_or_else(Error::not_found)?;
        let mut meta = CollectionMeta::decode(&raw)?;
        if meta.is_stale() {
            return Err(Error::stale());
        }
        if meta.count == 0 {
            return Err(Error::not_found());
        }

        let target = rand::thread_rng().gen_range(0..meta.count.min(SPOP_WINDOW));
        let prefix = keys::prefix(key, meta.version);
        let mut batch = WriteBatch::default();
        for (index, entry) in self
            .db
            .iterator_cf(
                &member_cf,
                rocksdb::IteratorMode::From(&prefix, rocksdb::Direction::Forward),
            )
            .enumerate()
        {
            let (member_key, _) = entry?;
            if !member_key.starts_with(&prefix) {
                break;
            }
            if index as u32 == target {
                let member = SubKey::parse(&member_key)?.member().to_vec();
                batch.delete_cf(&member_cf, member_key);
                meta.count -= 1;
                batch.put_cf(&meta_cf, key, meta.encode());
                self.db.write(batch)?;
                return Ok(member);
            }
        }
        Err(Error::corruption("set shorter than its meta count"))
    }

    /// `count >= 0`: up to `count` distinct members. `count < 0`: exactly
    /// `|count|` members, possibly repeated. The result is shuffled.
    pub(crate) fn srandmember(&self, key: &[u8], count: i64) -> Result<Vec<Vec<u8>>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Err(Error::not_found());
        }

        let size = i64::from(meta.count);
        let mut rng = rand::thread_rng();
        let mut targets: Vec<i64> = if count > 0 {
            let wanted = count.min(size) as usize;
            let mut picked = AHashSet::new();
            while picked.len() < wanted {
                picked.insert(rng.gen_range(0..size));
            }
            picked.into_iter().collect()
        } else {
            (0..-count).map(|_| rng.gen_range(0..size)).collect()
        };
        targets.sort_unstable();

        let mut members = Vec::with_capacity(targets.len());
        let prefix = keys::prefix(key, meta.version);
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        let mut next = 0;
        for (index, entry) in snapshot
            .iterator_cf(
                &member_cf,
                rocksdb::IteratorMode::From(&prefix, rocksdb::Direction::Forward),
            )
            .enumerate()
        {
            if next >= targets.len() {
                break;
            }
            let (member_key, _) = entry?;
            if !member_key.starts_with(&prefix) {
                break;
            }
            while next < targets.len() && targets[next] == index as i64 {
                members.push(SubKey::parse(&member_key)?.member().to_vec());
                next += 1;
            }
        }
        members.shuffle(&mut rng);
        Ok(members)
    }

    /// Moves `member` from `source` to `destination` atomically. Returns
    /// false when the member (or the source set) does not exist.
    pub(crate) fn smove(&self, source: &[u8], destination: &[u8], member: &[u8]) -> Result<bool> {
        let _guard = self.lock_mgr.multi_lock(&[source, destination]);
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;

        let src_raw = match self.db.get_cf(&meta_cf, source)? {
            Some(raw) => raw,
            None => return Ok(false),
        };
        let mut src_meta = CollectionMeta::decode(&src_raw)?;
        if src_meta.is_stale() {
            return Ok(false);
        }
        let src_member_key = keys::member_key(source, src_meta.version, member);
        if self.db.get_cf(&member_cf, &src_member_key)?.is_none() {
            return Ok(false);
        }
        if source == destination {
            return Ok(true);
        }

        let mut batch = WriteBatch::default();
        src_meta.count -= 1;
        batch.put_cf(&meta_cf, source, src_meta.encode());
        batch.delete_cf(&member_cf, src_member_key);

        match self.db.get_cf(&meta_cf, destination)? {
            Some(raw) => {
                let mut dst_meta = CollectionMeta::decode(&raw)?;
                if dst_meta.is_stale() {
                    let version = dst_meta.reinitialize();
                    dst_meta.count = 1;
                    batch.put_cf(&meta_cf, destination, dst_meta.encode());
                    batch.put_cf(&member_cf, keys::member_key(destination, version, member), b"");
                } else {
                    let dst_member_key = keys::member_key(destination, dst_meta.version, member);
                    if self.db.get_cf(&member_cf, &dst_member_key)?.is_none() {
                        dst_meta.count += 1;
                        batch.put_cf(&meta_cf, destination, dst_meta.encode());
                        batch.put_cf(&member_cf, dst_member_key, b"");
                    }
                }
            }
            None => {
                let dst_meta = CollectionMeta::create(1);
                batch.put_cf(&meta_cf, destination, dst_meta.encode());
                batch.put_cf(
                    &member_cf,
                    keys::member_key(destination, dst_meta.version, member),
                    b"",
                );
            }
        }
        self.db.write(batch)?;
        Ok(true)
    }

    /// Members of the first set that appear in none of the others.
    pub(crate) fn sdiff(&self, keys_in: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
        if keys_in.is_empty() {
            return Err(Error::invalid_argument("SDIFF requires at least one key"));
        }
        let snapshot = self.db.snapshot();
        self.diff_under(&snapshot, keys_in)
    }

    fn diff_under(
        &self,
        snapshot: &rocksdb::SnapshotWithThreadMode<'_, Db>,
        keys_in: &[&[u8]],
    ) -> Result<Vec<Vec<u8>>> {
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        let others = self
            .live_inputs(snapshot, &keys_in[1..], false)?
            .unwrap_or_default();

        let meta_cf = cf_handle(&self.db, META_CF)?;
        let first = match snapshot.get_cf(&meta_cf, keys_in[0])? {
            Some(raw) => {
                let meta = CollectionMeta::decode(&raw)?;
                if meta.is_stale() {
                    return Ok(Vec::new());
                }
                meta
            }
            None => return Ok(Vec::new()),
        };

        let mut result = Vec::new();
        for member in self.members_of(snapshot, keys_in[0], first.version)? {
            let mut found = false;
            for other in &others {
                let probe = keys::member_key(&other.key, other.version, &member);
                if snapshot.get_cf(&member_cf, probe)?.is_some() {
                    found = true;
                    break;
                }
            }
            if !found {
                result.push(member);
            }
        }
        Ok(result)
    }

    /// Members present in every input; empty if any input is absent,
    /// stale, or empty.
    pub(crate) fn sinter(&self, keys_in: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
        if keys_in.is_empty() {
            return Err(Error::invalid_argument("SINTER requires at least one key"));
        }
        let snapshot = self.db.snapshot();
        self.inter_under(&snapshot, keys_in)
    }

    fn inter_under(
        &self,
        snapshot: &rocksdb::SnapshotWithThreadMode<'_, Db>,
        keys_in: &[&[u8]],
    ) -> Result<Vec<Vec<u8>>> {
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        let Some(others) = self.live_inputs(snapshot, &keys_in[1..], true)? else {
            return Ok(Vec::new());
        };
        let Some(firsts) = self.live_inputs(snapshot, &keys_in[..1], true)? else {
            return Ok(Vec::new());
        };
        let first = &firsts[0];

        let mut result = Vec::new();
        'members: for member in self.members_of(snapshot, &first.key, first.version)? {
            for other in &others {
                let probe = keys::member_key(&other.key, other.version, &member);
                if snapshot.get_cf(&member_cf, probe)?.is_none() {
                    continue 'members;
                }
            }
            result.push(member);
        }
        Ok(result)
    }

    /// Distinct members across every live input, in first-seen order.
    pub(crate) fn sunion(&self, keys_in: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
        if keys_in.is_empty() {
            return Err(Error::invalid_argument("SUNION requires at least one key"));
        }
        let snapshot = self.db.snapshot();
        self.union_under(&snapshot, keys_in)
    }

    fn union_under(
        &self,
        snapshot: &rocksdb::SnapshotWithThreadMode<'_, Db>,
        keys_in: &[&[u8]],
    ) -> Result<Vec<Vec<u8>>> {
        let inputs = self
            .live_inputs(snapshot, keys_in, false)?
            .unwrap_or_default();
        let mut seen = AHashSet::new();
        let mut result = Vec::new();
        for input in &inputs {
            for member in self.members_of(snapshot, &input.key, input.version)? {
                if seen.insert(member.clone()) {
                    result.push(member);
                }
            }
        }
        Ok(result)
    }

    pub(crate) fn sdiffstore(&self, destination: &[u8], keys_in: &[&[u8]]) -> Result<i32> {
        if keys_in.is_empty() {
            return Err(Error::invalid_argument("SDIFFSTORE requires at least one key"));
        }
        let _guard = self.lock_mgr.lock(destination);
        let snapshot = self.db.snapshot();
        let members = self.diff_under(&snapshot, keys_in)?;
        self.store_result(destination, &members)
    }

    pub(crate) fn sinterstore(&self, destination: &[u8], keys_in: &[&[u8]]) -> Result<i32> {
        if keys_in.is_empty() {
            return Err(Error::invalid_argument("SINTERSTORE requires at least one key"));
        }
        let _guard = self.lock_mgr.lock(destination);
        let snapshot = self.db.snapshot();
        let members = self.inter_under(&snapshot, keys_in)?;
        self.store_result(destination, &members)
    }

    pub(crate) fn sunionstore(&self, destination: &[u8], keys_in: &[&[u8]]) -> Result<i32> {
        if keys_in.is_empty() {
            return Err(Error::invalid_argument("SUNIONSTORE requires at least one key"));
        }
        let _guard = self.lock_mgr.lock(destination);
        let snapshot = self.db.snapshot();
        let members = self.union_under(&snapshot, keys_in)?;
        self.store_result(destination, &members)
    }

    /// Overwrites `destination` with `members` under a fresh version in one
    /// batch. The previous generation's records are left for compaction.
    fn store_result(&self, destination: &[u8], members: &[Vec<u8>]) -> Result<i32> {
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        let mut batch = WriteBatch::default();
        let version = match self.db.get_cf(&meta_cf, destination)? {
            Some(raw) => {
                let mut meta = CollectionMeta::decode(&raw)?;
                let version = meta.reinitialize();
                meta.count = members.len() as u32;
                batch.put_cf(&meta_cf, destination, meta.encode());
                version
            }
            None => {
                let meta = CollectionMeta::create(members.len() as u32);
                batch.put_cf(&meta_cf, destination, meta.encode());
                meta.version
            }
        };
        for member in members {
            batch.put_cf(&member_cf, keys::member_key(destination, version, member), b"");
        }
        self.db.write(batch)?;
        Ok(members.len() as i32)
    }

    /// One page of member iteration, resumable via the handler's bounded
    /// cursor store. Unknown cursors restart from the beginning.
    pub(crate) fn sscan(
        &self,
        key: &[u8],
        cursor: u64,
        pattern: &[u8],
        count: i64,
    ) -> Result<(u64, Vec<Vec<u8>>)> {
        if count <= 0 {
            return Err(Error::invalid_argument("count must be positive"));
        }
        let meta_cf = cf_handle(&self.db, META_CF)?;
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        let snapshot = self.db.snapshot();
        let meta: CollectionMeta = read_meta(snapshot.get_cf(&meta_cf, key)?)?;
        if meta.count == 0 {
            return Ok((0, Vec::new()));
        }

        let start_member = self
            .sscan_cursors
            .start_member(key, pattern, cursor)
            .unwrap_or_default();
        let compiled = Pattern::new(pattern);
        let prefix = keys::prefix(key, meta.version);
        let mut members = Vec::new();
        let mut rest = count;
        let mut iter = snapshot.iterator_cf(
            &member_cf,
            rocksdb::IteratorMode::From(
                &keys::member_key(key, meta.version, &start_member),
                rocksdb::Direction::Forward,
            ),
        );

        let next_cursor = loop {
            let Some(entry) = iter.next() else {
                break 0;
            };
            let (member_key, _) = entry?;
            if !member_key.starts_with(&prefix) {
                break 0;
            }
            let member = SubKey::parse(&member_key)?.member().to_vec();
            if rest == 0 {
                let next_cursor = cursor + count as u64;
                self.sscan_cursors
                    .store_next_member(key, pattern, next_cursor, member);
                break next_cursor;
            }
            if compiled.matches(&member) {
                members.push(member);
            }
            rest -= 1;
        };
        Ok((next_cursor, members))
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
        let member_cf = cf_handle(&self.db, MEMBER_CF)?;
        self.db
            .compact_range_cf(&meta_cf, None::<&[u8]>, None::<&[u8]>);
        self.db
            .compact_range_cf(&member_cf, None::<&[u8]>, None::<&[u8]>);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open() -> (TempDir, Sets) {
        let dir = TempDir::new().unwrap();
        let sets = Sets::open(&StoreOptions::default(), dir.path()).unwrap();
        (dir, sets)
    }

    #[test]
    fn sadd_dedupes_and_is_idempotent() {
        let (_dir, db) = open();
        assert_eq!(db.sadd(b"s", &[b"m", b"m", b"n"]).unwrap(), 2);
        assert_eq!(db.sadd(b"s", &[b"m"]).unwrap(), 0);
        assert_eq!(db.scard(b"s").unwrap(), 2);
    }

    #[test]
    fn membership_and_listing() {
        let (_dir, db) = open();
        db.sadd(b"s", &[b"b", b"a", b"c"]).unwrap();
        assert!(db.sismember(b"s", b"a").unwrap());
        assert!(!db.sismember(b"s", b"z").unwrap());
        assert!(!db.sismember(b"missing", b"a").unwrap());
        let members = db.smembers(b"s").unwrap();
        assert_eq!(members, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn srem_counts_existing_only() {
        let (_dir, db) = open();
        db.sadd(b"s", &[b"a", b"b"]).unwrap();
        assert_eq!(db.srem(b"s", &[b"a", b"z", b"a"]).unwrap(), 1);
        assert_eq!(db.scard(b"s").unwrap(), 1);
        assert_eq!(db.srem(b"missing", &[b"a"]).unwrap(), 0);
    }

    #[test]
    fn spop_removes_a_member() {
        let (_dir, db) = open();
        db.sadd(b"s", &[b"a", b"b", b"c"]).unwrap();
        let popped = db.spop(b"s").unwrap();
        assert!([b"a".to_vec(), b"b".to_vec(), b"c".to_vec()].contains(&popped));
        assert_eq!(db.scard(b"s").unwrap(), 2);
        assert!(!db.sismember(b"s", &popped).unwrap());
        db.spop(b"s").unwrap();
        db.spop(b"s").unwrap();
        assert!(db.spop(b"s").unwrap_err().is_not_found());
    }

    #[test]
    fn srandmember_counts() {
        let (_dir, db) = open();
        db.sadd(b"s", &[b"a", b"b", b"c"]).unwrap();
        let distinct = db.srandmember(b"s", 2).unwrap();
        assert_eq!(distinct.len(), 2);
        assert_ne!(distinct[0], distinct[1]);
        let clamped = db.srandmember(b"s", 10).unwrap();
        assert_eq!(clamped.len(), 3);
        let replaced = db.srandmember(b"s", -7).unwrap();
        assert_eq!(replaced.len(), 7);
        assert!(db.srandmember(b"s", 0).unwrap().is_empty());
        // set unchanged throughout
        assert_eq!(db.scard(b"s").unwrap(), 3);
    }

    #[test]
    fn smove_between_sets() {
        let (_dir, db) = open();
        db.sadd(b"src", &[b"m", b"n"]).unwrap();
        assert!(db.smove(b"src", b"dst", b"m").unwrap());
        assert!(!db.sismember(b"src", b"m").unwrap());
        assert!(db.sismember(b"dst", b"m").unwrap());
        assert!(!db.smove(b"src", b"dst", b"ghost").unwrap());
        assert!(!db.smove(b"missing", b"dst", b"m").unwrap());
        // moving onto itself is a membership test
        assert!(db.smove(b"dst", b"dst", b"m").unwrap());
    }

    #[test]
    fn set_algebra() {
        let (_dir, db) = open();
        db.sadd(b"a", &[b"x", b"y", b"z"]).unwrap();
        db.sadd(b"b", &[b"y"]).unwrap();
        db.sadd(b"c", &[b"z", b"w"]).unwrap();

        let diff = db.sdiff(&[b"a", b"b", b"c"]).unwrap();
        assert_eq!(diff, vec![b"x".to_vec()]);

        let inter = db.sinter(&[b"a", b"c"]).unwrap();
        assert_eq!(inter, vec![b"z".to_vec()]);
        assert!(db.sinter(&[b"a", b"missing"]).unwrap().is_empty());

        let mut union = db.sunion(&[b"a", b"b", b"c"]).unwrap();
        union.sort();
        assert_eq!(
            union,
            vec![b"w".to_vec(), b"x".to_vec(), b"y".to_vec(), b"z".to_vec()]
        );
        // absent inputs are silently skipped
        let skipped = db.sunion(&[b"b", b"missing"]).unwrap();
        assert_eq!(skipped, vec![b"y".to_vec()]);
    }

    #[test]
    fn store_variants_overwrite_destination() {
        let (_dir, db) = open();
        db.sadd(b"a", &[b"x", b"y"]).unwrap();
        db.sadd(b"b", &[b"y"]).unwrap();
        db.sadd(b"dest", &[b"old"]).unwrap();

        assert_eq!(db.sdiffstore(b"dest", &[b"a", b"b"]).unwrap(), 1);
        assert_eq!(db.smembers(b"dest").unwrap(), vec![b"x".to_vec()]);

        assert_eq!(db.sunionstore(b"dest", &[b"a", b"b"]).unwrap(), 2);
        assert_eq!(db.scard(b"dest").unwrap(), 2);

        assert_eq!(db.sinterstore(b"dest", &[b"a", b"missing"]).unwrap(), 0);
        assert!(db.scard(b"dest").unwrap_err().is_not_found());
    }

    #[test]
    fn sscan_pages_through_members() {
        let (_dir, db) = open();
        let members: Vec<Vec<u8>> = (0..10).map(|i| format!("m{i:02}").into_bytes()).collect();
        let refs: Vec<&[u8]> = members.iter().map(Vec::as_slice).collect();
        db.sadd(b"s", &refs).unwrap();

        let (cursor, first) = db.sscan(b"s", 0, b"*", 4).unwrap();
        assert_eq!(first.len(), 4);
        assert_ne!(cursor, 0);
        let (cursor, second) = db.sscan(b"s", cursor, b"*", 4).unwrap();
        assert_eq!(second.len(), 4);
        let (cursor, third) = db.sscan(b"s", cursor, b"*", 4).unwrap();
        assert_eq!(third.len(), 2);
        assert_eq!(cursor, 0);

        let mut all: Vec<Vec<u8>> = first.into_iter().chain(second).chain(third).collect();
        all.sort();
        assert_eq!(all, members);
    }

    #[test]
    fn sscan_filters_by_pattern() {
        let (_dir, db) = open();
        db.sadd(b"s", &[b"apple", b"banana", b"avocado"]).unwrap();
        let (cursor, matched) = db.sscan(b"s", 0, b"a*", 100).unwrap();
        assert_eq!(cursor, 0);
        assert_eq!(matched, vec![b"apple".to_vec(), b"avocado".to_vec()]);
    }

    #[test]
    fn invalid_cursor_restarts() {
        let (_dir, db) = open();
        db.sadd(b"s", &[b"a", b"b"]).unwrap();
        let (cursor, members) = db.sscan(b"s", 987654, b"*", 10).unwrap();
        assert_eq!(cursor, 0);
        assert_eq!(members.len(), 2);
    }
}
