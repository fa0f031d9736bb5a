//! Compaction filters.
//!
//! Logical deletion leaves physical garbage behind: string records whose
//! timestamp has passed, meta records that are both stale and empty, and
//! sub-records orphaned by a version bump. These filters reclaim all three
//! during background compaction. Filters are purely decisional — they
//! return keep or drop and never rewrite.

use std::ffi::CStr;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rocksdb::compaction_filter::{CompactionFilter, Decision};
use rocksdb::compaction_filter_factory::{CompactionFilterContext, CompactionFilterFactory};
use tracing::trace;

use crate::format::keys::SubKey;
use crate::format::meta::{CollectionMeta, ListMeta};
use crate::format::strings::StringValue;
use crate::store::{Db, META_CF};
use crate::time;

/// Which meta shape a filter should decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetaLayout {
    Collection,
    List,
}

/// The fields a filter needs from either meta shape.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MetaSummary {
    pub count: u64,
    pub version: u32,
    pub timestamp: u32,
}

impl MetaLayout {
    pub(crate) fn summarize(self, raw: &[u8]) -> Option<MetaSummary> {
        match self {
            MetaLayout::Collection => CollectionMeta::decode(raw).ok().map(|m| MetaSummary {
                count: u64::from(m.count),
                version: m.version,
                timestamp: m.timestamp,
            }),
            MetaLayout::List => ListMeta::decode(raw).ok().map(|m| MetaSummary {
                count: m.count,
                version: m.version,
                timestamp: m.timestamp,
            }),
        }
    }
}

/// Late-bound handle to the DB that owns the column family being compacted.
///
/// Filter factories are constructed before the DB they serve exists, and a
/// compaction could in principle fire before the handler publishes the
/// handle; until then every filter defaults to keep. Holding a `Weak`
/// (rather than an `Arc`) keeps the DB's own factories from pinning it
/// alive forever.
#[derive(Clone)]
pub(crate) struct DbRef {
    inner: Arc<RwLock<Weak<Db>>>,
}

impl DbRef {
    pub(crate) fn unset() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Weak::new())),
        }
    }

    pub(crate) fn install(&self, db: &Arc<Db>) {
        *self.inner.write() = Arc::downgrade(db);
    }

    pub(crate) fn db(&self) -> Option<Arc<Db>> {
        self.inner.read().upgrade()
    }
}

/// Drops string records whose inline timestamp has passed.
pub(crate) struct StringsFilter;

impl CompactionFilter for StringsFilter {
    fn filter(&mut self, _level: u32, _key: &[u8], value: &[u8]) -> Decision {
        match StringValue::decode(value) {
            Ok(parsed) if parsed.is_stale() => Decision::Remove,
            _ => Decision::Keep,
        }
    }

    fn name(&self) -> &CStr {
        c"cinder.strings-filter"
    }
}

pub(crate) struct StringsFilterFactory;

impl CompactionFilterFactory for StringsFilterFactory {
    type Filter = StringsFilter;

    fn create(&mut self, _context: CompactionFilterContext) -> Self::Filter {
        StringsFilter
    }

    fn name(&self) -> &CStr {
        c"cinder.strings-filter-factory"
    }
}

/// Drops meta records that are stale and logically empty. Anything else —
/// live, or merely empty with no expiry — is kept, because the record is
/// still the authority for its key.
pub(crate) struct MetaFilter {
    layout: MetaLayout,
    filter_name: &'static CStr,
}

impl CompactionFilter for MetaFilter {
    fn filter(&mut self, _level: u32, key: &[u8], value: &[u8]) -> Decision {
        let Some(meta) = self.layout.summarize(value) else {
            return Decision::Keep;
        };
        if meta.count == 0 && time::is_expired(meta.timestamp, time::now_seconds()) {
            trace!(key = ?String::from_utf8_lossy(key), version = meta.version, "dropping stale meta");
            Decision::Remove
        } else {
            Decision::Keep
        }
    }

    fn name(&self) -> &CStr {
        self.filter_name
    }
}

pub(crate) struct MetaFilterFactory {
    layout: MetaLayout,
    filter_name: &'static CStr,
    factory_name: &'static CStr,
}

impl MetaFilterFactory {
    pub(crate) fn new(
        layout: MetaLayout,
        filter_name: &'static CStr,
        factory_name: &'static CStr,
    ) -> Self {
        Self {
            layout,
            filter_name,
            factory_name,
        }
    }
}

impl CompactionFilterFactory for MetaFilterFactory {
    type Filter = MetaFilter;

    fn create(&mut self, _context: CompactionFilterContext) -> Self::Filter {
        MetaFilter {
            layout: self.layout,
            filter_name: self.filter_name,
        }
    }

    fn name(&self) -> &CStr {
        self.factory_name
    }
}

/// What the filter learned about the current user key's meta record.
enum MetaState {
    Absent,
    Live(MetaSummary),
}

/// Drops sub-records whose owning meta is gone, expired, version-bumped,
/// or logically empty.
///
/// Consecutive sub-records of one user key arrive together (every sub-key
/// layout leads with the user key), so the meta lookup is cached until the
/// user key changes — one point read per key per compaction, not per
/// sub-record.
pub(crate) struct SubRecordFilter {
    back: DbRef,
    layout: MetaLayout,
    filter_name: &'static CStr,
    cur_key: Option<Vec<u8>>,
    cur_meta: MetaState,
}

impl SubRecordFilter {
    fn refresh_meta(&mut self, db: &Db, user_key: &[u8]) -> bool {
        let Some(meta_cf) = db.cf_handle(META_CF) else {
            return false;
        };
        match db.get_cf(&meta_cf, user_key) {
            Ok(Some(raw)) => match self.layout.summarize(&raw) {
                Some(meta) => self.cur_meta = MetaState::Live(meta),
                // undecodable meta: cannot judge, keep the sub-record
                None => return false,
            },
            Ok(None) => self.cur_meta = MetaState::Absent,
            // lookup failed: keep, and do not cache the failure
            Err(_) => return false,
        }
        self.cur_key = Some(user_key.to_vec());
        true
    }
}

impl CompactionFilter for SubRecordFilter {
    fn filter(&mut self, _level: u32, key: &[u8], _value: &[u8]) -> Decision {
        let Ok(sub) = SubKey::parse(key) else {
            return Decision::Keep;
        };
        // The back-reference is published right after open; a compaction
        // racing that window keeps everything and retries next round.
        let Some(db) = self.back.db() else {
            return Decision::Keep;
        };

        if self.cur_key.as_deref() != Some(sub.user_key)
            && !self.refresh_meta(&db, sub.user_key)
        {
            self.cur_key = None;
            return Decision::Keep;
        }

        match &self.cur_meta {
            MetaState::Absent => Decision::Remove,
            MetaState::Live(meta) => {
                if time::is_expired(meta.timestamp, time::now_seconds())
                    || meta.version > sub.version
                    || meta.count == 0
                {
                    trace!(
                        key = ?String::from_utf8_lossy(sub.user_key),
                        sub_version = sub.version,
                        meta_version = meta.version,
                        "dropping orphaned sub-record"
                    );
                    Decision::Remove
                } else {
                    Decision::Keep
                }
            }
        }
    }

    fn name(&self) -> &CStr {
        self.filter_name
    }
}

pub(crate) struct SubRecordFilterFactory {
    back: DbRef,
    layout: MetaLayout,
    filter_name: &'static CStr,
    factory_name: &'static CStr,
}

impl SubRecordFilterFactory {
    pub(crate) fn new(
        back: DbRef,
        layout: MetaLayout,
        filter_name: &'static CStr,
        factory_name: &'static CStr,
    ) -> Self {
        Self {
            back,
            layout,
            filter_name,
            factory_name,
        }
    }
}

impl CompactionFilterFactory for SubRecordFilterFactory {
    type Filter = SubRecordFilter;

    fn create(&mut self, _context: CompactionFilterContext) -> Self::Filter {
        SubRecordFilter {
            back: self.back.clone(),
            layout: self.layout,
            filter_name: self.filter_name,
            cur_key: None,
            cur_meta: MetaState::Absent,
        }
    }

    fn name(&self) -> &CStr {
        self.factory_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::NO_EXPIRY;

    fn run_meta_filter(layout: MetaLayout, value: &[u8]) -> Decision {
        let mut filter = MetaFilter {
            layout,
            filter_name: c"test",
        };
        filter.filter(0, b"k", value)
    }

    #[test]
    fn live_meta_is_kept() {
        let meta = CollectionMeta::create(3);
        assert!(matches!(
            run_meta_filter(MetaLayout::Collection, &meta.encode()),
            Decision::Keep
        ));
    }

    #[test]
    fn empty_but_unexpired_meta_is_kept() {
        let mut meta = CollectionMeta::create(3);
        meta.count = 0;
        meta.timestamp = NO_EXPIRY;
        assert!(matches!(
            run_meta_filter(MetaLayout::Collection, &meta.encode()),
            Decision::Keep
        ));
    }

    #[test]
    fn stale_empty_meta_is_dropped() {
        let mut meta = CollectionMeta::create(0);
        meta.count = 0;
        meta.timestamp = 1;
        assert!(matches!(
            run_meta_filter(MetaLayout::Collection, &meta.encode()),
            Decision::Remove
        ));
    }

    #[test]
    fn stale_nonempty_meta_is_kept_for_reads() {
        let mut meta = CollectionMeta::create(4);
        meta.timestamp = 1;
        assert!(matches!(
            run_meta_filter(MetaLayout::Collection, &meta.encode()),
            Decision::Keep
        ));
    }

    #[test]
    fn stale_empty_list_meta_is_dropped() {
        let mut meta = ListMeta::create();
        meta.timestamp = 1;
        assert!(matches!(
            run_meta_filter(MetaLayout::List, &meta.encode()),
            Decision::Remove
        ));
    }

    #[test]
    fn strings_filter_drops_only_expired() {
        let mut filter = StringsFilter;
        let live = crate::format::strings::encode(b"v", NO_EXPIRY);
        let dead = crate::format::strings::encode(b"v", 1);
        assert!(matches!(filter.filter(0, b"k", &live), Decision::Keep));
        assert!(matches!(filter.filter(0, b"k", &dead), Decision::Remove));
    }

    #[test]
    fn sub_filter_keeps_everything_before_handles_publish() {
        let mut filter = SubRecordFilter {
            back: DbRef::unset(),
            layout: MetaLayout::Collection,
            filter_name: c"test",
            cur_key: None,
            cur_meta: MetaState::Absent,
        };
        let key = crate::format::keys::member_key(b"k", 1, b"m");
        assert!(matches!(filter.filter(0, &key, b""), Decision::Keep));
    }
}
