//! Bounded LRU cursor stores.
//!
//! SCAN-family commands are stateless on the wire but resumable: each call
//! that suspends records its resume point under an opaque integer cursor.
//! The stores are capped, evicting the least-recently-touched entry, so a
//! client that abandons a scan costs a bounded amount of memory. A cursor
//! that has been evicted (or was never issued) restarts the scan from the
//! beginning, which is exactly Redis's contract for invalid cursors.

use std::collections::VecDeque;
use std::hash::Hash;

use ahash::AHashMap;
use parking_lot::Mutex;

/// Default capacity for every cursor store in the engine.
pub(crate) const CURSOR_STORE_CAPACITY: usize = 5000;

/// A small LRU map. Reads promote; inserts evict from the cold end once
/// the capacity is exceeded.
pub(crate) struct LruCache<K, V> {
    map: AHashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            map: AHashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub(crate) fn get(&mut self, key: &K) -> Option<V> {
        let value = self.map.get(key)?.clone();
        self.touch(key);
        Some(value)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_front(key);
        while self.map.len() > self.capacity {
            if let Some(cold) = self.order.pop_back() {
                self.map.remove(&cold);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_front(key.clone());
    }
}

/// The facade's cursor store: integer cursor → resume marker
/// (`type tag || next user key`).
pub(crate) struct CursorStore {
    inner: Mutex<LruCache<u64, Vec<u8>>>,
}

impl CursorStore {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Looks up (and promotes) a cursor's resume marker.
    pub(crate) fn start_point(&self, cursor: u64) -> Option<Vec<u8>> {
        self.inner.lock().get(&cursor)
    }

    /// Stores a resume marker, bumping the requested cursor until it does
    /// not collide with one already outstanding. Returns the cursor the
    /// caller should hand back to the client.
    pub(crate) fn store(&self, requested: u64, marker: Vec<u8>) -> u64 {
        let mut inner = self.inner.lock();
        let mut cursor = requested.max(1);
        while inner.contains(&cursor) {
            cursor += 1;
        }
        inner.insert(cursor, marker);
        cursor
    }
}

/// Per-handler SSCAN store: `key || pattern || cursor` → next member.
pub(crate) struct MemberCursorStore {
    inner: Mutex<LruCache<Vec<u8>, Vec<u8>>>,
}

impl MemberCursorStore {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn index_key(key: &[u8], pattern: &[u8], cursor: u64) -> Vec<u8> {
        let mut out = Vec::with_capacity(key.len() + pattern.len() + 24);
        out.extend_from_slice(key);
        out.push(b'_');
        out.extend_from_slice(pattern);
        out.push(b'_');
        out.extend_from_slice(cursor.to_string().as_bytes());
        out
    }

    pub(crate) fn start_member(&self, key: &[u8], pattern: &[u8], cursor: u64) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .get(&Self::index_key(key, pattern, cursor))
    }

    pub(crate) fn store_next_member(
        &self,
        key: &[u8],
        pattern: &[u8],
        cursor: u64,
        next_member: Vec<u8>,
    ) {
        self.inner
            .lock()
            .insert(Self::index_key(key, pattern, cursor), next_member);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_cold_entries() {
        let mut lru = LruCache::new(2);
        lru.insert(1, "a");
        lru.insert(2, "b");
        lru.insert(3, "c");
        assert_eq!(lru.len(), 2);
        assert!(lru.get(&1).is_none());
        assert_eq!(lru.get(&3), Some("c"));
    }

    #[test]
    fn reads_promote() {
        let mut lru = LruCache::new(2);
        lru.insert(1, "a");
        lru.insert(2, "b");
        assert_eq!(lru.get(&1), Some("a"));
        lru.insert(3, "c");
        // 2 was coldest after 1's promotion
        assert!(lru.get(&2).is_none());
        assert_eq!(lru.get(&1), Some("a"));
    }

    #[test]
    fn reinsert_updates_in_place() {
        let mut lru = LruCache::new(2);
        lru.insert(1, "a");
        lru.insert(1, "a2");
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.get(&1), Some("a2"));
    }

    #[test]
    fn cursor_store_avoids_collisions() {
        let store = CursorStore::new(10);
        let first = store.store(5, b"kaaa".to_vec());
        assert_eq!(first, 5);
        let second = store.store(5, b"hbbb".to_vec());
        assert_eq!(second, 6);
        assert_eq!(store.start_point(5), Some(b"kaaa".to_vec()));
        assert_eq!(store.start_point(6), Some(b"hbbb".to_vec()));
        assert_eq!(store.start_point(7), None);
    }

    #[test]
    fn zero_cursor_is_never_issued() {
        let store = CursorStore::new(10);
        assert!(store.store(0, b"k".to_vec()) >= 1);
    }

    #[test]
    fn member_store_is_keyed_by_key_pattern_cursor() {
        let store = MemberCursorStore::new(10);
        store.store_next_member(b"s", b"*", 3, b"mmm".to_vec());
        assert_eq!(store.start_member(b"s", b"*", 3), Some(b"mmm".to_vec()));
        assert_eq!(store.start_member(b"s", b"x*", 3), None);
        assert_eq!(store.start_member(b"s", b"*", 4), None);
    }
}
