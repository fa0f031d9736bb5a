//! Per-key advisory locking.
//!
//! Write commands hold a key's lock for the whole read-modify-write; pure
//! reads take a snapshot instead. Locks are process-local: the underlying
//! store still mediates actual IO.
//!
//! Keys hash onto a fixed array of mutex shards. Multi-key acquisition
//! sorts and dedups the shard indices first — that is the deterministic
//! total order that makes concurrent multi-key commands deadlock-free, and
//! the dedup keeps two keys that collide onto one shard from self-deadlocking.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use parking_lot::{Mutex, MutexGuard};

const SHARD_COUNT: usize = 1024;

pub(crate) struct LockManager {
    shards: Vec<Mutex<()>>,
}

impl LockManager {
    pub(crate) fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(())).collect(),
        }
    }

    fn shard_for(&self, key: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    /// Blocks until the key's shard is free, then returns a scoped guard.
    pub(crate) fn lock(&self, key: &[u8]) -> RecordLock<'_> {
        RecordLock {
            _guard: self.shards[self.shard_for(key)].lock(),
        }
    }

    /// Acquires locks for every key in one operation.
    pub(crate) fn multi_lock<K: AsRef<[u8]>>(&self, keys: &[K]) -> MultiRecordLock<'_> {
        let mut indices: Vec<usize> = keys.iter().map(|k| self.shard_for(k.as_ref())).collect();
        indices.sort_unstable();
        indices.dedup();
        MultiRecordLock {
            guards: indices.into_iter().map(|i| self.shards[i].lock()).collect(),
        }
    }
}

/// Exclusive hold on a single key, released on drop.
pub(crate) struct RecordLock<'a> {
    _guard: MutexGuard<'a, ()>,
}

/// Exclusive hold on a set of keys. Guards release in reverse acquisition
/// order on scope exit.
pub(crate) struct MultiRecordLock<'a> {
    guards: Vec<MutexGuard<'a, ()>>,
}

impl Drop for MultiRecordLock<'_> {
    fn drop(&mut self) {
        while self.guards.pop().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn lock_is_exclusive_per_key() {
        let mgr = Arc::new(LockManager::new());
        let counter = Arc::new(Mutex::new(0u32));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mgr = Arc::clone(&mgr);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let _guard = mgr.lock(b"contended");
                        let mut c = counter.lock();
                        *c += 1;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*counter.lock(), 800);
    }

    #[test]
    fn multi_lock_with_duplicate_keys_does_not_deadlock() {
        let mgr = LockManager::new();
        let _guard = mgr.multi_lock(&[b"same".as_slice(), b"same".as_slice()]);
    }

    #[test]
    fn crossed_multi_lock_orders_deterministically() {
        let mgr = Arc::new(LockManager::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mgr = Arc::clone(&mgr);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let pair: [&[u8]; 2] = if i % 2 == 0 {
                            [b"alpha", b"beta"]
                        } else {
                            [b"beta", b"alpha"]
                        };
                        let _guard = mgr.multi_lock(&pair);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn single_lock_released_on_drop() {
        let mgr = LockManager::new();
        {
            let _guard = mgr.lock(b"k");
        }
        let _again = mgr.lock(b"k");
    }
}
