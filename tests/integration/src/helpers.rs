//! Shared helpers for store-level integration tests.

#![allow(dead_code)]

use cinder_core::{Store, StoreOptions};
use tempfile::TempDir;

/// Opens a fresh store in a temp directory. Keep the `TempDir` alive for
/// the duration of the test; dropping it deletes the store.
pub fn open_store() -> (TempDir, Store) {
    let dir = TempDir::new().expect("create temp dir");
    let store = Store::open(&StoreOptions::default(), dir.path()).expect("open store");
    (dir, store)
}

/// Reopens a store at the same path, as a process restart would.
pub fn reopen(dir: &TempDir) -> Store {
    Store::open(&StoreOptions::default(), dir.path()).expect("reopen store")
}
