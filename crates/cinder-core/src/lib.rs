//! cinder-core: Redis-style data types over an embedded ordered store.
//!
//! Strings, hashes, lists, sets, and sorted sets, each mapped onto column
//! families of an ordered key-value store via a meta-record protocol:
//! every typed key owns one meta record (existence, logical size, version,
//! expiry) plus sub-records keyed by `(user_key, version, ...)`. Deleting
//! or expiring a key bumps the version — an O(1) logical delete — and
//! compaction filters reclaim the orphaned sub-records in the background.
//!
//! This is an embedded library: open a [`Store`] at a directory and call
//! typed commands. There is no network surface, no replication, and no
//! cluster layer; concurrency comes from the caller, mediated by per-key
//! locks and store snapshots.

mod compare;
mod cursor;
mod engine;
mod error;
mod filter;
mod format;
mod lock;
mod options;
mod store;
mod time;
mod util;

pub use engine::{DataType, Store, TypeStatus};
pub use error::{Error, Result};
pub use options::StoreOptions;
pub use store::lists::InsertPosition;
pub use store::strings::BitOperation;
pub use store::zsets::{Aggregate, ScoreMember};
