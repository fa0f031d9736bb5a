//! Open-time configuration.
//!
//! Everything beyond `create_if_missing` passes straight through to the
//! underlying store; the engine itself has no tunables.

use rocksdb::{BlockBasedOptions, Cache, DBCompressionType, Options};

/// Options recognized when opening a [`Store`](crate::Store).
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Create the per-type directories and column families if absent.
    /// Required for the first open of a path.
    pub create_if_missing: bool,
    /// Shared LRU block cache size in bytes. `None` uses the store default.
    pub block_cache_size: Option<usize>,
    /// Memtable size in bytes. `None` uses the store default.
    pub write_buffer_size: Option<usize>,
    /// On-disk compression for all column families.
    pub compression: DBCompressionType,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            block_cache_size: None,
            write_buffer_size: None,
            compression: DBCompressionType::None,
        }
    }
}

impl StoreOptions {
    /// Base rocksdb options shared by every type handler; per-handler code
    /// layers comparators and compaction filters on top.
    pub(crate) fn db_options(&self) -> Options {
        let mut opts = Options::default();
        opts.create_if_missing(self.create_if_missing);
        opts.create_missing_column_families(self.create_if_missing);
        opts.set_compression_type(self.compression);
        if let Some(size) = self.write_buffer_size {
            opts.set_write_buffer_size(size);
        }
        if let Some(size) = self.block_cache_size {
            let cache = Cache::new_lru_cache(size);
            let mut block = BlockBasedOptions::default();
            block.set_block_cache(&cache);
            opts.set_block_based_table_factory(&block);
        }
        opts
    }
}
