//! RocksDB storage for Larder.
//!
//! The collection keys map straight onto RocksDB keys in the default column
//! family; one directory holds one inventory.

use std::path::Path;

use larder_core::KvStore;
use rocksdb::{DB, Options};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("RocksDB error: {0}")]
pub struct RocksError(#[from] rocksdb::Error);

/// An inventory and its history kept in a RocksDB directory.
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Opens the inventory directory at `path`.
    ///
    /// A missing directory starts out as an empty inventory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RocksError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }
}

impl KvStore for RocksStore {
    type Error = RocksError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.db.get(key)?)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.db.put(key, value)?;
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.db.get_pinned(key)?.is_some())
    }
}
