//! Fjall storage for Larder.
//!
//! Each inventory lives in one keyspace, holding the item and history arrays
//! plus the schema stamp under the keys `RecordStore` uses.

use std::path::Path;

use fjall::{Database, Keyspace, KeyspaceCreateOptions};
use larder_core::KvStore;
use thiserror::Error;

pub const DEFAULT_KEYSPACE: &str = "larder";

#[derive(Debug, Error)]
#[error("Fjall error: {0}")]
pub struct FjallError(#[from] fjall::Error);

/// One household's inventory inside a Fjall database directory.
pub struct FjallStore {
    keyspace: Keyspace,
    // owns the journal the keyspace writes to
    _database: Database,
}

impl FjallStore {
    /// Opens the `larder` keyspace under `path`.
    ///
    /// A missing directory starts out as an empty inventory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FjallError> {
        Self::open_keyspace(path, DEFAULT_KEYSPACE)
    }

    /// Opens the inventory stored in `keyspace` under `path`.
    ///
    /// Separate keyspaces hold independent inventories in one directory.
    pub fn open_keyspace(path: impl AsRef<Path>, keyspace: &str) -> Result<Self, FjallError> {
        let database = Database::builder(path).open()?;
        let keyspace = database.keyspace(keyspace, || KeyspaceCreateOptions::default())?;
        Ok(Self {
            keyspace,
            _database: database,
        })
    }
}

impl KvStore for FjallStore {
    type Error = FjallError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.keyspace.get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.keyspace.insert(key.as_bytes(), value)?;
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, Self::Error> {
        self.keyspace.contains_key(key.as_bytes()).map_err(Into::into)
    }
}
