use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::RwLock;

/// A string-keyed byte store holding the persisted collections.
///
/// Stores operate on raw bytes. Encoding and decoding of records is handled
/// by [`RecordStore`](crate::RecordStore); stores know nothing about food
/// items or history.
///
/// All methods take `&self` to support stores with internal locking (e.g., RocksDB).
pub trait KvStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Retrieves the bytes stored under `key`, or None if not present.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Stores bytes under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), Self::Error>;

    /// Checks whether `key` exists in the store.
    fn has(&self, key: &str) -> Result<bool, Self::Error>;

    /// False when there is no storage substrate behind this store.
    fn is_available(&self) -> bool {
        true
    }
}

impl<S: KvStore> KvStore for &S {
    type Error = S::Error;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        (*self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        (*self).put(key, value)
    }

    fn has(&self, key: &str) -> Result<bool, Self::Error> {
        (*self).has(key)
    }

    fn is_available(&self) -> bool {
        (*self).is_available()
    }
}

/// An in-memory store backed by a HashMap.
///
/// Useful for testing and for throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.data.read().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.data
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.data.read().unwrap().contains_key(key))
    }
}

/// A store for contexts with no storage substrate at all.
///
/// Reads find nothing and writes are dropped. This is a normal operating
/// mode, not a failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl KvStore for UnavailableStore {
    type Error = Infallible;

    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn has(&self, _key: &str) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_available(&self) -> bool {
        false
    }
}
